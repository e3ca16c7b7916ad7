use std::sync::Arc;

use tracing::{debug, info, warn};
use winit::dpi::PhysicalSize;

use crate::config::WindowConfig;
use crate::error::{Result, WindowError};

/// 优先 sRGB 格式
pub fn select_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|format| format.is_srgb())
        .or_else(|| formats.first().copied())
}

/// `Fifo` 是所有表面都支持的模式
pub fn select_present_mode(vsync: bool, modes: &[wgpu::PresentMode]) -> wgpu::PresentMode {
    if vsync {
        return wgpu::PresentMode::Fifo;
    }
    [wgpu::PresentMode::Mailbox, wgpu::PresentMode::Immediate]
        .into_iter()
        .find(|mode| modes.contains(mode))
        .unwrap_or(wgpu::PresentMode::Fifo)
}

/// 零面积（最小化）返回 None，否则按设备上限截断
pub fn surface_extent(size: PhysicalSize<u32>, max_dimension: u32) -> Option<(u32, u32)> {
    if size.width == 0 || size.height == 0 {
        return None;
    }
    Some((size.width.min(max_dimension), size.height.min(max_dimension)))
}

/// 单个窗口的表面与设备
pub struct State {
    surface: wgpu::Surface,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    max_dimension: u32,
}

impl State {
    pub async fn new(
        instance: &wgpu::Instance,
        window: &winit::window::Window,
        window_config: &WindowConfig,
    ) -> Result<Self> {
        // 表面不能比窗口活得久，`Window` 先释放 state
        let surface = unsafe { instance.create_surface(window) }?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: window_config.power_preference.into(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(WindowError::NoAdapter)?;
        let info = adapter.get_info();
        info!("adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("mainwindow device"),
                    features: wgpu::Features::empty(),
                    limits: wgpu::Limits::default(),
                },
                None,
            )
            .await?;

        let caps = surface.get_capabilities(&adapter);
        let format = select_format(&caps.formats).ok_or(WindowError::UnsupportedSurface)?;
        let present_mode = select_present_mode(window_config.vsync, &caps.present_modes);
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let max_dimension = device.limits().max_texture_dimension_2d;
        let size = window.inner_size();
        let (width, height) = surface_extent(size, max_dimension).unwrap_or((1, 1));
        debug!("surface {format:?} {present_mode:?} {width}x{height}");

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        Ok(Self {
            surface,
            device: Arc::new(device),
            queue: Arc::new(queue),
            config,
            size,
            max_dimension,
        })
    }

    pub fn device(&self) -> &Arc<wgpu::Device> {
        &self.device
    }

    pub fn queue(&self) -> &Arc<wgpu::Queue> {
        &self.queue
    }

    /// 尺寸变化时重新配置，返回 false 表示无可绘制区域
    pub fn resize(&mut self, size: PhysicalSize<u32>) -> bool {
        let Some((width, height)) = surface_extent(size, self.max_dimension) else {
            return false;
        };
        if size != self.size {
            debug!("resize {}x{} -> {width}x{height}", self.size.width, self.size.height);
            self.size = size;
            self.config.width = width;
            self.config.height = height;
            self.configure();
        }
        true
    }

    fn configure(&self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// `None` 表示跳过本帧
    pub fn acquire(&mut self) -> Result<Option<wgpu::SurfaceTexture>> {
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                warn!("surface {e:?}, reconfiguring");
                self.configure();
                Ok(None)
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("timed out acquiring frame");
                Ok(None)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => Err(WindowError::OutOfMemory),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::{PresentMode, TextureFormat};

    #[test]
    fn srgb_format_preferred() {
        let formats = [TextureFormat::Bgra8Unorm, TextureFormat::Bgra8UnormSrgb];
        assert_eq!(select_format(&formats), Some(TextureFormat::Bgra8UnormSrgb));
    }

    #[test]
    fn first_format_without_srgb() {
        let formats = [TextureFormat::Rgba16Float, TextureFormat::Bgra8Unorm];
        assert_eq!(select_format(&formats), Some(TextureFormat::Rgba16Float));
        assert_eq!(select_format(&[]), None);
    }

    #[test]
    fn vsync_is_always_fifo() {
        let modes = [PresentMode::Immediate, PresentMode::Mailbox, PresentMode::Fifo];
        assert_eq!(select_present_mode(true, &modes), PresentMode::Fifo);
    }

    #[test]
    fn unsynced_prefers_mailbox_then_immediate() {
        let all = [PresentMode::Fifo, PresentMode::Immediate, PresentMode::Mailbox];
        assert_eq!(select_present_mode(false, &all), PresentMode::Mailbox);

        let no_mailbox = [PresentMode::Fifo, PresentMode::Immediate];
        assert_eq!(select_present_mode(false, &no_mailbox), PresentMode::Immediate);

        assert_eq!(select_present_mode(false, &[PresentMode::Fifo]), PresentMode::Fifo);
    }

    #[test]
    fn zero_area_has_no_extent() {
        assert_eq!(surface_extent(PhysicalSize::new(0, 600), 8192), None);
        assert_eq!(surface_extent(PhysicalSize::new(800, 0), 8192), None);
    }

    #[test]
    fn extent_is_clamped_to_device_limit() {
        assert_eq!(surface_extent(PhysicalSize::new(800, 600), 8192), Some((800, 600)));
        assert_eq!(surface_extent(PhysicalSize::new(10000, 600), 8192), Some((8192, 600)));
    }
}
