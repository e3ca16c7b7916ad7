use std::sync::Arc;

use tracing::{debug, info};
use winit::dpi::PhysicalSize;
use winit::event_loop::EventLoopWindowTarget;
use winit::window::{WindowBuilder, WindowId};

use crate::command::{Color, CommandQueue};
use crate::config::WindowConfig;
use crate::error::{Result, WindowError};
use crate::image::load_icon;
use crate::render::State;

/// 宽高均须非零
pub fn validate_size(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(WindowError::InvalidSize { width, height });
    }
    Ok(())
}

/// 窗口：原生窗口 + 表面 + 命令队列
pub struct Window {
    // 字段顺序：表面先于原生窗口释放
    state: State,
    commands: Arc<CommandQueue>,
    window: winit::window::Window,
    clear_color: Color,
    frames: u64,
}

impl Window {
    pub(crate) fn new(
        event_loop: &EventLoopWindowTarget<()>,
        instance: &wgpu::Instance,
        config: &WindowConfig,
    ) -> Result<Self> {
        validate_size(config.width, config.height)?;
        let icon = config.icon.as_ref().map(load_icon).transpose()?;

        let window = WindowBuilder::new()
            .with_title(config.title.as_str())
            .with_window_icon(icon)
            .with_visible(false)
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .with_resizable(config.resizable)
            .build(event_loop)?;
        let state = pollster::block_on(State::new(instance, &window, config))?;
        let commands = Arc::new(CommandQueue::new(
            Arc::clone(state.device()),
            Arc::clone(state.queue()),
        ));
        window.set_visible(config.visible);
        info!(
            "created window {:?} {}x{} \"{}\"",
            window.id(),
            config.width,
            config.height,
            config.title
        );

        Ok(Self {
            state,
            commands,
            window,
            clear_color: config.clear_color,
            frames: 0,
        })
    }

    pub fn id(&self) -> WindowId {
        self.window.id()
    }

    /// 窗口存活期间始终是同一个队列
    pub fn command_queue(&self) -> Arc<CommandQueue> {
        Arc::clone(&self.commands)
    }

    /// 用队列中的命令呈现一帧，垂直同步时阻塞
    ///
    /// 最小化、表面丢失或获取超时都跳过本帧且不报错，跳帧时命令保留在队列中
    pub fn send_frame(&mut self) -> Result<()> {
        if !self.state.resize(self.window.inner_size()) {
            debug!("window {:?} has no area, frame skipped", self.id());
            return Ok(());
        }
        let Some(frame) = self.state.acquire()? else {
            return Ok(());
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let buffers = self.commands.record_frame(&view, self.clear_color);
        self.state.queue().submit(buffers);
        frame.present();
        self.frames += 1;
        Ok(())
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames
    }

    pub fn size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    pub fn title(&self) -> String {
        self.window.title()
    }

    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }

    pub fn set_visible(&self, visible: bool) {
        self.window.set_visible(visible);
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    /// 等同于 drop
    pub fn destroy(self) {}
}

impl Drop for Window {
    fn drop(&mut self) {
        self.commands.close();
        info!("destroyed window {:?} after {} frames", self.id(), self.frames);
    }
}
