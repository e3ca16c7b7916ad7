use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Result, WindowError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl From<Color> for wgpu::Color {
    fn from(color: Color) -> Self {
        wgpu::Color {
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        }
    }
}

/// 录制到帧编码器，view 为本帧画面
pub type EncodeFn =
    Box<dyn FnOnce(&wgpu::Device, &mut wgpu::CommandEncoder, &wgpu::TextureView) + Send>;

pub enum Command {
    /// 帧清屏颜色，最后一次生效
    Clear(Color),
    Encode(EncodeFn),
    /// 预先录制好的命令，先于帧编码器提交
    Submit(wgpu::CommandBuffer),
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Clear(color) => f.debug_tuple("Clear").field(color).finish(),
            Command::Encode(_) => f.write_str("Encode(..)"),
            Command::Submit(_) => f.write_str("Submit(..)"),
        }
    }
}

/// 一帧取出的命令
#[derive(Default)]
pub struct FrameCommands {
    pub clear: Option<Color>,
    pub buffers: Vec<wgpu::CommandBuffer>,
    pub passes: Vec<EncodeFn>,
}

impl FrameCommands {
    pub fn is_empty(&self) -> bool {
        self.clear.is_none() && self.buffers.is_empty() && self.passes.is_empty()
    }
}

/// 跳帧期间最多积压的编码/提交命令数
pub const MAX_PENDING: usize = 256;

/// 清屏色单独保存，只保留最后一次
#[derive(Debug, Default)]
pub struct CommandList {
    clear: Option<Color>,
    commands: Vec<Command>,
    closed: bool,
}

impl CommandList {
    pub fn new() -> Self {
        Self::default()
    }

    /// 积压满时拒绝编码/提交命令，清屏色总是覆盖
    pub fn push(&mut self, command: Command) -> Result<()> {
        if self.closed {
            return Err(WindowError::QueueClosed);
        }
        match command {
            Command::Clear(color) => self.clear = Some(color),
            command if self.commands.len() >= MAX_PENDING => {
                trace!("drop {command:?}, {MAX_PENDING} pending");
                return Err(WindowError::QueueFull(MAX_PENDING));
            }
            command => self.commands.push(command),
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.commands.len() + usize::from(self.clear.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// 关闭后丢弃未提交的命令
    pub fn close(&mut self) {
        self.closed = true;
        self.clear = None;
        self.commands.clear();
    }

    pub fn take_frame(&mut self) -> FrameCommands {
        let mut frame = FrameCommands {
            clear: self.clear.take(),
            ..Default::default()
        };
        for command in self.commands.drain(..) {
            match command {
                Command::Clear(color) => frame.clear = Some(color),
                Command::Encode(pass) => frame.passes.push(pass),
                Command::Submit(buffer) => frame.buffers.push(buffer),
            }
        }
        frame
    }
}

/// 窗口的命令队列，可跨线程录制，由窗口在 `send_frame` 中取出
pub struct CommandQueue {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    pending: Mutex<CommandList>,
}

impl CommandQueue {
    pub(crate) fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        Self {
            device,
            queue,
            pending: Mutex::new(CommandList::new()),
        }
    }

    fn list(&self) -> MutexGuard<'_, CommandList> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, command: Command) -> Result<()> {
        trace!("queue {command:?}");
        self.list().push(command)
    }

    pub fn clear(&self, color: Color) -> Result<()> {
        self.push(Command::Clear(color))
    }

    pub fn encode<F>(&self, pass: F) -> Result<()>
    where
        F: FnOnce(&wgpu::Device, &mut wgpu::CommandEncoder, &wgpu::TextureView) + Send + 'static,
    {
        self.push(Command::Encode(Box::new(pass)))
    }

    pub fn submit(&self, buffer: wgpu::CommandBuffer) -> Result<()> {
        self.push(Command::Submit(buffer))
    }

    pub fn pending(&self) -> usize {
        self.list().len()
    }

    pub fn is_closed(&self) -> bool {
        self.list().is_closed()
    }

    pub fn device(&self) -> &Arc<wgpu::Device> {
        &self.device
    }

    pub fn queue(&self) -> &Arc<wgpu::Queue> {
        &self.queue
    }

    pub(crate) fn close(&self) {
        self.list().close();
    }

    /// 按提交顺序生成命令：先预录制的，再是帧编码器
    pub(crate) fn record_frame(
        &self,
        view: &wgpu::TextureView,
        default_clear: Color,
    ) -> Vec<wgpu::CommandBuffer> {
        let FrameCommands {
            clear,
            mut buffers,
            passes,
        } = self.list().take_frame();

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });
        {
            let _clear_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("frame clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear.unwrap_or(default_clear).into()),
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });
        }
        for pass in passes {
            pass(&self.device, &mut encoder, view);
        }
        buffers.push(encoder.finish());
        buffers
    }
}

impl fmt::Debug for CommandQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandQueue")
            .field("pending", &*self.list())
            .finish_non_exhaustive()
    }
}
