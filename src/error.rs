use thiserror::Error;

/// 窗口与呈现错误
#[derive(Error, Debug)]
pub enum WindowError {
    #[error("invalid window size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("an event loop already exists in this process")]
    PlatformInUse,

    #[error("window creation failed: {0}")]
    Os(#[from] winit::error::OsError),

    #[error("surface creation failed: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible graphics adapter")]
    NoAdapter,

    #[error("device request failed: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    UnsupportedSurface,

    #[error("out of memory while acquiring a frame")]
    OutOfMemory,

    #[error("command queue is closed")]
    QueueClosed,

    #[error("command queue is full ({0} pending)")]
    QueueFull(usize),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("icon decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("bad icon: {0}")]
    BadIcon(#[from] winit::window::BadIcon),
}

pub type Result<T, E = WindowError> = std::result::Result<T, E>;
