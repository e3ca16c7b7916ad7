//! 最小窗口接口：创建窗口、向命令队列录制、发送帧、轮询退出
//!
//! [`Platform`] 是显式入口；下面的自由函数（`create_window`、`get_command_queue`、
//! `send_frame`、`destroy_window`、`poll_event`）作用于每个线程的默认平台
//!
//! ```no_run
//! use mainwindow::{Color, Event};
//!
//! let mut window = mainwindow::create_window(640, 480)?;
//! let queue = mainwindow::get_command_queue(&window);
//! while mainwindow::poll_event() != Event::Quit {
//!     queue.clear(Color::new(0.1, 0.2, 0.3, 1.0))?;
//!     mainwindow::send_frame(&mut window)?;
//! }
//! mainwindow::destroy_window(window);
//! # Ok::<(), mainwindow::WindowError>(())
//! ```

use std::cell::RefCell;
use std::sync::Arc;

pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod image;
pub mod platform;
pub mod render;
pub mod window;

pub use crate::command::{Color, Command, CommandQueue};
pub use crate::config::{AppConfig, LogConfig, PowerPreference, WindowConfig};
pub use crate::error::{ConfigError, Result, WindowError};
pub use crate::event::Event;
pub use crate::platform::Platform;
pub use crate::window::{validate_size, Window};

thread_local! {
    static DEFAULT_PLATFORM: RefCell<Option<Platform>> = RefCell::new(None);
}

fn with_platform<R>(f: impl FnOnce(&mut Platform) -> Result<R>) -> Result<R> {
    DEFAULT_PLATFORM.with(|cell| {
        let mut slot = cell.borrow_mut();
        let platform = match slot.take() {
            Some(platform) => platform,
            None => Platform::new()?,
        };
        f(slot.insert(platform))
    })
}

/// 在本线程的默认平台上创建窗口，尺寸非法时不会占用事件循环
pub fn create_window(width: u32, height: u32) -> Result<Window> {
    validate_size(width, height)?;
    with_platform(|platform| platform.create_window_sized(width, height))
}

pub fn create_window_with(config: &WindowConfig) -> Result<Window> {
    validate_size(config.width, config.height)?;
    with_platform(|platform| platform.create_window(config))
}

pub fn get_command_queue(window: &Window) -> Arc<CommandQueue> {
    window.command_queue()
}

pub fn send_frame(window: &mut Window) -> Result<()> {
    window.send_frame()
}

pub fn destroy_window(window: Window) {
    window.destroy();
}

/// 本线程尚未创建窗口时返回 `NoEvent`
pub fn poll_event() -> Event {
    DEFAULT_PLATFORM.with(|cell| {
        cell.borrow_mut()
            .as_mut()
            .map_or(Event::NoEvent, Platform::poll_event)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_without_platform_is_no_event() {
        assert_eq!(poll_event(), Event::NoEvent);
        assert_eq!(poll_event(), Event::NoEvent);
    }

    #[test]
    fn bad_size_does_not_start_platform() {
        assert!(matches!(
            create_window(0, 480),
            Err(WindowError::InvalidSize { width: 0, height: 480 })
        ));
        let config = WindowConfig::default().with_size(640, 0);
        assert!(matches!(
            create_window_with(&config),
            Err(WindowError::InvalidSize { width: 640, height: 0 })
        ));
        DEFAULT_PLATFORM.with(|cell| assert!(cell.borrow().is_none()));
    }
}
