use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};
use winit::event_loop::{EventLoop, EventLoopBuilder};
use winit::platform::run_return::EventLoopExtRunReturn;

use crate::config::WindowConfig;
use crate::error::{Result, WindowError};
use crate::event::{translate, Event, EventQueue};
use crate::window::Window;

// winit 每个进程只允许一个事件循环，释放后也不能再建
static LOOP_TAKEN: AtomicBool = AtomicBool::new(false);

/// 事件循环与图形实例，所有窗口都由它创建
pub struct Platform {
    instance: wgpu::Instance,
    events: EventQueue,
    event_loop: EventLoop<()>,
}

impl Platform {
    pub fn new() -> Result<Self> {
        if LOOP_TAKEN.swap(true, Ordering::AcqRel) {
            return Err(WindowError::PlatformInUse);
        }
        let event_loop = EventLoopBuilder::new().build();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        info!("platform started");
        Ok(Self {
            instance,
            events: EventQueue::new(),
            event_loop,
        })
    }

    pub fn create_window(&self, config: &WindowConfig) -> Result<Window> {
        Window::new(&self.event_loop, &self.instance, config)
    }

    pub fn create_window_sized(&self, width: u32, height: u32) -> Result<Window> {
        self.create_window(&WindowConfig::default().with_size(width, height))
    }

    /// 取任意窗口的下一个事件，没有则返回 `NoEvent`，不阻塞
    pub fn poll_event(&mut self) -> Event {
        if self.events.is_empty() {
            self.pump();
        }
        self.events.pop()
    }

    /// 非阻塞地处理一轮原生事件
    pub fn pump(&mut self) {
        let events = &mut self.events;
        self.event_loop.run_return(|event, _, control_flow| {
            control_flow.set_poll();
            match event {
                winit::event::Event::MainEventsCleared => control_flow.set_exit(),
                event => {
                    if let Some(event) = translate(&event) {
                        debug!("event {event:?}");
                        events.push(event);
                    }
                }
            }
        });
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }
}

impl Drop for Platform {
    fn drop(&mut self) {
        info!("platform stopped");
    }
}
