use std::collections::VecDeque;

use tracing::debug;
use winit::event::WindowEvent;

/// 轮询结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum Event {
    #[default]
    NoEvent = -1,
    Quit = 0,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown event code {0}")]
pub struct UnknownEvent(pub i32);

impl Event {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Event::NoEvent),
            0 => Some(Event::Quit),
            _ => None,
        }
    }

    pub fn is_quit(self) -> bool {
        self == Event::Quit
    }
}

impl From<Event> for i32 {
    fn from(event: Event) -> Self {
        event.code()
    }
}

impl TryFrom<i32> for Event {
    type Error = UnknownEvent;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Event::from_code(code).ok_or(UnknownEvent(code))
    }
}

/// 原生事件映射，`LoopDestroyed` 在每次 pump 结束时都会出现，不能当作退出
pub fn translate<T>(event: &winit::event::Event<'_, T>) -> Option<Event> {
    match event {
        winit::event::Event::WindowEvent {
            window_id,
            event: WindowEvent::CloseRequested,
        } => {
            debug!("close requested for {window_id:?}");
            Some(Event::Quit)
        }
        _ => None,
    }
}

/// 待处理事件，先进先出
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        // NoEvent 只作为轮询结果
        if event != Event::NoEvent {
            self.events.push_back(event);
        }
    }

    pub fn pop(&mut self) -> Event {
        self.events.pop_front().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
