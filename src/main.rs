#![windows_subsystem = "windows"]
use std::{env, thread, time::Duration};

use anyhow::Result;
use log_error::*;
use mainwindow::{AppConfig, Color, Event, Platform};
use time::{macros::format_description, UtcOffset};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::OffsetTime;

const IDLE: Duration = Duration::from_millis(10);

fn init_logging(config: &AppConfig) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::never(&config.log.directory, &config.log.file);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    // 取不到本地时区时用UTC
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let timer = OffsetTime::new(
        offset,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    );
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_timer(timer)
        .with_ansi(false)
        .init();
    guard
}

/// 按帧数循环色相
fn frame_color(frame: u64) -> Color {
    let t = (frame % 360) as f64 / 360.0 * std::f64::consts::TAU;
    Color::new(
        0.5 + 0.5 * t.sin(),
        0.5 + 0.5 * (t + 2.0).sin(),
        0.5 + 0.5 * (t + 4.0).sin(),
        1.0,
    )
}

fn main() -> Result<()> {
    let config = match env::args().nth(1) {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let _guard = init_logging(&config);

    let mut platform = Platform::new()?;
    let mut window = platform.create_window(&config.window)?;
    let queue = window.command_queue();

    loop {
        match platform.poll_event() {
            Event::Quit => break,
            Event::NoEvent => {}
        }
        let sent = window.frames_sent();
        // 跳帧时命令仍在队列中
        if queue.pending() == 0 {
            queue
                .clear(frame_color(sent))
                .log_error("写入命令队列失败");
        }
        window.send_frame().log_error("发送帧失败");
        if window.frames_sent() == sent {
            thread::sleep(IDLE);
        }
    }

    info!("quit after {} frames", window.frames_sent());
    window.destroy();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_colors_stay_in_range() {
        for frame in 0..720 {
            let color = frame_color(frame);
            for c in [color.r, color.g, color.b] {
                assert!((0.0..=1.0).contains(&c), "{frame}: {c}");
            }
            assert_eq!(color.a, 1.0);
        }
        assert_eq!(frame_color(0), frame_color(360));
    }
}
