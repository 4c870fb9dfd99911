/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io::{self, IsTerminal, Write};

use chrono::Local;
use flume::{Receiver, Sender, TrySendError};
use slog::{Drain, Level, OwnedKVList, Record};

mod format;
use format::StdLogFormatter;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

#[derive(Clone, Debug)]
pub struct AsyncLogConfig {
    pub channel_capacity: usize,
    pub thread_name: String,
}

impl AsyncLogConfig {
    pub fn with_name(thread_name: &str) -> Self {
        AsyncLogConfig {
            channel_capacity: 1024,
            thread_name: thread_name.to_string(),
        }
    }
}

impl Default for AsyncLogConfig {
    fn default() -> Self {
        AsyncLogConfig::with_name("log-async")
    }
}

pub struct StdLogValue {
    level: Level,
    message: String,
    kv_pairs: Vec<(String, String)>,
    location: Option<String>,
}

impl StdLogValue {
    fn message_str(&self) -> &str {
        if self.message.is_empty() {
            "()"
        } else {
            &self.message
        }
    }
}

/// A slog drain that formats records in the calling thread and writes
/// them to stderr from a dedicated thread.
///
/// Records are dropped if the channel is full.
pub struct AsyncStdLogger {
    sender: Sender<StdLogValue>,
    formatter: StdLogFormatter,
}

impl Drain for AsyncStdLogger {
    type Ok = ();
    type Err = slog::Error;

    fn log(&self, record: &Record, logger_values: &OwnedKVList) -> Result<(), slog::Error> {
        let v = self.formatter.format_slog(record, logger_values)?;
        match self.sender.try_send(v) {
            Ok(_) => Ok(()),
            // the io thread is slow or gone, no way to report it
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => Ok(()),
        }
    }
}

pub fn new_async_logger(
    async_conf: &AsyncLogConfig,
    append_code_position: bool,
) -> AsyncStdLogger {
    let (sender, receiver) = flume::bounded::<StdLogValue>(async_conf.channel_capacity);

    let io_thread = AsyncIoThread { receiver };
    let _detached_thread = std::thread::Builder::new()
        .name(async_conf.thread_name.clone())
        .spawn(move || io_thread.run_with_stderr());

    AsyncStdLogger {
        sender,
        formatter: StdLogFormatter::new(append_code_position),
    }
}

struct AsyncIoThread {
    receiver: Receiver<StdLogValue>,
}

impl AsyncIoThread {
    fn run_with_stderr(self) {
        let stderr = io::stderr();
        let console = stderr.is_terminal();

        let mut io = stderr;
        let mut buf: Vec<u8> = Vec::with_capacity(1024);
        while let Ok(v) = self.receiver.recv() {
            buf.clear();
            let _ = write_value(&mut buf, v, console);
            let _ = io.write_all(&buf);

            while let Ok(v) = self.receiver.try_recv() {
                buf.clear();
                let _ = write_value(&mut buf, v, console);
                let _ = io.write_all(&buf);
            }

            let _ = io.flush();
        }
    }
}

fn write_value<IO: Write>(io: &mut IO, v: StdLogValue, console: bool) -> io::Result<()> {
    if console {
        write_console(io, v)
    } else {
        write_plain(io, v)
    }
}

fn write_plain<IO: Write>(io: &mut IO, v: StdLogValue) -> io::Result<()> {
    write!(io, "{}", Local::now().format(TIME_FORMAT))?;
    write!(io, " {}", v.level)?;
    for (k, v) in &v.kv_pairs {
        write!(io, " {k}: {v},")?;
    }
    write!(io, " {}", v.message_str())?;
    if let Some(location) = &v.location {
        write!(io, " <{location}>")?;
    }
    writeln!(io)
}

fn write_console<IO: Write>(io: &mut IO, v: StdLogValue) -> io::Result<()> {
    use anstyle::{AnsiColor, Color, Style};

    const COLOR_MAGENTA: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Magenta)));
    const COLOR_RED: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red)));
    const COLOR_YELLOW: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow)));
    const COLOR_GREEN: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green)));
    const COLOR_CYAN: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan)));
    const COLOR_BLUE: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue)));
    const STYLE_BOLD: Style = Style::new().bold();

    let level_color = match v.level {
        Level::Critical => COLOR_MAGENTA,
        Level::Error => COLOR_RED,
        Level::Warning => COLOR_YELLOW,
        Level::Info => COLOR_GREEN,
        Level::Debug => COLOR_CYAN,
        Level::Trace => COLOR_BLUE,
    };

    write!(io, "{}", Local::now().format(TIME_FORMAT))?;
    write!(
        io,
        " {}{}{}",
        level_color.render(),
        v.level,
        level_color.render_reset()
    )?;
    for (k, v) in &v.kv_pairs {
        write!(
            io,
            " {}{k}{}={v},",
            STYLE_BOLD.render(),
            STYLE_BOLD.render_reset()
        )?;
    }
    write!(
        io,
        " {}{}{}",
        STYLE_BOLD.render(),
        v.message_str(),
        STYLE_BOLD.render_reset()
    )?;
    if let Some(location) = &v.location {
        write!(io, " <{location}>")?;
    }
    writeln!(io)
}
