/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use slog::Drain;
use slog_scope::GlobalLoggerGuard;

use h4f_stdlog::AsyncLogConfig;

use crate::opts::ProcArgs;

const PROCESS_LOG_THREAD_NAME: &str = "log-process";

pub fn setup(args: &ProcArgs) -> Result<GlobalLoggerGuard, log::SetLoggerError> {
    let async_conf = AsyncLogConfig::with_name(PROCESS_LOG_THREAD_NAME);
    let drain = h4f_stdlog::new_async_logger(&async_conf, true);
    let logger = slog::Logger::root(drain.fuse(), slog::o!());

    let scope_guard = slog_scope::set_global_logger(logger);

    let log_level = match args.verbose_level {
        0 => log::Level::Warn,
        1 => log::Level::Info,
        2 => log::Level::Debug,
        _ => log::Level::Trace,
    };

    slog_stdlog::init_with_level(log_level)?;
    Ok(scope_guard)
}
