/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

pub(crate) const VERSION: &str = env!("CARGO_PKG_VERSION");
pub(crate) const PKG_NAME: &str = env!("CARGO_PKG_NAME");

const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
const RUST_VERSION: &str = env!("CARGO_PKG_RUST_VERSION");

const LOG_RAW_IO_FEATURE: Option<&str> = if cfg!(feature = "log-raw-io") {
    Some("log-raw-io")
} else {
    None
};

pub(crate) fn print_version(verbose_level: u8) {
    println!("{PKG_NAME} {VERSION}");
    if verbose_level > 0 {
        println!("{PKG_DESCRIPTION}");
        print!("Features:");
        if let Some(raw_io) = LOG_RAW_IO_FEATURE {
            print!(" {raw_io}");
        }
        println!();
    }
    if verbose_level > 1 {
        println!("Minimal Rust Version: {RUST_VERSION}");
    }
}
