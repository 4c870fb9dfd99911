/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod doc;
mod hash;

pub mod humanize;
pub mod key;
pub mod value;

pub use doc::foreach_doc;
pub use hash::{foreach_kv, get_required as hash_get_required};
