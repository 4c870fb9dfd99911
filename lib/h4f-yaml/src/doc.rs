/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::path::Path;

use anyhow::{Context, anyhow};
use yaml_rust::{Yaml, YamlLoader};

/// Call `f` on every document found in the yaml file, with the document index.
pub fn foreach_doc<F>(path: &Path, mut f: F) -> anyhow::Result<()>
where
    F: FnMut(usize, &Yaml) -> anyhow::Result<()>,
{
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read file {}: {e}", path.display()))?;
    let docs = YamlLoader::load_from_str(&content)
        .map_err(|e| anyhow!("invalid yaml file {}: {e}", path.display()))?;
    for (i, doc) in docs.iter().enumerate() {
        f(i, doc).context(format!("failed to load doc #{i}"))?;
    }
    Ok(())
}
