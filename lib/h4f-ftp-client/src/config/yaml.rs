/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

use super::{FtpClientConfig, FtpControlConfig, FtpTransferConfig};

impl FtpControlConfig {
    pub fn parse_yaml(value: &Yaml) -> anyhow::Result<Self> {
        let Yaml::Hash(map) = value else {
            return Err(anyhow!("invalid yaml type"));
        };

        let mut config = FtpControlConfig::default();
        h4f_yaml::foreach_kv(map, |k, v| match h4f_yaml::key::normalize(k).as_str() {
            "max_line_len" | "max_line_length" => {
                config.max_line_len = h4f_yaml::humanize::as_usize(v)
                    .context(format!("invalid humanize usize value for key {k}"))?;
                Ok(())
            }
            "max_multi_lines" => {
                config.max_multi_lines = h4f_yaml::value::as_usize(v)
                    .context(format!("invalid usize value for key {k}"))?;
                Ok(())
            }
            "command_timeout" => {
                let timeout = h4f_yaml::humanize::as_duration(v)
                    .context(format!("invalid humanize duration value for key {k}"))?;
                config.command_timeout = if timeout.is_zero() {
                    None
                } else {
                    Some(timeout)
                };
                Ok(())
            }
            _ => Err(anyhow!("invalid key {k}")),
        })?;
        Ok(config)
    }
}

impl FtpTransferConfig {
    pub fn parse_yaml(value: &Yaml) -> anyhow::Result<Self> {
        let Yaml::Hash(map) = value else {
            return Err(anyhow!("invalid yaml type"));
        };

        let mut config = FtpTransferConfig::default();
        h4f_yaml::foreach_kv(map, |k, v| match h4f_yaml::key::normalize(k).as_str() {
            "end_wait_timeout" => {
                config.end_wait_timeout = h4f_yaml::humanize::as_duration(v)
                    .context(format!("invalid humanize duration value for key {k}"))?;
                Ok(())
            }
            _ => Err(anyhow!("invalid key {k}")),
        })?;
        Ok(config)
    }
}

impl FtpClientConfig {
    /// Parse the protocol tuning part of the client config.
    ///
    /// Connect timeouts and feature toggles belong to the endpoint and are
    /// not accepted here.
    pub fn parse_yaml(value: &Yaml) -> anyhow::Result<Self> {
        let Yaml::Hash(map) = value else {
            return Err(anyhow!("invalid yaml type"));
        };

        let mut config = FtpClientConfig::default();
        h4f_yaml::foreach_kv(map, |k, v| match h4f_yaml::key::normalize(k).as_str() {
            "control" => {
                config.control = FtpControlConfig::parse_yaml(v).context(format!(
                    "invalid ftp control connection config value for key {k}"
                ))?;
                Ok(())
            }
            "transfer" => {
                config.transfer = FtpTransferConfig::parse_yaml(v).context(format!(
                    "invalid ftp transfer connection config value for key {k}"
                ))?;
                Ok(())
            }
            _ => Err(anyhow!("invalid key {k}")),
        })?;
        Ok(config)
    }
}
