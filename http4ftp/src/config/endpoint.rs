/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::time::Duration;

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

use h4f_ftp_client::FtpClientConfig;

const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(5);

/// The remote FTP server all requests are bridged to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub addr: String,
    pub user: String,
    pub pass: String,
    pub dial_timeout: Duration,
    pub disable_epsv: bool,
    pub disable_mlsd: bool,
    pub disable_utf8: bool,
}

impl EndpointConfig {
    pub fn new(addr: &str) -> Self {
        EndpointConfig {
            addr: addr.to_string(),
            user: String::new(),
            pass: String::new(),
            dial_timeout: Duration::ZERO,
            disable_epsv: false,
            disable_mlsd: false,
            disable_utf8: false,
        }
    }

    pub fn validate(&mut self) {
        if self.dial_timeout.is_zero() {
            self.dial_timeout = DEFAULT_DIAL_TIMEOUT;
        }
    }

    pub fn parse_yaml(value: &Yaml) -> anyhow::Result<Self> {
        let Yaml::Hash(map) = value else {
            return Err(anyhow!("yaml value type for ftp endpoint should be 'map'"));
        };

        let v = h4f_yaml::hash_get_required(map, "addr")?;
        let addr = h4f_yaml::value::as_string(v).context("invalid string value for key addr")?;
        let mut config = EndpointConfig::new(&addr);

        h4f_yaml::foreach_kv(map, |k, v| match h4f_yaml::key::normalize(k).as_str() {
            "addr" => Ok(()),
            "user" | "username" => {
                config.user = h4f_yaml::value::as_string(v)
                    .context(format!("invalid string value for key {k}"))?;
                Ok(())
            }
            "pass" | "password" => {
                config.pass = h4f_yaml::value::as_string(v)
                    .context(format!("invalid string value for key {k}"))?;
                Ok(())
            }
            "dial_timeout" => {
                config.dial_timeout = h4f_yaml::humanize::as_duration(v)
                    .context(format!("invalid humanize duration value for key {k}"))?;
                Ok(())
            }
            "disable_epsv" => {
                config.disable_epsv = h4f_yaml::value::as_bool(v)
                    .context(format!("invalid bool value for key {k}"))?;
                Ok(())
            }
            "disable_mlsd" => {
                config.disable_mlsd = h4f_yaml::value::as_bool(v)
                    .context(format!("invalid bool value for key {k}"))?;
                Ok(())
            }
            "disable_utf8" => {
                config.disable_utf8 = h4f_yaml::value::as_bool(v)
                    .context(format!("invalid bool value for key {k}"))?;
                Ok(())
            }
            _ => Err(anyhow!("invalid key {k}")),
        })?;

        if config.addr.is_empty() {
            return Err(anyhow!("empty ftp server address"));
        }
        config.validate();
        Ok(config)
    }

    /// Merge the endpoint settings into the protocol tuning config.
    pub fn ftp_client_config(&self, base: &FtpClientConfig) -> FtpClientConfig {
        let mut config = base.clone();
        config.connect_timeout = self.dial_timeout;
        config.greeting_timeout = self.dial_timeout;
        config.disable_epsv = self.disable_epsv;
        config.disable_mlsd = self.disable_mlsd;
        config.disable_utf8 = self.disable_utf8;
        config
    }
}
