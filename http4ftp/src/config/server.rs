/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::net::{Ipv6Addr, SocketAddr};

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

use h4f_ftp_client::FtpClientConfig;

const DEFAULT_LISTEN_PORT: u16 = 8080;
const DEFAULT_MAX_HEADER_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub max_header_size: usize,
    pub ftp_client: FtpClientConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen: SocketAddr::new(Ipv6Addr::UNSPECIFIED.into(), DEFAULT_LISTEN_PORT),
            max_header_size: DEFAULT_MAX_HEADER_SIZE,
            ftp_client: FtpClientConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn parse_yaml(value: &Yaml) -> anyhow::Result<Self> {
        let Yaml::Hash(map) = value else {
            return Err(anyhow!("yaml value type for server should be 'map'"));
        };

        let mut config = ServerConfig::default();
        h4f_yaml::foreach_kv(map, |k, v| match h4f_yaml::key::normalize(k).as_str() {
            "listen" => {
                config.listen = h4f_yaml::value::as_sockaddr(v)
                    .context(format!("invalid socket address value for key {k}"))?;
                Ok(())
            }
            "max_header_size" => {
                config.max_header_size = h4f_yaml::humanize::as_usize(v)
                    .context(format!("invalid humanize usize value for key {k}"))?;
                Ok(())
            }
            "ftp_client" => {
                config.ftp_client = FtpClientConfig::parse_yaml(v)
                    .context(format!("invalid ftp client config value for key {k}"))?;
                Ok(())
            }
            _ => Err(anyhow!("invalid key {k}")),
        })?;

        if config.max_header_size < 1024 {
            return Err(anyhow!(
                "max header size {} is too small",
                config.max_header_size
            ));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use yaml_rust::YamlLoader;

    fn load(s: &str) -> Yaml {
        YamlLoader::load_from_str(s).unwrap().remove(0)
    }

    #[test]
    fn parse_ok() {
        let v = load(
            r#"
            listen: 127.0.0.1:8000
            max_header_size: 8KiB
            ftp_client:
              control:
                command_timeout: 30s
            "#,
        );
        let config = ServerConfig::parse_yaml(&v).unwrap();
        assert_eq!(config.listen, "127.0.0.1:8000".parse().unwrap());
        assert_eq!(config.max_header_size, 8192);
        assert_eq!(
            config.ftp_client.control.command_timeout,
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn parse_default() {
        let config = ServerConfig::parse_yaml(&load("listen: 9000")).unwrap();
        assert_eq!(config.listen.port(), 9000);
        assert_eq!(config.max_header_size, DEFAULT_MAX_HEADER_SIZE);
    }

    #[test]
    fn parse_err() {
        assert!(ServerConfig::parse_yaml(&load("max_header_size: 100")).is_err());
        assert!(ServerConfig::parse_yaml(&load("listen: localhost")).is_err());
        assert!(ServerConfig::parse_yaml(&load("backlog: 10")).is_err());
    }
}
