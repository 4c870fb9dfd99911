/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, anyhow};
use yaml_rust::{Yaml, yaml};

mod endpoint;
pub use endpoint::EndpointConfig;

mod server;
pub use server::ServerConfig;

pub struct GatewayConfig {
    pub server: Arc<ServerConfig>,
    pub endpoint: Arc<EndpointConfig>,
}

pub fn load(path: &Path) -> anyhow::Result<GatewayConfig> {
    let mut server = None;
    let mut endpoint = None;
    h4f_yaml::foreach_doc(path, |_, doc| match doc {
        Yaml::Hash(map) => load_doc(map, &mut server, &mut endpoint),
        _ => Err(anyhow!("yaml doc root should be hash")),
    })?;

    let Some(endpoint) = endpoint else {
        return Err(anyhow!("no ftp endpoint configured"));
    };
    Ok(GatewayConfig {
        server: Arc::new(server.unwrap_or_default()),
        endpoint: Arc::new(endpoint),
    })
}

fn load_doc(
    map: &yaml::Hash,
    server: &mut Option<ServerConfig>,
    endpoint: &mut Option<EndpointConfig>,
) -> anyhow::Result<()> {
    h4f_yaml::foreach_kv(map, |k, v| match h4f_yaml::key::normalize(k).as_str() {
        "server" => {
            let config = ServerConfig::parse_yaml(v).context("failed to load server config")?;
            *server = Some(config);
            Ok(())
        }
        "ftp" => {
            let config = EndpointConfig::parse_yaml(v).context("failed to load ftp config")?;
            *endpoint = Some(config);
            Ok(())
        }
        _ => Err(anyhow!("invalid key {k} in main conf")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use yaml_rust::YamlLoader;

    fn load_str(s: &str) -> anyhow::Result<(Option<ServerConfig>, Option<EndpointConfig>)> {
        let mut server = None;
        let mut endpoint = None;
        for doc in YamlLoader::load_from_str(s)? {
            let Yaml::Hash(map) = doc else {
                return Err(anyhow!("not hash"));
            };
            load_doc(&map, &mut server, &mut endpoint)?;
        }
        Ok((server, endpoint))
    }

    #[test]
    fn load_docs() {
        let (server, endpoint) = load_str(
            r#"
server:
  listen: "[::1]:8080"
---
ftp:
  addr: 127.0.0.1:21
  dial_timeout: 3s
"#,
        )
        .unwrap();
        assert_eq!(server.unwrap().listen.port(), 8080);
        assert_eq!(endpoint.unwrap().dial_timeout, Duration::from_secs(3));
    }

    #[test]
    fn load_invalid() {
        assert!(load_str("ftpd:\n  addr: 127.0.0.1:21").is_err());
        assert!(load_str("ftp:\n  user: bob").is_err());
    }

    #[test]
    fn sample_config() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/http4ftp.yaml");
        let config = load(&path).unwrap();
        assert_eq!(config.endpoint.addr, "127.0.0.1:21");
        assert_eq!(config.endpoint.dial_timeout, Duration::from_secs(5));
        assert_eq!(config.server.listen.port(), 8080);
    }
}
