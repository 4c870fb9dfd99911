/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::net::SocketAddr;
use std::str::FromStr;

use anyhow::anyhow;
use yaml_rust::Yaml;

pub fn as_sockaddr(v: &Yaml) -> anyhow::Result<SocketAddr> {
    match v {
        Yaml::String(s) => {
            SocketAddr::from_str(s).map_err(|e| anyhow!("invalid socket address {s}: {e}"))
        }
        Yaml::Integer(i) => {
            let port = u16::try_from(*i).map_err(|_| anyhow!("out of range port {i}"))?;
            Ok(SocketAddr::new(std::net::Ipv6Addr::UNSPECIFIED.into(), port))
        }
        _ => Err(anyhow!(
            "yaml value type for 'socket address' should be 'string' or 'integer'"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_sockaddr() {
        let v = Yaml::String("127.0.0.1:8080".to_string());
        assert_eq!(as_sockaddr(&v).unwrap(), "127.0.0.1:8080".parse().unwrap());

        let v = Yaml::String("[::]:80".to_string());
        assert_eq!(as_sockaddr(&v).unwrap().port(), 80);

        let v = Yaml::Integer(8080);
        assert_eq!(as_sockaddr(&v).unwrap(), "[::]:8080".parse().unwrap());

        let v = Yaml::Integer(70000);
        assert!(as_sockaddr(&v).is_err());

        let v = Yaml::String("localhost".to_string());
        assert!(as_sockaddr(&v).is_err());
    }
}
