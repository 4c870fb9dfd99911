/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;

use anyhow::anyhow;
use yaml_rust::Yaml;

pub fn as_bool(v: &Yaml) -> anyhow::Result<bool> {
    match v {
        Yaml::String(s) => match s.to_lowercase().as_str() {
            "on" | "true" | "yes" | "1" => Ok(true),
            "off" | "false" | "no" | "0" => Ok(false),
            _ => Err(anyhow!("invalid yaml string value for 'bool': {s}")),
        },
        Yaml::Boolean(value) => Ok(*value),
        Yaml::Integer(i) => Ok(*i != 0),
        _ => Err(anyhow!(
            "yaml value type for 'bool' should be 'boolean' / 'string' / 'integer'"
        )),
    }
}

pub fn as_usize(v: &Yaml) -> anyhow::Result<usize> {
    match v {
        Yaml::String(s) => Ok(usize::from_str(s)?),
        Yaml::Integer(i) => Ok(usize::try_from(*i)?),
        _ => Err(anyhow!(
            "yaml value type for 'usize' should be 'string' or 'integer'"
        )),
    }
}

/// Numbers are accepted too, so a password like `123456` needs no quoting.
pub fn as_string(v: &Yaml) -> anyhow::Result<String> {
    match v {
        Yaml::String(s) => Ok(s.to_string()),
        Yaml::Integer(i) => Ok(i.to_string()),
        Yaml::Real(s) => Ok(s.to_string()),
        Yaml::Null => Ok(String::new()),
        _ => Err(anyhow!(
            "yaml value type for string should be 'string' / 'integer' / 'real'"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_bool() {
        assert!(as_bool(&Yaml::Boolean(true)).unwrap());
        assert!(as_bool(&Yaml::String("on".to_string())).unwrap());
        assert!(!as_bool(&Yaml::String("No".to_string())).unwrap());
        assert!(!as_bool(&Yaml::Integer(0)).unwrap());
        assert!(as_bool(&Yaml::String("maybe".to_string())).is_err());
        assert!(as_bool(&Yaml::Null).is_err());
    }

    #[test]
    fn t_string() {
        assert_eq!(as_string(&Yaml::String("ftp".to_string())).unwrap(), "ftp");
        assert_eq!(as_string(&Yaml::Integer(123456)).unwrap(), "123456");
        assert_eq!(as_string(&Yaml::Null).unwrap(), "");
        assert!(as_string(&Yaml::Array(Vec::new())).is_err());
    }

    #[test]
    fn t_usize() {
        assert_eq!(as_usize(&Yaml::Integer(128)).unwrap(), 128);
        assert_eq!(as_usize(&Yaml::String("64".to_string())).unwrap(), 64);
        assert!(as_usize(&Yaml::Integer(-1)).is_err());
    }
}
