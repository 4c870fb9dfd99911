/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;
use std::time::Duration;

use anyhow::anyhow;
use humanize_rs::ParseError;
use yaml_rust::Yaml;

/// Parse a duration like "5s" or "1m30s". Bare numbers are seconds.
pub fn as_duration(v: &Yaml) -> anyhow::Result<Duration> {
    match v {
        Yaml::String(value) => match humanize_rs::duration::parse(value) {
            Ok(v) => Ok(v),
            Err(ParseError::MissingUnit) => {
                if let Ok(u) = u64::from_str(value) {
                    Ok(Duration::from_secs(u))
                } else {
                    Err(anyhow!("invalid duration string"))
                }
            }
            Err(e) => Err(anyhow!("invalid humanize duration string: {e}")),
        },
        Yaml::Integer(value) => {
            let u = u64::try_from(*value).map_err(|_| anyhow!("negative duration value"))?;
            Ok(Duration::from_secs(u))
        }
        Yaml::Real(s) => {
            let f = f64::from_str(s).map_err(|e| anyhow!("invalid f64 value: {e}"))?;
            Duration::try_from_secs_f64(f).map_err(anyhow::Error::new)
        }
        _ => Err(anyhow!(
            "yaml value type for humanize duration should be 'string' or 'integer' or 'real'"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_duration() {
        let v = Yaml::String("5s".to_string());
        assert_eq!(as_duration(&v).unwrap(), Duration::from_secs(5));

        let v = Yaml::String("1m30s".to_string());
        assert_eq!(as_duration(&v).unwrap(), Duration::from_secs(90));

        let v = Yaml::String("30".to_string());
        assert_eq!(as_duration(&v).unwrap(), Duration::from_secs(30));

        let v = Yaml::String("-30".to_string());
        assert!(as_duration(&v).is_err());

        let v = Yaml::Integer(0);
        assert_eq!(as_duration(&v).unwrap(), Duration::ZERO);

        let v = Yaml::Integer(-1);
        assert!(as_duration(&v).is_err());

        let v = Yaml::Real("0.5".to_string());
        assert_eq!(as_duration(&v).unwrap(), Duration::from_millis(500));

        let v = Yaml::Array(vec![Yaml::Integer(1)]);
        assert!(as_duration(&v).is_err());
    }
}
