/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use anyhow::{Context, anyhow};
use yaml_rust::{Yaml, yaml};

pub fn foreach_kv<F>(table: &yaml::Hash, mut f: F) -> anyhow::Result<()>
where
    F: FnMut(&str, &Yaml) -> anyhow::Result<()>,
{
    for (k, v) in table.iter() {
        let Yaml::String(key) = k else {
            return Err(anyhow!("key in hash should be string"));
        };
        f(key, v).context(format!("failed to parse value of key {key}"))?;
    }
    Ok(())
}

pub fn get_required<'a>(map: &'a yaml::Hash, k: &str) -> anyhow::Result<&'a Yaml> {
    map.get(&Yaml::String(k.to_string()))
        .ok_or_else(|| anyhow!("no required key {k} found in this map"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use yaml_rust::YamlLoader;

    fn load_hash(s: &str) -> yaml::Hash {
        let mut docs = YamlLoader::load_from_str(s).unwrap();
        docs.remove(0).into_hash().unwrap()
    }

    #[test]
    fn foreach_kv_ok() {
        let map = load_hash("a: 1\nb: 2");
        let mut seen = Vec::new();
        foreach_kv(&map, |k, v| {
            seen.push((k.to_string(), v.as_i64().unwrap()));
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, vec![("a".to_string(), 1), ("b".to_string(), 2)]);
    }

    #[test]
    fn foreach_kv_err() {
        let map = load_hash("123: 1");
        assert!(foreach_kv(&map, |_, _| Ok(())).is_err());

        let map = load_hash("a: 1");
        assert!(foreach_kv(&map, |k, _| Err(anyhow!("error at {k}"))).is_err());
    }

    #[test]
    fn required() {
        let map = load_hash("addr: 127.0.0.1:21");
        assert!(get_required(&map, "addr").is_ok());
        assert!(get_required(&map, "user").is_err());
    }
}
