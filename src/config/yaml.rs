// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use yaml_rust2::YamlLoader;
pub type Yaml = yaml_rust2::yaml::Yaml;

/// Lookup helpers for config sections. Absent keys never fail.
pub trait Get {
    fn get(&self, key: &str) -> &Yaml;
    fn get_string(&self, key: &str) -> Option<String>;
    fn get_pathbuf(&self, key: &str) -> Option<PathBuf>;
    fn get_yaml_vector(&self, key: &str) -> &[Yaml];
    fn get_optional_bool(&self, key: &str) -> Option<bool>;

    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get_optional_bool(key).unwrap_or(default)
    }
}

impl Get for Yaml {
    fn get(&self, key: &str) -> &Yaml {
        &self[key]
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self[key].as_str().map(str::to_string)
    }

    fn get_pathbuf(&self, key: &str) -> Option<PathBuf> {
        self[key].as_str().map(PathBuf::from)
    }

    fn get_yaml_vector(&self, key: &str) -> &[Yaml] {
        self[key].as_vec().map(Vec::as_slice).unwrap_or_default()
    }

    fn get_optional_bool(&self, key: &str) -> Option<bool> {
        match &self[key] {
            Yaml::BadValue => None,
            Yaml::Boolean(b) => Some(*b),
            // yes/no stay plain strings in yaml_rust2
            Yaml::String(s) => match to_bool(s) {
                Ok(b) => Some(b),
                Err(e) => {
                    log::warn!("{key}: {e}");
                    None
                }
            },
            other => {
                log::warn!("{key} is not bool like: {other:?}");
                None
            }
        }
    }
}

pub fn load_from_file(file_name: &Path) -> Result<Vec<Yaml>> {
    let content = fs::read_to_string(file_name)
        .with_context(|| format!("Can't read config file {}", file_name.display()))?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<Vec<Yaml>> {
    Ok(YamlLoader::load_from_str(content)?)
}

fn to_bool(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "yes" | "true" | "on" => Ok(true),
        "no" | "false" | "off" => Ok(false),
        _ => bail!("Invalid boolean value '{}'", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML_HOSTS: &str = r#"
hosts:
  - name: a
  - name: b
flag: yes
other: maybe
number: 5
"#;

    fn doc(source: &str) -> Yaml {
        load_from_str(source).unwrap().remove(0)
    }

    #[test]
    fn test_to_bool() {
        assert!(to_bool("yEs").unwrap());
        assert!(!to_bool("nO").unwrap());
        assert!(to_bool("On").unwrap());
        assert!(!to_bool("faLse").unwrap());
        assert!(to_bool("").is_err());
        assert!(to_bool("1").is_err());
    }

    #[test]
    fn test_yaml_vector() {
        let yaml = doc(YAML_HOSTS);
        assert!(yaml.get_yaml_vector("bad").is_empty());
        let hosts = yaml.get_yaml_vector("hosts");
        assert_eq!(hosts.len(), 2);
        assert_eq!(hosts[1].get_string("name").as_deref(), Some("b"));
    }

    #[test]
    fn test_bool() {
        let yaml = doc(YAML_HOSTS);
        assert!(yaml.get_bool("flag", false));
        assert_eq!(yaml.get_optional_bool("other"), None);
        assert_eq!(yaml.get_optional_bool("number"), None);
        assert!(yaml.get_bool("absent", true));
    }

    #[test]
    fn test_missing_file() {
        assert!(load_from_file(Path::new("this/file/does/not/exist.yml")).is_err());
    }
}
