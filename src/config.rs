// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

pub mod yaml;

use crate::checking_types::State;
use crate::constants;
use crate::crash::CrashDumpWriter;
use crate::exit_spec::{ExitCategory, ExitCodeSpec};
use crate::wrapper::HostConfigLookup;
use anyhow::{anyhow, bail, Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use yaml::{Get, Yaml};

mod keys {
    pub const EXEC: &str = "exec";
    pub const DEBUG: &str = "debug";
    pub const CRASH_DIR: &str = "crash_dir";
    pub const EXIT_SPEC: &str = "exit_spec";
    pub const HOSTS: &str = "hosts";
    pub const NAME: &str = "name";
}

/// Host configuration, loaded once and never changed afterwards.
#[derive(Debug, Default, PartialEq)]
pub struct ExecConfig {
    debug: bool,
    crash_dir: Option<PathBuf>,
    exit_spec: ExitCodeSpec,
    hosts: HashMap<String, ExitCodeSpec>,
}

impl ExecConfig {
    pub fn load_file(file: &Path) -> Result<Self> {
        let docs = yaml::load_from_file(file)?;
        match docs.first() {
            Some(doc) => Self::from_yaml(doc)
                .with_context(|| format!("Bad config file {}", file.display())),
            None => {
                log::info!("Empty config file {}, using defaults", file.display());
                Ok(Self::default())
            }
        }
    }

    pub fn from_string(source: &str) -> Result<Self> {
        yaml::load_from_str(source)?
            .first()
            .map_or_else(|| Ok(Self::default()), Self::from_yaml)
    }

    pub fn from_yaml(yaml: &Yaml) -> Result<Self> {
        let root = yaml.get(keys::EXEC);
        if root.is_badvalue() {
            bail!("Missing section '{}'", keys::EXEC);
        }
        let hosts_node = root.get(keys::HOSTS);
        if !hosts_node.is_badvalue() && !hosts_node.is_null() && hosts_node.as_vec().is_none() {
            bail!("'{}' must be a list", keys::HOSTS);
        }
        let mut hosts = HashMap::new();
        for host in root.get_yaml_vector(keys::HOSTS) {
            let name = host
                .get_string(keys::NAME)
                .ok_or_else(|| anyhow!("Host entry without '{}'", keys::NAME))?;
            let spec = exit_spec_from_yaml(host.get(keys::EXIT_SPEC))
                .with_context(|| format!("Bad exit spec for host {}", name))?;
            if hosts.insert(name.clone(), spec).is_some() {
                log::warn!("Host {} is configured twice, last entry wins", name);
            }
        }

        Ok(Self {
            debug: root.get_bool(keys::DEBUG, false),
            crash_dir: root.get_pathbuf(keys::CRASH_DIR),
            exit_spec: exit_spec_from_yaml(root.get(keys::EXIT_SPEC))?,
            hosts,
        })
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn crash_dir(&self) -> PathBuf {
        self.crash_dir.clone().unwrap_or_else(|| {
            constants::ENV_TEMP_DIR
                .clone()
                .unwrap_or_else(std::env::temp_dir)
                .join(constants::CRASH_SUBDIR)
        })
    }

    pub fn crash_reporter(&self) -> CrashDumpWriter {
        CrashDumpWriter::new(self.crash_dir())
    }
}

impl HostConfigLookup for ExecConfig {
    fn exit_code_spec(&self, host: &str) -> ExitCodeSpec {
        match self.hosts.get(host) {
            Some(host_spec) => self.exit_spec.overridden_by(host_spec),
            None => self.exit_spec.clone(),
        }
    }
}

fn exit_spec_from_yaml(yaml: &Yaml) -> Result<ExitCodeSpec> {
    let mut spec = ExitCodeSpec::new();
    if yaml.is_badvalue() || yaml.is_null() {
        return Ok(spec);
    }
    if yaml.as_hash().is_none() {
        bail!("'{}' must be a mapping", keys::EXIT_SPEC);
    }
    for category in [
        ExitCategory::Timeout,
        ExitCategory::Connection,
        ExitCategory::Exception,
    ] {
        let value = yaml.get(category.as_str());
        if value.is_badvalue() {
            continue;
        }
        let code = value
            .as_i64()
            .ok_or_else(|| anyhow!("'{}' must be an integer", category.as_str()))?;
        spec.set(category, State::try_from(code)?);
    }
    if let Some(map) = yaml.as_hash() {
        for key in map.keys().filter_map(|k| k.as_str()) {
            if ExitCategory::from_name(key).is_none() {
                log::warn!("Unknown exit spec category '{}' ignored", key);
            }
        }
    }
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
exec:
  debug: yes
  crash_dir: /tmp/crashes
  exit_spec:
    timeout: 1
  hosts:
    - name: myhost
      exit_spec:
        connection: 0
    - name: other
"#;

    #[test]
    fn test_parse() {
        let config = ExecConfig::from_string(CONFIG).unwrap();
        assert!(config.debug());
        assert_eq!(config.crash_dir(), PathBuf::from("/tmp/crashes"));
        assert_eq!(
            config.exit_code_spec("myhost"),
            ExitCodeSpec::new()
                .with(ExitCategory::Timeout, State::Warn)
                .with(ExitCategory::Connection, State::Ok)
        );
        assert_eq!(
            config.exit_code_spec("other"),
            ExitCodeSpec::new().with(ExitCategory::Timeout, State::Warn)
        );
        assert_eq!(
            config.exit_code_spec("unknown-host"),
            ExitCodeSpec::new().with(ExitCategory::Timeout, State::Warn)
        );
    }

    #[test]
    fn test_defaults() {
        let config = ExecConfig::from_string("exec:\n  debug: no\n").unwrap();
        assert!(!config.debug());
        assert_eq!(config.exit_code_spec("any"), ExitCodeSpec::new());
        assert_eq!(ExecConfig::from_string("").unwrap(), ExecConfig::default());
    }

    #[test]
    fn test_missing_section() {
        assert!(ExecConfig::from_string("other:\n  a: 1\n").is_err());
    }

    #[test]
    fn test_out_of_range_exit_code() {
        let source = "exec:\n  exit_spec:\n    exception: 4\n";
        assert!(ExecConfig::from_string(source).is_err());
    }

    #[test]
    fn test_not_an_integer() {
        let source = "exec:\n  exit_spec:\n    exception: crit\n";
        assert!(ExecConfig::from_string(source).is_err());
    }

    #[test]
    fn test_malformed_sections() {
        let source = "exec:\n  exit_spec: 5\n";
        assert!(ExecConfig::from_string(source).is_err());
        let source = "exec:\n  hosts:\n    name: myhost\n";
        assert!(ExecConfig::from_string(source).is_err());
        let source = "exec:\n  hosts:\n    - name: myhost\n      exit_spec: crit\n";
        assert!(ExecConfig::from_string(source).is_err());
        let source = "exec:\n  exit_spec:\n  hosts:\n";
        assert_eq!(ExecConfig::from_string(source).unwrap(), ExecConfig::default());
    }

    #[test]
    fn test_host_without_name() {
        let source = "exec:\n  hosts:\n    - exit_spec:\n        timeout: 1\n";
        assert!(ExecConfig::from_string(source).is_err());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("check-exec.yml");
        std::fs::write(&file, CONFIG).unwrap();
        assert!(ExecConfig::load_file(&file).unwrap().debug());
        assert!(ExecConfig::load_file(&dir.path().join("absent.yml")).is_err());
    }
}
