// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use typed_builder::TypedBuilder;
use uuid::Uuid;

pub const CRASH_INFO_FILE: &str = "crash.info";

#[derive(Debug, Clone, TypedBuilder, Serialize)]
pub struct CrashInfo {
    #[builder(setter(into))]
    pub host: String,
    #[builder(setter(into))]
    pub plugin: String,
    #[builder(setter(into))]
    pub description: String,
    #[builder(setter(into))]
    pub exc_value: String,
    #[builder(default)]
    pub exc_chain: Vec<String>,
}

impl CrashInfo {
    pub fn from_error(
        host: &str,
        plugin: &str,
        description: &str,
        err: &anyhow::Error,
    ) -> Self {
        Self::builder()
            .host(host)
            .plugin(plugin)
            .description(description)
            .exc_value(err.to_string())
            .exc_chain(err.chain().skip(1).map(ToString::to_string).collect())
            .build()
    }
}

/// Creates a crash artifact and returns a human readable reference to it.
pub trait CrashReporter {
    fn create_crash_dump(&self, info: &CrashInfo) -> Result<String>;
}

#[derive(Serialize)]
struct CrashRecord<'a> {
    id: Uuid,
    time: u64,
    crash_type: &'static str,
    version: &'static str,
    #[serde(flatten)]
    info: &'a CrashInfo,
}

/// Writes every crash as `<dir>/<uuid>/crash.info` (JSON).
pub struct CrashDumpWriter {
    dir: PathBuf,
}

impl CrashDumpWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl CrashReporter for CrashDumpWriter {
    fn create_crash_dump(&self, info: &CrashInfo) -> Result<String> {
        let id = Uuid::new_v4();
        let crash_dir = self.dir.join(id.to_string());
        fs::create_dir_all(&crash_dir)
            .with_context(|| format!("Failed to create crash directory {:?}", crash_dir))?;
        let record = CrashRecord {
            id,
            time: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default(),
            crash_type: "check",
            version: crate::constants::VERSION,
            info,
        };
        let file = crash_dir.join(CRASH_INFO_FILE);
        fs::write(&file, serde_json::to_string_pretty(&record)?)
            .with_context(|| format!("Failed to write crash dump {:?}", file))?;
        log::warn!("Crash dump of {}/{} written to {:?}", info.host, info.plugin, file);
        Ok(format!(
            "check failed - please submit a crash report! ({})\nCrash dump:\n{}",
            id,
            file.display()
        ))
    }
}
