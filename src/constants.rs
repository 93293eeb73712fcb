// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

use lazy_static::lazy_static;
use std::path::PathBuf;

pub const VERSION: &str = "2.3.0b1";
pub const LOG_BASENAME: &str = "check-exec";
/// Below `$MK_TEMPDIR` or the system temp dir, unless `crash_dir` is configured.
pub const CRASH_SUBDIR: &str = "check-exec-crashes";

pub mod log {
    use flexi_logger::{Cleanup, Criterion, Naming};
    pub const FILE_MAX_SIZE: Criterion = Criterion::Size(500_000);
    pub const FILE_NAMING: Naming = Naming::Numbers;
    pub const FILE_CLEANUP: Cleanup = Cleanup::KeepLogFiles(5);
}

pub mod environment {
    pub const CONFIG_NAME: &str = "check-exec.yml";
    pub const CONFIG_DIR_ENV_VAR: &str = "MK_CONFDIR";
    pub const LOG_DIR_ENV_VAR: &str = "MK_LOGDIR";
    pub const TEMP_DIR_ENV_VAR: &str = "MK_TEMPDIR";
}

fn env_dir(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

lazy_static! {
    pub static ref DEFAULT_CONFIG_FILE: PathBuf = env_dir(environment::CONFIG_DIR_ENV_VAR)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(environment::CONFIG_NAME);
    pub static ref ENV_LOG_DIR: Option<PathBuf> = env_dir(environment::LOG_DIR_ENV_VAR);
    pub static ref ENV_TEMP_DIR: Option<PathBuf> = env_dir(environment::TEMP_DIR_ENV_VAR);
}
