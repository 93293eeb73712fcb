// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

use crate::args::Args;
use crate::config::ExecConfig;
use crate::constants;
use anyhow::Result;
use clap::Parser;
use flexi_logger::{self, FileSpec, LogSpecification, LoggerHandle};
use std::ffi::OsString;
use std::path::Path;

pub enum SendTo {
    Null,
    Stderr,
}

pub struct Env {
    pub args: Args,
    pub config: ExecConfig,
    _logger: LoggerHandle,
}

pub fn init<I, T>(args: I) -> Result<Env>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = Args::parse_from(args);
    let logger = init_logging_from_args(&args)?;
    let config = get_exec_config(&args)?;
    Ok(Env {
        args,
        config,
        _logger: logger,
    })
}

fn init_logging_from_args(args: &Args) -> Result<LoggerHandle> {
    let level = &args.logging_level();
    let log_dir = args.log_dir.as_deref().or(constants::ENV_LOG_DIR.as_deref());
    let send_to = if args.display_log {
        SendTo::Stderr
    } else {
        SendTo::Null
    };

    init_logging(level, log_dir, send_to)
}

fn get_exec_config(args: &Args) -> Result<ExecConfig> {
    match args.config_file {
        Some(ref config_file) => ExecConfig::load_file(config_file),
        None if constants::DEFAULT_CONFIG_FILE.exists() => {
            ExecConfig::load_file(&constants::DEFAULT_CONFIG_FILE)
        }
        None => {
            log::info!(
                "No config file {}, using defaults",
                constants::DEFAULT_CONFIG_FILE.display()
            );
            Ok(ExecConfig::default())
        }
    }
}

fn init_logging(level: &str, log_dir: Option<&Path>, send_to: SendTo) -> Result<LoggerHandle> {
    let spec = LogSpecification::parse(level)?;
    let mut logger = flexi_logger::Logger::with(spec);

    logger = if let Some(dir) = log_dir {
        logger
            .log_to_file(make_log_file_spec(dir))
            .rotate(
                constants::log::FILE_MAX_SIZE,
                constants::log::FILE_NAMING,
                constants::log::FILE_CLEANUP,
            )
            .append()
    } else {
        logger.do_not_log()
    };

    logger = match send_to {
        SendTo::Null => logger
            .duplicate_to_stderr(flexi_logger::Duplicate::None)
            .duplicate_to_stdout(flexi_logger::Duplicate::None),
        SendTo::Stderr => logger.duplicate_to_stderr(flexi_logger::Duplicate::All),
    };

    Ok(logger.format(flexi_logger::detailed_format).start()?)
}

fn make_log_file_spec(log_dir: &Path) -> FileSpec {
    FileSpec::default()
        .directory(log_dir.to_owned())
        .suppress_timestamp()
        .basename(constants::LOG_BASENAME)
}
