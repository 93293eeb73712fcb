// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

use crate::constants;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Check_MK check execution helper.", version = constants::VERSION)]
pub struct Args {
    /// Enable verbose output. Use once (-v) for logging level DEBUG and twice (-vv) for logging
    /// level TRACE.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Sends log to stderr.
    #[arg(short = 'l', long, global = true)]
    pub display_log: bool,

    /// Use custom log dir
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Use custom config file
    #[arg(short, long, global = true)]
    pub config_file: Option<PathBuf>,

    /// Let failures propagate instead of converting them
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub mode: Mode,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
    /// Print the exit code spec in effect for a host
    ExitSpec {
        /// Host name as found in the config file
        host: String,
    },

    /// Inspect check plugin man pages
    #[command(subcommand)]
    ManPages(ManPagesMode),
}

#[derive(Subcommand, Debug)]
pub enum ManPagesMode {
    /// List all man pages with their titles
    Table {
        /// Man page directory, earlier ones take precedence
        #[arg(long = "dir", required = true)]
        dirs: Vec<PathBuf>,
    },

    /// Show one level of the man page catalog
    Catalog {
        /// Man page directory, earlier ones take precedence
        #[arg(long = "dir", required = true)]
        dirs: Vec<PathBuf>,

        /// Catalog path, e.g. `os linux`
        path: Vec<String>,
    },
}

impl Args {
    pub fn logging_level(&self) -> String {
        match self.verbose {
            2.. => String::from("trace"),
            1 => String::from("debug"),
            _ => String::from("info"),
        }
    }
}
