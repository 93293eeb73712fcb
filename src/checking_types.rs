// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

use anyhow::{anyhow, Result};
use std::fmt::{Display, Formatter, Result as FormatResult};

/// Service state. The derived ordering is the merge order: "worst wins".
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum State {
    #[default]
    Ok,
    Warn,
    Crit,
    Unknown,
}

impl State {
    pub fn merge(self, other: Self) -> Self {
        std::cmp::max(self, other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warn => "WARN",
            Self::Crit => "CRIT",
            Self::Unknown => "UNKN",
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter) -> FormatResult {
        write!(f, "{}", self.as_str())
    }
}

impl From<State> for i32 {
    fn from(value: State) -> Self {
        match value {
            State::Ok => 0,
            State::Warn => 1,
            State::Crit => 2,
            State::Unknown => 3,
        }
    }
}

impl TryFrom<i64> for State {
    type Error = anyhow::Error;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Self::Ok),
            1 => Ok(Self::Warn),
            2 => Ok(Self::Crit),
            3 => Ok(Self::Unknown),
            _ => Err(anyhow!("Invalid service state: {}", value)),
        }
    }
}

/// Short name for a raw state code as found in configuration.
pub fn short_state_name(code: i64) -> Result<&'static str> {
    State::try_from(code).map(|s| s.as_str())
}
