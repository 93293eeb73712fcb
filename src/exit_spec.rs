// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

use crate::checking_types::State;
use std::fmt::{Display, Formatter, Result as FormatResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCategory {
    Timeout,
    Connection,
    Exception,
}

impl ExitCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connection => "connection",
            Self::Exception => "exception",
        }
    }

    pub fn default_state(&self) -> State {
        match self {
            Self::Timeout | Self::Connection => State::Crit,
            Self::Exception => State::Unknown,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "timeout" => Some(Self::Timeout),
            "connection" => Some(Self::Connection),
            "exception" => Some(Self::Exception),
            _ => None,
        }
    }
}

/// Per host override of the state reported for a failure category.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExitCodeSpec {
    timeout: Option<State>,
    connection: Option<State>,
    exception: Option<State>,
}

impl ExitCodeSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: ExitCategory, state: State) -> Self {
        self.set(category, state);
        self
    }

    pub fn set(&mut self, category: ExitCategory, state: State) {
        *self.slot(category) = Some(state);
    }

    /// Configured override, if any.
    pub fn get(&self, category: ExitCategory) -> Option<State> {
        match category {
            ExitCategory::Timeout => self.timeout,
            ExitCategory::Connection => self.connection,
            ExitCategory::Exception => self.exception,
        }
    }

    pub fn state_for(&self, category: ExitCategory) -> State {
        self.get(category).unwrap_or_else(|| category.default_state())
    }

    /// Categories set in `other` win over those set in `self`.
    pub fn overridden_by(&self, other: &ExitCodeSpec) -> Self {
        Self {
            timeout: other.timeout.or(self.timeout),
            connection: other.connection.or(self.connection),
            exception: other.exception.or(self.exception),
        }
    }

    fn slot(&mut self, category: ExitCategory) -> &mut Option<State> {
        match category {
            ExitCategory::Timeout => &mut self.timeout,
            ExitCategory::Connection => &mut self.connection,
            ExitCategory::Exception => &mut self.exception,
        }
    }
}

impl Display for ExitCodeSpec {
    fn fmt(&self, f: &mut Formatter) -> FormatResult {
        let all = [
            ExitCategory::Timeout,
            ExitCategory::Connection,
            ExitCategory::Exception,
        ];
        let text = all
            .iter()
            .map(|c| format!("{}={}", c.as_str(), i32::from(self.state_for(*c))))
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let spec = ExitCodeSpec::new();
        assert_eq!(spec.state_for(ExitCategory::Timeout), State::Crit);
        assert_eq!(spec.state_for(ExitCategory::Connection), State::Crit);
        assert_eq!(spec.state_for(ExitCategory::Exception), State::Unknown);
        assert_eq!(spec.get(ExitCategory::Timeout), None);
    }

    #[test]
    fn test_override() {
        let spec = ExitCodeSpec::new().with(ExitCategory::Connection, State::Warn);
        assert_eq!(spec.state_for(ExitCategory::Connection), State::Warn);
        assert_eq!(spec.state_for(ExitCategory::Timeout), State::Crit);
    }

    #[test]
    fn test_overridden_by() {
        let global = ExitCodeSpec::new()
            .with(ExitCategory::Timeout, State::Warn)
            .with(ExitCategory::Exception, State::Crit);
        let host = ExitCodeSpec::new().with(ExitCategory::Timeout, State::Unknown);
        let merged = global.overridden_by(&host);
        assert_eq!(merged.get(ExitCategory::Timeout), Some(State::Unknown));
        assert_eq!(merged.get(ExitCategory::Exception), Some(State::Crit));
        assert_eq!(merged.get(ExitCategory::Connection), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ExitCodeSpec::new()
                .with(ExitCategory::Connection, State::Ok)
                .to_string(),
            "timeout=2 connection=0 exception=3"
        );
    }

    #[test]
    fn test_category_names() {
        assert_eq!(
            ExitCategory::from_name("timeout"),
            Some(ExitCategory::Timeout)
        );
        assert_eq!(ExitCategory::from_name("crash"), None);
    }
}
