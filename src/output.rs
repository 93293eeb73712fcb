// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

use crate::checking_types::State;
use std::fmt::{Display, Formatter, Result as FormatResult};

/// One unit emitted by a check body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialResult {
    pub state: State,
    pub text: String,
    pub metrics: Vec<String>,
}

impl PartialResult {
    pub fn new(state: State, text: impl Into<String>) -> Self {
        Self {
            state,
            text: text.into(),
            metrics: vec![],
        }
    }

    pub fn with_metric(mut self, metric: impl Into<String>) -> Self {
        self.metrics.push(metric.into());
        self
    }
}

/// Everything collected during one check invocation.
///
/// The `Display` implementation renders the service output line handed to
/// the monitoring core:
/// `"<STATE> - <summaries>[ | <metrics>][\n<details>]\n"`.
/// Texts are passed through unescaped.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    state: State,
    summaries: Vec<String>,
    details: Vec<String>,
    metrics: Vec<String>,
}

impl CheckOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        state: State,
        summaries: Vec<String>,
        details: Vec<String>,
        metrics: Vec<String>,
    ) -> Self {
        Self {
            state,
            summaries,
            details,
            metrics,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn summaries(&self) -> &[String] {
        &self.summaries
    }

    pub fn details(&self) -> &[String] {
        &self.details
    }

    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    pub fn add(&mut self, result: PartialResult) {
        self.state = self.state.merge(result.state);
        self.summaries.push(result.text);
        self.metrics.extend(result.metrics);
    }

    pub fn add_summary(&mut self, text: impl Into<String>) {
        self.summaries.push(text.into());
    }

    pub fn add_details(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    pub fn add_metric(&mut self, metric: impl Into<String>) {
        self.metrics.push(metric.into());
    }

    pub fn merge_state(&mut self, state: State) {
        self.state = self.state.merge(state);
    }

    pub fn replace_state(&mut self, state: State) {
        self.state = state;
    }
}

impl FromIterator<PartialResult> for CheckOutcome {
    fn from_iter<I: IntoIterator<Item = PartialResult>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), |mut out, pr| {
            out.add(pr);
            out
        })
    }
}

impl Display for CheckOutcome {
    fn fmt(&self, f: &mut Formatter) -> FormatResult {
        fn write_joined<T: Display>(
            f: &mut Formatter,
            mut iter: impl Iterator<Item = T>,
            start: &'static str,
            joiner: &'static str,
        ) -> FormatResult {
            if let Some(item) = iter.next() {
                write!(f, "{}{}", start, item)?;
            };
            // Same as collecting into a Vec and joining, without the allocations.
            for item in iter {
                write!(f, "{}{}", joiner, item)?;
            }
            Ok(())
        }

        write!(f, "{} - ", self.state)?;
        write_joined(f, self.summaries.iter(), "", ", ")?;
        write_joined(f, self.metrics.iter(), " | ", " ")?;
        write_joined(f, self.details.iter(), "\n", "\n")?;
        writeln!(f)
    }
}

#[cfg(test)]
mod test_output_format {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_outcome_is_ok() {
        assert_eq!(CheckOutcome::new().to_string(), "OK - \n");
    }

    #[test]
    fn test_full_report() {
        let out = CheckOutcome::from_parts(
            State::Ok,
            strings(&["a", "b"]),
            strings(&["l1"]),
            strings(&["m=1"]),
        );
        assert_eq!(out.to_string(), "OK - a, b | m=1\nl1\n");
    }

    #[test]
    fn test_no_metrics_no_pipe() {
        let out = CheckOutcome::from_parts(
            State::Warn,
            strings(&["summary 1"]),
            strings(&["details 1", "details 2"]),
            vec![],
        );
        assert_eq!(out.to_string(), "WARN - summary 1\ndetails 1\ndetails 2\n");
    }

    #[test]
    fn test_two_metrics() {
        let out = CheckOutcome::from_parts(
            State::Crit,
            strings(&["x"]),
            vec![],
            strings(&["m1=1;;;;", "m2=2;;;;"]),
        );
        assert_eq!(out.to_string(), "CRIT - x | m1=1;;;; m2=2;;;;\n");
    }

    #[test]
    fn test_worst_state_wins() {
        let out: CheckOutcome = vec![
            PartialResult::new(State::Ok, "summary 1"),
            PartialResult::new(State::Crit, "summary 2").with_metric("m=2"),
            PartialResult::new(State::Warn, "summary 3"),
        ]
        .into_iter()
        .collect();
        assert_eq!(out.state(), State::Crit);
        assert_eq!(out.to_string(), "CRIT - summary 1, summary 2, summary 3 | m=2\n");
    }

    #[test]
    fn test_separators_are_not_escaped() {
        let out = CheckOutcome::from_parts(
            State::Ok,
            strings(&["a | b", "c, d"]),
            vec![],
            vec![],
        );
        assert_eq!(out.to_string(), "OK - a | b, c, d\n");
    }

    #[test]
    fn test_replace_state_may_lower() {
        let mut out = CheckOutcome::new();
        out.merge_state(State::Unknown);
        out.replace_state(State::Crit);
        assert_eq!(out.state(), State::Crit);
    }
}
