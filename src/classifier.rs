// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

use crate::crash::{CrashInfo, CrashReporter};
use crate::exit_spec::{ExitCategory, ExitCodeSpec};
use crate::failure::CheckFailure;
use crate::output::CheckOutcome;

/// Identifies the check a crash dump is created for.
pub struct CrashSite<'a> {
    pub host: &'a str,
    pub plugin: &'a str,
    pub description: &'a str,
}

pub struct Classifier<'a> {
    pub exit_spec: &'a ExitCodeSpec,
    pub keepalive: bool,
    pub debug: bool,
    pub crash_reporter: &'a dyn CrashReporter,
    pub site: CrashSite<'a>,
}

impl Classifier<'_> {
    /// Folds `failure` into `outcome`.
    ///
    /// Returns the failure unchanged if it must leave the wrapper: termination
    /// always, timeouts in keepalive mode and unclassified failures in debug mode.
    /// Connection failures replace the accumulated state, all others merge into it.
    pub fn classify(
        &self,
        failure: CheckFailure,
        outcome: &mut CheckOutcome,
    ) -> Result<(), CheckFailure> {
        match failure {
            CheckFailure::Terminated => Err(failure),
            CheckFailure::Timeout if self.keepalive => Err(failure),
            CheckFailure::Timeout => {
                outcome.add_summary("Timed out");
                outcome.merge_state(self.exit_spec.state_for(ExitCategory::Timeout));
                Ok(())
            }
            CheckFailure::Communication { message, .. } => {
                outcome.add_summary(message);
                outcome.replace_state(self.exit_spec.state_for(ExitCategory::Connection));
                Ok(())
            }
            CheckFailure::Application(message) => {
                outcome.add_summary(message);
                outcome.merge_state(self.exit_spec.state_for(ExitCategory::Exception));
                Ok(())
            }
            CheckFailure::Unclassified(err) => {
                if self.debug {
                    return Err(CheckFailure::Unclassified(err));
                }
                let info = CrashInfo::from_error(
                    self.site.host,
                    self.site.plugin,
                    self.site.description,
                    &err,
                );
                let crash_text = self.crash_reporter.create_crash_dump(&info)?;
                outcome.add_details(crash_text.replace('\n', "\\n"));
                outcome.merge_state(self.exit_spec.state_for(ExitCategory::Exception));
                Ok(())
            }
        }
    }
}
