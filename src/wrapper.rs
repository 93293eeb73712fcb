// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Execution of a single "Check_MK" check.
//!
//! [`execute`] runs a check body, classifies whatever it fails with and
//! renders exactly one service output. The output goes to the keepalive
//! transport if one is active, otherwise to the given writer. Only
//! termination, keepalive timeouts and (in debug mode) unclassified failures
//! leave [`execute`] without a rendered result.

use crate::classifier::{Classifier, CrashSite};
use crate::config::ExecConfig;
use crate::crash::CrashReporter;
use crate::exit_spec::ExitCodeSpec;
use crate::failure::CheckFailure;
use crate::keepalive::Transport;
use crate::output::CheckOutcome;
use anyhow::Context;
use std::io::Write;
use typed_builder::TypedBuilder;

pub const DEFAULT_DESCRIPTION: &str = "Check_MK";

/// Source of the per host exit code spec. Read only during a check run.
pub trait HostConfigLookup {
    fn exit_code_spec(&self, host: &str) -> ExitCodeSpec;
}

impl HostConfigLookup for ExitCodeSpec {
    fn exit_code_spec(&self, _host: &str) -> ExitCodeSpec {
        self.clone()
    }
}

/// Process wide state, passed explicitly.
pub struct RunContext<'a> {
    pub debug: bool,
    pub transport: Option<&'a mut dyn Transport>,
    pub crash_reporter: &'a dyn CrashReporter,
}

impl RunContext<'_> {
    pub fn is_keepalive_active(&self) -> bool {
        self.transport.as_ref().is_some_and(|t| t.enabled())
    }
}

#[derive(Debug, TypedBuilder)]
pub struct Invocation<'a> {
    pub host: &'a str,
    pub plugin: &'a str,
    #[builder(default = DEFAULT_DESCRIPTION)]
    pub description: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Pending,
    Running,
    Completed,
    Failed,
    Aborted,
}

fn enter(phase: &mut Phase, next: Phase, invocation: &Invocation) {
    log::debug!(
        "{}/{}: {:?} -> {:?}",
        invocation.host,
        invocation.plugin,
        phase,
        next
    );
    *phase = next;
}

/// Runs `body` and returns the exit code of the resulting state.
pub fn execute<F>(
    ctx: &mut RunContext,
    host_config: &dyn HostConfigLookup,
    invocation: &Invocation,
    out: &mut dyn Write,
    body: F,
) -> Result<i32, CheckFailure>
where
    F: FnOnce(&mut CheckOutcome) -> Result<(), CheckFailure>,
{
    let mut phase = Phase::Pending;
    let exit_spec = host_config.exit_code_spec(invocation.host);
    let keepalive = ctx.is_keepalive_active();
    enter(&mut phase, Phase::Running, invocation);

    let mut outcome = CheckOutcome::new();
    match body(&mut outcome) {
        Ok(()) => enter(&mut phase, Phase::Completed, invocation),
        Err(failure) => {
            let classifier = Classifier {
                exit_spec: &exit_spec,
                keepalive,
                debug: ctx.debug,
                crash_reporter: ctx.crash_reporter,
                site: CrashSite {
                    host: invocation.host,
                    plugin: invocation.plugin,
                    description: invocation.description,
                },
            };
            let text = failure.to_string();
            if let Err(failure) = classifier.classify(failure, &mut outcome) {
                enter(&mut phase, Phase::Aborted, invocation);
                log::warn!(
                    "{}/{}: aborted: {}",
                    invocation.host,
                    invocation.plugin,
                    failure
                );
                return Err(failure);
            }
            log::info!(
                "{}/{}: classified failure as {}: {}",
                invocation.host,
                invocation.plugin,
                outcome.state(),
                text
            );
            enter(&mut phase, Phase::Failed, invocation);
        }
    }

    let report = outcome.to_string();
    match ctx.transport.as_deref_mut() {
        Some(transport) if keepalive => {
            transport.submit_result(invocation.host, &report);
            log::debug!("{}", report);
        }
        _ => {
            out.write_all(report.as_bytes())
                .and_then(|_| out.flush())
                .context("Failed to write check result")?;
        }
    }

    Ok(outcome.state().into())
}

/// One-shot run configured from `config`, reporting to stdout.
pub fn run_one_shot<F>(
    config: &ExecConfig,
    invocation: &Invocation,
    body: F,
) -> Result<i32, CheckFailure>
where
    F: FnOnce(&mut CheckOutcome) -> Result<(), CheckFailure>,
{
    run_one_shot_to(config, invocation, &mut std::io::stdout(), body)
}

/// Like [`run_one_shot`], but reports to `out`.
pub fn run_one_shot_to<F>(
    config: &ExecConfig,
    invocation: &Invocation,
    out: &mut dyn Write,
    body: F,
) -> Result<i32, CheckFailure>
where
    F: FnOnce(&mut CheckOutcome) -> Result<(), CheckFailure>,
{
    let crash_reporter = config.crash_reporter();
    let mut ctx = RunContext {
        debug: config.debug(),
        transport: None,
        crash_reporter: &crash_reporter,
    };
    execute(&mut ctx, config, invocation, out, body)
}
