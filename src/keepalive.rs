// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

use crate::crash::CrashReporter;
use crate::failure::CheckFailure;
use crate::output::CheckOutcome;
use crate::wrapper::{self, HostConfigLookup, Invocation, RunContext};
use anyhow::{bail, Result};

/// Result channel of a persistent worker.
pub trait Transport {
    fn enabled(&self) -> bool {
        true
    }

    fn submit_result(&mut self, host: &str, report: &str);
}

/// Keeps submitted results in order of submission.
#[derive(Debug)]
pub struct ResultQueue {
    enabled: bool,
    results: Vec<(String, String)>,
}

impl Default for ResultQueue {
    fn default() -> Self {
        Self {
            enabled: true,
            results: vec![],
        }
    }
}

impl ResultQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            results: vec![],
        }
    }

    pub fn results(&self) -> &[(String, String)] {
        &self.results
    }

    pub fn drain(&mut self) -> Vec<(String, String)> {
        std::mem::take(&mut self.results)
    }
}

impl Transport for ResultQueue {
    fn enabled(&self) -> bool {
        self.enabled
    }

    fn submit_result(&mut self, host: &str, report: &str) {
        self.results.push((host.to_string(), report.to_string()));
    }
}

pub type CheckBody = Box<dyn FnOnce(&mut CheckOutcome) -> Result<(), CheckFailure>>;

pub struct Job {
    pub host: String,
    pub plugin: String,
    pub description: String,
    pub body: CheckBody,
}

impl Job {
    pub fn new<F>(host: &str, plugin: &str, body: F) -> Self
    where
        F: FnOnce(&mut CheckOutcome) -> Result<(), CheckFailure> + 'static,
    {
        Self {
            host: host.to_string(),
            plugin: plugin.to_string(),
            description: wrapper::DEFAULT_DESCRIPTION.to_string(),
            body: Box::new(body),
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct WorkerSummary {
    pub processed: usize,
    pub timed_out: Vec<String>,
}

/// Persistent worker: runs jobs one after another and hands every result to
/// its transport.
pub struct Worker<'a, T: Transport> {
    transport: T,
    host_config: &'a dyn HostConfigLookup,
    crash_reporter: &'a dyn CrashReporter,
    debug: bool,
}

impl<'a, T: Transport> Worker<'a, T> {
    /// Fails on a disabled transport: the worker has no other sink for results.
    pub fn new(
        transport: T,
        host_config: &'a dyn HostConfigLookup,
        crash_reporter: &'a dyn CrashReporter,
        debug: bool,
    ) -> Result<Self> {
        if !transport.enabled() {
            log::error!("Keepalive transport is disabled, worker not started");
            bail!("Keepalive worker requires an enabled transport");
        }
        Ok(Self {
            transport,
            host_config,
            crash_reporter,
            debug,
        })
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Stops on the first failure which is not a timeout.
    pub fn run(
        &mut self,
        jobs: impl IntoIterator<Item = Job>,
    ) -> Result<WorkerSummary, CheckFailure> {
        let mut summary = WorkerSummary::default();
        for job in jobs {
            let invocation = Invocation::builder()
                .host(&job.host)
                .plugin(&job.plugin)
                .description(&job.description)
                .build();
            let mut ctx = RunContext {
                debug: self.debug,
                transport: Some(&mut self.transport),
                crash_reporter: self.crash_reporter,
            };
            let res = wrapper::execute(
                &mut ctx,
                self.host_config,
                &invocation,
                &mut std::io::sink(),
                job.body,
            );
            summary.processed += 1;
            match res {
                Ok(code) => log::debug!("{}/{}: exit code {}", job.host, job.plugin, code),
                Err(CheckFailure::Timeout) => {
                    log::warn!("{}/{}: timed out", job.host, job.plugin);
                    summary.timed_out.push(job.host.clone());
                }
                Err(failure) => {
                    log::error!("{}/{}: worker stops: {}", job.host, job.plugin, failure);
                    return Err(failure);
                }
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checking_types::State;
    use crate::crash::CrashInfo;
    use crate::exit_spec::{ExitCategory, ExitCodeSpec};
    use crate::output::PartialResult;
    use anyhow::{anyhow, Result};

    struct FixedReporter;

    impl CrashReporter for FixedReporter {
        fn create_crash_dump(&self, _info: &CrashInfo) -> Result<String> {
            Ok("Crash dump:\nid".to_string())
        }
    }

    fn ok_job(host: &str) -> Job {
        Job::new(host, "mk_agent", |o| {
            o.add(PartialResult::new(State::Ok, "fine"));
            Ok(())
        })
    }

    #[test]
    fn test_sequential_results() {
        let spec = ExitCodeSpec::new().with(ExitCategory::Connection, State::Warn);
        let mut worker = Worker::new(ResultQueue::new(), &spec, &FixedReporter, false).unwrap();
        let jobs = vec![
            ok_job("a"),
            Job::new("b", "mk_agent", |_| Err(CheckFailure::agent("refused"))),
            Job::new("c", "mk_agent", |_| Err(anyhow!("bug").into())),
        ];
        let summary = worker.run(jobs).unwrap();
        assert_eq!(summary.processed, 3);
        assert_eq!(
            worker.transport().results(),
            [
                ("a".to_string(), "OK - fine\n".to_string()),
                ("b".to_string(), "WARN - refused\n".to_string()),
                ("c".to_string(), "UNKN - \nCrash dump:\\nid\n".to_string()),
            ]
        );
    }

    #[test]
    fn test_timeout_is_observed_by_loop() {
        let spec = ExitCodeSpec::new();
        let mut worker = Worker::new(ResultQueue::new(), &spec, &FixedReporter, false).unwrap();
        let jobs = vec![
            Job::new("slow", "mk_agent", |_| Err(CheckFailure::Timeout)),
            ok_job("fast"),
        ];
        let summary = worker.run(jobs).unwrap();
        assert_eq!(
            summary,
            WorkerSummary {
                processed: 2,
                timed_out: vec!["slow".to_string()],
            }
        );
        assert_eq!(worker.transport().results().len(), 1);
        assert_eq!(worker.transport().results()[0].0, "fast");
    }

    #[test]
    fn test_termination_stops_loop() {
        let spec = ExitCodeSpec::new();
        let mut worker = Worker::new(ResultQueue::new(), &spec, &FixedReporter, false).unwrap();
        let jobs = vec![
            Job::new("x", "mk_agent", |_| Err(CheckFailure::Terminated)),
            ok_job("never"),
        ];
        assert!(matches!(worker.run(jobs), Err(CheckFailure::Terminated)));
        assert!(worker.transport().results().is_empty());
    }

    #[test]
    fn test_disabled_transport_is_rejected() {
        let spec = ExitCodeSpec::new();
        assert!(Worker::new(ResultQueue::disabled(), &spec, &FixedReporter, false).is_err());
    }

    #[test]
    fn test_drain() {
        let mut queue = ResultQueue::new();
        queue.submit_result("h", "OK - \n");
        assert_eq!(queue.drain().len(), 1);
        assert!(queue.results().is_empty());
    }
}
