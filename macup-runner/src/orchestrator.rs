//! Run orchestration: connectivity gate → config → selection → tasks.
//!
//! Connectivity, config, and selection failures abort the run before any
//! task executes. Task failures are carried in the [`RunReport`] and never
//! abort the run.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use macup_core::{Config, ConfigStore};

use crate::catalog::Catalog;
use crate::connectivity::ConnectivityProbe;
use crate::error::{RunError, SelectionError, TaskError};
use crate::executor::CommandRunner;
use crate::resolver::ToolResolver;

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Why the selection source is being asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionReason {
    /// The caller did not ask to reuse the saved selection.
    Requested,
    /// Reuse was asked for, but nothing is saved.
    NoPreviousSelection,
}

/// Produces the ordered list of task names to run. Called at most once per run.
pub trait SelectionSource {
    fn select(
        &mut self,
        config: &Config,
        available: &[&'static str],
        reason: SelectionReason,
    ) -> Result<Vec<String>, SelectionError>;
}

/// Where the names that ran came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOrigin {
    /// The persisted selection, unchanged.
    Reused,
    /// A fresh selection, now persisted.
    Fresh,
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Use the persisted selection without asking, when there is one.
    pub reuse_previous: bool,
}

/// Result of one executed task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub name: String,
    pub output: String,
    pub error: Option<TaskError>,
    pub elapsed: Duration,
}

impl TaskReport {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub origin: SelectionOrigin,
    /// Executed tasks, in selection order.
    pub tasks: Vec<TaskReport>,
    /// Selected names with no matching task.
    pub unknown: Vec<String>,
}

impl RunReport {
    pub fn failed(&self) -> impl Iterator<Item = &TaskReport> {
        self.tasks.iter().filter(|t| !t.is_success())
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

pub struct Orchestrator<'a> {
    catalog: &'a Catalog,
    store: &'a ConfigStore,
    probe: &'a dyn ConnectivityProbe,
    runner: &'a dyn CommandRunner,
    resolver: &'a dyn ToolResolver,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        catalog: &'a Catalog,
        store: &'a ConfigStore,
        probe: &'a dyn ConnectivityProbe,
        runner: &'a dyn CommandRunner,
        resolver: &'a dyn ToolResolver,
    ) -> Self {
        Self {
            catalog,
            store,
            probe,
            runner,
            resolver,
        }
    }

    pub fn run(
        &self,
        options: &RunOptions,
        selector: &mut dyn SelectionSource,
    ) -> Result<RunReport, RunError> {
        if let Err(err) = self.probe.check() {
            tracing::warn!(error = %err, "no internet connection, aborting run");
            return Err(RunError::NetworkUnavailable(err));
        }

        let mut config = self.store.load()?;
        let (selected, origin) = if options.reuse_previous && config.has_selection() {
            tracing::info!(count = config.selected_updates.len(), "reusing previous selection");
            (config.selected_updates.clone(), SelectionOrigin::Reused)
        } else {
            let reason = if options.reuse_previous {
                SelectionReason::NoPreviousSelection
            } else {
                SelectionReason::Requested
            };
            let selected = selector.select(&config, &self.catalog.names(), reason)?;
            config.selected_updates = selected.clone();
            self.store.save(&config)?;
            (selected, SelectionOrigin::Fresh)
        };

        let mut report = RunReport {
            origin,
            tasks: Vec::with_capacity(selected.len()),
            unknown: Vec::new(),
        };
        let mut seen = HashSet::new();
        for name in selected {
            if !seen.insert(name.clone()) {
                continue;
            }
            let Some(task) = self.catalog.get(&name) else {
                tracing::warn!(task = %name, "unknown task in selection, skipping");
                report.unknown.push(name);
                continue;
            };

            tracing::info!(task = %name, "running task");
            let started = Instant::now();
            let outcome = task.run(self.runner, self.resolver);
            report.tasks.push(TaskReport {
                name,
                output: outcome.output,
                error: outcome.error,
                elapsed: started.elapsed(),
            });
        }
        Ok(report)
    }
}
