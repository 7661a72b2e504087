//! Task definitions and the step-folding executor.
//!
//! A [`Task`] is data: a banner, an optional presence [`Guard`], and a
//! [`Plan`] of [`Step`]s. Running it appends to one output buffer and stops
//! at the first failing step; output already produced is always returned.

use std::path::Path;

use macup_core::Tool;

use crate::error::TaskError;
use crate::executor::{CommandResult, CommandRunner};
use crate::resolver::ToolResolver;

// ---------------------------------------------------------------------------
// Gating
// ---------------------------------------------------------------------------

/// What a step does when its tool cannot be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Invoke regardless; a missing tool fails at spawn time.
    Required,
    /// Leave a notice in the output and move on.
    SkipIfAbsent,
}

/// What a task prints when its guard binary is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardPolicy {
    /// Banner only.
    Silent,
    /// Banner plus `"<binary> is not installed."`.
    Announce,
}

/// Task-level presence check evaluated before any step runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guard {
    /// Executable looked up on the host. Need not be whitelisted; it is
    /// never executed.
    pub binary: &'static str,
    pub policy: GuardPolicy,
    /// If the binary resolves to exactly this path it counts as absent.
    pub stock_path: Option<&'static str>,
}

impl Guard {
    pub fn silent(binary: &'static str) -> Self {
        Self {
            binary,
            policy: GuardPolicy::Silent,
            stock_path: None,
        }
    }

    pub fn announce(binary: &'static str) -> Self {
        Self {
            binary,
            policy: GuardPolicy::Announce,
            stock_path: None,
        }
    }

    /// Treat the OS-provided copy at `path` as not installed.
    pub fn ignoring_stock(mut self, path: &'static str) -> Self {
        self.stock_path = Some(path);
        self
    }

    pub fn is_satisfied(&self, resolver: &dyn ToolResolver) -> bool {
        match resolver.resolve(self.binary) {
            None => false,
            Some(found) => self
                .stock_path
                .map_or(true, |stock| found.as_path() != Path::new(stock)),
        }
    }

    fn notice(&self) -> Option<String> {
        match self.policy {
            GuardPolicy::Silent => None,
            GuardPolicy::Announce => Some(format!("{} is not installed.", self.binary)),
        }
    }
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// One tool invocation with fixed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub tool: Tool,
    pub args: Vec<String>,
    pub gate: Gate,
    /// Informational line written before the step, whether or not it runs.
    pub heading: Option<&'static str>,
}

impl Step {
    pub fn required(tool: Tool, args: &[&str]) -> Self {
        Self::new(tool, args, Gate::Required)
    }

    pub fn skip_if_absent(tool: Tool, args: &[&str]) -> Self {
        Self::new(tool, args, Gate::SkipIfAbsent)
    }

    fn new(tool: Tool, args: &[&str], gate: Gate) -> Self {
        Self {
            tool,
            args: args.iter().map(|a| (*a).to_string()).collect(),
            gate,
            heading: None,
        }
    }

    pub fn with_heading(mut self, heading: &'static str) -> Self {
        self.heading = Some(heading);
        self
    }

    /// `brew cleanup -s`
    pub fn command_line(&self) -> String {
        std::iter::once(self.tool.binary())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn run(
        &self,
        runner: &dyn CommandRunner,
        resolver: &dyn ToolResolver,
        output: &mut String,
    ) -> Result<(), TaskError> {
        if let Some(heading) = self.heading {
            push_line(output, heading);
        }
        if self.gate == Gate::SkipIfAbsent && !resolver.is_present(self.tool.binary()) {
            tracing::info!(tool = %self.tool, "not installed, skipping step");
            push_line(output, &format!("skipping {}: not installed", self.tool));
            return Ok(());
        }

        let result = invoke(runner, self.tool, &self.args);
        output.push_str(&result.output);
        match result.error {
            None => Ok(()),
            Some(source) => Err(TaskError {
                command: self.command_line(),
                source,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

/// Steps discovered at run time from a listing command.
#[derive(Debug, Clone)]
pub struct Enumeration {
    /// Invoked once; its output is parsed, not shown.
    pub listing: Step,
    /// Turns listing output into identifiers. Blank or malformed lines are
    /// dropped here.
    pub parse: fn(&str) -> Vec<String>,
    /// Builds the step for one identifier.
    pub expand: fn(&str) -> Step,
}

#[derive(Debug, Clone)]
pub enum Plan {
    Fixed(Vec<Step>),
    Enumerated(Enumeration),
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

/// A named maintenance operation.
#[derive(Debug, Clone)]
pub struct Task {
    pub name: &'static str,
    pub banner: &'static str,
    pub guard: Option<Guard>,
    pub plan: Plan,
}

/// Output and (optional) failure of one task run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskOutcome {
    pub output: String,
    pub error: Option<TaskError>,
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

impl Task {
    pub fn new(name: &'static str, banner: &'static str, plan: Plan) -> Self {
        Self {
            name,
            banner,
            guard: None,
            plan,
        }
    }

    pub fn guarded_by(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Run every step in order, stopping at the first failure.
    pub fn run(&self, runner: &dyn CommandRunner, resolver: &dyn ToolResolver) -> TaskOutcome {
        let mut output = String::new();
        push_line(&mut output, self.banner);

        if let Some(guard) = &self.guard {
            if !guard.is_satisfied(resolver) {
                tracing::info!(task = self.name, binary = guard.binary, "not installed, skipping task");
                if let Some(notice) = guard.notice() {
                    push_line(&mut output, &notice);
                }
                return TaskOutcome {
                    output,
                    error: None,
                };
            }
        }

        let result = match &self.plan {
            Plan::Fixed(steps) => run_steps(steps, runner, resolver, &mut output),
            Plan::Enumerated(enumeration) => {
                run_enumerated(enumeration, runner, resolver, &mut output)
            }
        };

        if let Err(err) = &result {
            tracing::warn!(task = self.name, error = %err, "task stopped at failing step");
        }
        TaskOutcome {
            output,
            error: result.err(),
        }
    }
}

fn run_steps(
    steps: &[Step],
    runner: &dyn CommandRunner,
    resolver: &dyn ToolResolver,
    output: &mut String,
) -> Result<(), TaskError> {
    steps
        .iter()
        .try_for_each(|step| step.run(runner, resolver, output))
}

fn run_enumerated(
    enumeration: &Enumeration,
    runner: &dyn CommandRunner,
    resolver: &dyn ToolResolver,
    output: &mut String,
) -> Result<(), TaskError> {
    let listing = &enumeration.listing;
    let result = invoke(runner, listing.tool, &listing.args);
    if let Some(source) = result.error {
        output.push_str(&result.output);
        return Err(TaskError {
            command: listing.command_line(),
            source,
        });
    }

    let steps: Vec<Step> = (enumeration.parse)(&result.output)
        .iter()
        .map(|id| (enumeration.expand)(id.as_str()))
        .collect();
    tracing::debug!(command = %listing.command_line(), count = steps.len(), "enumerated steps");
    run_steps(&steps, runner, resolver, output)
}

fn invoke(runner: &dyn CommandRunner, tool: Tool, args: &[String]) -> CommandResult {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    runner.execute(tool.binary(), &args)
}

fn push_line(output: &mut String, line: &str) {
    output.push_str(line);
    output.push('\n');
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct At(&'static str);

    impl ToolResolver for At {
        fn resolve(&self, _binary: &str) -> Option<PathBuf> {
            Some(PathBuf::from(self.0))
        }
    }

    struct Nowhere;

    impl ToolResolver for Nowhere {
        fn resolve(&self, _binary: &str) -> Option<PathBuf> {
            None
        }
    }

    #[test]
    fn command_line_joins_tool_and_args() {
        let step = Step::required(Tool::Brew, &["cleanup", "-s"]);
        assert_eq!(step.command_line(), "brew cleanup -s");
        assert_eq!(
            Step::required(Tool::Mas, &["upgrade"]).command_line(),
            "mas upgrade"
        );
    }

    #[test]
    fn guard_rejects_stock_path() {
        let guard = Guard::announce("gem").ignoring_stock("/usr/bin/gem");
        assert!(!guard.is_satisfied(&At("/usr/bin/gem")));
        assert!(guard.is_satisfied(&At("/opt/homebrew/bin/gem")));
        assert!(!guard.is_satisfied(&Nowhere));
    }

    #[test]
    fn guard_without_stock_path_accepts_any_location() {
        assert!(Guard::silent("brew").is_satisfied(&At("/usr/bin/brew")));
    }

    #[test]
    fn guard_notices() {
        assert_eq!(Guard::silent("brew").notice(), None);
        assert_eq!(
            Guard::announce("gem").notice().as_deref(),
            Some("gem is not installed.")
        );
    }
}
