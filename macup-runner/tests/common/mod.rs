//! In-memory host used by the runner integration tests.
//!
//! Records every command line it is asked to run and answers from a script;
//! unscripted commands succeed and echo their command line.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;

use macup_runner::{executor, CommandResult, CommandRunner, ExecError, ToolResolver};

#[derive(Default)]
pub struct FakeHost {
    installed: HashMap<String, PathBuf>,
    script: RefCell<HashMap<String, VecDeque<CommandResult>>>,
    calls: RefCell<Vec<String>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `binaries` under `/opt/homebrew/bin`.
    pub fn with_tools(mut self, binaries: &[&str]) -> Self {
        for b in binaries {
            self.installed
                .insert((*b).to_string(), PathBuf::from(format!("/opt/homebrew/bin/{b}")));
        }
        self
    }

    pub fn with_tool_at(mut self, binary: &str, path: &str) -> Self {
        self.installed.insert(binary.to_string(), PathBuf::from(path));
        self
    }

    /// Queue a result for `command_line` (e.g. `"brew upgrade"`).
    pub fn respond(self, command_line: &str, result: CommandResult) -> Self {
        self.script
            .borrow_mut()
            .entry(command_line.to_string())
            .or_default()
            .push_back(result);
        self
    }

    pub fn fail(self, command_line: &str, partial: &str) -> Self {
        let tool = command_line.split(' ').next().unwrap_or_default().to_string();
        self.respond(
            command_line,
            CommandResult::failed(
                partial,
                ExecError::Execution {
                    tool,
                    reason: "exit status: 1".into(),
                },
            ),
        )
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for FakeHost {
    fn execute(&self, tool: &str, args: &[&str]) -> CommandResult {
        if let Err(err) = executor::validate(tool, args) {
            return CommandResult::failed(String::new(), err);
        }
        let line = std::iter::once(tool)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.borrow_mut().push(line.clone());

        let scripted = self
            .script
            .borrow_mut()
            .get_mut(&line)
            .and_then(VecDeque::pop_front);
        scripted.unwrap_or_else(|| CommandResult::ok(format!("{line}\n")))
    }
}

impl ToolResolver for FakeHost {
    fn resolve(&self, binary: &str) -> Option<PathBuf> {
        self.installed.get(binary).cloned()
    }
}
