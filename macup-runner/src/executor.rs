//! Whitelisted command execution.
//!
//! ## `execute` — validation order
//!
//! 1. Executable name must be in [`Whitelist::get`].
//! 2. No argument may contain a character from [`FORBIDDEN_CHARS`].
//! 3. Spawn, with stdout and stderr sharing one pipe so the captured text
//!    keeps the order the child wrote it in.
//!
//! Steps 1 and 2 never spawn anything and return empty output.

use std::io::Read;
use std::process::{Command, ExitStatus, Stdio};

use macup_core::Whitelist;

use crate::error::ExecError;

/// Shell metacharacters rejected in any argument.
pub const FORBIDDEN_CHARS: [char; 6] = ['&', '|', ';', '$', '>', '<'];

// ---------------------------------------------------------------------------
// Command result
// ---------------------------------------------------------------------------

/// Outcome of one invocation: everything the child wrote, plus the error if
/// it did not succeed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub output: String,
    pub error: Option<ExecError>,
}

impl CommandResult {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            error: None,
        }
    }

    pub fn failed(output: impl Into<String>, error: ExecError) -> Self {
        Self {
            output: output.into(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Runs one external command to completion.
pub trait CommandRunner {
    fn execute(&self, tool: &str, args: &[&str]) -> CommandResult;
}

/// Check `tool` and `args` without running anything.
pub fn validate(tool: &str, args: &[&str]) -> Result<(), ExecError> {
    if !Whitelist::get().contains(tool) {
        return Err(ExecError::CommandNotAllowed {
            tool: tool.to_string(),
        });
    }
    if let Some(arg) = args.iter().find(|a| a.contains(FORBIDDEN_CHARS)) {
        return Err(ExecError::InvalidArgument {
            arg: (*arg).to_string(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// SystemRunner
// ---------------------------------------------------------------------------

/// Spawns real processes. One child per call, always awaited.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn execute(&self, tool: &str, args: &[&str]) -> CommandResult {
        if let Err(err) = validate(tool, args) {
            tracing::warn!(tool, error = %err, "refusing to run command");
            return CommandResult::failed(String::new(), err);
        }

        tracing::debug!(tool, ?args, "running command");
        let mut captured = Vec::new();
        let outcome = spawn_and_capture(tool, args, &mut captured);
        let output = String::from_utf8_lossy(&captured).into_owned();

        match outcome {
            Ok(status) if status.success() => CommandResult::ok(output),
            Ok(status) => {
                tracing::warn!(tool, %status, "command exited unsuccessfully");
                CommandResult::failed(
                    output,
                    ExecError::Execution {
                        tool: tool.to_string(),
                        reason: status.to_string(),
                    },
                )
            }
            Err(err) => {
                tracing::warn!(tool, error = %err, "command could not be run");
                CommandResult::failed(
                    output,
                    ExecError::Execution {
                        tool: tool.to_string(),
                        reason: err.to_string(),
                    },
                )
            }
        }
    }
}

fn spawn_and_capture(
    tool: &str,
    args: &[&str],
    buf: &mut Vec<u8>,
) -> std::io::Result<ExitStatus> {
    let (mut reader, writer) = std::io::pipe()?;
    let stderr = writer.try_clone()?;
    // The Command (and its copies of the write end) is dropped at the end of
    // this statement, so the reader sees EOF once the child exits.
    let mut child = Command::new(tool)
        .args(args)
        .stdin(Stdio::null())
        .stdout(writer)
        .stderr(stderr)
        .spawn()?;

    let read = reader.read_to_end(buf);
    let status = child.wait()?;
    read?;
    Ok(status)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
