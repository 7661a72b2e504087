//! # macup-runner
//!
//! The update task execution engine.
//!
//! [`Orchestrator::run`] gates on connectivity, resolves the task selection
//! through the config store, then runs each selected [`Task`] from the
//! [`Catalog`] one after another. Every external process goes through a
//! [`CommandRunner`], which enforces the tool whitelist and the
//! argument filter before spawning anything.

pub mod catalog;
pub mod connectivity;
pub mod error;
pub mod executor;
pub mod orchestrator;
pub mod resolver;
pub mod task;

pub use catalog::Catalog;
pub use connectivity::{ConnectivityProbe, HttpProbe};
pub use error::{ConnectivityError, ExecError, RunError, SelectionError, TaskError};
pub use executor::{CommandResult, CommandRunner, SystemRunner};
pub use orchestrator::{
    Orchestrator, RunOptions, RunReport, SelectionOrigin, SelectionReason, SelectionSource,
    TaskReport,
};
pub use resolver::{PathResolver, ToolResolver};
pub use task::{Gate, Guard, GuardPolicy, Plan, Step, Task, TaskOutcome};
