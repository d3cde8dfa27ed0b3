//! Runtime-agnostic local process execution
//!
//! This crate provides the small process-launching capability the local
//! JVM launcher is built on: a clonable command builder, a handle for
//! waiting on a started process, and a stream of line events read from
//! the process's stdout and stderr as they are produced.

#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod event;
pub mod process;
pub mod spawner;

pub use command::Command;
pub use error::{Error, Result};
pub use event::{ProcessEvent, ProcessEventType};
pub use process::{ExitStatus, ProcessHandle};
pub use spawner::{EventStream, LocalSpawner, Spawner};
