//! # Engine Error Types
//!
//! Errors raised by the parts of the engine that touch the outside world:
//! configuration files and the worker pool. Meshing itself cannot fail.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that can occur while setting up or driving the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The configuration file could not be read.
    #[error("failed to read configuration {path:?}: {source}")]
    ConfigIo {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },

    /// The configuration was not valid JSON for [`crate::config::EngineConfig`].
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The configuration parsed but holds unusable values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A worker thread could not be started.
    #[error("failed to spawn worker thread: {0}")]
    WorkerSpawn(#[source] io::Error),

    /// A worker thread hung up while tasks were still in flight.
    #[error("worker {0} disconnected with tasks in flight")]
    WorkerDisconnected(usize),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
