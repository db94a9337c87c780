//! # Task System Core Traits
//!
//! This module defines the fundamental building blocks of the task system,
//! which runs work on background threads and applies the results on the
//! thread that owns the [`MeshManager`].
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The task returns a boxed `TaskResult`
//! 4. The result's `handle_result()` is called on the owning thread
//! 5. The result can update the mesh manager and spawn new tasks
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred between threads
//! - `TaskResult` must be `Send` to be transferred back to the owning thread
//! - Shared state such as the world goes through [`crate::core::MtResource`]

use crate::meshing::MeshManager;

/// A unit of work that can be executed on a worker thread.
///
/// Tasks should own everything they need, usually cloned `MtResource`
/// handles plus plain values.
pub trait Task: Send {
    /// Processes the task and returns a result.
    ///
    /// Runs on a worker thread. Any failure must be folded into the result;
    /// a panic here takes the worker down with it.
    fn process(&self) -> Box<dyn TaskResult + Send>;
}

/// The result of processing a [`Task`].
pub trait TaskResult: Send {
    /// Applies the result on the owning thread.
    ///
    /// # Returns
    /// Follow-up tasks to schedule (can be empty)
    fn handle_result(self: Box<Self>, mesh_manager: &mut MeshManager) -> Vec<Box<dyn Task + Send>>;
}
