//! # Task Management System
//!
//! A small worker pool for running chunk mesh builds off the calling thread.
//!
//! ## Architecture Overview
//! - `TaskManager`: Central coordinator for task distribution and worker management
//! - `Task`: A unit of work executed on a worker thread
//! - `TaskResult`: The result of a completed task, which can spawn additional tasks
//! - `TaskChannel`: Communication channel between the owning thread and one worker
//!
//! Every worker is a named `std::thread` with a dedicated pair of `mpsc`
//! channels. Tasks are handed out round-robin with at most
//! [`MAX_TASKS_IN_FLIGHT`] per worker; the rest wait in a FIFO queue.
//!
//! ## Task Lifecycle
//! 1. Tasks are created and published via `TaskManager::publish_task()`
//! 2. The manager distributes tasks to available worker channels using round-robin
//! 3. Workers process tasks and send results back
//! 4. Results are applied to the [`MeshManager`] in `process_completed_tasks()`
//! 5. Results can spawn new tasks
//!
//! ## Example Usage
//! ```
//! use cgmath::Point3;
//! use voxel_mesher::{
//!     core::MtResource, BlockType, Chunk, MeshManager, TaskManager, World,
//! };
//!
//! let mut world = World::new();
//! world.insert_chunk(Chunk::filled(&Point3::new(0, 0, 0), BlockType::STONE));
//! let world = MtResource::new(world);
//!
//! let mut mesh_manager = MeshManager::new(64)?;
//! let mut task_manager = TaskManager::new(2)?;
//!
//! mesh_manager.mark_dirty(Point3::new(0, 0, 0));
//! mesh_manager.schedule_dirty(&mut task_manager, &world);
//! task_manager.wait_for_idle(&mut mesh_manager)?;
//!
//! assert_eq!(mesh_manager.peek_mesh(Point3::new(0, 0, 0)).map(|m| m.face_count()), Some(6));
//! # Ok::<(), voxel_mesher::EngineError>(())
//! ```

pub mod task;

use std::{
    collections::VecDeque,
    sync::mpsc::{channel, Receiver, Sender, TryRecvError},
    thread::{self, JoinHandle},
};

use log::{debug, error, info, warn};

use crate::{
    error::{EngineError, EngineResult},
    meshing::MeshManager,
};
use task::{Task, TaskResult};

/// A communication channel between the owning thread and a worker thread.
///
/// # Fields
/// - `task_sender`: Sends tasks from the owning thread to the worker
/// - `result_receiver`: Receives task results from the worker
/// - `num_tasks_in_flight`: Tracks number of tasks currently being processed
/// - `worker`: Handle to the worker thread, joined when the manager drops
struct TaskChannel {
    task_sender: Sender<Box<dyn Task + Send>>,
    result_receiver: Receiver<Box<dyn TaskResult + Send>>,
    num_tasks_in_flight: usize,
    worker: JoinHandle<()>,
}

/// Manages a pool of worker threads and coordinates task execution.
///
/// The `TaskManager` is responsible for:
/// - Creating and joining worker threads
/// - Distributing tasks across available workers
/// - Collecting results and applying them to the [`MeshManager`]
/// - Queuing tasks while all workers are busy
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task + Send>>,
    current_channel: usize,
}

/// Maximum number of tasks that can be in flight per worker channel.
///
/// Keeping this at 1 leaves queued work in the manager, where it can still be
/// picked up by whichever worker frees up first.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl TaskManager {
    /// Creates a new `TaskManager` with the specified number of worker threads.
    ///
    /// # Errors
    /// - [`EngineError::InvalidConfig`] if `num_workers` is zero
    /// - [`EngineError::WorkerSpawn`] if the OS refuses to start a thread
    pub fn new(num_workers: usize) -> EngineResult<Self> {
        if num_workers == 0 {
            return Err(EngineError::InvalidConfig(
                "the worker pool needs at least one worker".to_string(),
            ));
        }

        info!(
            "Starting {} mesh workers (available parallelism: {:?})",
            num_workers,
            thread::available_parallelism()
        );

        let mut channels = Vec::with_capacity(num_workers);
        for index in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task + Send>>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult + Send>>();

            let worker = thread::Builder::new()
                .name(format!("mesh-worker-{index}"))
                .spawn(move || {
                    while let Ok(task) = task_rx.recv() {
                        let result = task.process();
                        if result_tx.send(result).is_err() {
                            break;
                        }
                    }
                })
                .map_err(EngineError::WorkerSpawn)?;

            channels.push(TaskChannel {
                task_sender: task_tx,
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                worker,
            });
        }

        Ok(TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        })
    }

    /// Number of worker threads.
    pub fn num_workers(&self) -> usize {
        self.channels.len()
    }

    /// Tasks sent to a worker whose results have not been handled yet.
    pub fn tasks_in_flight(&self) -> usize {
        self.channels.iter().map(|c| c.num_tasks_in_flight).sum()
    }

    /// Tasks waiting for a free worker.
    pub fn queued_tasks(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Whether every published task has been handled.
    pub fn is_idle(&self) -> bool {
        self.queued_tasks.is_empty() && self.tasks_in_flight() == 0
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// Returns the task on failure (worker disconnected) so it can be requeued.
    fn try_send_task(
        &mut self,
        task: Box<dyn Task + Send>,
        channel_idx: usize,
    ) -> Result<(), Box<dyn Task + Send>> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(()) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(task) => {
                warn!("Worker {} is gone, requeueing task", channel_idx);
                Err(task.0)
            }
        }
    }

    /// Finds an available worker channel, round-robin from the last one used.
    ///
    /// Channels that have reached [`MAX_TASKS_IN_FLIGHT`] are skipped.
    fn find_available_channel(&self) -> Option<usize> {
        let len = self.channels.len();
        (0..len)
            .map(|step| (self.current_channel + step) % len)
            .find(|&idx| self.channels[idx].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT)
    }

    /// Publishes a new task for execution.
    ///
    /// # Returns
    /// - `true` if the task was immediately sent to an available worker
    /// - `false` if the task was queued because all workers are busy
    pub fn publish_task(&mut self, task: Box<dyn Task + Send>) -> bool {
        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(()) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(task) => {
                    self.queued_tasks.push_back(task);
                    false
                }
            },
            None => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Sends queued tasks to workers until the queue is empty or every worker is busy.
    ///
    /// Tasks leave the queue in FIFO order.
    pub fn process_queued_tasks(&mut self) {
        while let Some(channel_idx) = self.find_available_channel() {
            let Some(task) = self.queued_tasks.pop_front() else {
                return;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(()) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => {
                    // Channel is disconnected, put task back and stop processing
                    self.queued_tasks.push_front(task);
                    return;
                }
            }
        }
    }

    /// Applies every result that has already arrived, without blocking.
    ///
    /// Follow-up tasks returned by the results are published.
    ///
    /// # Returns
    /// The number of results handled
    ///
    /// # Errors
    /// [`EngineError::WorkerDisconnected`] if a worker died with tasks in flight
    pub fn process_completed_tasks(&mut self, mesh_manager: &mut MeshManager) -> EngineResult<usize> {
        let mut tasks_to_queue = Vec::new();
        let mut handled = 0;
        let mut disconnected = None;

        for (index, channel) in self.channels.iter_mut().enumerate() {
            loop {
                match channel.result_receiver.try_recv() {
                    Ok(result) => {
                        channel.num_tasks_in_flight -= 1;
                        handled += 1;
                        tasks_to_queue.extend(result.handle_result(mesh_manager));
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        if channel.num_tasks_in_flight > 0 && disconnected.is_none() {
                            disconnected = Some(index);
                        }
                        break;
                    }
                }
            }
        }

        for task in tasks_to_queue {
            self.publish_task(task);
        }

        match disconnected {
            Some(index) => {
                error!("Mesh worker {} disconnected with tasks in flight", index);
                Err(EngineError::WorkerDisconnected(index))
            }
            None => Ok(handled),
        }
    }

    /// Blocks until every published task, including follow-ups, has been handled.
    ///
    /// # Returns
    /// The number of results handled while waiting
    ///
    /// # Errors
    /// [`EngineError::WorkerDisconnected`] if a worker died before finishing
    pub fn wait_for_idle(&mut self, mesh_manager: &mut MeshManager) -> EngineResult<usize> {
        let mut handled = 0;

        loop {
            self.process_queued_tasks();
            handled += self.process_completed_tasks(mesh_manager)?;

            if self.is_idle() {
                debug!("Task manager idle after handling {} results", handled);
                return Ok(handled);
            }

            let Some(index) = self
                .channels
                .iter()
                .position(|channel| channel.num_tasks_in_flight > 0)
            else {
                // Work is queued but no worker accepted it.
                return Err(EngineError::WorkerDisconnected(self.current_channel));
            };

            let channel = &mut self.channels[index];
            let result = channel
                .result_receiver
                .recv()
                .map_err(|_| EngineError::WorkerDisconnected(index))?;
            channel.num_tasks_in_flight -= 1;
            handled += 1;

            for task in result.handle_result(mesh_manager) {
                self.publish_task(task);
            }
        }
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        let workers: Vec<_> = self
            .channels
            .drain(..)
            .map(|channel| {
                drop(channel.task_sender);
                drop(channel.result_receiver);
                channel.worker
            })
            .collect();

        for worker in workers {
            if worker.join().is_err() {
                warn!("A mesh worker panicked before shutdown");
            }
        }

        if !self.queued_tasks.is_empty() {
            debug!("Dropped {} queued tasks on shutdown", self.queued_tasks.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::MtResource,
        meshing::{ChunkMesher, MeshData},
        voxels::{
            block::block_type::BlockType,
            chunk::Chunk,
            world::{ChunkGenerationMethod, ChunkGenerator, World},
        },
    };
    use cgmath::Point3;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn random_world() -> World {
        let generator = ChunkGenerator {
            method: ChunkGenerationMethod::Random,
            seed: 7,
            fill_block: BlockType::STONE,
        };
        let mut world = World::new();
        for x in -1..=1 {
            for y in -1..=1 {
                world.add_chunk_at(Point3::new(x, y, 0), &generator);
            }
        }
        world
    }

    #[test]
    fn zero_workers_is_rejected() {
        assert!(matches!(TaskManager::new(0), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn pooled_builds_match_synchronous_builds() {
        let world = random_world();
        let expected: Vec<(Point3<i32>, MeshData)> = world
            .chunk_positions()
            .into_iter()
            .filter_map(|p| world.get_chunk_at(p).map(|c| (p, ChunkMesher::build(c, &world))))
            .collect();

        let positions = world.chunk_positions();
        let world = MtResource::new(world);
        let mut mesh_manager = MeshManager::new(64).unwrap();
        let mut task_manager = TaskManager::new(3).unwrap();

        mesh_manager.mark_block_changed(&positions);
        assert_eq!(mesh_manager.schedule_dirty(&mut task_manager, &world), 9);
        assert_eq!(task_manager.wait_for_idle(&mut mesh_manager).unwrap(), 9);
        assert!(task_manager.is_idle());

        for (position, mesh) in expected {
            assert_eq!(mesh_manager.peek_mesh(position), Some(&mesh));
        }
    }

    struct CountingTask {
        remaining: usize,
        counter: Arc<AtomicUsize>,
    }

    struct CountingResult {
        remaining: usize,
        counter: Arc<AtomicUsize>,
    }

    impl Task for CountingTask {
        fn process(&self) -> Box<dyn TaskResult + Send> {
            self.counter.fetch_add(1, Ordering::SeqCst);
            Box::new(CountingResult {
                remaining: self.remaining,
                counter: self.counter.clone(),
            })
        }
    }

    impl TaskResult for CountingResult {
        fn handle_result(self: Box<Self>, _mesh_manager: &mut MeshManager) -> Vec<Box<dyn Task + Send>> {
            if self.remaining == 0 {
                return Vec::new();
            }
            vec![Box::new(CountingTask {
                remaining: self.remaining - 1,
                counter: self.counter,
            })]
        }
    }

    #[test]
    fn follow_up_tasks_run_before_idle() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut mesh_manager = MeshManager::new(1).unwrap();
        let mut task_manager = TaskManager::new(2).unwrap();

        for _ in 0..5 {
            task_manager.publish_task(Box::new(CountingTask {
                remaining: 3,
                counter: counter.clone(),
            }));
        }
        assert_eq!(task_manager.tasks_in_flight(), 2);
        assert_eq!(task_manager.queued_tasks(), 3);

        assert_eq!(task_manager.wait_for_idle(&mut mesh_manager).unwrap(), 20);
        assert_eq!(counter.load(Ordering::SeqCst), 20);
    }

    struct PanickingTask;

    impl Task for PanickingTask {
        fn process(&self) -> Box<dyn TaskResult + Send> {
            panic!("task failure");
        }
    }

    #[test]
    fn dead_worker_is_reported() {
        let mut mesh_manager = MeshManager::new(1).unwrap();
        let mut task_manager = TaskManager::new(1).unwrap();

        task_manager.publish_task(Box::new(PanickingTask));
        assert!(matches!(
            task_manager.wait_for_idle(&mut mesh_manager),
            Err(EngineError::WorkerDisconnected(0))
        ));
    }

    #[test]
    fn empty_chunk_world_finishes_immediately() {
        let mut mesh_manager = MeshManager::new(4).unwrap();
        let mut task_manager = TaskManager::new(1).unwrap();
        let mut world = World::new();
        world.insert_chunk(Chunk::new(Point3::new(0, 0, 0)));
        let world = MtResource::new(world);

        mesh_manager.mark_dirty(Point3::new(0, 0, 0));
        mesh_manager.schedule_dirty(&mut task_manager, &world);
        task_manager.wait_for_idle(&mut mesh_manager).unwrap();
        assert!(mesh_manager.peek_mesh(Point3::new(0, 0, 0)).is_some_and(MeshData::is_empty));
    }
}
