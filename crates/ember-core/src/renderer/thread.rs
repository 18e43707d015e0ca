// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The dedicated thread that executes all graphics-API work.
//!
//! The runner owns the spawned thread and the synchronization around it: a
//! start condition the spawning thread blocks on, the completed-command set
//! blocking waiters re-check, and the listener list invoked when notify
//! commands finish. The command vector and the completed set are guarded by
//! distinct mutexes so notify traffic never contends with submission.

use crate::renderer::api::{RenderSettings, RenderStats};
use crate::renderer::command::{CommandId, CommandQueue, QueuedCommand};
use crate::renderer::diagnostics::RenderDiagnostic;
use crate::renderer::error::RenderError;
use crate::renderer::traits::RenderBackend;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::{Duration, Instant};

/// Lifecycle of the dedicated render thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderThreadState {
    /// No thread has been spawned yet.
    NotStarted,
    /// The thread is spawned but has not entered its loop.
    Starting,
    /// The thread is processing commands.
    Running,
    /// Shutdown was requested; remaining commands are draining.
    ShuttingDown,
    /// The thread has exited.
    Stopped,
}

/// A callback invoked on the render thread when a notify command completes.
pub type CompletionListener = Box<dyn Fn(CommandId) + Send>;

#[derive(Default)]
struct Counters {
    executed: AtomicU64,
    failed: AtomicU64,
    batches: AtomicU64,
}

struct RenderThreadShared {
    queue: Arc<CommandQueue>,
    state: Mutex<RenderThreadState>,
    state_changed: Condvar,
    // Distinct from the queue mutex: the notify path must not contend with
    // the submission path.
    completed: Mutex<HashSet<CommandId>>,
    command_complete: Condvar,
    listeners: Mutex<Vec<CompletionListener>>,
    counters: Counters,
}

impl RenderThreadShared {
    /// Records completion of a notify command and releases its waiters.
    /// Listener callbacks run first, on the render thread, so that a blocked
    /// caller resumes only after every listener has observed the completion.
    fn signal_completed(&self, id: CommandId) {
        {
            let listeners = self.listeners.lock().unwrap();
            for listener in listeners.iter() {
                listener(id);
            }
        }
        let mut completed = self.completed.lock().unwrap();
        completed.insert(id);
        self.command_complete.notify_all();
    }
}

/// Owns the dedicated render thread and the synchronization around it.
///
/// Spawned once by [`RenderSystem::start`](crate::renderer::system::RenderSystem::start);
/// all operations reach it through the facade.
pub(crate) struct RenderThread {
    shared: Arc<RenderThreadShared>,
    handle: Option<JoinHandle<()>>,
    thread_id: ThreadId,
    slow_wait_warn: Option<Duration>,
}

impl RenderThread {
    /// Spawns the render thread and blocks until it has entered
    /// [`RenderThreadState::Running`].
    ///
    /// The backend is moved into the new thread here and never leaves it.
    pub(crate) fn spawn(
        queue: Arc<CommandQueue>,
        backend: Box<dyn RenderBackend>,
        settings: &RenderSettings,
        diagnostics: flume::Sender<RenderDiagnostic>,
    ) -> Result<Self, RenderError> {
        let shared = Arc::new(RenderThreadShared {
            queue,
            state: Mutex::new(RenderThreadState::NotStarted),
            state_changed: Condvar::new(),
            completed: Mutex::new(HashSet::new()),
            command_complete: Condvar::new(),
            listeners: Mutex::new(Vec::new()),
            counters: Counters::default(),
        });

        *shared.state.lock().unwrap() = RenderThreadState::Starting;

        let thread_shared = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name(settings.render_thread_name.clone())
            .spawn(move || run_render_loop(thread_shared, backend, diagnostics))
            .map_err(|e| {
                RenderError::InitializationFailed(format!("could not spawn render thread: {e}"))
            })?;

        // Block on the start condition until the new thread announces it is
        // processing commands.
        {
            let mut state = shared.state.lock().unwrap();
            while *state == RenderThreadState::Starting {
                state = shared.state_changed.wait(state).unwrap();
            }
        }

        let thread_id = handle.thread().id();
        let slow_wait_warn = match settings.slow_wait_warn_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };
        Ok(Self {
            shared,
            handle: Some(handle),
            thread_id,
            slow_wait_warn,
        })
    }

    /// Current lifecycle state.
    pub(crate) fn state(&self) -> RenderThreadState {
        *self.shared.state.lock().unwrap()
    }

    /// Identity of the dedicated thread.
    pub(crate) fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Panics unless invoked on the render thread. Guards code that touches
    /// backend state directly.
    pub(crate) fn ensure_render_thread(&self) {
        assert!(
            thread::current().id() == self.thread_id,
            "this operation may only run on the render thread ({:?}), was called from {:?}",
            self.thread_id,
            thread::current().id()
        );
    }

    /// Registers a callback invoked on the render thread each time a notify
    /// command finishes.
    pub(crate) fn add_completion_listener(&self, listener: CompletionListener) {
        self.shared.listeners.lock().unwrap().push(listener);
    }

    /// Blocks the calling thread until the command with the given id has
    /// completed, then clears its completion record.
    ///
    /// The id must have been queued with `notify = true`; waiting on any
    /// other id never returns. All callers live inside the facade, which
    /// pairs the flag and the wait.
    ///
    /// ## Panics
    /// Panics when called from the render thread itself: the wait could
    /// only be satisfied by the thread that is now suspended.
    pub(crate) fn block_until_command_completed(&self, id: CommandId) {
        assert!(
            thread::current().id() != self.thread_id,
            "block_until_command_completed called on the render thread; \
             this self-wait can never complete"
        );
        let started = Instant::now();
        let mut warned = false;
        let mut completed = self.shared.completed.lock().unwrap();
        loop {
            if completed.remove(&id) {
                return;
            }
            match self.slow_wait_warn {
                Some(limit) => {
                    let (guard, _) = self
                        .shared
                        .command_complete
                        .wait_timeout(completed, limit)
                        .unwrap();
                    completed = guard;
                    if !warned && started.elapsed() >= limit {
                        warned = true;
                        log::warn!(
                            "Still waiting on render command {:?} after {:?}.",
                            id,
                            started.elapsed()
                        );
                    }
                }
                None => {
                    completed = self.shared.command_complete.wait(completed).unwrap();
                }
            }
        }
    }

    /// Requests shutdown, closes the queue, and joins the thread.
    ///
    /// Every command queued before this call executes before the thread
    /// exits; nothing is cancelled. Calling again after the thread has
    /// stopped is a no-op.
    pub(crate) fn shutdown(&mut self) {
        {
            let mut state = self.shared.state.lock().unwrap();
            match *state {
                RenderThreadState::Running => *state = RenderThreadState::ShuttingDown,
                other => {
                    log::debug!("Render thread shutdown requested in state {other:?}; ignoring.");
                    return;
                }
            }
        }
        log::info!("Render thread shutting down; draining queued commands.");
        self.shared.queue.close();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Render thread panicked before it could stop cleanly.");
            }
        }
        // Normal exit already set Stopped; force it if the thread panicked.
        *self.shared.state.lock().unwrap() = RenderThreadState::Stopped;
    }

    /// Copies the runner counters into a stats snapshot.
    pub(crate) fn fill_stats(&self, stats: &mut RenderStats) {
        stats.commands_executed = self.shared.counters.executed.load(Ordering::Relaxed);
        stats.commands_failed = self.shared.counters.failed.load(Ordering::Relaxed);
        stats.batches_drained = self.shared.counters.batches.load(Ordering::Relaxed);
    }
}

/// Body of the dedicated thread: wait, drain, execute, notify, until the
/// queue is closed and empty.
fn run_render_loop(
    shared: Arc<RenderThreadShared>,
    mut backend: Box<dyn RenderBackend>,
    diagnostics: flume::Sender<RenderDiagnostic>,
) {
    {
        let mut state = shared.state.lock().unwrap();
        *state = RenderThreadState::Running;
        shared.state_changed.notify_all();
    }
    log::info!(
        "Render thread running on {:?} (backend: {}).",
        thread::current().id(),
        backend.name()
    );
    let _ = diagnostics.send(RenderDiagnostic::ThreadStarted);

    loop {
        let batch = shared.queue.wait_for_commands();
        if batch.is_empty() {
            // Closed and fully drained.
            break;
        }
        shared.counters.batches.fetch_add(1, Ordering::Relaxed);
        for command in batch {
            let QueuedCommand { id, notify, work } = command;
            if let Err(err) = work(backend.as_mut()) {
                // A failing command must not halt the loop; subsequent
                // commands still execute.
                log::error!("Render command {id:?} failed: {err}");
                shared.counters.failed.fetch_add(1, Ordering::Relaxed);
                let _ = diagnostics.send(RenderDiagnostic::CommandFailed {
                    id,
                    message: err.to_string(),
                });
            }
            shared.counters.executed.fetch_add(1, Ordering::Relaxed);
            if notify {
                shared.signal_completed(id);
            }
        }
    }

    {
        let mut state = shared.state.lock().unwrap();
        *state = RenderThreadState::Stopped;
        shared.state_changed.notify_all();
    }
    let _ = diagnostics.send(RenderDiagnostic::ThreadStopped);
    log::info!("Render thread stopped.");
}
