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

//! Single-assignment futures for results produced on the render thread.

use crate::renderer::error::RenderError;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::ThreadId;

struct OpState<T> {
    value: Option<Result<T, RenderError>>,
}

struct OpShared<T> {
    state: Mutex<OpState<T>>,
    completed: Condvar,
    // Identity of the thread that will fulfill this op; used to fail fast on
    // a render-thread self-wait instead of deadlocking.
    render_thread: ThreadId,
}

/// A single-assignment future representing the pending result of a queued
/// render command.
///
/// An `AsyncOp` is created by the facade at submission time and shared
/// between the calling thread and the closure that travels to the render
/// thread. It is completed at most once, only from the render thread,
/// exactly by the command that captured it; the wrapper built by
/// [`queue_return_command`](crate::renderer::system::RenderSystem::queue_return_command)
/// enforces this structurally. Once both sides drop their handle the slot is
/// freed.
pub struct AsyncOp<T> {
    shared: Arc<OpShared<T>>,
}

impl<T> Clone for AsyncOp<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> std::fmt::Debug for AsyncOp<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncOp")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

impl<T> AsyncOp<T> {
    /// Returns `true` once the result has been assigned.
    pub fn is_resolved(&self) -> bool {
        self.shared.state.lock().unwrap().value.is_some()
    }
}

impl<T: Send + 'static> AsyncOp<T> {
    /// Creates a pending op that `render_thread` will fulfill.
    pub(crate) fn pending(render_thread: ThreadId) -> Self {
        Self {
            shared: Arc::new(OpShared {
                state: Mutex::new(OpState { value: None }),
                completed: Condvar::new(),
                render_thread,
            }),
        }
    }

    /// Assigns the result and wakes every waiter.
    ///
    /// ## Panics
    /// Panics if the op has already been completed: completing twice is a
    /// contract violation inside the command machinery, never a runtime
    /// condition.
    pub(crate) fn complete(&self, result: Result<T, RenderError>) {
        let mut state = self.shared.state.lock().unwrap();
        assert!(
            state.value.is_none(),
            "AsyncOp completed twice; a command result can only be assigned once"
        );
        state.value = Some(result);
        self.shared.completed.notify_all();
    }

    /// Suspends the calling thread until the result has been assigned.
    /// Returns immediately if it already has been.
    ///
    /// ## Panics
    /// Panics when called from the render thread while unresolved: the
    /// render thread is the only thread that can resolve the op, so waiting
    /// there is a self-wait that would never return.
    pub fn block_until_complete(&self) {
        let mut state = self.shared.state.lock().unwrap();
        if state.value.is_some() {
            return;
        }
        assert!(
            std::thread::current().id() != self.shared.render_thread,
            "AsyncOp::block_until_complete called on the render thread for an \
             unresolved op; this self-wait can never complete"
        );
        while state.value.is_none() {
            state = self.shared.completed.wait(state).unwrap();
        }
    }

    /// Moves the settled result out, leaving the op resolved but empty.
    ///
    /// Returns `None` while pending or when the result was already taken.
    /// The result is single-consumer: exactly one caller observes the value.
    pub fn take(&self) -> Option<Result<T, RenderError>> {
        self.shared.state.lock().unwrap().value.take()
    }
}
