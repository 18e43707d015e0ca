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

//! The thread-safe FIFO that carries commands to the render thread.

use super::{CommandFn, CommandId, QueuedCommand};
use std::sync::{Condvar, Mutex};

struct QueueInner {
    commands: Vec<QueuedCommand>,
    next_id: u64,
    open: bool,
}

/// A thread-safe FIFO of deferred rendering commands.
///
/// Any thread may push under the internal mutex; only the render thread
/// drains. Draining swaps the whole vector out instead of popping one
/// element at a time, so the lock is held for O(1) per batch. The queue
/// never reorders: the execution order observed by the render thread equals
/// the submission order established by lock acquisition.
pub struct CommandQueue {
    inner: Mutex<QueueInner>,
    ready: Condvar,
    capacity: usize,
}

impl CommandQueue {
    /// Creates an empty, open queue whose command vector reserves `capacity`
    /// slots up front.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(QueueInner {
                commands: Vec::with_capacity(capacity),
                next_id: 0,
                open: true,
            }),
            ready: Condvar::new(),
            capacity,
        }
    }

    /// Appends a unit of work and returns its assigned sequence id.
    ///
    /// ## Panics
    /// Panics if the queue has been closed: queuing after shutdown has begun
    /// is a contract violation, since the render thread is no longer
    /// consuming.
    pub fn queue(&self, work: CommandFn, notify: bool) -> CommandId {
        let mut inner = self.inner.lock().unwrap();
        assert!(
            inner.open,
            "render command queued after render thread shutdown"
        );
        let id = CommandId(inner.next_id);
        inner.next_id += 1;
        inner.commands.push(QueuedCommand { id, notify, work });
        self.ready.notify_one();
        id
    }

    /// Appends a batch of work under a single lock acquisition.
    ///
    /// The batch occupies contiguous sequence ids, so no command from
    /// another thread can interleave with it on the render thread.
    ///
    /// ## Panics
    /// Panics if the queue has been closed, like [`queue`](Self::queue).
    pub fn queue_batch(&self, batch: Vec<(CommandFn, bool)>) -> Vec<CommandId> {
        let mut inner = self.inner.lock().unwrap();
        assert!(
            inner.open,
            "render command batch queued after render thread shutdown"
        );
        let mut ids = Vec::with_capacity(batch.len());
        for (work, notify) in batch {
            let id = CommandId(inner.next_id);
            inner.next_id += 1;
            inner.commands.push(QueuedCommand { id, notify, work });
            ids.push(id);
        }
        if !ids.is_empty() {
            self.ready.notify_one();
        }
        ids
    }

    /// Atomically swaps out all currently queued commands, in submission
    /// order. Never blocks; returns an empty vector when nothing is queued.
    ///
    /// Called only by the render thread.
    pub fn drain(&self) -> Vec<QueuedCommand> {
        let mut inner = self.inner.lock().unwrap();
        if inner.commands.is_empty() {
            return Vec::new();
        }
        std::mem::replace(&mut inner.commands, Vec::with_capacity(self.capacity))
    }

    /// Blocks until at least one command is queued or the queue is closed,
    /// then drains.
    ///
    /// Returns an empty vector only when the queue is closed *and* empty.
    /// The render loop uses that as its exit signal, which guarantees every
    /// command queued before [`close`](Self::close) is still handed out.
    pub fn wait_for_commands(&self) -> Vec<QueuedCommand> {
        let mut inner = self.inner.lock().unwrap();
        while inner.commands.is_empty() && inner.open {
            inner = self.ready.wait(inner).unwrap();
        }
        if inner.commands.is_empty() {
            return Vec::new();
        }
        std::mem::replace(&mut inner.commands, Vec::with_capacity(self.capacity))
    }

    /// Marks the queue closed and wakes the render thread.
    ///
    /// Commands already queued remain drainable; new submissions panic.
    pub fn close(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.open = false;
        self.ready.notify_all();
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        !self.inner.lock().unwrap().open
    }

    /// Number of commands currently queued.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().commands.len()
    }

    /// Returns `true` if no commands are queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
