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

//! Per-thread command recording, flushed into the global queue as one batch.

use super::{CommandFn, CommandId};
use crate::renderer::error::RenderError;
use crate::renderer::system::RenderSystem;
use crate::renderer::traits::RenderBackend;
use std::marker::PhantomData;

/// Records commands locally on one thread, then submits them all at once.
///
/// Recording touches no shared state, so a thread preparing many commands
/// (an editor panel, a debug-draw pass) pays for the submission lock exactly
/// once, and the batch occupies contiguous sequence ids: no command from
/// another thread interleaves with it on the render thread.
///
/// The queue is bound to the thread that uses it (`!Send`/`!Sync`); create
/// one per thread that needs it.
#[derive(Default)]
pub struct DeferredRenderQueue {
    recorded: Vec<(CommandFn, bool)>,
    // Bind the recorder to a single thread.
    _not_thread_safe: PhantomData<*const ()>,
}

impl DeferredRenderQueue {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self {
            recorded: Vec::new(),
            _not_thread_safe: PhantomData,
        }
    }

    /// Records a unit of work without touching the shared queue.
    pub fn record<F>(&mut self, work: F)
    where
        F: FnOnce(&mut dyn RenderBackend) -> Result<(), RenderError> + Send + 'static,
    {
        self.recorded.push((Box::new(work), false));
    }

    /// Number of commands recorded and not yet flushed.
    pub fn len(&self) -> usize {
        self.recorded.len()
    }

    /// Returns `true` if nothing has been recorded since the last flush.
    pub fn is_empty(&self) -> bool {
        self.recorded.is_empty()
    }

    /// Submits every recorded command to `system` as one contiguous batch
    /// and returns their sequence ids, in recording order.
    pub fn flush(&mut self, system: &RenderSystem) -> Vec<CommandId> {
        if self.recorded.is_empty() {
            return Vec::new();
        }
        system.queue_batch(std::mem::take(&mut self.recorded))
    }
}

impl std::fmt::Debug for DeferredRenderQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredRenderQueue")
            .field("recorded", &self.recorded.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::api::RenderSettings;
    use crate::renderer::test_support::NullBackend;
    use std::sync::{Arc, Mutex};

    fn start_system() -> RenderSystem {
        RenderSystem::start(Box::new(NullBackend::new()), RenderSettings::default())
            .expect("render system should start")
    }

    #[test]
    fn flush_on_empty_recorder_submits_nothing() {
        let mut system = start_system();
        let mut deferred = DeferredRenderQueue::new();
        assert!(deferred.is_empty());
        assert!(deferred.flush(&system).is_empty());
        system.shutdown();
    }

    #[test]
    fn flushed_batch_gets_contiguous_ids_and_executes_in_recording_order() {
        let mut system = start_system();
        let executed = Arc::new(Mutex::new(Vec::new()));

        let mut deferred = DeferredRenderQueue::new();
        for n in 0..10u32 {
            let executed = Arc::clone(&executed);
            deferred.record(move |_| {
                executed.lock().unwrap().push(n);
                Ok(())
            });
        }
        assert_eq!(deferred.len(), 10);

        let ids = deferred.flush(&system);
        assert!(deferred.is_empty());
        assert_eq!(ids.len(), 10);
        for pair in ids.windows(2) {
            assert_eq!(pair[1].0, pair[0].0 + 1, "batch ids must be contiguous");
        }

        system.shutdown();
        assert_eq!(*executed.lock().unwrap(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn recorder_can_be_reused_after_flush() {
        let mut system = start_system();
        let mut deferred = DeferredRenderQueue::new();

        deferred.record(|_| Ok(()));
        let first = deferred.flush(&system);
        deferred.record(|_| Ok(()));
        deferred.record(|_| Ok(()));
        let second = deferred.flush(&system);

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
        assert!(first[0] < second[0]);
        system.shutdown();
    }
}
