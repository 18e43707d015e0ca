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

//! Counters describing the work performed by the render thread.

use serde::{Deserialize, Serialize};

/// A snapshot of the render-thread counters.
///
/// Counters are maintained by the render loop and can be sampled from any
/// thread via [`RenderSystem::stats`](crate::renderer::system::RenderSystem::stats).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Total commands executed since the thread started.
    pub commands_executed: u64,
    /// Commands whose closure returned an error.
    pub commands_failed: u64,
    /// Number of times the queue was drained into a batch.
    pub batches_drained: u64,
    /// Draw calls submitted through the facade.
    pub draws_submitted: u64,
}
