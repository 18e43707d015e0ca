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

//! Global settings for the render-thread machinery.

use serde::{Deserialize, Serialize};

/// A collection of settings that tune the command-queue machinery.
///
/// Serializable so it can live inside the engine's configuration files next
/// to the other subsystem settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSettings {
    /// OS-level name assigned to the spawned render thread.
    pub render_thread_name: String,
    /// Initial capacity of the command vector; a new vector with this
    /// capacity is swapped in on every drain.
    pub command_buffer_capacity: usize,
    /// If a blocking wait for a command exceeds this many milliseconds, a
    /// warning is logged once. `0` disables the check.
    pub slow_wait_warn_ms: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            render_thread_name: "ember-render".to_string(),
            command_buffer_capacity: 256,
            slow_wait_warn_ms: 1000,
        }
    }
}
