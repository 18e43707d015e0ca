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

//! Deferred units of rendering work and the queue that carries them.
//!
//! A command is a boxed closure over the backend plus a sequence id and a
//! notify flag. Ids are assigned under the queue lock, so the id order *is*
//! the submission order, and the render thread executes commands in exactly
//! that order.

pub mod async_op;
pub mod deferred;
pub mod queue;

pub use self::async_op::AsyncOp;
pub use self::deferred::DeferredRenderQueue;
pub use self::queue::CommandQueue;

use crate::renderer::error::RenderError;
use crate::renderer::traits::RenderBackend;

/// The sequence id assigned to a command at submission time.
///
/// Unique per [`RenderSystem`](crate::renderer::system::RenderSystem)
/// instance and strictly increasing in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(pub u64);

/// The boxed closure form in which all rendering work travels to the render
/// thread.
pub type CommandFn = Box<dyn FnOnce(&mut dyn RenderBackend) -> Result<(), RenderError> + Send>;

/// A unit of deferred rendering work as stored in the [`CommandQueue`].
pub struct QueuedCommand {
    /// Sequence id assigned at submission.
    pub id: CommandId,
    /// Whether completion of this command must be recorded for blocking
    /// waiters.
    pub notify: bool,
    /// The work itself.
    pub work: CommandFn,
}

impl std::fmt::Debug for QueuedCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuedCommand")
            .field("id", &self.id)
            .field("notify", &self.notify)
            .finish()
    }
}
