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

//! Provides the render-thread command model and the backend-agnostic
//! rendering contracts for the Ember Engine.
//!
//! Rendering work is split across two roles: any number of caller threads
//! that *submit* work, and a single dedicated render thread that *executes*
//! it. The [`RenderSystem`] facade is the submission surface; every
//! graphics-API call it exposes is wrapped as a [`command`] and executed in
//! strict submission order on the render thread, which exclusively owns the
//! concrete [`RenderBackend`]. A backend implementation lives in the
//! `ember-infra` crate and never sees more than one thread.

pub mod api;
pub mod command;
pub mod diagnostics;
pub mod error;
pub mod system;
#[cfg(test)]
pub(crate) mod test_support;
pub mod thread;
pub mod traits;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::command::{AsyncOp, CommandId, DeferredRenderQueue};
pub use self::diagnostics::{DiagnosticsBus, RenderDiagnostic};
pub use self::error::{RenderError, ResourceError};
pub use self::system::RenderSystem;
pub use self::thread::RenderThreadState;
pub use self::traits::{BackendSelector, RenderBackend};
