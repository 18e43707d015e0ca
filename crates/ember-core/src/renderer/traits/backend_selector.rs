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

use crate::renderer::api::{BackendConfig, BackendKind};
use crate::renderer::error::RenderError;
use crate::renderer::traits::RenderBackend;

/// A factory that constructs the concrete [`RenderBackend`] chosen at startup.
///
/// There is no global registry of backends: the application constructs the
/// selector it wants, asks it for a backend, and hands the result to
/// [`RenderSystem::start`](crate::renderer::system::RenderSystem::start).
/// Concrete selectors live in `ember-infra`.
pub trait BackendSelector {
    /// Checks whether the given backend can be created on this platform.
    fn is_supported(&self, kind: BackendKind) -> bool;

    /// Creates the backend described by `config`.
    ///
    /// ## Errors
    /// * `RenderError::InitializationFailed` - if the requested backend is
    ///   unavailable or its device cannot be brought up.
    fn create_backend(&self, config: &BackendConfig) -> Result<Box<dyn RenderBackend>, RenderError>;
}
