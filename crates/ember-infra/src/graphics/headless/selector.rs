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

//! Startup factory for the headless backend.

use super::HeadlessBackend;
use ember_core::renderer::api::{BackendConfig, BackendKind};
use ember_core::renderer::error::RenderError;
use ember_core::renderer::traits::{BackendSelector, RenderBackend};

/// Selects and constructs the [`HeadlessBackend`].
///
/// The headless backend has no platform requirements, so selection cannot
/// fail; the selector exists so applications pick their backend through one
/// seam regardless of which backends are compiled in.
#[derive(Debug, Default)]
pub struct HeadlessBackendSelector;

impl HeadlessBackendSelector {
    /// Creates the selector.
    pub fn new() -> Self {
        Self
    }
}

impl BackendSelector for HeadlessBackendSelector {
    fn is_supported(&self, kind: BackendKind) -> bool {
        match kind {
            BackendKind::Headless => true,
        }
    }

    fn create_backend(&self, config: &BackendConfig) -> Result<Box<dyn RenderBackend>, RenderError> {
        match config.kind {
            BackendKind::Headless => {
                log::info!("Selected headless graphics backend.");
                Ok(Box::new(HeadlessBackend::new()))
            }
        }
    }
}
