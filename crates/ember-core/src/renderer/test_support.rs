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

//! Backend double shared by the unit tests of this crate.

use crate::renderer::api::*;
use crate::renderer::error::{RenderError, ResourceError};
use crate::renderer::traits::RenderBackend;

/// A backend that accepts everything and stores nothing. Unit tests of the
/// command machinery use it when the behavior under test lives entirely in
/// the queue, the runner, or the facade.
pub(crate) struct NullBackend;

impl NullBackend {
    pub(crate) fn new() -> Self {
        Self
    }
}

impl RenderBackend for NullBackend {
    fn name(&self) -> &str {
        "null"
    }

    fn adapter_info(&self) -> AdapterInfo {
        AdapterInfo {
            name: "null adapter".to_string(),
            kind: BackendKind::Headless,
        }
    }

    fn supports_feature(&self, _feature_name: &str) -> bool {
        false
    }

    fn begin_frame(&mut self) -> Result<(), RenderError> {
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        Ok(())
    }

    fn set_viewport(&mut self, _viewport: Viewport) {}

    fn set_scissor_rect(&mut self, _rect: ScissorRect) {}

    fn set_render_target(&mut self, _target: Option<TextureId>) -> Result<(), ResourceError> {
        Ok(())
    }

    fn set_vertex_buffer(
        &mut self,
        _slot: u32,
        _buffer: Option<BufferId>,
    ) -> Result<(), ResourceError> {
        Ok(())
    }

    fn set_index_buffer(
        &mut self,
        _buffer: Option<BufferId>,
        _format: IndexFormat,
    ) -> Result<(), ResourceError> {
        Ok(())
    }

    fn bind_texture(&mut self, _unit: u32, _texture: Option<TextureId>) -> Result<(), ResourceError> {
        Ok(())
    }

    fn clear(
        &mut self,
        _flags: ClearFlags,
        _color: Color,
        _depth: f32,
        _stencil: u32,
    ) -> Result<(), RenderError> {
        Ok(())
    }

    fn draw(&mut self, _vertex_count: u32) -> Result<(), RenderError> {
        Ok(())
    }

    fn draw_indexed(&mut self, _start_index: u32, _index_count: u32) -> Result<(), RenderError> {
        Ok(())
    }

    fn create_buffer(
        &mut self,
        _id: BufferId,
        _descriptor: &BufferDescriptor,
    ) -> Result<(), ResourceError> {
        Ok(())
    }

    fn destroy_buffer(&mut self, _id: BufferId) -> Result<(), ResourceError> {
        Ok(())
    }

    fn write_buffer(
        &mut self,
        _id: BufferId,
        _offset: u64,
        _data: &[u8],
    ) -> Result<(), ResourceError> {
        Ok(())
    }

    fn create_texture(
        &mut self,
        _id: TextureId,
        _descriptor: &TextureDescriptor,
    ) -> Result<(), ResourceError> {
        Ok(())
    }

    fn destroy_texture(&mut self, _id: TextureId) -> Result<(), ResourceError> {
        Ok(())
    }

    fn write_texture(&mut self, _id: TextureId, _data: &[u8]) -> Result<(), ResourceError> {
        Ok(())
    }

    fn read_texture(&self, _id: TextureId) -> Result<Vec<u8>, ResourceError> {
        Ok(Vec::new())
    }
}
