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

use crate::renderer::api::*;
use crate::renderer::error::{RenderError, ResourceError};

/// The abstract graphics-API surface executed by the render thread.
///
/// A `RenderBackend` is moved into the render thread when the
/// [`RenderSystem`](crate::renderer::system::RenderSystem) starts and is
/// never shared after that: every method takes `&mut self` and is invoked
/// exclusively from the render loop. Thread confinement is therefore a
/// property of ownership, not of runtime assertions; no facade method hands
/// out a reference to the backend.
///
/// `Send` is required for the initial move; `Sync` deliberately is not.
pub trait RenderBackend: Send {
    /// Returns the name of the backend implementation.
    fn name(&self) -> &str;

    /// Describes the adapter this backend runs on.
    fn adapter_info(&self) -> AdapterInfo;

    /// Indicates if a specific named feature is supported.
    fn supports_feature(&self, feature_name: &str) -> bool;

    /// Signifies the beginning of a frame.
    fn begin_frame(&mut self) -> Result<(), RenderError>;

    /// Ends rendering of the current frame.
    fn end_frame(&mut self) -> Result<(), RenderError>;

    /// Sets the active viewport for future draws.
    fn set_viewport(&mut self, viewport: Viewport);

    /// Sets the scissor region; rendering outside of it is masked off.
    fn set_scissor_rect(&mut self, rect: ScissorRect);

    /// Sets the render target for subsequent clear and draw operations.
    /// Pass `None` to unbind.
    fn set_render_target(&mut self, target: Option<TextureId>) -> Result<(), ResourceError>;

    /// Sets the vertex buffer for the given source slot. Pass `None` to
    /// clear the slot.
    fn set_vertex_buffer(&mut self, slot: u32, buffer: Option<BufferId>)
        -> Result<(), ResourceError>;

    /// Sets the index buffer used by indexed draws. Pass `None` to unbind.
    fn set_index_buffer(
        &mut self,
        buffer: Option<BufferId>,
        format: IndexFormat,
    ) -> Result<(), ResourceError>;

    /// Binds a texture to the given texture unit. Pass `None` to turn the
    /// unit off.
    fn bind_texture(&mut self, unit: u32, texture: Option<TextureId>) -> Result<(), ResourceError>;

    /// Clears the selected attachments of the current render target.
    fn clear(
        &mut self,
        flags: ClearFlags,
        color: Color,
        depth: f32,
        stencil: u32,
    ) -> Result<(), RenderError>;

    /// Draws `vertex_count` vertices from the bound vertex buffers.
    fn draw(&mut self, vertex_count: u32) -> Result<(), RenderError>;

    /// Draws `index_count` indices starting at `start_index` from the bound
    /// index buffer.
    fn draw_indexed(&mut self, start_index: u32, index_count: u32) -> Result<(), RenderError>;

    /// Creates a buffer under the caller-allocated id.
    fn create_buffer(
        &mut self,
        id: BufferId,
        descriptor: &BufferDescriptor,
    ) -> Result<(), ResourceError>;

    /// Destroys a buffer and releases its storage.
    fn destroy_buffer(&mut self, id: BufferId) -> Result<(), ResourceError>;

    /// Writes `data` into a buffer at `offset`.
    fn write_buffer(&mut self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), ResourceError>;

    /// Creates a texture under the caller-allocated id.
    fn create_texture(
        &mut self,
        id: TextureId,
        descriptor: &TextureDescriptor,
    ) -> Result<(), ResourceError>;

    /// Destroys a texture and releases its storage.
    fn destroy_texture(&mut self, id: TextureId) -> Result<(), ResourceError>;

    /// Replaces the full contents of a texture with `data`.
    fn write_texture(&mut self, id: TextureId, data: &[u8]) -> Result<(), ResourceError>;

    /// Reads the full contents of a texture back into CPU memory.
    fn read_texture(&self, id: TextureId) -> Result<Vec<u8>, ResourceError>;
}
