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

//! The concrete, in-memory implementation of the [`RenderBackend`] trait.

use ember_core::renderer::api::*;
use ember_core::renderer::error::{RenderError, ResourceError};
use ember_core::renderer::traits::RenderBackend;
use std::collections::HashMap;

struct BufferStorage {
    descriptor: BufferDescriptor,
    data: Vec<u8>,
}

struct TextureStorage {
    descriptor: TextureDescriptor,
    texels: Vec<u8>,
}

/// A backend that keeps every resource in host memory.
///
/// Binds and draws are validated like a driver would validate them; clears
/// actually write texel data into the bound render target, so a full
/// upload → clear → read-back cycle is observable without any GPU.
///
/// All mutation happens through `&mut self` from the render thread that owns
/// the backend; there is no interior synchronization and none is needed.
pub struct HeadlessBackend {
    buffers: HashMap<BufferId, BufferStorage>,
    textures: HashMap<TextureId, TextureStorage>,
    vertex_bindings: HashMap<u32, BufferId>,
    index_binding: Option<(BufferId, IndexFormat)>,
    texture_bindings: HashMap<u32, TextureId>,
    render_target: Option<TextureId>,
    viewport: Option<Viewport>,
    scissor: Option<ScissorRect>,
    in_frame: bool,
    frames_completed: u64,
    draws_executed: u64,
}

impl HeadlessBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        log::debug!("HeadlessBackend created.");
        Self {
            buffers: HashMap::new(),
            textures: HashMap::new(),
            vertex_bindings: HashMap::new(),
            index_binding: None,
            texture_bindings: HashMap::new(),
            render_target: None,
            viewport: None,
            scissor: None,
            in_frame: false,
            frames_completed: 0,
            draws_executed: 0,
        }
    }

    /// Number of completed frames (`end_frame` calls).
    pub fn frames_completed(&self) -> u64 {
        self.frames_completed
    }

    /// Number of draw calls executed.
    pub fn draws_executed(&self) -> u64 {
        self.draws_executed
    }

    /// The currently configured viewport, if any.
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// The currently configured scissor rectangle, if any.
    pub fn scissor_rect(&self) -> Option<ScissorRect> {
        self.scissor
    }

    fn buffer(&self, id: BufferId) -> Result<&BufferStorage, ResourceError> {
        self.buffers
            .get(&id)
            .ok_or(ResourceError::BufferNotFound(id))
    }

    fn texture_mut(&mut self, id: TextureId) -> Result<&mut TextureStorage, ResourceError> {
        self.textures
            .get_mut(&id)
            .ok_or(ResourceError::TextureNotFound(id))
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for HeadlessBackend {
    fn name(&self) -> &str {
        "headless"
    }

    fn adapter_info(&self) -> AdapterInfo {
        AdapterInfo {
            name: "Ember Headless Reference Device".to_string(),
            kind: BackendKind::Headless,
        }
    }

    fn supports_feature(&self, feature_name: &str) -> bool {
        matches!(feature_name, "texture-readback" | "headless")
    }

    fn begin_frame(&mut self) -> Result<(), RenderError> {
        if self.in_frame {
            return Err(RenderError::RenderingFailed(
                "begin_frame called while a frame is already open".to_string(),
            ));
        }
        self.in_frame = true;
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        if !self.in_frame {
            return Err(RenderError::RenderingFailed(
                "end_frame called without an open frame".to_string(),
            ));
        }
        self.in_frame = false;
        self.frames_completed += 1;
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    fn set_scissor_rect(&mut self, rect: ScissorRect) {
        self.scissor = Some(rect);
    }

    fn set_render_target(&mut self, target: Option<TextureId>) -> Result<(), ResourceError> {
        if let Some(id) = target {
            if !self.textures.contains_key(&id) {
                return Err(ResourceError::TextureNotFound(id));
            }
        }
        self.render_target = target;
        Ok(())
    }

    fn set_vertex_buffer(
        &mut self,
        slot: u32,
        buffer: Option<BufferId>,
    ) -> Result<(), ResourceError> {
        match buffer {
            Some(id) => {
                let storage = self.buffer(id)?;
                if !storage.descriptor.usage.contains(BufferUsage::VERTEX) {
                    return Err(ResourceError::BackendError(format!(
                        "{id:?} was not created with VERTEX usage"
                    )));
                }
                self.vertex_bindings.insert(slot, id);
            }
            None => {
                self.vertex_bindings.remove(&slot);
            }
        }
        Ok(())
    }

    fn set_index_buffer(
        &mut self,
        buffer: Option<BufferId>,
        format: IndexFormat,
    ) -> Result<(), ResourceError> {
        match buffer {
            Some(id) => {
                let storage = self.buffer(id)?;
                if !storage.descriptor.usage.contains(BufferUsage::INDEX) {
                    return Err(ResourceError::BackendError(format!(
                        "{id:?} was not created with INDEX usage"
                    )));
                }
                self.index_binding = Some((id, format));
            }
            None => self.index_binding = None,
        }
        Ok(())
    }

    fn bind_texture(&mut self, unit: u32, texture: Option<TextureId>) -> Result<(), ResourceError> {
        match texture {
            Some(id) => {
                if !self.textures.contains_key(&id) {
                    return Err(ResourceError::TextureNotFound(id));
                }
                self.texture_bindings.insert(unit, id);
            }
            None => {
                self.texture_bindings.remove(&unit);
            }
        }
        Ok(())
    }

    fn clear(
        &mut self,
        flags: ClearFlags,
        color: Color,
        depth: f32,
        _stencil: u32,
    ) -> Result<(), RenderError> {
        if flags.is_empty() {
            return Ok(());
        }
        let target_id = self.render_target.ok_or_else(|| {
            RenderError::RenderingFailed("clear issued with no render target bound".to_string())
        })?;
        let target = self.texture_mut(target_id).map_err(RenderError::from)?;
        match target.descriptor.format {
            TextureFormat::Rgba8Unorm | TextureFormat::Bgra8Unorm => {
                if flags.contains(ClearFlags::COLOR) {
                    let [r, g, b, a] = color.to_rgba8();
                    let texel = match target.descriptor.format {
                        TextureFormat::Bgra8Unorm => [b, g, r, a],
                        _ => [r, g, b, a],
                    };
                    for chunk in target.texels.chunks_exact_mut(4) {
                        chunk.copy_from_slice(&texel);
                    }
                }
            }
            TextureFormat::Depth32Float => {
                if flags.contains(ClearFlags::COLOR) {
                    return Err(RenderError::RenderingFailed(format!(
                        "color clear issued against depth target {target_id:?}"
                    )));
                }
                if flags.contains(ClearFlags::DEPTH) {
                    let texel = depth.to_le_bytes();
                    for chunk in target.texels.chunks_exact_mut(4) {
                        chunk.copy_from_slice(&texel);
                    }
                }
            }
        }
        Ok(())
    }

    fn draw(&mut self, vertex_count: u32) -> Result<(), RenderError> {
        if !self.in_frame {
            return Err(RenderError::RenderingFailed(
                "draw issued outside of a frame".to_string(),
            ));
        }
        if self.render_target.is_none() {
            return Err(RenderError::RenderingFailed(
                "draw issued with no render target bound".to_string(),
            ));
        }
        if vertex_count > 0 && !self.vertex_bindings.contains_key(&0) {
            return Err(RenderError::RenderingFailed(
                "draw issued with no vertex buffer in slot 0".to_string(),
            ));
        }
        self.draws_executed += 1;
        Ok(())
    }

    fn draw_indexed(&mut self, _start_index: u32, index_count: u32) -> Result<(), RenderError> {
        if index_count > 0 && self.index_binding.is_none() {
            return Err(RenderError::RenderingFailed(
                "indexed draw issued with no index buffer bound".to_string(),
            ));
        }
        self.draw(index_count)
    }

    fn create_buffer(
        &mut self,
        id: BufferId,
        descriptor: &BufferDescriptor,
    ) -> Result<(), ResourceError> {
        if self.buffers.contains_key(&id) {
            return Err(ResourceError::AlreadyExists(format!("{id:?}")));
        }
        log::trace!(
            "HeadlessBackend: creating buffer {id:?} ({} bytes, label {:?}).",
            descriptor.size,
            descriptor.label
        );
        self.buffers.insert(
            id,
            BufferStorage {
                descriptor: descriptor.clone(),
                data: vec![0; descriptor.size as usize],
            },
        );
        Ok(())
    }

    fn destroy_buffer(&mut self, id: BufferId) -> Result<(), ResourceError> {
        if self.buffers.remove(&id).is_none() {
            return Err(ResourceError::BufferNotFound(id));
        }
        self.vertex_bindings.retain(|_, bound| *bound != id);
        if matches!(self.index_binding, Some((bound, _)) if bound == id) {
            self.index_binding = None;
        }
        Ok(())
    }

    fn write_buffer(&mut self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), ResourceError> {
        let storage = self
            .buffers
            .get_mut(&id)
            .ok_or(ResourceError::BufferNotFound(id))?;
        if !storage.descriptor.usage.contains(BufferUsage::COPY_DST) {
            return Err(ResourceError::BackendError(format!(
                "{id:?} was not created with COPY_DST usage"
            )));
        }
        let size = storage.descriptor.size;
        let end = offset + data.len() as u64;
        if end > size {
            return Err(ResourceError::OutOfBounds {
                offset,
                len: data.len() as u64,
                size,
            });
        }
        storage.data[offset as usize..end as usize].copy_from_slice(data);
        Ok(())
    }

    fn create_texture(
        &mut self,
        id: TextureId,
        descriptor: &TextureDescriptor,
    ) -> Result<(), ResourceError> {
        if self.textures.contains_key(&id) {
            return Err(ResourceError::AlreadyExists(format!("{id:?}")));
        }
        log::trace!(
            "HeadlessBackend: creating texture {id:?} ({}x{}, {:?}).",
            descriptor.extent.width,
            descriptor.extent.height,
            descriptor.format
        );
        self.textures.insert(
            id,
            TextureStorage {
                descriptor: descriptor.clone(),
                texels: vec![0; descriptor.byte_size() as usize],
            },
        );
        Ok(())
    }

    fn destroy_texture(&mut self, id: TextureId) -> Result<(), ResourceError> {
        if self.textures.remove(&id).is_none() {
            return Err(ResourceError::TextureNotFound(id));
        }
        self.texture_bindings.retain(|_, bound| *bound != id);
        if self.render_target == Some(id) {
            self.render_target = None;
        }
        Ok(())
    }

    fn write_texture(&mut self, id: TextureId, data: &[u8]) -> Result<(), ResourceError> {
        let storage = self.texture_mut(id)?;
        let size = storage.texels.len() as u64;
        if data.len() as u64 != size {
            return Err(ResourceError::OutOfBounds {
                offset: 0,
                len: data.len() as u64,
                size,
            });
        }
        storage.texels.copy_from_slice(data);
        Ok(())
    }

    fn read_texture(&self, id: TextureId) -> Result<Vec<u8>, ResourceError> {
        self.textures
            .get(&id)
            .map(|storage| storage.texels.clone())
            .ok_or(ResourceError::TextureNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba_texture(width: u32, height: u32) -> TextureDescriptor {
        TextureDescriptor {
            label: Some("test texture".to_string()),
            extent: Extent2D { width, height },
            format: TextureFormat::Rgba8Unorm,
        }
    }

    fn vertex_buffer(size: u64) -> BufferDescriptor {
        BufferDescriptor {
            label: Some("test vertices".to_string()),
            size,
            usage: BufferUsage::VERTEX | BufferUsage::COPY_DST,
        }
    }

    #[test]
    fn buffer_lifecycle_and_bounds() {
        let mut backend = HeadlessBackend::new();
        let id = BufferId(0);
        backend.create_buffer(id, &vertex_buffer(16)).unwrap();

        backend.write_buffer(id, 4, &[1, 2, 3, 4]).unwrap();
        assert!(matches!(
            backend.write_buffer(id, 12, &[0; 8]),
            Err(ResourceError::OutOfBounds { .. })
        ));

        backend.destroy_buffer(id).unwrap();
        assert!(matches!(
            backend.write_buffer(id, 0, &[0]),
            Err(ResourceError::BufferNotFound(_))
        ));
    }

    #[test]
    fn write_requires_copy_dst_usage() {
        let mut backend = HeadlessBackend::new();
        let id = BufferId(1);
        let descriptor = BufferDescriptor {
            label: None,
            size: 8,
            usage: BufferUsage::VERTEX,
        };
        backend.create_buffer(id, &descriptor).unwrap();
        assert!(matches!(
            backend.write_buffer(id, 0, &[0; 4]),
            Err(ResourceError::BackendError(_))
        ));
    }

    #[test]
    fn duplicate_creation_is_rejected() {
        let mut backend = HeadlessBackend::new();
        let id = TextureId(0);
        backend.create_texture(id, &rgba_texture(2, 2)).unwrap();
        assert!(matches!(
            backend.create_texture(id, &rgba_texture(2, 2)),
            Err(ResourceError::AlreadyExists(_))
        ));
    }

    #[test]
    fn texture_write_read_round_trip() {
        let mut backend = HeadlessBackend::new();
        let id = TextureId(0);
        backend.create_texture(id, &rgba_texture(2, 1)).unwrap();

        let data = vec![10, 20, 30, 40, 50, 60, 70, 80];
        backend.write_texture(id, &data).unwrap();
        assert_eq!(backend.read_texture(id).unwrap(), data);

        // A short upload is rejected, not zero-padded.
        assert!(matches!(
            backend.write_texture(id, &[0; 4]),
            Err(ResourceError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn clear_fills_the_bound_render_target() {
        let mut backend = HeadlessBackend::new();
        let id = TextureId(0);
        backend.create_texture(id, &rgba_texture(2, 2)).unwrap();
        backend.set_render_target(Some(id)).unwrap();

        backend
            .clear(ClearFlags::COLOR, Color::new(1.0, 0.0, 0.0, 1.0), 1.0, 0)
            .unwrap();
        let texels = backend.read_texture(id).unwrap();
        for chunk in texels.chunks_exact(4) {
            assert_eq!(chunk, [255, 0, 0, 255]);
        }
    }

    #[test]
    fn clear_without_target_fails() {
        let mut backend = HeadlessBackend::new();
        assert!(matches!(
            backend.clear(ClearFlags::COLOR, Color::BLACK, 1.0, 0),
            Err(RenderError::RenderingFailed(_))
        ));
        // Clearing nothing is a no-op even without a target.
        backend
            .clear(ClearFlags::NONE, Color::BLACK, 1.0, 0)
            .unwrap();
    }

    #[test]
    fn draw_validates_frame_target_and_bindings() {
        let mut backend = HeadlessBackend::new();
        let texture = TextureId(0);
        backend
            .create_texture(texture, &rgba_texture(4, 4))
            .unwrap();
        backend.set_render_target(Some(texture)).unwrap();

        assert!(matches!(
            backend.draw(3),
            Err(RenderError::RenderingFailed(_))
        ));

        backend.begin_frame().unwrap();
        assert!(matches!(
            backend.draw(3),
            Err(RenderError::RenderingFailed(_))
        ));

        let vertices = BufferId(0);
        backend.create_buffer(vertices, &vertex_buffer(64)).unwrap();
        backend.set_vertex_buffer(0, Some(vertices)).unwrap();
        backend.draw(3).unwrap();
        backend.end_frame().unwrap();

        assert_eq!(backend.draws_executed(), 1);
        assert_eq!(backend.frames_completed(), 1);
    }

    #[test]
    fn frame_markers_must_pair() {
        let mut backend = HeadlessBackend::new();
        assert!(backend.end_frame().is_err());
        backend.begin_frame().unwrap();
        assert!(backend.begin_frame().is_err());
        backend.end_frame().unwrap();
    }

    #[test]
    fn destroying_a_bound_resource_clears_its_bindings() {
        let mut backend = HeadlessBackend::new();
        let texture = TextureId(0);
        backend
            .create_texture(texture, &rgba_texture(1, 1))
            .unwrap();
        backend.set_render_target(Some(texture)).unwrap();
        backend.bind_texture(2, Some(texture)).unwrap();

        backend.destroy_texture(texture).unwrap();
        assert!(matches!(
            backend.clear(ClearFlags::COLOR, Color::BLACK, 1.0, 0),
            Err(RenderError::RenderingFailed(_))
        ));
        assert!(matches!(
            backend.bind_texture(2, Some(texture)),
            Err(ResourceError::TextureNotFound(_))
        ));
    }
}
