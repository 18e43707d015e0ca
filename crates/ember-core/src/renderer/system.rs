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

//! The submission facade every engine collaborator talks to.
//!
//! `RenderSystem` wraps each exposed graphics operation as a command and
//! queues it, so the concrete backend only ever runs on the render thread,
//! regardless of which thread asked. There is no global instance: the system
//! is constructed once at startup via [`RenderSystem::start`] and passed by
//! reference to the collaborators that need it.

use crate::renderer::api::*;
use crate::renderer::command::{AsyncOp, CommandFn, CommandId, CommandQueue};
use crate::renderer::diagnostics::DiagnosticsBus;
use crate::renderer::error::RenderError;
use crate::renderer::thread::{CompletionListener, RenderThread, RenderThreadState};
use crate::renderer::traits::RenderBackend;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::ThreadId;

/// The render-system facade: submission entry points plus device-state
/// mutators, all executed on the dedicated render thread.
pub struct RenderSystem {
    queue: Arc<CommandQueue>,
    thread: RenderThread,
    diagnostics: DiagnosticsBus,
    settings: RenderSettings,
    next_buffer_id: AtomicUsize,
    next_texture_id: AtomicUsize,
    draws_submitted: AtomicU64,
}

impl std::fmt::Debug for RenderSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSystem")
            .field("state", &self.state())
            .field("queued", &self.queue.len())
            .finish()
    }
}

impl RenderSystem {
    /// Takes ownership of the backend, spawns the render thread, and blocks
    /// until it is running.
    ///
    /// This is the single start point: the backend moves into the new thread
    /// and is unreachable from anywhere else afterwards.
    pub fn start(
        backend: Box<dyn RenderBackend>,
        settings: RenderSettings,
    ) -> Result<Self, RenderError> {
        log::info!(
            "Starting render system (backend: {}, thread name: {}).",
            backend.name(),
            settings.render_thread_name
        );
        let queue = Arc::new(CommandQueue::new(settings.command_buffer_capacity));
        let diagnostics = DiagnosticsBus::new();
        let thread =
            RenderThread::spawn(Arc::clone(&queue), backend, &settings, diagnostics.sender())?;
        Ok(Self {
            queue,
            thread,
            diagnostics,
            settings,
            next_buffer_id: AtomicUsize::new(0),
            next_texture_id: AtomicUsize::new(0),
            draws_submitted: AtomicU64::new(0),
        })
    }

    /// Queues a fire-and-forget command. Callable from any thread.
    ///
    /// With `block_until_complete` the calling thread is suspended until
    /// this specific command has executed; every command queued before it
    /// runs first, which can take a while on a busy queue.
    pub fn queue_command<F>(&self, work: F, block_until_complete: bool) -> CommandId
    where
        F: FnOnce(&mut dyn RenderBackend) -> Result<(), RenderError> + Send + 'static,
    {
        let id = self.queue.queue(Box::new(work), block_until_complete);
        if block_until_complete {
            self.thread.block_until_command_completed(id);
        }
        id
    }

    /// Queues a command that produces a result, returning the [`AsyncOp`]
    /// that will carry it. Callable from any thread.
    ///
    /// The op is completed exactly once, on the render thread, with whatever
    /// the closure returns, including its error, which therefore surfaces
    /// to the thread holding the op rather than the diagnostic channel. With
    /// `block_until_complete` the returned op is already resolved.
    pub fn queue_return_command<T, F>(&self, work: F, block_until_complete: bool) -> AsyncOp<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut dyn RenderBackend) -> Result<T, RenderError> + Send + 'static,
    {
        let op = AsyncOp::pending(self.thread.thread_id());
        let completer = op.clone();
        let id = self.queue.queue(
            Box::new(move |backend| {
                completer.complete(work(backend));
                Ok(())
            }),
            block_until_complete,
        );
        if block_until_complete {
            self.thread.block_until_command_completed(id);
        }
        op
    }

    /// Queues a pre-recorded batch under one lock acquisition; used by
    /// [`DeferredRenderQueue`](crate::renderer::command::DeferredRenderQueue).
    pub(crate) fn queue_batch(&self, batch: Vec<(CommandFn, bool)>) -> Vec<CommandId> {
        self.queue.queue_batch(batch)
    }

    /// Identity of the render thread, for code that needs to assert where it
    /// runs before touching backend objects directly.
    pub fn render_thread_id(&self) -> ThreadId {
        self.thread.thread_id()
    }

    /// Panics unless invoked on the render thread.
    pub fn ensure_render_thread(&self) {
        self.thread.ensure_render_thread();
    }

    /// Current lifecycle state of the render thread.
    pub fn state(&self) -> RenderThreadState {
        self.thread.state()
    }

    /// The settings this system was started with.
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// The channel on which the render thread reports failures of
    /// fire-and-forget commands and lifecycle events.
    pub fn diagnostics(&self) -> &DiagnosticsBus {
        &self.diagnostics
    }

    /// Registers a callback invoked on the render thread whenever a notify
    /// command completes.
    pub fn add_completion_listener(&self, listener: CompletionListener) {
        self.thread.add_completion_listener(listener);
    }

    /// Samples the work counters.
    pub fn stats(&self) -> RenderStats {
        let mut stats = RenderStats {
            draws_submitted: self.draws_submitted.load(Ordering::Relaxed),
            ..RenderStats::default()
        };
        self.thread.fill_stats(&mut stats);
        stats
    }

    /// Requests shutdown and joins the render thread.
    ///
    /// All commands queued before this call are executed first; nothing is
    /// cancelled. Idempotent.
    pub fn shutdown(&mut self) {
        self.thread.shutdown();
    }

    // ------------------------------------------------------------------
    // Device state mutators. Each is a queued command; none touches the
    // backend on the calling thread.
    // ------------------------------------------------------------------

    /// Signifies the beginning of a frame.
    pub fn begin_frame(&self) {
        self.queue_command(|backend| backend.begin_frame(), false);
    }

    /// Ends rendering of the current frame.
    pub fn end_frame(&self) {
        self.queue_command(|backend| backend.end_frame(), false);
    }

    /// Sets the active viewport.
    pub fn set_viewport(&self, viewport: Viewport) {
        self.queue_command(
            move |backend| {
                backend.set_viewport(viewport);
                Ok(())
            },
            false,
        );
    }

    /// Sets the scissor region.
    pub fn set_scissor_rect(&self, rect: ScissorRect) {
        self.queue_command(
            move |backend| {
                backend.set_scissor_rect(rect);
                Ok(())
            },
            false,
        );
    }

    /// Sets the render target for subsequent clears and draws.
    pub fn set_render_target(&self, target: Option<TextureId>) {
        self.queue_command(
            move |backend| backend.set_render_target(target).map_err(RenderError::from),
            false,
        );
    }

    /// Sets the vertex buffer for the given slot; `None` clears the slot.
    pub fn set_vertex_buffer(&self, slot: u32, buffer: Option<BufferId>) {
        self.queue_command(
            move |backend| {
                backend
                    .set_vertex_buffer(slot, buffer)
                    .map_err(RenderError::from)
            },
            false,
        );
    }

    /// Sets the index buffer used by indexed draws; `None` unbinds.
    pub fn set_index_buffer(&self, buffer: Option<BufferId>, format: IndexFormat) {
        self.queue_command(
            move |backend| {
                backend
                    .set_index_buffer(buffer, format)
                    .map_err(RenderError::from)
            },
            false,
        );
    }

    /// Binds a texture to a texture unit; `None` turns the unit off.
    pub fn bind_texture(&self, unit: u32, texture: Option<TextureId>) {
        self.queue_command(
            move |backend| backend.bind_texture(unit, texture).map_err(RenderError::from),
            false,
        );
    }

    /// Turns a texture unit off.
    pub fn disable_texture_unit(&self, unit: u32) {
        self.bind_texture(unit, None);
    }

    /// Clears the selected attachments of the current render target.
    pub fn clear(&self, flags: ClearFlags, color: Color, depth: f32, stencil: u32) {
        self.queue_command(
            move |backend| backend.clear(flags, color, depth, stencil),
            false,
        );
    }

    /// Draws `vertex_count` vertices from the bound vertex buffers.
    pub fn draw(&self, vertex_count: u32) {
        self.draws_submitted.fetch_add(1, Ordering::Relaxed);
        self.queue_command(move |backend| backend.draw(vertex_count), false);
    }

    /// Draws `index_count` indices starting at `start_index`.
    pub fn draw_indexed(&self, start_index: u32, index_count: u32) {
        self.draws_submitted.fetch_add(1, Ordering::Relaxed);
        self.queue_command(
            move |backend| backend.draw_indexed(start_index, index_count),
            false,
        );
    }

    // ------------------------------------------------------------------
    // Resource operations. Handles are allocated synchronously on the
    // calling thread; the backend-side work is queued like everything else.
    // ------------------------------------------------------------------

    /// Creates a buffer and returns its handle immediately; the backend-side
    /// allocation happens on the render thread.
    pub fn create_buffer(&self, descriptor: BufferDescriptor) -> BufferId {
        let id = BufferId(self.next_buffer_id.fetch_add(1, Ordering::Relaxed));
        self.queue_command(
            move |backend| {
                backend
                    .create_buffer(id, &descriptor)
                    .map_err(RenderError::from)
            },
            false,
        );
        id
    }

    /// Destroys a buffer.
    pub fn destroy_buffer(&self, id: BufferId) {
        self.queue_command(
            move |backend| backend.destroy_buffer(id).map_err(RenderError::from),
            false,
        );
    }

    /// Writes `data` into a buffer at `offset`, optionally blocking until
    /// the upload has happened on the render thread.
    pub fn write_buffer(&self, id: BufferId, offset: u64, data: Vec<u8>, block: bool) {
        self.queue_command(
            move |backend| {
                backend
                    .write_buffer(id, offset, &data)
                    .map_err(RenderError::from)
            },
            block,
        );
    }

    /// Creates a texture and returns its handle immediately.
    pub fn create_texture(&self, descriptor: TextureDescriptor) -> TextureId {
        let id = TextureId(self.next_texture_id.fetch_add(1, Ordering::Relaxed));
        self.queue_command(
            move |backend| {
                backend
                    .create_texture(id, &descriptor)
                    .map_err(RenderError::from)
            },
            false,
        );
        id
    }

    /// Destroys a texture.
    pub fn destroy_texture(&self, id: TextureId) {
        self.queue_command(
            move |backend| backend.destroy_texture(id).map_err(RenderError::from),
            false,
        );
    }

    /// Replaces the full contents of a texture, optionally blocking until
    /// the upload has happened on the render thread.
    pub fn write_texture(&self, id: TextureId, data: Vec<u8>, block: bool) {
        self.queue_command(
            move |backend| backend.write_texture(id, &data).map_err(RenderError::from),
            block,
        );
    }

    /// Reads a texture back into CPU memory.
    ///
    /// The read happens on the render thread after every previously queued
    /// command; with `block` the returned op is already resolved.
    pub fn read_texture(&self, id: TextureId, block: bool) -> AsyncOp<Vec<u8>> {
        self.queue_return_command(
            move |backend| backend.read_texture(id).map_err(RenderError::from),
            block,
        )
    }
}

impl Drop for RenderSystem {
    fn drop(&mut self) {
        // Graceful drain even when the owner forgot an explicit shutdown;
        // the runner ignores the call if already stopped.
        self.thread.shutdown();
    }
}
