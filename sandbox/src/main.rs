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

// Ember Engine Sandbox
// Drives a headless render system through a few frames from multiple
// threads and prints what the render thread did.

use anyhow::{Context, Result};
use ember_core::renderer::api::*;
use ember_core::renderer::traits::BackendSelector;
use ember_core::{DeferredRenderQueue, RenderSystem};
use ember_infra::HeadlessBackendSelector;
use std::sync::Arc;
use std::thread;

fn main() -> Result<()> {
    env_logger::init();

    let selector = HeadlessBackendSelector::new();
    let backend = selector
        .create_backend(&BackendConfig::default())
        .context("backend selection failed")?;
    let system = Arc::new(
        RenderSystem::start(backend, RenderSettings::default())
            .context("render system failed to start")?,
    );
    log::info!("Render thread id: {:?}", system.render_thread_id());

    system.add_completion_listener(Box::new(|id| {
        log::debug!("notify command {id:?} completed");
    }));

    // --- Build a tiny scene: one render target, one vertex buffer ---
    let target = system.create_texture(TextureDescriptor {
        label: Some("sandbox target".to_string()),
        extent: Extent2D {
            width: 64,
            height: 64,
        },
        format: TextureFormat::Rgba8Unorm,
    });
    let vertices = system.create_buffer(BufferDescriptor {
        label: Some("sandbox triangle".to_string()),
        size: 36,
        usage: BufferUsage::VERTEX | BufferUsage::COPY_DST,
    });
    system.write_buffer(vertices, 0, vec![0u8; 36], false);

    // --- Render a few frames while a worker thread records a deferred batch ---
    let worker = {
        let system = Arc::clone(&system);
        thread::spawn(move || {
            let mut deferred = DeferredRenderQueue::new();
            for unit in 0..4 {
                deferred.record(move |backend| {
                    backend.bind_texture(unit, None)?;
                    Ok(())
                });
            }
            let ids = deferred.flush(&system);
            log::info!("worker flushed {} deferred commands", ids.len());
        })
    };

    system.set_render_target(Some(target));
    for frame in 0..3 {
        system.begin_frame();
        system.set_viewport(Viewport {
            x: 0,
            y: 0,
            width: 64,
            height: 64,
        });
        let shade = frame as f32 / 3.0;
        system.clear(ClearFlags::COLOR, Color::new(shade, 0.2, 0.7, 1.0), 1.0, 0);
        system.set_vertex_buffer(0, Some(vertices));
        system.draw(3);
        system.end_frame();
    }
    worker.join().expect("worker thread panicked");

    // --- Read the final frame back synchronously ---
    let op = system.read_texture(target, true);
    let texels = op
        .take()
        .expect("blocking read-back must be resolved")
        .context("texture read-back failed")?;
    let first: Vec<u8> = texels.iter().take(4).copied().collect();
    log::info!("top-left texel after 3 frames: {first:?}");

    let mut system = Arc::into_inner(system).expect("no other owners remain");
    system.shutdown();

    let stats = system.stats();
    println!(
        "executed {} commands in {} batches ({} failed), {} draws submitted",
        stats.commands_executed,
        stats.batches_drained,
        stats.commands_failed,
        stats.draws_submitted
    );
    Ok(())
}
