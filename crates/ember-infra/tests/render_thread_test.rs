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

//! End-to-end tests driving the full command path: facade -> queue ->
//! render thread -> headless backend.

use ember_core::renderer::api::*;
use ember_core::renderer::diagnostics::RenderDiagnostic;
use ember_core::renderer::error::{RenderError, ResourceError};
use ember_core::renderer::traits::BackendSelector;
use ember_core::renderer::{DeferredRenderQueue, RenderSystem, RenderThreadState};
use ember_infra::HeadlessBackendSelector;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

fn start_headless_system() -> RenderSystem {
    let backend = HeadlessBackendSelector::new()
        .create_backend(&BackendConfig::default())
        .expect("headless backend should always be creatable");
    RenderSystem::start(backend, RenderSettings::default()).expect("render system should start")
}

fn rgba_texture(width: u32, height: u32) -> TextureDescriptor {
    TextureDescriptor {
        label: Some("integration texture".to_string()),
        extent: Extent2D { width, height },
        format: TextureFormat::Rgba8Unorm,
    }
}

#[test]
fn system_starts_running_and_stops_on_shutdown() {
    let mut system = start_headless_system();
    assert_eq!(system.state(), RenderThreadState::Running);
    assert_ne!(system.render_thread_id(), thread::current().id());
    system.shutdown();
    assert_eq!(system.state(), RenderThreadState::Stopped);
}

#[test]
fn texture_upload_and_blocking_read_back_round_trip() {
    // --- ARRANGE ---
    let mut system = start_headless_system();
    let texture = system.create_texture(rgba_texture(2, 2));
    let pixels: Vec<u8> = (0..16).collect();

    // --- ACT ---
    system.write_texture(texture, pixels.clone(), false);
    let op = system.read_texture(texture, true);

    // --- ASSERT ---
    // A blocking read-back returns an already-resolved op, and the read ran
    // after the upload because commands execute in submission order.
    assert!(op.is_resolved());
    let read = op.take().expect("resolved").expect("read should succeed");
    assert_eq!(read, pixels);
    system.shutdown();
}

#[test]
fn nonblocking_read_back_resolves_via_block_until_complete() {
    let mut system = start_headless_system();
    let texture = system.create_texture(rgba_texture(1, 1));
    system.write_texture(texture, vec![9, 8, 7, 6], false);

    let op = system.read_texture(texture, false);
    op.block_until_complete();
    assert_eq!(
        op.take().expect("resolved").expect("read should succeed"),
        vec![9, 8, 7, 6]
    );
    system.shutdown();
}

#[test]
fn clear_is_observable_through_read_back() {
    let mut system = start_headless_system();
    let target = system.create_texture(rgba_texture(4, 4));
    system.set_render_target(Some(target));
    system.clear(ClearFlags::COLOR, Color::new(0.0, 1.0, 0.0, 1.0), 1.0, 0);

    let op = system.read_texture(target, true);
    let texels = op.take().expect("resolved").expect("read should succeed");
    assert_eq!(texels.len(), 64);
    for chunk in texels.chunks_exact(4) {
        assert_eq!(chunk, [0, 255, 0, 255]);
    }
    system.shutdown();
}

#[test]
fn a_full_frame_of_state_commands_executes() {
    let mut system = start_headless_system();

    let target = system.create_texture(rgba_texture(8, 8));
    let vertices = system.create_buffer(BufferDescriptor {
        label: Some("triangle".to_string()),
        size: 36,
        usage: BufferUsage::VERTEX | BufferUsage::COPY_DST,
    });
    system.write_buffer(vertices, 0, vec![0xAB; 36], false);

    system.set_render_target(Some(target));
    system.begin_frame();
    system.set_viewport(Viewport {
        x: 0,
        y: 0,
        width: 8,
        height: 8,
    });
    system.set_scissor_rect(ScissorRect {
        x: 0,
        y: 0,
        width: 8,
        height: 8,
    });
    system.clear(ClearFlags::COLOR, Color::BLACK, 1.0, 0);
    system.set_vertex_buffer(0, Some(vertices));
    system.draw(3);
    system.disable_texture_unit(0);
    system.end_frame();
    system.shutdown();

    let stats = system.stats();
    assert_eq!(stats.draws_submitted, 1);
    assert_eq!(stats.commands_failed, 0);
    // create x2, write, target, begin, viewport, scissor, clear, bind, draw,
    // unit off, end
    assert_eq!(stats.commands_executed, 12);
}

#[test]
fn errors_from_fire_and_forget_commands_reach_diagnostics() {
    let mut system = start_headless_system();

    // Writing to a texture that was never created fails on the render
    // thread; nobody waits on it, so the error goes to the bus.
    system.write_texture(TextureId(999), vec![0; 4], true);

    // The blocking submission above already returned, so the failure event
    // is buffered on the bus by now.
    let failure = system
        .diagnostics()
        .try_collect()
        .into_iter()
        .find(|event| matches!(event, RenderDiagnostic::CommandFailed { .. }));
    assert!(failure.is_some(), "expected a CommandFailed diagnostic");

    // The loop keeps processing after a failure.
    let op = system.queue_return_command(|_| Ok(1u32), true);
    assert_eq!(op.take().expect("resolved").expect("ok"), 1);
    system.shutdown();
}

#[test]
fn errors_from_return_commands_surface_through_the_op() {
    let mut system = start_headless_system();
    let op = system.read_texture(TextureId(424242), true);
    match op.take() {
        Some(Err(RenderError::ResourceError(ResourceError::TextureNotFound(id)))) => {
            assert_eq!(id, TextureId(424242));
        }
        other => panic!("expected TextureNotFound, got {other:?}"),
    }
    system.shutdown();
}

#[test]
fn concurrent_writers_all_land_before_shutdown() {
    let system = Arc::new(start_headless_system());
    let texture = system.create_texture(rgba_texture(16, 1));

    // 16 threads each write the full texture with their own byte; whichever
    // write lands last wins, but every queued write must execute before the
    // thread exits.
    let mut handles = Vec::new();
    for n in 0..16u8 {
        let system = Arc::clone(&system);
        handles.push(thread::spawn(move || {
            system.write_texture(texture, vec![n; 64], false);
        }));
    }
    for handle in handles {
        handle.join().expect("writer panicked");
    }

    let mut system = Arc::into_inner(system).expect("sole owner");
    system.shutdown();
    let stats = system.stats();
    // create + 16 writes.
    assert_eq!(stats.commands_executed, 17);
    assert_eq!(stats.commands_failed, 0);
}

#[test]
fn deferred_batches_from_two_threads_do_not_interleave() {
    let system = Arc::new(start_headless_system());
    let executed: Arc<Mutex<Vec<(usize, usize)>>> = Arc::new(Mutex::new(Vec::new()));

    let mut handles = Vec::new();
    for batch_idx in 0..2usize {
        let system = Arc::clone(&system);
        let executed = Arc::clone(&executed);
        handles.push(thread::spawn(move || {
            let mut deferred = DeferredRenderQueue::new();
            for k in 0..20usize {
                let executed = Arc::clone(&executed);
                deferred.record(move |_| {
                    executed.lock().unwrap().push((batch_idx, k));
                    Ok(())
                });
            }
            // Give both threads a chance to finish recording before either
            // flushes, maximizing the interleaving opportunity.
            thread::sleep(Duration::from_millis(10));
            deferred.flush(&system);
        }));
    }
    for handle in handles {
        handle.join().expect("recorder panicked");
    }

    Arc::into_inner(system).expect("sole owner").shutdown();

    let order = executed.lock().unwrap();
    assert_eq!(order.len(), 40);
    // Each batch must appear as one contiguous run in recording order.
    let mut runs: Vec<(usize, usize)> = Vec::new();
    for &(batch, k) in order.iter() {
        match runs.last_mut() {
            Some((last_batch, count)) if *last_batch == batch => {
                assert_eq!(k, *count, "batch executed out of recording order");
                *count += 1;
            }
            _ => {
                assert_eq!(k, 0, "batch must start at its first command");
                runs.push((batch, 1));
            }
        }
    }
    assert_eq!(runs.len(), 2, "batches interleaved on the render thread");
}
