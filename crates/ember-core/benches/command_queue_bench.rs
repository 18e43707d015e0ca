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

use criterion::{criterion_group, criterion_main, Criterion};
use ember_core::renderer::command::CommandQueue;

fn bench_submission_and_drain(c: &mut Criterion) {
    c.bench_function("queue_1024_then_drain", |b| {
        let queue = CommandQueue::new(1024);
        b.iter(|| {
            for _ in 0..1024 {
                queue.queue(Box::new(|_| Ok(())), false);
            }
            let batch = queue.drain();
            assert_eq!(batch.len(), 1024);
        });
    });

    c.bench_function("queue_single_command", |b| {
        let queue = CommandQueue::new(1024);
        b.iter(|| {
            queue.queue(Box::new(|_| Ok(())), false);
            queue.drain()
        });
    });
}

criterion_group!(benches, bench_submission_and_drain);
criterion_main!(benches);
