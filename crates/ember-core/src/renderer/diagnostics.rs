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

//! The channel on which the render thread reports events nobody is blocked
//! waiting for.
//!
//! Errors from fire-and-forget commands have no `AsyncOp` to surface
//! through. They are logged, and additionally published here so that tools
//! (editor overlays, test harnesses) can observe them programmatically
//! instead of scraping logs.

use crate::renderer::command::CommandId;

/// An event published by the render thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderDiagnostic {
    /// The render thread entered its loop.
    ThreadStarted,
    /// The render thread drained its last batch and exited.
    ThreadStopped,
    /// A fire-and-forget command returned an error.
    CommandFailed {
        /// Sequence id of the failed command.
        id: CommandId,
        /// Rendered error message.
        message: String,
    },
}

/// An unbounded channel transporting [`RenderDiagnostic`] events out of the
/// render thread.
#[derive(Debug)]
pub struct DiagnosticsBus {
    sender: flume::Sender<RenderDiagnostic>,
    receiver: flume::Receiver<RenderDiagnostic>,
}

impl DiagnosticsBus {
    /// Creates a new bus with an unbounded channel.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self { sender, receiver }
    }

    /// Publishes an event, logging if the receiving side is gone.
    pub fn publish(&self, event: RenderDiagnostic) {
        log::trace!("Render diagnostic: {event:?}");
        if let Err(e) = self.sender.send(event) {
            log::error!("Failed to publish render diagnostic: {e}.");
        }
    }

    /// Returns a clone of the sender end, for the render thread to publish
    /// from.
    pub fn sender(&self) -> flume::Sender<RenderDiagnostic> {
        self.sender.clone()
    }

    /// Returns a reference to the receiver end, for the owner to observe
    /// events.
    pub fn receiver(&self) -> &flume::Receiver<RenderDiagnostic> {
        &self.receiver
    }

    /// Drains every event currently buffered, without blocking.
    pub fn try_collect(&self) -> Vec<RenderDiagnostic> {
        self.receiver.try_iter().collect()
    }
}

impl Default for DiagnosticsBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_then_collect() {
        let bus = DiagnosticsBus::new();
        bus.publish(RenderDiagnostic::ThreadStarted);
        bus.publish(RenderDiagnostic::CommandFailed {
            id: CommandId(3),
            message: "boom".to_string(),
        });
        let events = bus.try_collect();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], RenderDiagnostic::ThreadStarted);
        assert!(matches!(
            &events[1],
            RenderDiagnostic::CommandFailed { id: CommandId(3), message } if message == "boom"
        ));
        assert!(bus.try_collect().is_empty());
    }

    #[test]
    fn sender_clone_feeds_same_receiver() {
        let bus = DiagnosticsBus::new();
        let sender = bus.sender();
        sender
            .send(RenderDiagnostic::ThreadStopped)
            .expect("send should succeed");
        assert_eq!(bus.try_collect(), vec![RenderDiagnostic::ThreadStopped]);
    }
}
