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

/// A generic, thread-safe notification channel.
///
/// The bus is generic over the event type `T` so this crate stays decoupled
/// from any particular producer. An engine-side component owns the bus and
/// publishes into it; consumers hold a receiver obtained from
/// [`subscribe`](EventBus::subscribe) and drain it at their own pace.
/// Events are delivered in publication order.
#[derive(Debug)]
pub struct EventBus<T: Clone + Send + Sync + 'static> {
    sender: flume::Sender<T>,
    receiver: flume::Receiver<T>,
}

impl<T: Clone + Send + Sync + 'static> EventBus<T> {
    /// Creates a new bus backed by an unbounded channel.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self { sender, receiver }
    }

    /// Publishes an event.
    ///
    /// A disconnected receiver is logged and otherwise ignored: a producer
    /// must never fault because its last subscriber went away.
    pub fn publish(&self, event: T) {
        if let Err(e) = self.sender.send(event) {
            log::warn!("Dropping event: {e}. All subscribers disconnected.");
        }
    }

    /// Returns a receiver draining this bus's events.
    ///
    /// Receivers share a single queue: each event is consumed by exactly one
    /// receiver, so a bus is intended to have one logical subscriber.
    #[must_use]
    pub fn subscribe(&self) -> flume::Receiver<T> {
        self.receiver.clone()
    }

    /// Returns a clone of the sender end, for producers that outlive the
    /// bus's owner.
    #[must_use]
    pub fn sender(&self) -> flume::Sender<T> {
        self.sender.clone()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}
