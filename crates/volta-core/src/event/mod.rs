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

//! Event-driven communication between the engine and the session layer.
//!
//! The engine raises notifications on a channel rather than through ambient
//! callback registration: the circuit owns the sender end of an
//! [`EventBus`], and the session controller drains the receiver it obtains
//! via [`Circuit::events`](crate::engine::Circuit::events). Handlers run to
//! completion on a single execution context, so delivery order is emission
//! order.

mod bus;

pub use self::bus::EventBus;

use crate::engine::{Paper, PaperId};
use std::fmt;
use std::sync::Arc;

/// A notification raised by the circuit engine.
#[derive(Clone)]
pub enum CircuitEvent {
    /// The engine created a paper (the primary paper or a sub-circuit view).
    PaperAdded(Arc<dyn Paper>),
    /// The engine destroyed the paper with the given identifier.
    PaperRemoved(PaperId),
    /// The engine's run loop started (`true`) or stopped (`false`).
    RunningChanged(bool),
}

impl fmt::Debug for CircuitEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitEvent::PaperAdded(paper) => {
                write!(f, "PaperAdded({})", paper.id())
            }
            CircuitEvent::PaperRemoved(id) => write!(f, "PaperRemoved({id})"),
            CircuitEvent::RunningChanged(running) => {
                write!(f, "RunningChanged({running})")
            }
        }
    }
}
