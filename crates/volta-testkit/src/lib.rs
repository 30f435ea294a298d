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

//! # Volta Testkit
//!
//! A scripted, in-memory implementation of the circuit-engine contract from
//! `volta-core`, used to exercise the session layer in tests. It simulates
//! nothing: circuits only track run state, recorded time and their papers,
//! and every externally visible action lands in a shared [`ActionLog`] so
//! tests can assert call ordering.
//!
//! The scripted engine understands descriptions of the form:
//!
//! ```json
//! {
//!   "devices":     { ... },              // opaque topology
//!   "connectors":  [ ... ],              // opaque topology
//!   "subcircuits": ["alu", ...],         // one paper per entry at display
//!   "layout":      { ... }               // optional coordinates
//! }
//! ```
//!
//! Everything except `layout` and `subcircuits` is carried through
//! serialization untouched. `serialize(true)` emits the stored layout, or
//! the engine-default placeholder when none was provided; `serialize(false)`
//! omits the `layout` key entirely.

#![warn(missing_docs)]

mod actions;
mod engine;
mod views;

pub use actions::ActionLog;
pub use engine::{ScriptedCircuit, ScriptedCircuitHandle, ScriptedEngine, ScriptedMonitor};
pub use views::{ScriptedIoPanel, ScriptedMonitorView, ScriptedPaper};

use serde_json::json;
use volta_core::Description;

/// A description with a primary schematic, one sub-circuit paper and
/// explicit layout coordinates.
#[must_use]
pub fn demo_description() -> Description {
    Description::new(json!({
        "devices": {
            "clk": { "type": "Clock" },
            "and1": { "type": "And", "bits": 1 },
            "out1": { "type": "Lamp" }
        },
        "connectors": [
            { "from": "clk", "to": "and1" },
            { "from": "and1", "to": "out1" }
        ],
        "subcircuits": ["alu"],
        "layout": {
            "and1": { "x": 120, "y": 40 },
            "out1": { "x": 240, "y": 40 }
        }
    }))
}

/// A minimal description: topology only, no sub-circuits, no layout.
#[must_use]
pub fn bare_description() -> Description {
    Description::new(json!({
        "devices": { "btn": { "type": "Button" }, "out": { "type": "Lamp" } },
        "connectors": [ { "from": "btn", "to": "out" } ]
    }))
}
