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

//! Structured debug-inspection surface for schematic elements.
//!
//! Double-clicking an element on any registered paper records the element's
//! backing model here, where a developer tool (console, inspector panel) can
//! pick it up. This is a debugging aid, not part of the functional contract:
//! nothing in the session layer reads the sink.

use crate::engine::PaperId;
use std::sync::{Arc, Mutex};

/// The backing model of an inspected schematic element.
#[derive(Debug, Clone, PartialEq)]
pub struct InspectedCell {
    /// The paper the element was double-clicked on.
    pub paper: PaperId,
    /// The engine-side model of the element (gate, subcircuit, ...).
    pub model: serde_json::Value,
}

/// A shared single-slot store for the most recently inspected cell.
///
/// Cloning the sink clones the handle, not the slot: all clones observe the
/// same cell. Each recording replaces the previous one.
#[derive(Debug, Clone, Default)]
pub struct InspectionSink {
    slot: Arc<Mutex<Option<InspectedCell>>>,
}

impl InspectionSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `cell` as the most recently inspected element.
    pub fn record(&self, cell: InspectedCell) {
        log::info!(
            "Captured double-clicked cell on paper {} for inspection.",
            cell.paper
        );
        *self.slot.lock().unwrap() = Some(cell);
    }

    /// Returns a copy of the current cell, leaving it in place.
    #[must_use]
    pub fn current(&self) -> Option<InspectedCell> {
        self.slot.lock().unwrap().clone()
    }

    /// Removes and returns the current cell.
    pub fn take(&self) -> Option<InspectedCell> {
        self.slot.lock().unwrap().take()
    }
}
