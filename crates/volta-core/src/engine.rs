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

//! The interface contract consumed from the external circuit engine.
//!
//! Every type the session layer touches on the engine side is reached
//! through one of these object-safe traits. The engine owns simulation
//! semantics, scheduling of its own run loop, and rendering; this contract
//! only exposes construction, run control, serialization, view handles, and
//! the notification stream.

use crate::description::Description;
use crate::error::EngineError;
use crate::event::CircuitEvent;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// A unique identifier for a [`Paper`].
///
/// Stable for the lifetime of the paper; never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaperId(Uuid);

impl PaperId {
    /// Creates a new, random (version 4) `PaperId`.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PaperId {
    /// Creates a new, random (version 4) `PaperId`.
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PaperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// An observer invoked with the backing model of a double-clicked schematic
/// element.
pub type DoubleClickObserver = Arc<dyn Fn(serde_json::Value) + Send + Sync>;

/// The engine's factory surface: deserializes descriptions and constructs
/// the dependent monitor and view components of a session.
pub trait CircuitEngine: Send + Sync {
    /// Constructs a new circuit from a serialized description.
    ///
    /// A malformed description is reported as
    /// [`EngineError::MalformedDescription`].
    fn build_circuit(&self, description: &Description) -> Result<Box<dyn Circuit>, EngineError>;

    /// Constructs a signal-trace recorder bound to `circuit`.
    fn build_monitor(&self, circuit: &dyn Circuit) -> Result<Box<dyn Monitor>, EngineError>;

    /// Constructs a scrollable, zoomable timeline view over `monitor`.
    fn build_monitor_view(&self, monitor: &dyn Monitor) -> Result<Arc<dyn MonitorView>, EngineError>;

    /// Constructs the interactive input/output panel bound to `circuit`.
    fn build_io_panel(&self, circuit: &dyn Circuit) -> Result<Box<dyn IoPanelView>, EngineError>;
}

/// The engine's runtime model of a digital logic network.
pub trait Circuit: Send + Sync {
    /// Starts the engine's run loop. The engine raises
    /// [`CircuitEvent::RunningChanged`] when the state actually changes.
    fn start(&self);

    /// Stops the engine's run loop. This is the sole cancellation primitive
    /// available to the session layer.
    fn stop(&self);

    /// Returns `true` while the engine's run loop is active.
    fn running(&self) -> bool;

    /// Serializes the circuit to a description, including layout coordinates
    /// iff `include_layout` is `true`.
    fn serialize(&self, include_layout: bool) -> Result<Description, EngineError>;

    /// Returns the receiver end of the circuit's notification stream.
    ///
    /// Events are delivered in emission order. The receiver is the session
    /// layer's only subscription point; the engine keeps the sender.
    fn events(&self) -> flume::Receiver<CircuitEvent>;

    /// Creates and returns the circuit's primary paper.
    ///
    /// Like every paper the engine creates, the primary paper is also
    /// announced through [`CircuitEvent::PaperAdded`].
    fn display(&self) -> Result<Arc<dyn Paper>, EngineError>;

    /// Returns `self` for engine-internal downcasting (e.g. when the engine
    /// binds a monitor to its own concrete circuit type).
    fn as_any(&self) -> &dyn Any;
}

/// Records signal history over simulated time. Opaque to the session layer
/// beyond being handed back to the engine to build a [`MonitorView`].
pub trait Monitor: Send + Sync {
    /// Returns `self` for engine-internal downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// A scrollable, zoomable rendered strip of recorded signal history.
///
/// While `live` is `true` the engine manages `start` to track the most
/// recent recorded time; the session layer must not write `start` in that
/// mode.
pub trait MonitorView: Send + Sync {
    /// The zoom factor (inverse of time-per-pixel).
    fn pixels_per_tick(&self) -> f64;

    /// Sets the zoom factor.
    fn set_pixels_per_tick(&self, value: f64);

    /// Returns `true` while the view tracks the most recent recorded time.
    fn live(&self) -> bool;

    /// Switches between live-follow and manual mode.
    fn set_live(&self, live: bool);

    /// The explicit left-edge time offset. Meaningful only when not live.
    fn start(&self) -> f64;

    /// Pins the view's left edge to `start`. Only valid in manual mode.
    fn set_start(&self, start: f64);

    /// The rendered pixel width. Read-only from the session layer.
    fn width(&self) -> f64;

    /// Releases the view's resources. The view must not be used afterwards.
    fn shutdown(&self);
}

/// Renders interactive input/output controls bound to the circuit.
pub trait IoPanelView: Send + Sync {
    /// Releases the panel's resources. The panel must not be used afterwards.
    fn shutdown(&self);
}

/// A renderable schematic view of the circuit or one of its sub-circuits.
///
/// Papers are created and destroyed dynamically by the engine; the session
/// layer only reacts to the creation/removal notifications and never owns
/// them.
pub trait Paper: Send + Sync {
    /// The paper's unique identifier.
    fn id(&self) -> PaperId;

    /// Locks (`true`) or unlocks (`false`) node positions against
    /// user-driven rearrangement.
    fn set_fixed(&self, fixed: bool);

    /// Installs an observer invoked with the backing model of any
    /// double-clicked element on this paper. Replaces a prior observer.
    fn on_element_double_click(&self, observer: DoubleClickObserver);
}
