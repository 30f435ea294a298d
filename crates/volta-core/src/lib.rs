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

//! # Volta Core
//!
//! Foundational crate containing traits, core types, and the interface
//! contract that binds the session layer to an external digital-circuit
//! simulation engine.
//!
//! The engine itself (gate models, simulation semantics, rendering) is an
//! external collaborator. This crate only describes the surface the session
//! layer consumes: circuit construction and serialization, run control,
//! paper (schematic view) handles, the signal-timeline view, and the event
//! stream the engine raises notifications on.

#![warn(missing_docs)]

pub mod description;
pub mod engine;
pub mod error;
pub mod event;
pub mod inspect;

pub use description::Description;
pub use engine::{
    Circuit, CircuitEngine, DoubleClickObserver, IoPanelView, Monitor, MonitorView, Paper, PaperId,
};
pub use error::EngineError;
pub use event::{CircuitEvent, EventBus};
pub use inspect::{InspectedCell, InspectionSink};
