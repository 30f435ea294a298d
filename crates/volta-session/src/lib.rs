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

//! # Volta Session
//!
//! The stateful coordination layer around an external circuit simulation
//! engine. It owns no simulation semantics of its own; it manages the
//! engine's run/stop lifecycle, keeps every schematic paper consistent with
//! a shared "fixed" display policy, drives the zoom and scroll position of
//! the recorded-signal timeline, and reloads a session through the engine's
//! own serializer to validate that circuit state round-trips.
//!
//! All operations run on a single execution context: engine notifications
//! are drained and handled to completion by
//! [`SessionController::pump_events`], and user commands are dispatched
//! synchronously through [`SessionService`].

#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod registry;
pub mod reload;
pub mod session;
pub mod timeline;

pub use command::{Command, SessionService};
pub use error::SessionError;
pub use registry::PaperRegistry;
pub use reload::ReloadPipeline;
pub use session::{RunStateObserver, SessionController};
pub use timeline::TimelineController;
