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

//! The serialize → teardown → reconstruct reload cycle.

use crate::error::SessionError;
use crate::session::SessionController;
use volta_core::Description;

/// Rebuilds the live session from its own serialized description.
///
/// This is the session layer's sole correctness check on the engine's
/// serializer: the reconstructed session is expected to be behaviorally and
/// structurally equivalent to the one it replaces (topology always
/// preserved; layout preserved only when requested).
pub struct ReloadPipeline;

impl ReloadPipeline {
    /// Performs, strictly in order: shutdown of the monitor view and I/O
    /// panel, stop of the circuit, serialization (with layout coordinates
    /// iff `include_layout`), full disposal of the old session, and a fresh
    /// [`SessionController::load`] from the serialized description.
    ///
    /// On success the new session is live and running (per `load`'s
    /// auto-start), the shared fixed policy has been reapplied to its
    /// papers, and the description that carried the circuit across is
    /// returned for callers that want to log or compare it.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoSession`] if nothing is loaded; engine errors from
    /// serialization or reconstruction propagate unmodified. A failed
    /// reload leaves no session installed: the old one is already gone and
    /// no partial replacement is kept.
    pub fn reload(
        controller: &mut SessionController,
        include_layout: bool,
    ) -> Result<Description, SessionError> {
        log::info!("Reloading session through the engine serializer (layout: {include_layout}).");
        let description = controller.dismantle(include_layout)?;
        controller.load(&description)?;
        Ok(description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use volta_testkit::{demo_description, ScriptedEngine};

    #[test]
    fn reload_produces_a_running_replacement_session() {
        let engine = Arc::new(ScriptedEngine::new());
        let mut controller = SessionController::new(engine.clone());
        controller.load(&demo_description()).unwrap();
        let first_circuit = engine.circuit().unwrap();

        ReloadPipeline::reload(&mut controller, true).unwrap();

        assert!(controller.running());
        // The replacement is a distinct circuit, not the old one restarted.
        assert!(!first_circuit.running());
        assert!(engine.circuit().unwrap().running());
    }

    #[test]
    fn reload_without_session_is_rejected() {
        let engine = Arc::new(ScriptedEngine::new());
        let mut controller = SessionController::new(engine);
        let result = ReloadPipeline::reload(&mut controller, true);
        assert!(matches!(result, Err(SessionError::NoSession)));
    }

    #[test]
    fn reload_disposes_views_before_stop_and_serialize() {
        let engine = Arc::new(ScriptedEngine::new());
        let mut controller = SessionController::new(engine.clone());
        controller.load(&demo_description()).unwrap();
        engine.log().clear();

        ReloadPipeline::reload(&mut controller, false).unwrap();

        let entries = engine.log().entries();
        // Old session: views down, then stop; new session: auto-start.
        assert_eq!(
            &entries[..3],
            &[
                "monitor_view.shutdown".to_string(),
                "io_panel.shutdown".to_string(),
                "circuit.stop".to_string(),
            ]
        );
        assert_eq!(entries.last().unwrap(), "circuit.start");
    }
}
