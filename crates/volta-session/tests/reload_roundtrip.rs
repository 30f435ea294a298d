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

//! Serialization-fidelity checks on the reload cycle: a session carried
//! through serialize → teardown → reconstruct must come back equivalent.

use serde_json::json;
use std::sync::Arc;
use volta_session::{Command, SessionService};
use volta_testkit::{demo_description, ScriptedEngine};

fn service() -> (SessionService, Arc<ScriptedEngine>) {
    let engine = Arc::new(ScriptedEngine::new());
    let service = SessionService::new(engine.clone());
    (service, engine)
}

#[test]
fn reload_with_layout_preserves_topology_and_layout() {
    let (mut service, _engine) = service();
    service.load(&demo_description()).unwrap();

    let before = service.controller().serialize(true).unwrap();
    let carried = service.reload(true).unwrap();
    let after = service.controller().serialize(true).unwrap();

    assert_eq!(carried, before);
    assert_eq!(after, before);
}

#[test]
fn double_round_trip_is_stable() {
    let (mut service, _engine) = service();
    service.load(&demo_description()).unwrap();

    let first = service.reload(true).unwrap();
    let second = service.reload(true).unwrap();
    assert_eq!(first, second);
}

#[test]
fn reload_without_layout_reverts_to_engine_default_placement() {
    let (mut service, _engine) = service();
    service.load(&demo_description()).unwrap();
    let original_layout = demo_description().as_value()["layout"].clone();

    service.reload(false).unwrap();
    let after = service.controller().serialize(true).unwrap();

    // Topology survives; layout is the engine default, not the original.
    assert_eq!(
        after.as_value()["devices"],
        demo_description().as_value()["devices"]
    );
    assert_ne!(after.as_value()["layout"], original_layout);
    assert_eq!(after.as_value()["layout"], json!({ "auto": true }));
}

#[test]
fn reload_leaves_one_running_session_with_policy_reapplied() {
    let (mut service, engine) = service();
    service.load(&demo_description()).unwrap();
    service.dispatch(Command::ToggleFixed { fixed: true }).unwrap();

    service.reload(true).unwrap();

    assert!(service.running());
    // The replacement session's papers carry the shared policy.
    assert_eq!(service.registry().len(), 2);
    let papers = engine.circuit().unwrap().papers();
    assert_eq!(papers.len(), 2);
    for paper in papers {
        assert!(paper.fixed());
    }

    // Old views were disposed; the new ones are live.
    assert!(!engine.monitor_view().unwrap().was_shutdown());
}

#[test]
fn old_session_components_are_fully_discarded() {
    let (mut service, engine) = service();
    service.load(&demo_description()).unwrap();

    let old_view = engine.monitor_view().unwrap();
    let old_panel = engine.io_panel().unwrap();
    let old_circuit = engine.circuit().unwrap();

    service.reload(true).unwrap();

    assert!(old_view.was_shutdown());
    assert!(old_panel.was_shutdown());
    assert!(!old_circuit.running());
    assert!(old_circuit.papers().len() == 2); // papers live engine-side only
}
