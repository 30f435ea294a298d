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

//! Registry of live schematic papers and the shared "fixed" display policy.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use volta_core::{InspectedCell, InspectionSink, Paper, PaperId};

/// Tracks the papers the engine has announced as created-but-not-yet-removed
/// and applies a single shared "fixed" flag uniformly to all of them.
///
/// The registry never creates or destroys papers; it holds weak references
/// only and reacts to the creation/removal notifications forwarded by the
/// session controller. A stale entry (paper released engine-side) is skipped
/// and pruned, never a fault.
pub struct PaperRegistry {
    papers: HashMap<PaperId, Weak<dyn Paper>>,
    fixed: bool,
    sink: InspectionSink,
}

impl PaperRegistry {
    /// Creates an empty registry recording inspected cells into `sink`.
    ///
    /// The shared fixed flag starts out `false` (papers rearrangeable).
    #[must_use]
    pub fn new(sink: InspectionSink) -> Self {
        Self {
            papers: HashMap::new(),
            fixed: false,
            sink,
        }
    }

    /// Registers a newly created paper.
    ///
    /// The current shared fixed flag is applied to the paper at registration
    /// time, and a double-click hook is installed that records the clicked
    /// element's backing model into the inspection sink.
    pub fn on_paper_added(&mut self, paper: &Arc<dyn Paper>) {
        let id = paper.id();
        paper.set_fixed(self.fixed);

        let sink = self.sink.clone();
        paper.on_element_double_click(Arc::new(move |model| {
            sink.record(InspectedCell { paper: id, model });
        }));

        if self.papers.insert(id, Arc::downgrade(paper)).is_some() {
            log::warn!("Paper {id} announced twice; entry replaced.");
        } else {
            log::debug!("Registered paper {id} (fixed: {}).", self.fixed);
        }
    }

    /// Unregisters the paper with the given identifier.
    ///
    /// A removal notification for an unknown paper is a no-op.
    pub fn on_paper_removed(&mut self, id: PaperId) {
        if self.papers.remove(&id).is_none() {
            log::debug!("Removal notification for unregistered paper {id}; ignored.");
        }
    }

    /// Updates the shared fixed flag and applies it immediately to every
    /// currently registered paper.
    ///
    /// Papers registered after this call pick the new value up at their own
    /// registration time; they are not re-queried retroactively.
    pub fn set_fixed(&mut self, fixed: bool) {
        self.fixed = fixed;
        self.apply_policy();
    }

    /// Re-asserts the current fixed flag on every registered paper, pruning
    /// entries whose paper has been released engine-side.
    pub fn apply_policy(&mut self) {
        let fixed = self.fixed;
        self.papers.retain(|id, weak| match weak.upgrade() {
            Some(paper) => {
                paper.set_fixed(fixed);
                true
            }
            None => {
                log::debug!("Pruning stale entry for paper {id}.");
                false
            }
        });
    }

    /// The current shared fixed flag.
    #[must_use]
    pub fn fixed(&self) -> bool {
        self.fixed
    }

    /// Returns `true` if a paper with the given identifier is registered.
    #[must_use]
    pub fn contains(&self, id: PaperId) -> bool {
        self.papers.contains_key(&id)
    }

    /// The number of registered papers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.papers.len()
    }

    /// Returns `true` if no papers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    /// Drops every entry. Called at session teardown so no registry entry
    /// outlives the session it belongs to.
    pub fn clear(&mut self) {
        self.papers.clear();
    }
}
