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

//! Error types raised by the circuit engine across the contract boundary.

use std::fmt;

/// An error reported by the external circuit engine.
///
/// These propagate unmodified to whoever initiated the failing operation;
/// the session layer performs no recovery and no retry on them.
#[derive(Debug)]
pub enum EngineError {
    /// The circuit description was syntactically or structurally invalid.
    MalformedDescription {
        /// Detailed error messages from the engine's deserializer.
        details: String,
    },
    /// The initial circuit description could not be read from its source.
    DescriptionIo {
        /// The path of the document that failed to load.
        path: String,
        /// The underlying I/O error.
        source_error: String,
    },
    /// The engine failed to construct one of the session's sub-components.
    ConstructionFailed {
        /// The component being built (e.g. `circuit`, `monitor view`).
        component: String,
        /// Detailed error messages from the engine.
        details: String,
    },
    /// The engine failed to serialize the circuit to a description.
    SerializationFailed {
        /// Detailed error messages from the engine's serializer.
        details: String,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::MalformedDescription { details } => {
                write!(f, "Malformed circuit description: {details}")
            }
            EngineError::DescriptionIo { path, source_error } => {
                write!(
                    f,
                    "Failed to read circuit description from '{path}': {source_error}"
                )
            }
            EngineError::ConstructionFailed { component, details } => {
                write!(f, "Engine failed to construct {component}: {details}")
            }
            EngineError::SerializationFailed { details } => {
                write!(f, "Circuit serialization failed: {details}")
            }
        }
    }
}

impl std::error::Error for EngineError {}
