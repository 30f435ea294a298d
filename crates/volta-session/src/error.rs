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

//! Error types for session operations.

use thiserror::Error;
use volta_core::EngineError;

/// An error raised by a session operation.
///
/// Invalid-state conditions are explicit rejections; errors reported by the
/// engine are passed through unmodified.
#[derive(Debug, Error)]
pub enum SessionError {
    /// `load` was called while a session is live. Tear the session down
    /// first; loads never implicitly replace a live session.
    #[error("a session is already active; tear it down before loading another")]
    SessionActive,

    /// The operation requires a live session and none is installed.
    #[error("no session is active")]
    NoSession,

    /// The engine reported an error during construction or serialization.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_pass_through_unmodified() {
        let engine_err = EngineError::SerializationFailed {
            details: "cycle in layout".to_string(),
        };
        let expected = engine_err.to_string();
        let err: SessionError = engine_err.into();
        assert_eq!(err.to_string(), expected);
    }
}
