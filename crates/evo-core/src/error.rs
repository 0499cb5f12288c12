//! Engine errors.

use thiserror::Error;

/// Errors produced by the simulation engine.
///
/// The failure surface is deliberately narrow: requesting an unknown
/// strategy name at agent-creation time is the only validation that
/// can fail. Every other engine operation is total given consistent
/// in-memory state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("unknown strategy: {name}")]
    UnknownStrategy { name: String },
}
