/*!
# Error System for the AST core

Checked errors for handle-contract violations. Ordinary miss conditions
(unbound name lookup) are `Option` values, not errors.
*/

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias for arena operations
pub type AstResult<T> = Result<T, AstError>;

/// Errors raised by the generation-checked arena accessors.
///
/// A stale handle is a handle whose slot has been recycled since the handle
/// was issued. The arena rejects it instead of handing out the slot's new
/// occupant.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AstError {
    #[error("stale node handle: slot {index} is at generation {slot_generation}, handle carries generation {handle_generation}")]
    StaleHandle {
        index: u32,
        handle_generation: u32,
        slot_generation: u32,
    },

    #[error("node handle out of bounds: slot {index} of {slot_count}")]
    OutOfBounds { index: u32, slot_count: u32 },
}
