/*!
# Core Module

Shared support types for the AST core: error handling for the
generation-checked arena accessors.
*/

pub mod errors;

pub use errors::{AstError, AstResult};
