//! Kontor Common Types
//!
//! This crate contains shared types used across the Kontor ledger,
//! including record identifiers, the posting side, the error taxonomy and
//! balance query options.

pub mod identifiers;
pub mod side;
pub mod error;
pub mod period;

pub use identifiers::*;
pub use side::*;
pub use error::*;
pub use period::*;
