//! # Domain Layer (Inner Hexagon)
//!
//! Pure business logic for action registration.
//! NO I/O, NO async, NO collaborator calls.
//!
//! - Dependencies point INWARD only (ports and adapters depend on this, not vice versa).

pub mod entities;
pub mod invariants;
pub mod value_objects;

pub use entities::*;
pub use invariants::*;
pub use value_objects::*;
