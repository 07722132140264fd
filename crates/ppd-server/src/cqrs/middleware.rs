//! CQRS markers
//!
//! Write operations are marked with [`Command`] so cross-cutting concerns
//! (auditing, future authorization checks) can be attached to commands
//! without touching queries.

/// Marker trait for state-mutating requests
pub trait Command {}
