//! Service layer for Foover.
//!
//! Each component wraps a shared [`VoteStore`](foover_core::store::VoteStore).
//! The [`Coordinator`] ties them together and enforces the cross-entity
//! checks a vote must pass before it is written.

pub mod aggregate;
pub mod catalog;
pub mod coordinator;
pub mod error;
pub mod ledger;
pub mod sessions;
pub mod validate;

pub use coordinator::Coordinator;
pub use error::{Result, ServiceError};

#[cfg(test)]
mod tests;
