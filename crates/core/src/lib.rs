//! Domain building blocks shared by the queue client and the presenter.
//!
//! Holds the log tail formatter, the Fooocus generation parameters and
//! the static option catalogs offered to users.

pub mod catalog;
pub mod error;
pub mod generation;
pub mod logs;
