//! Defines one-off utility functions used throughout the workspace
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

#[cfg(feature = "errors")]
pub mod errors;
#[cfg(feature = "telemetry")]
pub mod telemetry;

