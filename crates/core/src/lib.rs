//! Client-side domain logic for the toolhub web utilities.
//!
//! Nothing here touches the network or the filesystem. The
//! `toolhub-client` crate wires these pieces to the backend.

pub mod duplicates;
pub mod error;
pub mod format;
pub mod history;
pub mod hook;
pub mod job;
pub mod password;
pub mod picker;
pub mod platform;
pub mod progress;
pub mod selection;
pub mod types;
pub mod validation;
