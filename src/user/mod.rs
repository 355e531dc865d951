//! User directory collaborator.
//!
//! Users are owned by the external authentication provider; this module only
//! mirrors the profile fields the workflow engine reads (email and display
//! name) behind the [`ports::UserDirectory`] port.

pub mod adapters;
pub mod domain;
pub mod ports;
