//! Discord interaction handlers
//!
//! Autocomplete callbacks, the hooks run around every command and the
//! framework error handler.

/// Autocomplete handlers for item, crop, villager and station parameters
pub mod autocomplete;
/// Framework error handler
pub mod error;
/// Command check and post-command hooks
pub mod hooks;
