//! Shared result alias.
//!
//! Library crates return their own plain error enums. Code that crosses a
//! layer boundary (seed loading, the HTTP service) returns
//! `almanac_core::Result<T, SomeError>` so the failure travels as a
//! rootcause [`Report`] whose current context is the layer's error.

use rootcause::Report;

/// Result carrying a rootcause [`Report`] with context `C`.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;
