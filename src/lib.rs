//! msgloc - Markup-preserving translation of browser extension message catalogs
//!
//! Splits each `messages.json` message into text segments and markup tokens,
//! translates only the text through a pluggable backend, and writes one
//! catalog per target locale.

pub mod cli;
pub mod config;
pub mod catalog;
pub mod error;
pub mod markup;
pub mod translate;
pub mod workflow;
