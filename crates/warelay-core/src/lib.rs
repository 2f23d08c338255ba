//! # warelay-core
//!
//! Core types, traits, configuration, formatting, and error handling for the
//! warelay WhatsApp relay.

pub mod config;
pub mod error;
pub mod format;
pub mod message;
pub mod traits;
