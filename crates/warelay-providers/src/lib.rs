//! # warelay-providers
//!
//! Chat-completion provider implementations for warelay.

pub mod groq;
