//! # warelay-channels
//!
//! WhatsApp channel for warelay.

pub mod whatsapp;
