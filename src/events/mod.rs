//! ECS events.
//!
//! Submodules overview:
//! - [`telegram`] – telegram record, outbox entries and the dropped-telegram event

pub mod telegram;
