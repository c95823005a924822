//! Shared utilities for marketbrief
//!
//! This crate provides common functionality used across the marketbrief
//! workspace: logging setup and small text helpers.

pub mod logging;
pub mod text;

pub use logging::init_tracing;
pub use text::truncate_chars;
