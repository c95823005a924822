//! Record-set model and report assembly for marketbrief
//!
//! This crate provides the data shapes shared by every marketbrief command:
//!
//! - A loosely typed [`Table`] of fetched records plus the shaping
//!   operations report recipes chain over it
//! - Report assembly types that keep per-key failures inline instead of
//!   aborting a batch
//! - Date formats and lookback windows used by provider queries

pub mod dates;
pub mod error;
pub mod report;
pub mod table;

// Re-export main types
pub use error::{Result, TableError};
pub use report::{assemble, Block, Report, Section};
pub use table::{Cell, Table};
