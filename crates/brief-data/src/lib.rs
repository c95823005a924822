//! Market data provider clients for marketbrief
//!
//! This crate wraps the three upstream services the report commands read
//! from:
//!
//! - [`TushareClient`] - quotes, shareholder datasets and valuation
//!   indicators from the Tushare Pro endpoint
//! - [`HithinkClient`] - concept boards, industry plates, risk flags and
//!   core financial indicators from the Hithink F10 service
//! - [`EastmoneyClient`] - news article search from the Eastmoney endpoint
//!
//! Each client owns its HTTP connection and configuration; provider answers
//! come back as [`brief_core::Table`] record sets or typed article lists.

pub mod eastmoney;
pub mod error;
pub mod hithink;
pub mod tushare;

// Re-export main types
pub use eastmoney::{EastmoneyClient, EastmoneyConfig, NewsItem};
pub use error::{DataError, Result};
pub use hithink::{HithinkClient, HithinkConfig};
pub use tushare::{TushareClient, TushareConfig};
