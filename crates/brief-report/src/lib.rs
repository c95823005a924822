//! Report recipes for marketbrief
//!
//! Each public function here backs one CLI operation: code and name lookup,
//! stock profiles, shareholder history, financial summaries and the news
//! briefing. Recipes fetch through [`ReportContext`], shape provider answers
//! with [`brief_core::Table`] and render plain-text reports where every
//! requested key gets a section even when its fetch failed.

pub mod context;
pub mod error;
pub mod financials;
pub mod holders;
pub mod news;
pub mod profile;
pub mod symbols;

// Re-export main types
pub use context::{ReportConfig, ReportContext};
pub use error::{ReportError, Result};
pub use financials::financial_report;
pub use holders::holder_report;
pub use news::news_report;
pub use profile::stock_info_report;
pub use symbols::{code_name_transformer, normalize_code, LookupMode};

/// Answer when a command needs the fundamentals provider but it is disabled
pub const HITHINK_UNCONFIGURED: &str = "error,hithink data source not configured";

/// Answer when the news briefing is requested without a news provider
pub const EASTMONEY_UNCONFIGURED: &str = "error,eastmoney data source not configured";
