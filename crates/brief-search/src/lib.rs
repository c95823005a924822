//! Tool-orchestrated web search for marketbrief
//!
//! One search runs in three stages: a dispatch turn where the model picks
//! web tools to call for a keyword, execution of those calls against the
//! hosted web API, and a summarize turn that digests the transcripts. The
//! result is always one JSON object, success or not.

pub mod error;
pub mod registry;
pub mod searcher;
pub mod tool;
pub mod tools;
pub mod web;

// Re-export main types
pub use error::{Result, SearchError};
pub use registry::ToolRegistry;
pub use searcher::{SearchOutcome, Searcher, SearcherConfig, DEFAULT_SEARCH_MODEL};
pub use tool::Tool;
pub use tools::{WebFetchTool, WebSearchTool};
pub use web::{WebClient, WebConfig, WebFetchResponse, WebSearchResponse, WebSearchResult};
