//! LLM-orchestrated web search
//!
//! Sends a keyword to a tool-calling chat model, runs the web searches the
//! model asks for and prints one JSON object with the summarized result.
//!
//! # Usage
//!
//! ```bash
//! # Required for the web search tools
//! export OLLAMA_API_KEY="your-key"
//!
//! smart-search 平安银行 中期分红
//! ```

use brief_search::{SearchOutcome, Searcher, SearcherConfig};
use clap::Parser;

#[derive(Parser)]
#[command(name = "smart-search")]
#[command(about = "Search the web through a tool-calling chat model", long_about = None)]
struct Args {
    /// Search keyword; multiple words are joined with spaces
    #[arg(required = true)]
    keyword: Vec<String>,
}

#[tokio::main]
async fn main() {
    brief_util::init_tracing();

    let args = Args::parse();
    let keyword = args.keyword.join(" ");

    let outcome = match SearcherConfig::from_env().and_then(Searcher::with_config) {
        Ok(searcher) => searcher.search(&keyword).await,
        Err(e) => SearchOutcome::failed(&keyword, e.to_string()),
    };
    println!("{}", outcome.to_json());
}
