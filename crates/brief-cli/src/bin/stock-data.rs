//! Stock data reports: shareholders, financials and news
//!
//! # Usage
//!
//! ```bash
//! # Required
//! export TUSHARE_TOKEN="your-token"
//!
//! # Shareholder history over the last year
//! stock-data holders 000001.SZ 600519.SH
//!
//! # Core indicators and valuation statistics
//! stock-data financials 000001.SZ
//!
//! # News briefing per keyword
//! stock-data news 银行 白酒
//! ```

use brief_report::{financial_report, holder_report, news_report, ReportConfig, ReportContext};
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser)]
#[command(name = "stock-data")]
#[command(about = "Shareholder, financial and news reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shareholder counts and top-holder tables over the last year
    Holders {
        /// Stock codes
        #[arg(required = true)]
        codes: Vec<String>,
    },
    /// Core indicator history plus valuation statistics
    Financials {
        /// Stock codes
        #[arg(required = true)]
        codes: Vec<String>,
    },
    /// News briefing from mainstream outlets
    News {
        /// Search keywords
        #[arg(required = true)]
        keywords: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    brief_util::init_tracing();

    let cli = Cli::parse();
    info!("Starting stock-data");

    let context = ReportContext::with_config(ReportConfig::from_env()?)?;

    let output = match cli.command {
        Commands::Holders { codes } => holder_report(&context, &codes).await,
        Commands::Financials { codes } => financial_report(&context, &codes).await,
        Commands::News { keywords } => news_report(&context, &keywords).await,
    };
    println!("{output}");

    Ok(())
}
