//! Stock code lookup and profile reports
//!
//! # Usage
//!
//! ```bash
//! # Required
//! export TUSHARE_TOKEN="your-token"
//!
//! # Codes to names, or names to codes
//! stock-inform transform 000001 600519
//! stock-inform transform 平安银行
//!
//! # Concept, industry and risk profile
//! stock-inform info 000001.SZ 600519.SH
//! ```

use brief_report::{code_name_transformer, stock_info_report, ReportConfig, ReportContext};
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser)]
#[command(name = "stock-inform")]
#[command(about = "Stock code lookup and profile reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate codes to names, or names to codes
    Transform {
        /// Stock codes or company names
        #[arg(required = true)]
        queries: Vec<String>,
    },
    /// Concept boards, industry plates and risk flags per stock
    Info {
        /// Stock codes
        #[arg(required = true)]
        codes: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    brief_util::init_tracing();

    let cli = Cli::parse();
    info!("Starting stock-inform");

    let context = ReportContext::with_config(ReportConfig::from_env()?)?;

    let output = match cli.command {
        Commands::Transform { queries } => code_name_transformer(&context, &queries).await,
        Commands::Info { codes } => stock_info_report(&context, &codes).await,
    };
    println!("{output}");

    Ok(())
}
