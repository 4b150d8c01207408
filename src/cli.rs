use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::models::RiskLevel;

#[derive(Parser, Debug)]
#[command(
    name = "chainwatch",
    about = "Score supply-chain news and shipping data for disruption risk",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file [default: ./.chainwatch/config.toml, fallback ~/.config/chainwatch/config.toml]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Show full detail (alternative routes, mitigation strategies)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print summary lines
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score a single text item for supply-chain risk
    Analyze {
        /// Text to analyze
        text: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Score a file of text items (one per line, or a JSON array of strings)
    Batch {
        /// Input file
        file: PathBuf,

        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a full risk assessment over a supply-chain JSON payload
    Assess {
        /// JSON payload with routes, suppliers, and time window
        file: PathBuf,

        /// Report format
        #[arg(long, default_value = "terminal", value_name = "FORMAT")]
        report: ReportFormat,

        /// PDF output path; use without value to default to risk-report.pdf
        #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "risk-report.pdf")]
        pdf: Option<PathBuf>,
    },

    /// Fetch recent supply-chain news and score each article
    News {
        /// Number of days to look back
        #[arg(long, default_value_t = 7)]
        days_back: i64,

        /// Only keep articles in these categories (comma-separated)
        #[arg(long, value_delimiter = ',', value_name = "CATEGORY")]
        categories: Vec<String>,

        /// Only keep articles at this risk level
        #[arg(long, value_name = "LEVEL")]
        risk_level: Option<RiskLevelArg>,

        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
    Pdf,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum RiskLevelArg {
    Low,
    Medium,
    High,
}

impl From<&RiskLevelArg> for RiskLevel {
    fn from(arg: &RiskLevelArg) -> Self {
        match arg {
            RiskLevelArg::Low => RiskLevel::Low,
            RiskLevelArg::Medium => RiskLevel::Medium,
            RiskLevelArg::High => RiskLevel::High,
        }
    }
}
