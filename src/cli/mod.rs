pub mod init;
pub mod own_resources;
#[cfg(feature = "xls")]
pub mod projection;
pub mod render;
pub mod status;
pub mod summary;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "apoteo",
    about = "Budget-execution reports for APOTEOSYS payroll exports."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record the export source and cache policy.
    Init {
        /// Export URL or local file path (CSV, XLS or XLSX)
        #[arg(long)]
        source: String,
        /// Cache lifetime for remote fetches, in seconds
        #[arg(long, default_value_t = 600)]
        ttl: u64,
    },
    /// Funding-source execution summary with executive metrics.
    Summary {
        /// Override the configured export source
        #[arg(long)]
        source: Option<String>,
        /// Re-fetch the export even if the cached copy is fresh
        #[arg(long)]
        refresh: bool,
    },
    /// Own-resources breakdown by organizational band.
    OwnResources {
        /// Band: total, primera-infancia, orientadores, global (default: all)
        #[arg(long)]
        band: Option<String>,
        /// Show per-concept rows, not just the group totals
        #[arg(long)]
        detail: bool,
        /// Override the configured export source
        #[arg(long)]
        source: Option<String>,
        /// Re-fetch the export even if the cached copy is fresh
        #[arg(long)]
        refresh: bool,
    },
    /// Render consolidated-payroll projection workbooks.
    #[cfg(feature = "xls")]
    Projection {
        /// Wages workbook (nómina consolidada, sueldos)
        #[arg(long)]
        wages: String,
        /// Employer-contribution workbook (aportes)
        #[arg(long)]
        contributions: String,
    },
    /// Show settings, source and cache freshness.
    Status,
}
