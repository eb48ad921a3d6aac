use std::path::PathBuf;

use basura_core::{ClassificationPolicy, LowFrequency};
use clap::{Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "basura")]
#[command(about = "Terminal dashboard for barangay waste levels", long_about = None)]
pub(crate) struct Cli {
    /// Root of the waste-data API (serves /waste-data and /predict)
    #[arg(long, env = "BASURA_API_URL", default_value = "http://localhost:5000/api")]
    pub api_url: String,

    /// HTTP timeout for API calls, in seconds
    #[arg(long, env = "BASURA_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Pickup cadence recommended for low-volume districts
    #[arg(long, env = "BASURA_LOW_FREQUENCY", value_enum, default_value_t = LowFrequencyArg::Twice)]
    pub low_frequency: LowFrequencyArg,

    /// Number of districts in the top offenders table
    #[arg(long, env = "BASURA_TOP", default_value_t = 5)]
    pub top: usize,

    /// Log file; rotated daily
    #[arg(long, env = "BASURA_LOG_FILE", default_value = "logs/basura.log")]
    pub log_file: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum LowFrequencyArg {
    Once,
    Twice,
}

impl Cli {
    pub(crate) fn policy(&self) -> ClassificationPolicy {
        let low_frequency = match self.low_frequency {
            LowFrequencyArg::Once => LowFrequency::Once,
            LowFrequencyArg::Twice => LowFrequency::Twice,
        };
        ClassificationPolicy { low_frequency }
    }
}
