pub mod storage;
pub mod toml_config;

use crate::core::poll::PollPolicy;
use crate::core::{Check, ConfigProvider};
use crate::utils::error::{CheckError, Result};
use crate::utils::validation::{self, Validate};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://maayanlab.cloud/Enrichr";
pub const DEFAULT_GENES_FILE: &str = "genes.txt";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// 解析完成、注入給檢查器的設定
#[derive(Debug, Clone, PartialEq)]
pub struct CheckerOptions {
    pub base_url: String,
    pub genes_file: String,
    pub description: String,
    pub request_timeout: Duration,
    pub poll: PollPolicy,
    pub checks: Vec<Check>,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            genes_file: DEFAULT_GENES_FILE.to_string(),
            description: String::new(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            poll: PollPolicy::default(),
            checks: Check::ALL.to_vec(),
        }
    }
}

impl CheckerOptions {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_genes_file(mut self, genes_file: impl Into<String>) -> Self {
        self.genes_file = genes_file.into();
        self
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }
}

impl ConfigProvider for CheckerOptions {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn genes_file(&self) -> &str {
        &self.genes_file
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    fn poll_policy(&self) -> PollPolicy {
        self.poll
    }
}

impl Validate for CheckerOptions {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", &self.base_url)?;
        validation::validate_path("genes_file", &self.genes_file)?;
        validation::validate_positive_number(
            "request_timeout_secs",
            self.request_timeout.as_secs(),
            1,
        )?;
        validation::validate_range("polling.multiplier", self.poll.multiplier, 1.0, 10.0)?;

        if self.poll.max_delay < self.poll.initial_delay {
            return Err(CheckError::InvalidConfigValueError {
                field: "polling.max_delay_ms".to_string(),
                value: self.poll.max_delay.as_millis().to_string(),
                reason: "Must not be smaller than polling.initial_delay_ms".to_string(),
            });
        }

        if self.checks.is_empty() {
            return Err(CheckError::ConfigError {
                message: "At least one check must be enabled".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(feature = "cli")]
pub use cli::CliConfig;

#[cfg(feature = "cli")]
mod cli {
    use super::toml_config::TomlConfig;
    use super::CheckerOptions;
    use crate::core::Check;
    use crate::utils::error::Result;
    use clap::Parser;
    use std::time::Duration;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "enrichr-check")]
    #[command(about = "Submit a gene list to Enrichr and verify the service's response")]
    pub struct CliConfig {
        /// Path to a TOML configuration file
        #[arg(short, long)]
        pub config: Option<String>,

        /// Enrichr service root, e.g. https://maayanlab.cloud/Enrichr
        #[arg(long)]
        pub base_url: Option<String>,

        /// Gene list file, one symbol per line
        #[arg(long)]
        pub genes_file: Option<String>,

        #[arg(long)]
        pub description: Option<String>,

        /// HTTP request timeout in seconds
        #[arg(long)]
        pub timeout_secs: Option<u64>,

        #[arg(long)]
        pub poll_initial_ms: Option<u64>,

        #[arg(long)]
        pub poll_max_ms: Option<u64>,

        /// Give up waiting for the submitted list after this long
        #[arg(long)]
        pub poll_deadline_ms: Option<u64>,

        /// Run only these checks (comma-separated: user-list-id,short-id,round-trip)
        #[arg(long, value_delimiter = ',')]
        pub only: Vec<Check>,

        /// Write a JSON report to this path
        #[arg(long)]
        pub report: Option<String>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub json_logs: bool,
    }

    impl CliConfig {
        /// 設定檔為基底，命令列參數覆寫
        pub fn resolve(&self) -> Result<CheckerOptions> {
            let mut options = match &self.config {
                Some(path) => TomlConfig::from_file(path)?.into_options(),
                None => CheckerOptions::default(),
            };

            if let Some(base_url) = &self.base_url {
                options.base_url = base_url.clone();
            }
            if let Some(genes_file) = &self.genes_file {
                options.genes_file = genes_file.clone();
            }
            if let Some(description) = &self.description {
                options.description = description.clone();
            }
            if let Some(secs) = self.timeout_secs {
                options.request_timeout = Duration::from_secs(secs);
            }
            if let Some(ms) = self.poll_initial_ms {
                options.poll.initial_delay = Duration::from_millis(ms);
            }
            if let Some(ms) = self.poll_max_ms {
                options.poll.max_delay = Duration::from_millis(ms);
            }
            if let Some(ms) = self.poll_deadline_ms {
                options.poll.deadline = Duration::from_millis(ms);
            }
            if !self.only.is_empty() {
                options.checks = self.only.clone();
            }

            Ok(options)
        }
    }

}
