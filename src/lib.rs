pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::{storage::LocalStorage, toml_config::TomlConfig, CheckerOptions};
pub use crate::core::{checker::SubmissionChecker, client::EnrichrClient, poll::PollPolicy};
pub use crate::domain::model::{Check, CheckReport, CheckStatus, GeneList};
pub use crate::utils::error::{CheckError, Result};
