pub mod checker;
pub mod client;
pub mod genes;
pub mod poll;

pub use crate::domain::model::{Check, CheckOutcome, CheckReport, CheckStatus, GeneList};
pub use crate::domain::ports::{ConfigProvider, EnrichrApi, Storage};
pub use crate::utils::error::Result;
