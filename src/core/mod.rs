pub mod config;
pub mod error;
pub mod types;

pub use config::ScenarioConfig;
pub use error::{InsurgencyError, Result};
pub use types::{Termination, WarfarePhase, CONVENTIONAL_THRESHOLD};
