use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsurgencyError {
    #[error("Invalid lookup table '{table}': {reason}")]
    InvalidTable { table: String, reason: String },

    #[error("Missing lookup table: {0}")]
    MissingTable(String),

    #[error("Unknown lookup table: {0}")]
    UnknownTable(String),

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Scenario parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl InsurgencyError {
    pub fn invalid_table(table: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTable {
            table: table.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// True for errors raised while validating a scenario, before any step runs
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidTable { .. }
                | Self::MissingTable(_)
                | Self::UnknownTable(_)
                | Self::InvalidParameter { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, InsurgencyError>;
