use thiserror::Error;

pub type Result<T = (), E = UserHiveError> = std::result::Result<T, E>;

#[derive(Error, Debug, Clone)]
pub enum UserHiveError {
    #[error("Failed to open per-user hive: {0}")]
    HiveOpenFailed(String),

    #[error("Failed to query process token: {0}")]
    TokenQueryFailed(String),

    #[error("Failed to read process integrity level: {0}")]
    IntegrityQueryFailed(String),
}

impl From<windows::core::Error> for UserHiveError {
    fn from(e: windows::core::Error) -> Self {
        UserHiveError::TokenQueryFailed(e.to_string())
    }
}
