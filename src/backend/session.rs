use thiserror::Error;

use crate::storage::config::Config;

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("No user configured. Set session.user_id in {0} or pass --user <id>")]
    NoUser(String),
}

/// The signed-in user every backend call is made on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    user_id: i64,
}

impl Session {
    pub fn new(user_id: i64) -> Self {
        Self { user_id }
    }

    /// An explicit id wins over the configured one.
    pub fn resolve(config: &Config, explicit_user: Option<i64>) -> Result<Self, SessionError> {
        explicit_user
            .or(config.session.user_id)
            .map(Self::new)
            .ok_or_else(|| SessionError::NoUser(Config::config_path().display().to_string()))
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }
}
