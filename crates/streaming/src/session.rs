use crate::error::ApiError;

/// Read-only view of the signed-in user, supplied by the auth layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user_id: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn require_user(&self) -> Result<&str, ApiError> {
        self.user_id().ok_or(ApiError::SessionRequired)
    }
}
