use serde::{Deserialize, Serialize};

/// Uniform response wrapper: `status` always, `message` only on failure,
/// `data` only on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericEnvelope<T> {
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> GenericEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: Some(message.into()),
            data: None,
        }
    }
}
