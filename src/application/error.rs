use std::error::Error as StdError;

use axum::{http::StatusCode, response::Response};
use thiserror::Error;

use crate::infra::error::InfraError;

/// Diagnostic attached to error responses for the logging middleware.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, status: StatusCode, error: &dyn StdError) -> Self {
        let mut messages = vec![error.to_string()];
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self {
            source,
            status,
            messages,
        }
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::repos::RepoError;

    #[test]
    fn report_collects_error_chain() {
        let err = AppError::from(InfraError::database("connection refused"));
        let report =
            ErrorReport::from_error("test", StatusCode::INTERNAL_SERVER_ERROR, &err);

        assert_eq!(report.messages[0], "database error: connection refused");
        assert_eq!(report.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn report_from_repo_error_keeps_detail() {
        let err = RepoError::row_decode("column `eslora` is NULL");
        let report =
            ErrorReport::from_error("test", StatusCode::INTERNAL_SERVER_ERROR, &err);

        assert_eq!(
            report.messages,
            vec!["row could not be decoded: column `eslora` is NULL".to_string()]
        );
    }
}
