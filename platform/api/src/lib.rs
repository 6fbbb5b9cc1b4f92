use std::collections::BTreeMap;
use std::sync::Arc;

use async_graphql::{Error, ErrorExtensions, Value};
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound,
    #[error("bad request: {0}")]
    InvalidInput(String),
    #[error("validation failed")]
    Validation(BTreeMap<String, String>),
    #[error("internal server error")]
    Internal(Arc<anyhow::Error>),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound => "NOT_FOUND",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::Validation(_) => "VALIDATION_FAILED",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self::Internal(Arc::new(err))
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Field-level failures, keyed by input field name.
    pub fn validation<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self::Validation(
            fields
                .into_iter()
                .map(|(field, message)| (field.to_string(), message.to_string()))
                .collect(),
        )
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> Error {
        let mut err = Error::new(self.to_string());
        err = err.extend_with(|_err, e| {
            e.set("code", self.code());
        });
        match self {
            ApiError::InvalidInput(_) => {
                err = err.extend_with(|_err, e| {
                    e.set("type", "BAD_REQUEST");
                });
            }
            ApiError::Validation(fields) => {
                let fields = async_graphql::to_value(fields).unwrap_or(Value::Null);
                err = err.extend_with(move |_err, e| {
                    e.set("type", "BAD_REQUEST");
                    e.set("fields", fields);
                });
            }
            _ => {}
        }
        err
    }
}

/// Convert any error into a GraphQL error payload while hiding internals.
pub fn internal_error(err: impl Into<anyhow::Error>) -> Error {
    ApiError::internal(err.into()).extend()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_are_masked() {
        let err = internal_error(anyhow::anyhow!("boom"));
        assert_eq!(err.message, "internal server error");
        let extra = err.extensions.as_ref().and_then(|map| map.get("code"));
        let code = extra.cloned();
        assert_eq!(code, Some(Value::from("INTERNAL")));
    }

    #[test]
    fn validation_errors_carry_field_messages() {
        let err = ApiError::validation([("email", "Email is invalid")]).extend();
        assert_eq!(err.message, "validation failed");
        let extensions = err.extensions.as_ref().unwrap();
        assert_eq!(extensions.get("code"), Some(&Value::from("VALIDATION_FAILED")));
        let fields = extensions.get("fields").cloned().unwrap();
        assert_eq!(
            fields.into_json().unwrap(),
            serde_json::json!({"email": "Email is invalid"})
        );
    }
}
