// HTTP response utilities for JSON error bodies
use crate::application::client_factory::ClientFactoryError;
use crate::application::settings_form::SettingsError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    ClientFactory(#[from] ClientFactoryError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ClientFactory(e) => match e {
                ClientFactoryError::ServerNotFound { .. }
                | ClientFactoryError::DataStreamTypeNotFound { .. }
                | ClientFactoryError::DataStreamNotFound { .. } => StatusCode::NOT_FOUND,
                ClientFactoryError::MissingServerId { .. } | ClientFactoryError::Client { .. } => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                ClientFactoryError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Settings(e) => match e {
                SettingsError::UnknownDelta(_) => StatusCode::NOT_FOUND,
                SettingsError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
                SettingsError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {:#}", self);
        }

        let body = match &self {
            ApiError::Settings(SettingsError::Invalid(errors)) => {
                json!({ "error": self.to_string(), "errors": errors })
            }
            _ => json!({ "error": format!("{:#}", self) }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let not_found: ApiError = ClientFactoryError::ServerNotFound {
            server_id: "x".to_string(),
        }
        .into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let missing: ApiError = ClientFactoryError::MissingServerId {
            type_id: "sensor".to_string(),
            label: "Sensor".to_string(),
        }
        .into();
        assert_eq!(missing.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let invalid: ApiError = SettingsError::Invalid(vec!["bad".to_string()]).into();
        assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let internal: ApiError = anyhow::anyhow!("disk full").into();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
