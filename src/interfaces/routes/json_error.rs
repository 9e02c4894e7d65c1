use actix_multipart::form::MultipartFormConfig;
use actix_web::{
    web,
    http::StatusCode,
    ResponseError,
    HttpResponse,
    error::{JsonPayloadError, PathError, QueryPayloadError, UrlencodedError},
};
use serde_json::json;

use crate::errors::AppError;

/// Turns extractor failures into the standard `{success:false, error}`
/// envelope instead of actix's plain-text bodies.
pub fn config_routes(cfg: &mut web::ServiceConfig, upload_max_bytes: usize) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        JsonError::from(err).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        JsonError::from(err).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        JsonError::from(err).into()
    }))
    .app_data(web::FormConfig::default().error_handler(|err, _req| {
        JsonError::from(err).into()
    }))
    .app_data(
        MultipartFormConfig::default()
            // leave headroom for the multipart framing around the file
            .total_limit(upload_max_bytes + 64 * 1024)
            .memory_limit(upload_max_bytes)
            .error_handler(|err, _req| AppError::from(err).into()),
    );
}

#[derive(Debug)]
pub struct JsonError {
    message: String,
    status: StatusCode
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HttpResponse::build(self.status).json(json!({ "success": false, "error": self.message }))
    }
}

impl From<JsonPayloadError> for JsonError {
    fn from(err: JsonPayloadError) -> Self {
        let status = match err {
            JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            JsonPayloadError::ContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::BAD_REQUEST,
        };
        JsonError {
            message: format!("JSON payload error: {}", err),
            status,
        }
    }
}

impl From<QueryPayloadError> for JsonError {
    fn from(err: QueryPayloadError) -> Self {
        JsonError {
            message: format!("Invalid query string: {}", err),
            status: StatusCode::BAD_REQUEST,
        }
    }
}

impl From<PathError> for JsonError {
    fn from(err: PathError) -> Self {
        JsonError {
            message: format!("Invalid path: {}", err),
            status: StatusCode::BAD_REQUEST,
        }
    }
}

impl From<UrlencodedError> for JsonError {
    fn from(err: UrlencodedError) -> Self {
        JsonError {
            message: format!("Invalid form body: {}", err),
            status: StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_errors_are_415() {
        let err = JsonError::from(JsonPayloadError::ContentType);
        assert_eq!(err.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
