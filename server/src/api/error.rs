use std::collections::BTreeMap;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use foodgram_core::{MembershipError, SubscriptionError, ValidationErrors};
use serde::Serialize;
use utoipa::ToSchema;

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Field-level messages for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, Vec<String>>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fields: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(errors) => ErrorResponse {
                error: "Validation failed".to_string(),
                fields: Some(errors.into_fields()),
            },
            other => ErrorResponse::new(other.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            // `/api/recipes/abc` names no recipe
            PathRejection::FailedToDeserializePathParams(_) => ApiError::NotFound("Not found"),
            other => {
                tracing::error!("Path extraction failed: {}", other.body_text());
                ApiError::Internal("Failed to read path parameters")
            }
        }
    }
}

impl From<MembershipError> for ApiError {
    fn from(e: MembershipError) -> Self {
        match e {
            MembershipError::AlreadyMember(_) => ApiError::Conflict(e.to_string()),
            MembershipError::NotMember(_) => ApiError::BadRequest(e.to_string()),
            MembershipError::Store(store) => {
                tracing::error!("Membership store failed: {}", store);
                ApiError::Internal("Failed to update membership")
            }
        }
    }
}

impl From<SubscriptionError> for ApiError {
    fn from(e: SubscriptionError) -> Self {
        match e {
            SubscriptionError::SelfSubscription => {
                ApiError::Validation(ValidationErrors::single("author", e.to_string()))
            }
            SubscriptionError::AlreadySubscribed => ApiError::Conflict(e.to_string()),
            SubscriptionError::NotSubscribed => ApiError::BadRequest(e.to_string()),
            SubscriptionError::Store(store) => {
                tracing::error!("Subscription store failed: {}", store);
                ApiError::Internal("Failed to update subscription")
            }
        }
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::NotFound => ApiError::NotFound("Not found"),
            other => {
                tracing::error!("Database query failed: {}", other);
                ApiError::Internal("Database error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodgram_core::MembershipKind;

    #[test]
    fn test_membership_statuses() {
        let conflict: ApiError = MembershipError::AlreadyMember(MembershipKind::Favorite).into();
        assert_eq!(conflict.status(), StatusCode::CONFLICT);

        let missing: ApiError = MembershipError::NotMember(MembershipKind::ShoppingCart).into();
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
        assert_eq!(missing.to_string(), "Recipe is not in the shopping cart");
    }

    #[test]
    fn test_subscription_statuses() {
        let own: ApiError = SubscriptionError::SelfSubscription.into();
        assert_eq!(own.status(), StatusCode::BAD_REQUEST);
        assert!(matches!(own, ApiError::Validation(ref f) if f.has("author")));

        let dup: ApiError = SubscriptionError::AlreadySubscribed.into();
        assert_eq!(dup.status(), StatusCode::CONFLICT);

        let gone: ApiError = SubscriptionError::NotSubscribed.into();
        assert_eq!(gone.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_diesel_not_found() {
        let e: ApiError = diesel::result::Error::NotFound.into();
        assert_eq!(e.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_json_rejection_is_bad_request() {
        let e: ApiError = JsonRejection::from(axum::extract::rejection::MissingJsonContentType::default()).into();
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_body_omits_empty_fields() {
        let body = serde_json::to_value(ErrorResponse::new("Not found")).unwrap();
        assert_eq!(body, serde_json::json!({"error": "Not found"}));
    }
}
