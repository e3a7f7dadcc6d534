use super::dto::ErrorBody;
use crate::error::{AuthorizationFailure, EntitlementError, ValidationFailure};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

impl EntitlementError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Authorization { reason: AuthorizationFailure::Unauthenticated, .. } => {
                StatusCode::UNAUTHORIZED
            },
            Self::Authorization { .. } => StatusCode::FORBIDDEN,
            Self::Catalog { .. } | Self::Store { .. } | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    fn body(&self) -> ErrorBody {
        let mut body = ErrorBody {
            error: self.kind().to_owned(),
            message: self.to_string(),
            code: None,
            missing: None,
            conflicts: None,
            dependents: None,
            required: None,
        };

        match self {
            Self::NotFound { code, .. } => body.code = Some(code.clone()),
            Self::Validation { code, reason, .. } => {
                body.code = Some(code.clone());
                match reason {
                    ValidationFailure::MissingDependencies { missing } => {
                        body.missing = Some(missing.clone());
                    },
                    ValidationFailure::Conflicts { conflicts } => {
                        body.conflicts = Some(conflicts.clone());
                    },
                    ValidationFailure::HasDependents { dependents } => {
                        body.dependents = Some(dependents.clone());
                    },
                    ValidationFailure::Inactive | ValidationFailure::Protected => {},
                }
            },
            Self::Authorization {
                reason: AuthorizationFailure::MissingCapabilities { required, missing },
                ..
            } => {
                body.required = Some(required.clone());
                body.missing = Some(missing.clone());
            },
            Self::Store { .. } | Self::Catalog { .. } | Self::Internal { .. } => {
                body.message = "Internal server error".to_owned();
            },
            Self::Authorization { .. } => {},
        }
        body
    }
}

impl IntoResponse for EntitlementError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Entitlement request failed");
        } else {
            warn!(kind = self.kind(), error = %self, "Entitlement request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[test]
    fn statuses() {
        assert_eq!(EntitlementError::not_found("CRM.X".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            EntitlementError::validation("CRM.X".into(), ValidationFailure::Protected).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            EntitlementError::unauthorized(AuthorizationFailure::Unauthenticated).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            EntitlementError::unauthorized(AuthorizationFailure::InsufficientRole {
                role: bizhub_domain::identity::Role::Member,
            })
            .status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn internal_details_are_not_leaked() {
        let err = EntitlementError::from(StoreError::Unavailable {
            message: "connection refused on 10.0.0.3".into(),
            context: None,
        });
        let body = err.body();
        assert_eq!(body.error, "store");
        assert_eq!(body.message, "Internal server error");
    }

    #[test]
    fn payload_lists_offending_codes() {
        let body = EntitlementError::validation(
            "CRM.SEGMENTS".into(),
            ValidationFailure::HasDependents { dependents: vec!["CRM.EXPORT".into()] },
        )
        .body();

        assert_eq!(body.error, "has_dependents");
        assert_eq!(body.code.as_ref().map(|c| c.as_str()), Some("CRM.SEGMENTS"));
        assert_eq!(body.dependents, Some(vec!["CRM.EXPORT".into()]));
        assert!(body.missing.is_none());
    }
}
