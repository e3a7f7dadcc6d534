use std::borrow::Cow;

/// Failures while establishing who is calling.
#[bizhub_derive::bizhub_error]
pub enum AuthError {
    #[error("Authentication required{}: {message}", format_context(.context))]
    Unauthenticated { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Forbidden{}: {message}", format_context(.context))]
    Forbidden { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid identity header{}: {message}", format_context(.context))]
    InvalidHeader { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl AuthError {
    /// Stable machine-readable kind used in HTTP payloads.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unauthenticated { .. } => "unauthenticated",
            Self::Forbidden { .. } => "forbidden",
            Self::InvalidHeader { .. } => "invalid_identity",
        }
    }
}

#[cfg(feature = "server")]
impl axum::response::IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status = match self {
            Self::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::InvalidHeader { .. } => StatusCode::BAD_REQUEST,
        };
        let body = serde_json::json!({ "error": self.kind(), "message": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
