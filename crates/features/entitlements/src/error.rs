use crate::store::StoreError;
use bizhub_domain::identity::Role;
use bizhub_domain::submodule::SubmoduleCode;
use std::borrow::Cow;
use std::fmt::Write as _;

/// Entitlement engine error type.
#[bizhub_derive::bizhub_error]
pub enum EntitlementError {
    #[error("Unknown submodule '{code}'{}", format_context(.context))]
    NotFound { code: SubmoduleCode, context: Option<Cow<'static, str>> },

    #[error("{reason}{}", format_context(.context))]
    Validation {
        code: SubmoduleCode,
        reason: ValidationFailure,
        context: Option<Cow<'static, str>>,
    },

    #[error("{reason}{}", format_context(.context))]
    Authorization { reason: AuthorizationFailure, context: Option<Cow<'static, str>> },

    #[error("Invalid catalog{}: {message}", format_context(.context))]
    Catalog { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Entitlement store error{}: {source}", format_context(.context))]
    Store { source: StoreError, context: Option<Cow<'static, str>> },

    #[error("Entitlement error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Why a mutation was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ValidationFailure {
    #[error("Submodule is inactive and cannot be enabled")]
    Inactive,

    #[error("Missing required submodules: {}", join(.missing))]
    MissingDependencies { missing: Vec<SubmoduleCode> },

    #[error("Conflicts with enabled submodules: {}", join(.conflicts))]
    Conflicts { conflicts: Vec<SubmoduleCode> },

    #[error("Submodule is enabled by default and cannot be disabled")]
    Protected,

    #[error("Required by enabled submodules: {}", join(.dependents))]
    HasDependents { dependents: Vec<SubmoduleCode> },
}

/// Why a gated call was denied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum AuthorizationFailure {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Role '{role}' cannot manage entitlements")]
    InsufficientRole { role: Role },

    #[error("Missing required submodules: {}", join(.missing))]
    MissingCapabilities { required: Vec<SubmoduleCode>, missing: Vec<SubmoduleCode> },
}

impl EntitlementError {
    pub(crate) fn not_found(code: SubmoduleCode) -> Self {
        Self::NotFound { code, context: None }
    }

    pub(crate) fn validation(code: SubmoduleCode, reason: ValidationFailure) -> Self {
        Self::Validation { code, reason, context: None }
    }

    pub(crate) fn unauthorized(reason: AuthorizationFailure) -> Self {
        Self::Authorization { reason, context: None }
    }

    pub(crate) fn catalog(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Catalog { message: message.into(), context: None }
    }

    /// Stable machine-readable kind used in HTTP payloads and logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Validation { reason, .. } => reason.into(),
            Self::Authorization { reason, .. } => reason.into(),
            Self::Catalog { .. } => "catalog",
            Self::Store { .. } => "store",
            Self::Internal { .. } => "internal",
        }
    }
}

pub(crate) fn join(codes: &[SubmoduleCode]) -> String {
    let mut out = String::new();
    for (i, code) in codes.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{code}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_list_codes() {
        let err = EntitlementError::validation(
            "CRM.EXPORT".into(),
            ValidationFailure::MissingDependencies {
                missing: vec!["CRM.SEGMENTS".into(), "CRM.TAGS".into()],
            },
        );
        assert_eq!(err.to_string(), "Missing required submodules: CRM.SEGMENTS, CRM.TAGS");
        assert_eq!(err.kind(), "missing_dependencies");
    }

    #[test]
    fn kinds_are_snake_case() {
        assert_eq!(
            EntitlementError::unauthorized(AuthorizationFailure::MissingCapabilities {
                required: vec![],
                missing: vec![],
            })
            .kind(),
            "missing_capabilities"
        );
        assert_eq!(EntitlementError::not_found("X.Y".into()).kind(), "not_found");
        assert_eq!(EntitlementError::from("boom").kind(), "internal");
    }
}
