use super::{AuthError, Principal};
use axum::extract::{FromRequestParts, OptionalFromRequestParts, Request};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use bizhub_domain::constants::{ACTOR_ID_HEADER, ACTOR_ROLE_HEADER, TENANT_ID_HEADER};
use bizhub_domain::identity::{ActorId, Role, TenantId};
use std::str::FromStr;
use tracing::debug;

impl<S: Send + Sync> FromRequestParts<S> for Principal {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or_else(|| AuthError::Unauthenticated {
            message: "authentication required".into(),
            context: None,
        })
    }
}

impl<S: Send + Sync> OptionalFromRequestParts<S> for Principal {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned())
    }
}

/// Middleware turning gateway-provided identity headers into a [`Principal`].
///
/// Requests without `x-actor-id` pass through untouched (and fail later where a principal is
/// required). The role defaults to `member`.
///
/// Only mount this behind a gateway that authenticates callers and strips these headers from
/// client traffic.
pub async fn trusted_identity_headers(mut request: Request, next: Next) -> Response {
    match principal_from_headers(request.headers()) {
        Ok(Some(principal)) => {
            debug!(actor = %principal.actor_id, tenant = ?principal.tenant_id, "Resolved principal");
            request.extensions_mut().insert(principal);
            next.run(request).await
        },
        Ok(None) => next.run(request).await,
        Err(err) => err.into_response(),
    }
}

fn principal_from_headers(headers: &HeaderMap) -> Result<Option<Principal>, AuthError> {
    let Some(actor) = header_str(headers, ACTOR_ID_HEADER)? else {
        return Ok(None);
    };

    let tenant = header_str(headers, TENANT_ID_HEADER)?.map(TenantId::from);
    let role = match header_str(headers, ACTOR_ROLE_HEADER)? {
        Some(raw) => Role::from_str(raw).map_err(|_| AuthError::InvalidHeader {
            message: format!("unknown role '{raw}'").into(),
            context: Some(ACTOR_ROLE_HEADER.into()),
        })?,
        None => Role::Member,
    };

    Ok(Some(Principal { actor_id: ActorId::from(actor), tenant_id: tenant, role }))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<Option<&'a str>, AuthError> {
    let Some(value) = headers.get(name) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| AuthError::InvalidHeader {
        message: "header is not valid ASCII".into(),
        context: Some(name.into()),
    })?;
    let value = value.trim();
    Ok((!value.is_empty()).then_some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn no_actor_means_anonymous() {
        assert_eq!(principal_from_headers(&headers(&[(TENANT_ID_HEADER, "acme")])).unwrap(), None);
    }

    #[test]
    fn full_identity() {
        let principal = principal_from_headers(&headers(&[
            (ACTOR_ID_HEADER, "u-7"),
            (TENANT_ID_HEADER, "acme"),
            (ACTOR_ROLE_HEADER, "Admin"),
        ]))
        .unwrap()
        .unwrap();

        assert_eq!(principal.actor_id.as_str(), "u-7");
        assert_eq!(principal.tenant_id, Some(TenantId::from("acme")));
        assert_eq!(principal.role, Role::Admin);
    }

    #[test]
    fn role_defaults_to_member_and_rejects_unknown() {
        let principal =
            principal_from_headers(&headers(&[(ACTOR_ID_HEADER, "u-7")])).unwrap().unwrap();
        assert_eq!(principal.role, Role::Member);
        assert!(principal.tenant_id.is_none());

        let err = principal_from_headers(&headers(&[
            (ACTOR_ID_HEADER, "u-7"),
            (ACTOR_ROLE_HEADER, "superuser"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AuthError::InvalidHeader { .. }));
    }
}
