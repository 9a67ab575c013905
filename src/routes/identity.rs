//! Caller identity extraction from the trust headers set by the fronting
//! auth proxy. The backend never sees credentials, only the proxy's verdict.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};

use crate::{error::AppError, services::access::Identity};

/// Header carrying the authenticated user's identifier.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header set truthy when the user holds the administrator role.
pub const USER_ADMIN_HEADER: &str = "x-user-admin";
/// Header set truthy once the user's email address is verified.
pub const USER_VERIFIED_HEADER: &str = "x-user-verified";

fn header_flag(headers: &HeaderMap, name: &str) -> bool {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| matches!(value.trim(), "1" | "true"))
}

fn identity_from_headers(headers: &HeaderMap) -> Option<Identity> {
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())?;

    Some(Identity {
        user_id: user_id.to_owned(),
        is_admin: header_flag(headers, USER_ADMIN_HEADER),
        email_verified: header_flag(headers, USER_VERIFIED_HEADER),
    })
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        identity_from_headers(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))
    }
}

/// Optional variant for routes that serve anonymous callers too.
pub struct MaybeIdentity(pub Option<Identity>);

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeIdentity(identity_from_headers(&parts.headers)))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(entries: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in entries {
            map.insert(
                axum::http::HeaderName::try_from(*name).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn test_full_identity_parsed() {
        let map = headers(&[
            (USER_ID_HEADER, "user-1"),
            (USER_ADMIN_HEADER, "true"),
            (USER_VERIFIED_HEADER, "1"),
        ]);

        let identity = identity_from_headers(&map).unwrap();
        assert_eq!(identity.user_id, "user-1");
        assert!(identity.is_admin);
        assert!(identity.email_verified);
    }

    #[test]
    fn test_flags_default_to_false() {
        let map = headers(&[(USER_ID_HEADER, "user-1")]);

        let identity = identity_from_headers(&map).unwrap();
        assert!(!identity.is_admin);
        assert!(!identity.email_verified);
    }

    #[test]
    fn test_unknown_flag_values_are_false() {
        let map = headers(&[(USER_ID_HEADER, "user-1"), (USER_ADMIN_HEADER, "yes")]);

        let identity = identity_from_headers(&map).unwrap();
        assert!(!identity.is_admin);
    }

    #[test]
    fn test_blank_user_id_yields_no_identity() {
        let map = headers(&[(USER_ID_HEADER, "   ")]);
        assert!(identity_from_headers(&map).is_none());
    }

    #[test]
    fn test_missing_user_id_yields_no_identity() {
        let map = headers(&[(USER_ADMIN_HEADER, "true")]);
        assert!(identity_from_headers(&map).is_none());
    }
}
