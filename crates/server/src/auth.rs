//! Signed-in user extraction from request headers.
//!
//! The ruler sits behind an authenticating proxy that forwards the caller's
//! identity as headers. Only the organization is mandatory; the rest fall
//! back to an anonymous viewer.

use axum::http::HeaderMap;

use ruler_core::{OrgId, OrgRole, SignedInUser, UserId};

use crate::error::ApiError;

pub const ORG_ID_HEADER: &str = "x-org-id";
pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_LOGIN_HEADER: &str = "x-user-login";
pub const ORG_ROLE_HEADER: &str = "x-org-role";

const ANONYMOUS_LOGIN: &str = "anonymous";

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, ApiError> {
    match headers.get(name) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .map(|s| Some(s.trim()))
            .map_err(|_| ApiError::unauthorized(format!("invalid {name} header"))),
    }
}

/// Build the [`SignedInUser`] for a request, or reject it with `401`.
pub fn extract_user(headers: &HeaderMap) -> Result<SignedInUser, ApiError> {
    let org_id: OrgId = header_str(headers, ORG_ID_HEADER)?
        .ok_or_else(|| ApiError::unauthorized(format!("missing {ORG_ID_HEADER} header")))?
        .parse()
        .map_err(|_| ApiError::unauthorized(format!("invalid {ORG_ID_HEADER} header")))?;

    let user_id: UserId = match header_str(headers, USER_ID_HEADER)? {
        Some(raw) => raw
            .parse()
            .map_err(|_| ApiError::unauthorized(format!("invalid {USER_ID_HEADER} header")))?,
        None => 0,
    };

    let login = header_str(headers, USER_LOGIN_HEADER)?
        .filter(|s| !s.is_empty())
        .unwrap_or(ANONYMOUS_LOGIN);

    let org_role: OrgRole = match header_str(headers, ORG_ROLE_HEADER)? {
        Some(raw) => raw
            .parse()
            .map_err(|_| ApiError::unauthorized(format!("invalid {ORG_ROLE_HEADER} header")))?,
        None => OrgRole::default(),
    };

    Ok(SignedInUser::new(user_id, org_id, login, org_role))
}
