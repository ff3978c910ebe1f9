//! API key authentication middleware

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::User;

/// Extractor that requires a valid API key
///
/// Extracts the key from:
/// - Authorization header: `Bearer <api_key>`
/// - X-API-Key header
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let api_key = extract_api_key(&parts.headers)?;

        debug!("Validating API key");

        let user = state
            .user_service
            .get_by_api_key(&api_key)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::unauthorized("Invalid API key"))?;

        if user.banned() {
            return Err(ApiError::forbidden("Account is banned"));
        }

        Ok(RequireUser(user))
    }
}

/// Extract an API key from the Authorization or X-API-Key header
pub fn extract_api_key(headers: &HeaderMap) -> Result<String, ApiError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid Authorization header encoding"))?;

        if let Some(key) = auth_str.strip_prefix("Bearer ") {
            return Ok(key.trim().to_string());
        }
    }

    if let Some(key_header) = headers.get("X-API-Key") {
        let key = key_header
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid X-API-Key header encoding"))?;

        return Ok(key.trim().to_string());
    }

    Err(ApiError::unauthorized(
        "Authentication required. Provide an API key via 'Authorization: Bearer <key>' or 'X-API-Key' header",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_extract_bearer_key() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            "Bearer AAAA-BBBB-CCCC-DDDD".parse().unwrap(),
        );

        let result = extract_api_key(&headers);
        assert_eq!(result.unwrap(), "AAAA-BBBB-CCCC-DDDD");
    }

    #[test]
    fn test_extract_x_api_key_header() {
        let mut headers = HeaderMap::new();
        headers.insert("X-API-Key", "AAAA-BBBB-CCCC-DDDD".parse().unwrap());

        let result = extract_api_key(&headers);
        assert_eq!(result.unwrap(), "AAAA-BBBB-CCCC-DDDD");
    }

    #[test]
    fn test_missing_key() {
        let headers = HeaderMap::new();

        let err = extract_api_key(&headers).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_invalid_auth_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());

        assert!(extract_api_key(&headers).is_err());
    }

    #[test]
    fn test_trimmed_key() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            "Bearer   AAAA-BBBB-CCCC-DDDD   ".parse().unwrap(),
        );

        assert_eq!(extract_api_key(&headers).unwrap(), "AAAA-BBBB-CCCC-DDDD");
    }
}
