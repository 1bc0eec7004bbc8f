//! Bearer-token gate: read the claims of an identity-provider token and resolve
//! the calling farmer. The signature is not verified here; the identity provider
//! issued the token and the farmer lookup is the authorization step.

use crate::error::AppError;
use crate::model::FarmerId;
use crate::store::MarketStore;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const BEARER_PREFIX: &str = "Bearer ";

/// The subset of token claims the gate reads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Claims {
    pub sub: Uuid,
    pub email: Option<String>,
}

#[derive(Deserialize)]
struct RawClaims {
    sub: Option<String>,
    email: Option<String>,
}

/// The authenticated farmer attached to a request.
#[derive(Clone, Debug, Serialize)]
pub struct AuthFarmer {
    pub user_id: Uuid,
    pub farmer_id: FarmerId,
    pub email: Option<String>,
    pub farmer_name: String,
    pub farmer_last_name: String,
}

/// Decode one base64 segment. Accepts the URL-safe and standard alphabets, with or without padding.
fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    let normalized: String = segment
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    URL_SAFE_NO_PAD.decode(normalized.as_bytes()).ok()
}

/// Parse the `Authorization` header value into claims. Fails before any lookup.
pub fn decode_claims(header: Option<&str>) -> Result<Claims, AppError> {
    let header = header.ok_or_else(|| AppError::Unauthorized("missing bearer token".into()))?;
    let token = header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".into()))?;

    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(AppError::Unauthorized("malformed token".into()));
    }
    let payload = decode_segment(segments[1])
        .ok_or_else(|| AppError::Unauthorized("malformed token payload".into()))?;
    let raw: RawClaims = serde_json::from_slice(&payload)
        .map_err(|_| AppError::Unauthorized("malformed token payload".into()))?;

    let sub = raw
        .sub
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::Unauthorized("token has no subject".into()))?;
    let sub = Uuid::parse_str(sub.trim()).map_err(|_| AppError::Unauthorized("token subject is not a user id".into()))?;
    Ok(Claims { sub, email: raw.email })
}

/// Resolve the caller: decode the claims, then require an `Active` farmer row for the subject.
pub async fn build_auth_context(store: &dyn MarketStore, header: Option<&str>) -> Result<AuthFarmer, AppError> {
    let claims = decode_claims(header)?;
    let farmer = store
        .farmer_by_auth_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("farmer not found".into()))?;
    if !farmer.is_active() {
        tracing::warn!(farmer_id = farmer.farmer_id, "inactive farmer rejected");
        return Err(AppError::Forbidden("account is not active".into()));
    }
    Ok(AuthFarmer {
        user_id: claims.sub,
        farmer_id: farmer.farmer_id,
        email: claims.email.or(Some(farmer.farmer_mail)),
        farmer_name: farmer.farmer_name,
        farmer_last_name: farmer.farmer_last_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::{STANDARD, URL_SAFE};

    fn token_with(payload: &serde_json::Value, engine: &impl Engine) -> String {
        format!("Bearer hdr.{}.sig", engine.encode(payload.to_string()))
    }

    #[test]
    fn decodes_subject_and_email() {
        let sub = Uuid::new_v4();
        let header = token_with(&serde_json::json!({ "sub": sub, "email": "a@b.c" }), &URL_SAFE_NO_PAD);
        let claims = decode_claims(Some(&header)).unwrap();
        assert_eq!(claims.sub, sub);
        assert_eq!(claims.email.as_deref(), Some("a@b.c"));
    }

    #[test]
    fn accepts_padded_and_standard_alphabets() {
        let sub = Uuid::new_v4();
        let payload = serde_json::json!({ "sub": sub, "email": "çiftçi@tarladan.app?>>" });
        for header in [token_with(&payload, &STANDARD), token_with(&payload, &URL_SAFE)] {
            assert_eq!(decode_claims(Some(&header)).unwrap().sub, sub);
        }
    }

    #[test]
    fn rejects_missing_or_malformed_header() {
        assert!(matches!(decode_claims(None), Err(AppError::Unauthorized(_))));
        assert!(matches!(decode_claims(Some("Token abc")), Err(AppError::Unauthorized(_))));
        assert!(matches!(decode_claims(Some("Bearer ")), Err(AppError::Unauthorized(_))));
        assert!(matches!(decode_claims(Some("Bearer a.b")), Err(AppError::Unauthorized(_))));
        assert!(matches!(decode_claims(Some("Bearer a.b.c.d")), Err(AppError::Unauthorized(_))));
        assert!(matches!(decode_claims(Some("Bearer a.!!!.c")), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn rejects_missing_subject() {
        let header = token_with(&serde_json::json!({ "email": "a@b.c" }), &URL_SAFE_NO_PAD);
        assert!(matches!(decode_claims(Some(&header)), Err(AppError::Unauthorized(_))));
        let header = token_with(&serde_json::json!({ "sub": "" }), &URL_SAFE_NO_PAD);
        assert!(matches!(decode_claims(Some(&header)), Err(AppError::Unauthorized(_))));
    }
}
