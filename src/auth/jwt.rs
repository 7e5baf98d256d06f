use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::{Claims, TokenType};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

fn issue(
    token_type: TokenType,
    user_id: u64,
    username: String,
    role: u8,
    intern_id: Option<u64>,
    supervisor_id: Option<u64>,
    secret: &str,
    ttl: usize,
) -> (String, Claims) {
    let claims = Claims {
        user_id,
        sub: username,
        role,
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
        token_type,
        intern_id,
        supervisor_id,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap();

    (token, claims)
}

pub fn generate_access_token(
    user_id: u64,
    username: String,
    role: u8,
    intern_id: Option<u64>,
    supervisor_id: Option<u64>,
    secret: &str,
    ttl: usize,
) -> String {
    issue(
        TokenType::Access,
        user_id,
        username,
        role,
        intern_id,
        supervisor_id,
        secret,
        ttl,
    )
    .0
}

/// Returns the claims too so the caller can store the jti server-side.
pub fn generate_refresh_token(
    user_id: u64,
    username: String,
    role: u8,
    intern_id: Option<u64>,
    supervisor_id: Option<u64>,
    secret: &str,
    ttl: usize,
) -> (String, Claims) {
    issue(
        TokenType::Refresh,
        user_id,
        username,
        role,
        intern_id,
        supervisor_id,
        secret,
        ttl,
    )
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn access_token_round_trips() {
        let token = generate_access_token(7, "rani.putri".into(), 3, Some(42), None, SECRET, 900);
        let claims = verify_token(&token, SECRET).unwrap();

        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.sub, "rani.putri");
        assert_eq!(claims.role, 3);
        assert_eq!(claims.intern_id, Some(42));
        assert_eq!(claims.supervisor_id, None);
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn refresh_token_reports_its_jti() {
        let (token, issued) =
            generate_refresh_token(8, "budi".into(), 2, None, Some(3), SECRET, 3600);
        let claims = verify_token(&token, SECRET).unwrap();

        assert_eq!(claims.jti, issued.jti);
        assert_eq!(claims.token_type, TokenType::Refresh);
        assert_eq!(claims.supervisor_id, Some(3));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_access_token(7, "rani.putri".into(), 3, None, None, SECRET, 900);
        assert!(verify_token(&token, "some-other-secret").is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(verify_token("definitely.not.a-jwt", SECRET).is_err());
    }
}
