//! Test-only JWT token generation.
//!
//! `TestJwt` mints tokens signed with a fixed HS256 secret so integration
//! tests can exercise guard/identity-checking controllers without standing
//! up a real issuer or JWKS endpoint. Claim names match what
//! [`r2e_core::Identity`](r2e_core::guards::Identity) expects: `sub`,
//! `roles`, plus `iat`/`exp`.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{Map, Value};

/// Mints HS256 tokens for tests. Every token shares one fixed secret, so
/// a `TestJwt` constructed anywhere in a test binary can mint tokens a
/// validator constructed with [`TestJwt::decoding_key`] (or the same
/// `secret`) will accept.
pub struct TestJwt {
    secret: String,
}

impl Default for TestJwt {
    fn default() -> Self {
        Self::new("test-secret")
    }
}

impl TestJwt {
    /// Create a minter using the given HMAC secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// The secret this minter signs with, for constructing a matching
    /// `jsonwebtoken::DecodingKey` in the code under test.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Start building a token for `sub`.
    pub fn token(&self, sub: impl Into<String>) -> TokenBuilder<'_> {
        TokenBuilder {
            jwt: self,
            sub: sub.into(),
            roles: Vec::new(),
            email: None,
            ttl_secs: 3600,
            extra: Map::new(),
        }
    }
}

/// Builds one token's claims before signing it.
pub struct TokenBuilder<'a> {
    jwt: &'a TestJwt,
    sub: String,
    roles: Vec<String>,
    email: Option<String>,
    ttl_secs: i64,
    extra: Map<String, Value>,
}

impl<'a> TokenBuilder<'a> {
    /// Attach roles (the `roles` claim `Identity::roles` reads).
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Attach an `email` claim.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Override the default one-hour expiry.
    pub fn with_ttl_secs(mut self, ttl_secs: i64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    /// Set an arbitrary extra claim.
    pub fn with_claim(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Sign and return the compact JWT string.
    pub fn sign(self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before unix epoch")
            .as_secs() as i64;

        let mut claims = self.extra;
        claims.insert("sub".into(), Value::String(self.sub));
        claims.insert(
            "roles".into(),
            Value::Array(self.roles.into_iter().map(Value::String).collect()),
        );
        if let Some(email) = self.email {
            claims.insert("email".into(), Value::String(email));
        }
        claims.insert("iat".into(), Value::Number(now.into()));
        claims.insert("exp".into(), Value::Number((now + self.ttl_secs).into()));

        encode(
            &Header::default(),
            &Value::Object(claims),
            &EncodingKey::from_secret(self.jwt.secret().as_bytes()),
        )
        .expect("signing a well-formed claim set never fails")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

    #[test]
    fn signed_token_round_trips_claims() {
        let jwt = TestJwt::default();
        let token = jwt
            .token("alice")
            .with_roles(["admin", "editor"])
            .with_email("alice@example.com")
            .sign();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience::<str>(&[]);
        validation.validate_aud = false;
        let decoded = decode::<Value>(
            &token,
            &DecodingKey::from_secret(jwt.secret().as_bytes()),
            &validation,
        )
        .unwrap();

        assert_eq!(decoded.claims["sub"], "alice");
        assert_eq!(decoded.claims["roles"][0], "admin");
        assert_eq!(decoded.claims["email"], "alice@example.com");
    }

    #[test]
    fn different_secrets_do_not_validate() {
        let jwt = TestJwt::new("secret-a");
        let token = jwt.token("bob").sign();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        let result = decode::<Value>(
            &token,
            &DecodingKey::from_secret(b"secret-b"),
            &validation,
        );
        assert!(result.is_err());
    }
}
