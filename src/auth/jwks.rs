use jsonwebtoken::{Algorithm, DecodingKey, TokenData, Validation, decode, decode_header};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::jwt::Claims;

/// One public signing key of the Supabase project, cached by `kid`.
///
/// Projects on asymmetric signing keys publish EC (P-256) keys by default;
/// RSA keys are accepted as well.
#[derive(Clone, Debug, PartialEq)]
enum SigningKey {
    Ec { x: String, y: String, algorithm: Algorithm },
    Rsa { n: String, e: String },
}

impl SigningKey {
    fn algorithm(&self) -> Algorithm {
        match self {
            SigningKey::Ec { algorithm, .. } => *algorithm,
            SigningKey::Rsa { .. } => Algorithm::RS256,
        }
    }

    fn decoding_key(&self) -> Result<DecodingKey, String> {
        match self {
            SigningKey::Ec { x, y, .. } => DecodingKey::from_ec_components(x, y),
            SigningKey::Rsa { n, e } => DecodingKey::from_rsa_components(n, e),
        }
        .map_err(|e| format!("Failed to create decoding key: {e}"))
    }
}

#[derive(Clone)]
pub struct JwksCache {
    cache: Arc<Cache<String, SigningKey>>,
    jwks_url: String,
    client: reqwest::Client,
    anon_key: String,
}

impl JwksCache {
    pub fn new(supabase_url: &str, anon_key: &str) -> Self {
        let cache = Arc::new(
            Cache::builder()
                .time_to_live(Duration::from_secs(3600))
                .max_capacity(10)
                .build(),
        );

        Self {
            cache,
            jwks_url: format!("{supabase_url}/auth/v1/.well-known/jwks.json"),
            client: reqwest::Client::new(),
            anon_key: anon_key.to_string(),
        }
    }

    async fn fetch_jwks(&self) -> Result<serde_json::Value, String> {
        debug!(url = %self.jwks_url, "Fetching JWKS");

        let response = self
            .client
            .get(&self.jwks_url)
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(|e| format!("Failed to fetch JWKS: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("Failed to fetch JWKS: HTTP {status}"));
        }

        response
            .json()
            .await
            .map_err(|e| format!("Failed to parse JWKS JSON: {e}"))
    }

    /// Keys are fetched again only for a `kid` not seen yet (or expired), which
    /// also picks up rotated keys.
    async fn signing_key(&self, kid: &str) -> Result<SigningKey, String> {
        if let Some(cached) = self.cache.get(kid).await {
            return Ok(cached);
        }

        let jwks = self.fetch_jwks().await?;
        let key = parse_key(&jwks, kid)?;

        self.cache.insert(kid.to_string(), key.clone()).await;
        Ok(key)
    }

    pub async fn validate_token(&self, token: &str) -> Result<TokenData<Claims>, String> {
        let header = decode_header(token).map_err(|e| format!("Failed to decode header: {e}"))?;
        let kid = header.kid.ok_or("No 'kid' in token header")?;

        let key = self.signing_key(&kid).await?;
        if header.alg != key.algorithm() {
            return Err(format!(
                "Token algorithm {:?} does not match key {kid}",
                header.alg
            ));
        }

        let mut validation = Validation::new(key.algorithm());
        validation.validate_aud = false;

        decode::<Claims>(token, &key.decoding_key()?, &validation)
            .map_err(|e| format!("Token validation failed: {e}"))
    }
}

fn parse_key(jwks: &serde_json::Value, kid: &str) -> Result<SigningKey, String> {
    let keys = jwks["keys"].as_array().ok_or("No keys in JWKS")?;

    let key = keys
        .iter()
        .find(|k| k["kid"].as_str() == Some(kid))
        .ok_or(format!("Key with kid={kid} not found in JWKS"))?;

    let component = |name: &str| {
        key[name]
            .as_str()
            .map(str::to_string)
            .ok_or(format!("Missing '{name}' in JWK"))
    };

    match key["kty"].as_str() {
        Some("RSA") => Ok(SigningKey::Rsa {
            n: component("n")?,
            e: component("e")?,
        }),
        Some("EC") | None => Ok(SigningKey::Ec {
            x: component("x")?,
            y: component("y")?,
            algorithm: match key["alg"].as_str() {
                Some("ES384") => Algorithm::ES384,
                _ => Algorithm::ES256,
            },
        }),
        Some(other) => Err(format!("Unsupported key type '{other}' in JWK")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_key_picks_matching_kid() {
        let jwks = serde_json::json!({
            "keys": [
                { "kid": "a", "kty": "EC", "x": "xa", "y": "ya", "alg": "ES256" },
                { "kid": "b", "kty": "EC", "x": "xb", "y": "yb", "alg": "ES384" },
                { "kid": "c", "kty": "RSA", "n": "nc", "e": "AQAB", "alg": "RS256" }
            ]
        });

        let key = parse_key(&jwks, "b").unwrap();
        assert_eq!(
            key,
            SigningKey::Ec {
                x: "xb".into(),
                y: "yb".into(),
                algorithm: Algorithm::ES384
            }
        );

        let key = parse_key(&jwks, "c").unwrap();
        assert_eq!(key.algorithm(), Algorithm::RS256);
    }

    #[test]
    fn parse_key_reports_missing_parts() {
        let jwks = serde_json::json!({
            "keys": [
                { "kid": "a", "x": "xa" },
                { "kid": "o", "kty": "OKP", "x": "xo" }
            ]
        });

        assert!(parse_key(&jwks, "z").unwrap_err().contains("kid=z"));
        assert!(parse_key(&jwks, "a").unwrap_err().contains("'y'"));
        assert!(parse_key(&jwks, "o").unwrap_err().contains("OKP"));
        assert!(parse_key(&serde_json::json!({}), "a").is_err());
    }
}
