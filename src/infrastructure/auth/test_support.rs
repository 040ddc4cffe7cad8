//! RSA signing keys and token minting for tests

use std::sync::OnceLock;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use jsonwebtoken::jwk::{Jwk, JwkSet};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use rand::rngs::OsRng;
use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use serde_json::{json, Value};

/// An RS256 key pair published under a key identifier
pub struct TestKey {
    pub kid: String,
    pub jwk: Jwk,
    encoding_key: EncodingKey,
}

impl TestKey {
    pub fn generate(kid: &str) -> Self {
        let private_key = RsaPrivateKey::new(&mut OsRng, 2048).unwrap();
        let pem = private_key.to_pkcs1_pem(rsa::pkcs1::LineEnding::LF).unwrap();
        let encoding_key = EncodingKey::from_rsa_pem(pem.as_bytes()).unwrap();

        let n = URL_SAFE_NO_PAD.encode(private_key.n().to_bytes_be());
        let e = URL_SAFE_NO_PAD.encode(private_key.e().to_bytes_be());

        let jwk: Jwk = serde_json::from_value(json!({
            "kty": "RSA",
            "kid": kid,
            "alg": "RS256",
            "use": "sig",
            "n": n,
            "e": e
        }))
        .unwrap();

        Self {
            kid: kid.to_string(),
            jwk,
            encoding_key,
        }
    }

    /// Sign claims with this key, naming it in the header
    pub fn sign(&self, claims: &Value) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(self.kid.clone());
        encode(&header, claims, &self.encoding_key).unwrap()
    }

    /// Sign claims with this key but claim a different `kid` in the header
    pub fn sign_as(&self, kid: &str, claims: &Value) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(kid.to_string());
        encode(&header, claims, &self.encoding_key).unwrap()
    }

    /// Sign claims without any key identifier in the header
    pub fn sign_without_kid(&self, claims: &Value) -> String {
        encode(&Header::new(Algorithm::RS256), claims, &self.encoding_key).unwrap()
    }
}

// RSA key generation is slow in debug builds, so every test shares these
pub fn key_a() -> &'static TestKey {
    static KEY: OnceLock<TestKey> = OnceLock::new();
    KEY.get_or_init(|| TestKey::generate("key-a"))
}

pub fn key_b() -> &'static TestKey {
    static KEY: OnceLock<TestKey> = OnceLock::new();
    KEY.get_or_init(|| TestKey::generate("key-b"))
}

pub fn jwk_set(keys: &[&TestKey]) -> JwkSet {
    JwkSet {
        keys: keys.iter().map(|k| k.jwk.clone()).collect(),
    }
}

/// Identity provider style claims expiring `valid_for_secs` from now
pub fn user_claims(sub: &str, valid_for_secs: i64) -> Value {
    let now = Utc::now();

    json!({
        "sub": sub,
        "aud": "authenticated",
        "role": "authenticated",
        "email": format!("{}@example.com", sub),
        "iat": now.timestamp(),
        "exp": (now + Duration::seconds(valid_for_secs)).timestamp(),
        "app_metadata": { "provider": "email", "providers": ["email"] }
    })
}
