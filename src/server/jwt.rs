//! Access-token helpers.
//!
//! - Access tokens are JWTs signed with RS256.
//! - For now we keep a dev keypair in-process (generated at startup).

#[cfg(feature = "server")]
use anyhow::{Context, Result};

#[cfg(feature = "server")]
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

#[cfg(feature = "server")]
use once_cell::sync::Lazy;

#[cfg(feature = "server")]
use rand::{rngs::OsRng, RngCore};

#[cfg(feature = "server")]
use serde::{Deserialize, Serialize};

/// Issued sessions stay valid this long.
#[cfg(feature = "server")]
pub const TOKEN_LIFETIME_DAYS: i64 = 30;

#[cfg(feature = "server")]
static DEV_RSA_KEYPAIR: Lazy<RsaKeyPair> = Lazy::new(|| {
    // Dev-only: generate a fresh RSA keypair at startup. This means tokens become invalid on restart.
    // For production, load keys from disk or KMS and rotate via `kid`.
    RsaKeyPair::generate().expect("generate RSA keypair")
});

#[cfg(feature = "server")]
struct RsaKeyPair {
    kid: String,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

#[cfg(feature = "server")]
impl RsaKeyPair {
    fn generate() -> Result<Self> {
        use rsa::pkcs1::{EncodeRsaPrivateKey, EncodeRsaPublicKey};

        let private = rsa::RsaPrivateKey::new(&mut OsRng, 2048)
            .map_err(|e| anyhow::anyhow!("generate rsa private key: {e}"))?;
        let public = rsa::RsaPublicKey::from(&private);

        // jsonwebtoken uses PKCS#1 PEM for RSA keys.
        let private_pem = private
            .to_pkcs1_pem(rsa::pkcs1::LineEnding::LF)
            .map_err(|e| anyhow::anyhow!("encode private key pem: {e}"))?;
        let public_pem = public
            .to_pkcs1_pem(rsa::pkcs1::LineEnding::LF)
            .map_err(|e| anyhow::anyhow!("encode public key pem: {e}"))?;

        let encoding = EncodingKey::from_rsa_pem(private_pem.as_bytes()).context("encoding key")?;
        let decoding = DecodingKey::from_rsa_pem(public_pem.as_bytes()).context("decoding key")?;

        // kid: short random; good enough for dev.
        let mut kid_bytes = [0u8; 8];
        OsRng.fill_bytes(&mut kid_bytes);
        let kid = hex::encode(kid_bytes);

        Ok(Self {
            kid,
            encoding,
            decoding,
        })
    }
}

/// Claims carried by portal access tokens.
#[cfg(feature = "server")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub email: String,
    pub exp: usize,
    pub iat: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

/// Issue a JWT access token for a local user. Returns the token and its
/// expiry instant.
#[cfg(feature = "server")]
pub fn issue_access_token(
    user_id: &str,
    email: &str,
) -> Result<(String, chrono::DateTime<chrono::Utc>)> {
    let issuer = super::config::public_url();
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::days(TOKEN_LIFETIME_DAYS);

    let claims = AccessTokenClaims {
        iss: issuer.clone(),
        sub: user_id.to_string(),
        aud: issuer,
        email: email.to_string(),
        iat: now.timestamp() as usize,
        exp: expires_at.timestamp() as usize,
        jti: Some(uuid::Uuid::new_v4().to_string()),
    };

    let mut header = Header::new(Algorithm::RS256);
    header.typ = Some("JWT".to_string());
    header.kid = Some(DEV_RSA_KEYPAIR.kid.clone());

    let token =
        jsonwebtoken::encode(&header, &claims, &DEV_RSA_KEYPAIR.encoding).context("encode jwt")?;
    Ok((token, expires_at))
}

/// Validate an incoming JWT and return claims.
#[cfg(feature = "server")]
pub fn validate_access_token(token: &str) -> Result<AccessTokenClaims> {
    let issuer = super::config::public_url();
    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[issuer.clone()]);
    validation.set_issuer(&[issuer]);

    let data =
        jsonwebtoken::decode::<AccessTokenClaims>(token, &DEV_RSA_KEYPAIR.decoding, &validation)
            .context("decode jwt")?;
    Ok(data.claims)
}
