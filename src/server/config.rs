//! Server configuration from environment variables.

#[cfg(feature = "server")]
pub fn db_path() -> String {
    std::env::var("PLACEMENTCELL_DB_PATH").unwrap_or_else(|_| "placementcell_data".to_string())
}

/// Public base URL of this deployment, used as JWT issuer/audience and as
/// the OAuth redirect base.
#[cfg(feature = "server")]
pub fn public_url() -> String {
    std::env::var("PLACEMENTCELL_PUBLIC_URL")
        .unwrap_or_else(|_| "http://localhost:8080".to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Google OAuth client credentials. Federated login is disabled when unset.
#[cfg(feature = "server")]
pub fn google_oauth() -> Option<(String, String)> {
    let id = std::env::var("PLACEMENTCELL_GOOGLE_CLIENT_ID").ok()?;
    let secret = std::env::var("PLACEMENTCELL_GOOGLE_CLIENT_SECRET").ok()?;
    if id.is_empty() || secret.is_empty() {
        return None;
    }
    Some((id, secret))
}
