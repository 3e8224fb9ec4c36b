use crate::error::AppError;

/// Default issuer: Google, the portal's identity provider.
const DEFAULT_ISSUER: &str = "https://accounts.google.com";

/// OIDC configuration read from environment variables.
#[derive(Debug, Clone)]
pub struct OidcConfig {
    /// The OIDC issuer URL.
    pub issuer_url: String,
    /// The OAuth2 client ID.
    pub client_id: String,
    /// The OAuth2 client secret.
    pub client_secret: String,
    /// The redirect URI after sign-in completes.
    pub redirect_uri: String,
}

impl OidcConfig {
    /// Whether sign-in is configured at all.
    ///
    /// When false the auth routes answer with an error instead of
    /// redirecting to the provider.
    pub fn is_configured() -> bool {
        std::env::var("OIDC_CLIENT_ID").is_ok()
    }

    /// Build the OIDC config from environment variables.
    ///
    /// Required env vars:
    /// - `OIDC_CLIENT_ID`
    /// - `OIDC_CLIENT_SECRET`
    /// - `OIDC_REDIRECT_URI`
    ///
    /// `OIDC_ISSUER_URL` is optional and defaults to Google.
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            issuer_url: std::env::var("OIDC_ISSUER_URL")
                .unwrap_or_else(|_| DEFAULT_ISSUER.to_string()),
            client_id: std::env::var("OIDC_CLIENT_ID")
                .map_err(|_| AppError::Auth("OIDC_CLIENT_ID not set".into()))?,
            client_secret: std::env::var("OIDC_CLIENT_SECRET")
                .map_err(|_| AppError::Auth("OIDC_CLIENT_SECRET not set".into()))?,
            redirect_uri: std::env::var("OIDC_REDIRECT_URI")
                .map_err(|_| AppError::Auth("OIDC_REDIRECT_URI not set".into()))?,
        })
    }

    /// Build with explicit values (useful for testing).
    pub fn new(
        issuer_url: String,
        client_id: String,
        client_secret: String,
        redirect_uri: String,
    ) -> Self {
        Self {
            issuer_url,
            client_id,
            client_secret,
            redirect_uri,
        }
    }
}
