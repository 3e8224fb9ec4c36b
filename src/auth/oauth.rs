use axum::extract::{Query, State};
use axum::response::Redirect;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use openidconnect::core::{CoreClient, CoreProviderMetadata, CoreResponseType};
use openidconnect::reqwest::async_http_client;
use openidconnect::{
    AuthenticationFlow, AuthorizationCode, ClientId, ClientSecret, CsrfToken, IssuerUrl, Nonce,
    RedirectUrl, Scope, TokenResponse,
};
use serde::Deserialize;

use crate::auth::config::OidcConfig;
use crate::auth::events::AuthEvent;
use crate::auth::session;
use crate::error::AppError;
use crate::models::user::{build_user, User};
use crate::state::AppState;

/// Short-lived cookie carrying the CSRF state across the redirect.
const STATE_COOKIE: &str = "courseboard_oauth_state";
/// Short-lived cookie carrying the ID-token nonce across the redirect.
const NONCE_COOKIE: &str = "courseboard_oauth_nonce";

/// The OIDC client for the Google sign-in flow.
pub struct AuthClient {
    client: CoreClient,
}

impl AuthClient {
    /// Discover the provider and build the client.
    pub async fn discover(config: OidcConfig) -> Result<Self, AppError> {
        let issuer = IssuerUrl::new(config.issuer_url)
            .map_err(|e| AppError::Auth(format!("Invalid issuer URL: {}", e)))?;

        let provider_metadata = CoreProviderMetadata::discover_async(issuer, async_http_client)
            .await
            .map_err(|e| AppError::Auth(format!("OIDC discovery failed: {}", e)))?;

        let redirect = RedirectUrl::new(config.redirect_uri)
            .map_err(|e| AppError::Auth(format!("Invalid redirect URL: {}", e)))?;

        let client = CoreClient::from_provider_metadata(
            provider_metadata,
            ClientId::new(config.client_id),
            Some(ClientSecret::new(config.client_secret)),
        )
        .set_redirect_uri(redirect);

        Ok(Self { client })
    }

    /// The provider authorization URL plus the state/nonce to verify later.
    pub fn auth_url(&self) -> (url::Url, CsrfToken, Nonce) {
        self.client
            .authorize_url(
                AuthenticationFlow::<CoreResponseType>::AuthorizationCode,
                CsrfToken::new_random,
                Nonce::new_random,
            )
            .add_scope(Scope::new("openid".to_string()))
            .add_scope(Scope::new("profile".to_string()))
            .add_scope(Scope::new("email".to_string()))
            .url()
    }
}

fn flow_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn expire_flow_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, "")).path("/").removal().build()
}

/// `GET /api/auth/login` — redirect to the identity provider.
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    let auth = state
        .oauth
        .as_ref()
        .ok_or_else(|| AppError::Auth("Google sign-in is not configured".into()))?;

    let (auth_url, csrf_token, nonce) = auth.auth_url();

    let jar = jar
        .add(flow_cookie(STATE_COOKIE, csrf_token.secret().clone()))
        .add(flow_cookie(NONCE_COOKIE, nonce.secret().clone()));

    Ok((jar, Redirect::to(auth_url.as_str())))
}

#[derive(Debug, Deserialize)]
pub struct AuthCallbackQuery {
    pub code: String,
    pub state: String,
}

/// `GET /api/auth/callback` — complete the sign-in.
///
/// Verifies the CSRF state, exchanges the code, verifies the ID token,
/// and stores the derived user in the session cookie. Admin status comes
/// from allow-list membership, decided here and nowhere else.
pub async fn callback_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<AuthCallbackQuery>,
) -> Result<(CookieJar, Redirect), AppError> {
    let auth = state
        .oauth
        .as_ref()
        .ok_or_else(|| AppError::Auth("Google sign-in is not configured".into()))?;

    let stored_state = jar
        .get(STATE_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| AppError::Auth("Missing sign-in state".into()))?;
    if stored_state != query.state {
        return Err(AppError::Auth("Sign-in state mismatch".into()));
    }

    let stored_nonce = jar
        .get(NONCE_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| AppError::Auth("Missing sign-in nonce".into()))?;

    let token_response = auth
        .client
        .exchange_code(AuthorizationCode::new(query.code))
        .request_async(async_http_client)
        .await
        .map_err(|e| AppError::Auth(format!("Code exchange failed: {}", e)))?;

    let id_token = token_response
        .id_token()
        .ok_or_else(|| AppError::Auth("Provider returned no ID token".into()))?;

    let claims = id_token
        .claims(&auth.client.id_token_verifier(), &Nonce::new(stored_nonce))
        .map_err(|e| AppError::Auth(format!("ID token verification failed: {}", e)))?;

    let email = claims
        .email()
        .map(|email| email.as_str().to_string())
        .ok_or_else(|| AppError::Auth("ID token carries no email".into()))?;
    let display_name = claims
        .name()
        .and_then(|name| name.get(None))
        .map(|name| name.as_str().to_string());

    let user = build_user(
        claims.subject().as_str().to_string(),
        email,
        display_name,
        &state.admins,
    );

    state.auth_events.publish(AuthEvent::SignedIn(user.clone()));

    let jar = jar
        .remove(expire_flow_cookie(STATE_COOKIE))
        .remove(expire_flow_cookie(NONCE_COOKIE))
        .add(session::user_cookie(&user)?);

    Ok((jar, Redirect::to("/")))
}

/// `GET /api/auth/me` — the signed-in user.
pub async fn me_handler(jar: CookieJar) -> Result<axum::Json<User>, AppError> {
    let user = session::require_user(&jar)?;
    Ok(axum::Json(user))
}

/// `POST /api/auth/logout` — clear the session.
pub async fn logout_handler(State(state): State<AppState>, jar: CookieJar) -> CookieJar {
    if let Some(user) = session::current_user(&jar) {
        state
            .auth_events
            .publish(AuthEvent::SignedOut { uid: user.uid });
    }

    jar.remove(session::removal_cookie())
}
