use serde::{Deserialize, Serialize};

use crate::auth::events::AuthEvent;
use crate::auth::session;
use crate::error::AppError;
use crate::models::user::{build_user, AdminList, User};
use crate::state::AppState;

/// Built-in demo account definition.
#[derive(Debug, Clone)]
struct DemoAccount {
    username: &'static str,
    password: &'static str,
    email: &'static str,
    display_name: &'static str,
}

/// Demo instructor email; the default allow-list entry in demo mode.
pub const DEMO_INSTRUCTOR_EMAIL: &str = "instructor@demo.courseboard.dev";

/// The accounts available when `DEMO_MODE=true`.
const DEMO_ACCOUNTS: &[DemoAccount] = &[
    DemoAccount {
        username: "student",
        password: "student",
        email: "student@demo.courseboard.dev",
        display_name: "Demo Student",
    },
    DemoAccount {
        username: "instructor",
        password: "instructor",
        email: DEMO_INSTRUCTOR_EMAIL,
        display_name: "Demo Instructor",
    },
];

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response body.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: User,
}

/// Validate demo credentials and derive the user.
///
/// Admin status goes through the same allow-list as real sign-ins.
pub fn authenticate_demo_user(
    username: &str,
    password: &str,
    admins: &AdminList,
) -> Result<User, AppError> {
    DEMO_ACCOUNTS
        .iter()
        .find(|a| a.username == username && a.password == password)
        .map(|a| {
            build_user(
                format!("demo-{}", a.username),
                a.email.to_string(),
                Some(a.display_name.to_string()),
                admins,
            )
        })
        .ok_or_else(|| AppError::Auth("Invalid username or password".into()))
}

/// `POST /api/auth/demo-login` — password login for the demo accounts.
///
/// Only mounted in demo mode; answers 404 otherwise so the route stays
/// invisible on real deployments.
pub async fn demo_login_handler(
    axum::extract::State(state): axum::extract::State<AppState>,
    jar: axum_extra::extract::CookieJar,
    axum::Json(req): axum::Json<LoginRequest>,
) -> Result<(axum_extra::extract::CookieJar, axum::Json<LoginResponse>), AppError> {
    if !state.demo_mode {
        return Err(AppError::NotFound("Not found".into()));
    }

    let user = authenticate_demo_user(&req.username, &req.password, &state.admins)?;

    state
        .auth_events
        .publish(AuthEvent::SignedIn(user.clone()));

    let jar = jar.add(session::user_cookie(&user)?);

    Ok((
        jar,
        axum::Json(LoginResponse {
            message: "Login successful".to_string(),
            user,
        }),
    ))
}
