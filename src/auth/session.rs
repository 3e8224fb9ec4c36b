use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::error::AppError;
use crate::models::user::User;

/// Cookie holding the signed-in user as JSON.
pub const USER_COOKIE: &str = "courseboard_user";

/// Build the session cookie for a signed-in user.
pub fn user_cookie(user: &User) -> Result<Cookie<'static>, AppError> {
    let user_json = serde_json::to_string(user)
        .map_err(|e| AppError::Internal(format!("Failed to serialize user: {}", e)))?;

    Ok(Cookie::build((USER_COOKIE, user_json))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build())
}

/// Build the removal counterpart of the session cookie.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((USER_COOKIE, "")).path("/").removal().build()
}

/// The signed-in user, if any.
pub fn current_user(jar: &CookieJar) -> Option<User> {
    let cookie = jar.get(USER_COOKIE)?;
    serde_json::from_str(cookie.value()).ok()
}

/// The signed-in user, or an auth error.
pub fn require_user(jar: &CookieJar) -> Result<User, AppError> {
    current_user(jar).ok_or_else(|| AppError::Auth("Not signed in".into()))
}

/// The signed-in admin, or an auth/forbidden error.
pub fn require_admin(jar: &CookieJar) -> Result<User, AppError> {
    let user = require_user(jar)?;
    if !user.is_admin {
        return Err(AppError::Forbidden(
            "Admin access is restricted to authorized accounts".into(),
        ));
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jar_with_user(user: &User) -> CookieJar {
        CookieJar::new().add(user_cookie(user).unwrap())
    }

    fn user(is_admin: bool) -> User {
        User {
            uid: "sub-1".to_string(),
            email: "someone@example.edu".to_string(),
            display_name: "Someone".to_string(),
            is_admin,
        }
    }

    #[test]
    fn test_cookie_roundtrip() {
        let jar = jar_with_user(&user(true));
        let read = current_user(&jar).unwrap();
        assert_eq!(read.uid, "sub-1");
        assert!(read.is_admin);
    }

    #[test]
    fn test_missing_cookie_is_anonymous() {
        let jar = CookieJar::new();
        assert!(current_user(&jar).is_none());
        assert!(matches!(require_user(&jar), Err(AppError::Auth(_))));
    }

    #[test]
    fn test_garbage_cookie_is_anonymous() {
        let jar = CookieJar::new().add(Cookie::new(USER_COOKIE, "not json"));
        assert!(current_user(&jar).is_none());
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&jar_with_user(&user(true))).is_ok());
        assert!(matches!(
            require_admin(&jar_with_user(&user(false))),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            require_admin(&CookieJar::new()),
            Err(AppError::Auth(_))
        ));
    }
}
