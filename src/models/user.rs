use serde::{Deserialize, Serialize};

/// An authenticated portal user, derived from the OIDC claims.
///
/// Never stored server-side; lives only in the session cookie for as long
/// as the user stays signed in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique subject identifier from the identity provider.
    pub uid: String,
    pub email: String,
    pub display_name: String,
    /// Whether this user may perform admin mutations.
    pub is_admin: bool,
}

/// The configured set of admin email addresses.
///
/// Injected at startup (see `AppConfig`); membership is the entire admin
/// gate. Comparison is case-insensitive, emails being what they are.
#[derive(Debug, Clone, Default)]
pub struct AdminList {
    emails: Vec<String>,
}

impl AdminList {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            emails: emails
                .into_iter()
                .map(|e| e.as_ref().trim().to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    /// Parse a comma-separated allow-list, as configured via `ADMIN_EMAILS`.
    pub fn from_csv(csv: &str) -> Self {
        Self::new(csv.split(','))
    }

    pub fn is_admin(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.emails.iter().any(|e| *e == email)
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

/// Build a `User` from identity claims, deciding admin status by
/// allow-list membership.
pub fn build_user(
    uid: String,
    email: String,
    display_name: Option<String>,
    admins: &AdminList,
) -> User {
    let is_admin = admins.is_admin(&email);
    User {
        uid,
        display_name: display_name.unwrap_or_else(|| email.clone()),
        email,
        is_admin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_list_membership() {
        let admins = AdminList::from_csv("prof@example.edu, ta@example.edu");
        assert!(admins.is_admin("prof@example.edu"));
        assert!(admins.is_admin("ta@example.edu"));
        assert!(!admins.is_admin("student@example.edu"));
    }

    #[test]
    fn test_admin_list_case_insensitive() {
        let admins = AdminList::from_csv("Prof@Example.edu");
        assert!(admins.is_admin("prof@example.edu"));
        assert!(admins.is_admin("PROF@EXAMPLE.EDU"));
    }

    #[test]
    fn test_admin_list_ignores_blank_entries() {
        let admins = AdminList::from_csv(" , prof@example.edu, ");
        assert!(admins.is_admin("prof@example.edu"));
        assert!(!admins.is_admin(""));
    }

    #[test]
    fn test_empty_list_admits_nobody() {
        let admins = AdminList::default();
        assert!(admins.is_empty());
        assert!(!admins.is_admin("prof@example.edu"));
    }

    #[test]
    fn test_build_user_admin() {
        let admins = AdminList::from_csv("prof@example.edu");
        let user = build_user(
            "sub-1".to_string(),
            "prof@example.edu".to_string(),
            Some("Prof X".to_string()),
            &admins,
        );
        assert!(user.is_admin);
        assert_eq!(user.display_name, "Prof X");
    }

    #[test]
    fn test_build_user_falls_back_to_email_name() {
        let admins = AdminList::default();
        let user = build_user(
            "sub-2".to_string(),
            "student@example.edu".to_string(),
            None,
            &admins,
        );
        assert!(!user.is_admin);
        assert_eq!(user.display_name, "student@example.edu");
    }

    #[test]
    fn test_user_serialization_roundtrip() {
        let user = User {
            uid: "sub-3".to_string(),
            email: "ta@example.edu".to_string(),
            display_name: "TA".to_string(),
            is_admin: true,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("\"isAdmin\":true"));
        let back: User = serde_json::from_str(&json).unwrap();
        assert_eq!(back.uid, "sub-3");
        assert!(back.is_admin);
    }
}
