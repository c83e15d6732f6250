//! User profile model, as held by the auth provider.

use serde::{Deserialize, Serialize};

/// Profile of a signed-in user.
///
/// The authoritative copy lives in Firebase Auth; this app only ever
/// changes `display_name` and `photo_url`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Firebase Auth UID
    pub uid: String,
    /// Display name
    pub display_name: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Profile picture URL
    pub photo_url: Option<String>,
    /// Whether the email address has been verified
    #[serde(default)]
    pub email_verified: bool,
}

impl UserProfile {
    /// Name used to greet the user: display name, falling back to email.
    pub fn greeting_name(&self) -> String {
        self.display_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.email.as_deref())
            .unwrap_or_default()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_prefers_display_name() {
        let mut profile = UserProfile {
            uid: "u1".to_string(),
            display_name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(profile.greeting_name(), "Ada");

        profile.display_name = Some(String::new());
        assert_eq!(profile.greeting_name(), "ada@example.com");

        profile.email = None;
        assert_eq!(profile.greeting_name(), "");
    }
}
