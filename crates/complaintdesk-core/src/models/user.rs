use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    User,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "Admin"),
            UserRole::User => write!(f, "User"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "user" => Ok(UserRole::User),
            other => Err(format!("unknown role '{}' (expected admin or user)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
}

fn default_active() -> bool {
    true
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn status_display(&self) -> &'static str {
        if self.is_active {
            "Active"
        } else {
            "Inactive"
        }
    }
}

/// Body of `POST /admin/users/`
#[derive(Debug, Clone, Serialize)]
pub struct UserCreate {
    pub username: String,
    pub password: String,
    pub role: UserRole,
}

/// Body of `PUT /admin/users/{id}`. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Body of `POST /admin/users/{id}/reset-password`
#[derive(Debug, Clone, Serialize)]
pub struct PasswordReset {
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user() {
        let json = r#"{"username": "admin", "role": "admin", "id": 1, "is_active": true,
            "created_at": "2024-05-01T09:30:00.123456", "updated_at": null, "last_login": null}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, 1);
        assert!(user.is_admin());
        assert_eq!(user.status_display(), "Active");
        assert!(user.last_login.is_none());
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("ADMIN".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("user".parse::<UserRole>().unwrap(), UserRole::User);
        assert!("root".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_user_update_omits_unset_fields() {
        let update = UserUpdate {
            is_active: Some(false),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"is_active":false}"#);
    }
}
