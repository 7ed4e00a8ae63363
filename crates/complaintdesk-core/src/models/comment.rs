use serde::{Deserialize, Serialize};

use super::User;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub complaint_id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: String,
    // Only populated when the API embeds the author
    #[serde(default)]
    pub user: Option<User>,
}

impl Comment {
    /// Author name, falling back to the user id
    pub fn author(&self) -> String {
        match self.user {
            Some(ref user) => user.username.clone(),
            None => format!("user #{}", self.user_id),
        }
    }
}

/// Body of `POST /complaints/{id}/comments`
#[derive(Debug, Clone, Serialize)]
pub struct CommentCreate {
    pub content: String,
}

/// One entry of a complaint's change history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: i64,
    pub complaint_id: i64,
    pub changed_by_id: i64,
    pub change_description: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_author() {
        let json = r#"{"content": "Called the driver", "id": 5, "complaint_id": 12, "user_id": 3,
            "created_at": "2024-05-01T10:00:00",
            "user": {"username": "dispatch", "role": "user", "id": 3, "is_active": true,
                     "created_at": "2024-01-01T00:00:00"}}"#;
        let comment: Comment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.author(), "dispatch");

        let bare = Comment { user: None, ..comment };
        assert_eq!(bare.author(), "user #3");
    }

    #[test]
    fn test_parse_audit_log() {
        let json = r#"[{"change_description": "Status changed from open to resolved",
            "id": 1, "complaint_id": 12, "changed_by_id": 1, "timestamp": "2024-05-02T08:00:00"}]"#;
        let logs: Vec<AuditLog> = serde_json::from_str(json).unwrap();
        assert_eq!(logs.len(), 1);
        assert!(logs[0].change_description.contains("resolved"));
    }
}
