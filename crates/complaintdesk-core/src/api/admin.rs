//! Current-user lookup and admin user management.

use tracing::info;

use crate::models::{PasswordReset, User, UserCreate, UserUpdate};

use super::{ApiClient, ApiError, ApiRequest};

impl ApiClient {
    /// The user the session token belongs to
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.fetch(ApiRequest::get("/users/me")).await
    }

    pub async fn list_users(&self, search: Option<&str>) -> Result<Vec<User>, ApiError> {
        let request = ApiRequest::get("/admin/users/")
            .query_opt("search", search.map(str::trim).filter(|s| !s.is_empty()));
        self.fetch(request).await
    }

    pub async fn create_user(&self, user: &UserCreate) -> Result<User, ApiError> {
        let created: User = self.fetch(ApiRequest::post("/admin/users/").json(user)?).await?;
        info!(id = created.id, username = %created.username, role = %created.role, "User created");
        Ok(created)
    }

    pub async fn update_user(&self, id: i64, update: &UserUpdate) -> Result<User, ApiError> {
        self.fetch(ApiRequest::put(format!("/admin/users/{}", id)).json(update)?)
            .await
    }

    pub async fn reset_password(&self, id: i64, new_password: &str) -> Result<User, ApiError> {
        let body = PasswordReset {
            new_password: new_password.to_string(),
        };
        let user: User = self
            .fetch(ApiRequest::post(format!("/admin/users/{}/reset-password", id)).json(&body)?)
            .await?;
        info!(id, "Password reset");
        Ok(user)
    }

    /// Flip a user between active and inactive
    pub async fn toggle_user_status(&self, id: i64) -> Result<User, ApiError> {
        self.fetch(ApiRequest::post(format!("/admin/users/{}/toggle-status", id)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockito::Matcher;

    use crate::auth::{LogNavigator, MemorySessionStore, SessionKey, SessionStore};
    use crate::models::UserRole;

    use super::*;

    const USER_JSON: &str = r#"{"username": "dispatch", "role": "user", "id": 3, "is_active": false,
        "created_at": "2024-01-01T00:00:00", "updated_at": null, "last_login": null}"#;

    fn client(base_url: &str) -> ApiClient {
        let store = Arc::new(MemorySessionStore::new());
        store.set(SessionKey::Token, "admin-token").unwrap();
        ApiClient::new(base_url, store, Arc::new(LogNavigator)).unwrap()
    }

    #[tokio::test]
    async fn test_list_users_with_search() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/admin/users/")
            .match_header("authorization", "Bearer admin-token")
            .match_query(Matcher::UrlEncoded("search".into(), "disp".into()))
            .with_status(200)
            .with_body(format!("[{}]", USER_JSON))
            .create_async()
            .await;

        let users = client(&server.url()).list_users(Some(" disp ")).await.unwrap();

        assert_eq!(users.len(), 1);
        assert_eq!(users[0].status_display(), "Inactive");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_duplicate_user() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/admin/users/")
            .match_body(Matcher::Json(serde_json::json!({
                "username": "dispatch", "password": "pw", "role": "user"
            })))
            .with_status(400)
            .with_body(r#"{"detail": "Username already registered"}"#)
            .create_async()
            .await;

        let user = UserCreate {
            username: "dispatch".to_string(),
            password: "pw".to_string(),
            role: UserRole::User,
        };
        let result = client(&server.url()).create_user(&user).await;
        assert!(matches!(result, Err(ApiError::BadRequest(msg)) if msg == "Username already registered"));
    }

    #[tokio::test]
    async fn test_reset_password_and_toggle() {
        let mut server = mockito::Server::new_async().await;
        let reset = server
            .mock("POST", "/admin/users/3/reset-password")
            .match_body(Matcher::Json(serde_json::json!({"new_password": "n3w"})))
            .with_status(200)
            .with_body(USER_JSON)
            .create_async()
            .await;
        let toggle = server
            .mock("POST", "/admin/users/3/toggle-status")
            .with_status(200)
            .with_body(USER_JSON)
            .create_async()
            .await;

        let api = client(&server.url());
        api.reset_password(3, "n3w").await.unwrap();
        let user = api.toggle_user_status(3).await.unwrap();
        assert!(!user.is_active);

        reset.assert_async().await;
        toggle.assert_async().await;
    }
}
