use tracing::info;

use crate::models::{Tag, TagCreate, TagUpdate};

use super::{ApiClient, ApiError, ApiRequest};

impl ApiClient {
    pub async fn list_tags(&self) -> Result<Vec<Tag>, ApiError> {
        self.fetch(ApiRequest::get("/tags/")).await
    }

    pub async fn create_tag(&self, tag: &TagCreate) -> Result<Tag, ApiError> {
        let created: Tag = self.fetch(ApiRequest::post("/tags/").json(tag)?).await?;
        info!(id = created.id, name = %created.name, "Tag created");
        Ok(created)
    }

    pub async fn update_tag(&self, id: i64, update: &TagUpdate) -> Result<Tag, ApiError> {
        self.fetch(ApiRequest::put(format!("/tags/{}", id)).json(update)?)
            .await
    }

    pub async fn delete_tag(&self, id: i64) -> Result<(), ApiError> {
        self.request(&ApiRequest::delete(format!("/tags/{}", id)))
            .await?;
        info!(id, "Tag deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockito::Matcher;

    use crate::auth::{LogNavigator, MemorySessionStore};

    use super::*;

    fn client(base_url: &str) -> ApiClient {
        ApiClient::new(base_url, Arc::new(MemorySessionStore::new()), Arc::new(LogNavigator)).unwrap()
    }

    #[tokio::test]
    async fn test_create_tag_sends_default_color() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/tags/")
            .match_body(Matcher::Json(serde_json::json!({"name": "Billing", "color": "#3B82F6"})))
            .with_status(200)
            .with_body(r##"{"id": 8, "name": "Billing", "color": "#3B82F6", "created_at": "2024-05-01T00:00:00"}"##)
            .create_async()
            .await;

        let tag = client(&server.url())
            .create_tag(&TagCreate::new("Billing"))
            .await
            .unwrap();

        assert_eq!(tag.id, 8);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_missing_tag() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/tags/99")
            .with_status(404)
            .with_body(r#"{"detail": "Tag not found"}"#)
            .create_async()
            .await;

        let result = client(&server.url()).delete_tag(99).await;
        assert!(matches!(result, Err(ApiError::NotFound(msg)) if msg == "Tag not found"));
    }
}
