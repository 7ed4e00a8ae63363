//! Complaint, comment and audit-log calls.

use tracing::debug;

use crate::models::{
    AuditLog, Comment, CommentCreate, Complaint, ComplaintCreate, ComplaintDetail, ComplaintFilter,
    ComplaintStatus, ComplaintUpdate,
};

use super::{ApiClient, ApiError, ApiRequest};

impl ApiClient {
    /// List complaints matching the dashboard filters
    pub async fn list_complaints(&self, filter: &ComplaintFilter) -> Result<Vec<Complaint>, ApiError> {
        let mut request = ApiRequest::get("/complaints/");
        for (key, value) in filter.to_query() {
            request = request.query(key, value);
        }
        let complaints: Vec<Complaint> = self.fetch(request).await?;
        debug!(count = complaints.len(), "Complaints fetched");
        Ok(complaints)
    }

    pub async fn get_complaint(&self, id: i64) -> Result<Complaint, ApiError> {
        self.fetch(ApiRequest::get(format!("/complaints/{}", id))).await
    }

    pub async fn create_complaint(&self, complaint: &ComplaintCreate) -> Result<Complaint, ApiError> {
        self.fetch(ApiRequest::post("/complaints/").json(complaint)?).await
    }

    pub async fn update_complaint(
        &self,
        id: i64,
        update: &ComplaintUpdate,
    ) -> Result<Complaint, ApiError> {
        self.fetch(ApiRequest::put(format!("/complaints/{}", id)).json(update)?)
            .await
    }

    pub async fn set_complaint_status(
        &self,
        id: i64,
        status: ComplaintStatus,
    ) -> Result<Complaint, ApiError> {
        let update = ComplaintUpdate {
            status: Some(status),
            ..Default::default()
        };
        self.update_complaint(id, &update).await
    }

    /// Assign a complaint to the logged-in user
    pub async fn assign_to_me(&self, id: i64) -> Result<Complaint, ApiError> {
        let me = self.current_user().await?;
        let update = ComplaintUpdate {
            assigned_to_id: Some(me.id),
            ..Default::default()
        };
        self.update_complaint(id, &update).await
    }

    pub async fn list_audit_logs(&self, id: i64) -> Result<Vec<AuditLog>, ApiError> {
        self.fetch(ApiRequest::get(format!("/complaints/{}/audit-logs", id)))
            .await
    }

    pub async fn list_comments(&self, id: i64) -> Result<Vec<Comment>, ApiError> {
        self.fetch(ApiRequest::get(format!("/complaints/{}/comments", id)))
            .await
    }

    pub async fn add_comment(&self, id: i64, content: &str) -> Result<Comment, ApiError> {
        let body = CommentCreate {
            content: content.to_string(),
        };
        self.fetch(ApiRequest::post(format!("/complaints/{}/comments", id)).json(&body)?)
            .await
    }

    /// Fetch a complaint with its history and comments concurrently
    pub async fn complaint_detail(&self, id: i64) -> Result<ComplaintDetail, ApiError> {
        let (complaint, audit_logs, comments) = futures::try_join!(
            self.get_complaint(id),
            self.list_audit_logs(id),
            self.list_comments(id),
        )?;
        Ok(ComplaintDetail {
            complaint,
            audit_logs,
            comments,
        })
    }
}
