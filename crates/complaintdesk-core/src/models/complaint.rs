use serde::{Deserialize, Serialize};

use super::{AuditLog, Comment, Tag};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Open,
    InProgress,
    Resolved,
}

impl ComplaintStatus {
    /// Wire value used in query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Open => "open",
            ComplaintStatus::InProgress => "in_progress",
            ComplaintStatus::Resolved => "resolved",
        }
    }
}

impl std::fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplaintStatus::Open => write!(f, "Open"),
            ComplaintStatus::InProgress => write!(f, "In Progress"),
            ComplaintStatus::Resolved => write!(f, "Resolved"),
        }
    }
}

impl std::str::FromStr for ComplaintStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "open" => Ok(ComplaintStatus::Open),
            "in_progress" => Ok(ComplaintStatus::InProgress),
            "resolved" => Ok(ComplaintStatus::Resolved),
            _ => Err(format!(
                "unknown status '{}' (expected open, in_progress or resolved)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl ComplaintPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintPriority::Low => "low",
            ComplaintPriority::Medium => "medium",
            ComplaintPriority::High => "high",
            ComplaintPriority::Critical => "critical",
        }
    }
}

impl std::fmt::Display for ComplaintPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplaintPriority::Low => write!(f, "Low"),
            ComplaintPriority::Medium => write!(f, "Medium"),
            ComplaintPriority::High => write!(f, "High"),
            ComplaintPriority::Critical => write!(f, "Critical"),
        }
    }
}

impl std::str::FromStr for ComplaintPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(ComplaintPriority::Low),
            "medium" => Ok(ComplaintPriority::Medium),
            "high" => Ok(ComplaintPriority::High),
            "critical" => Ok(ComplaintPriority::Critical),
            _ => Err(format!(
                "unknown priority '{}' (expected low, medium, high or critical)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: ComplaintStatus,
    pub priority: ComplaintPriority,
    pub created_by_id: i64,
    pub assigned_to_id: Option<i64>,
    pub created_at: String,
    pub updated_at: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Complaint {
    /// Tag names joined for display
    pub fn tag_names(&self) -> String {
        self.tags
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Body of `POST /complaints/`
#[derive(Debug, Clone, Serialize)]
pub struct ComplaintCreate {
    pub title: String,
    pub description: String,
    pub priority: ComplaintPriority,
    pub tag_ids: Vec<i64>,
}

/// Body of `PUT /complaints/{id}`. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComplaintUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ComplaintStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<ComplaintPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<i64>>,
}

/// Dashboard filters for `GET /complaints/`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplaintFilter {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub status: Option<ComplaintStatus>,
    pub priority: Option<ComplaintPriority>,
    pub tag_id: Option<i64>,
}

impl ComplaintFilter {
    /// Query parameters for the set filters. Empty searches are dropped.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(skip) = self.skip {
            params.push(("skip", skip.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim) {
            if !search.is_empty() {
                params.push(("search", search.to_string()));
            }
        }
        if let Some(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        if let Some(priority) = self.priority {
            params.push(("priority", priority.as_str().to_string()));
        }
        if let Some(tag_id) = self.tag_id {
            params.push(("tag_id", tag_id.to_string()));
        }
        params
    }
}

/// Everything shown on a complaint's detail view
#[derive(Debug, Clone)]
pub struct ComplaintDetail {
    pub complaint: Complaint,
    pub audit_logs: Vec<AuditLog>,
    pub comments: Vec<Comment>,
}
