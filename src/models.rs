use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Viewer,
    Reviewer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Viewer => "viewer",
            Role::Reviewer => "reviewer",
            Role::Admin => "admin",
        }
    }
}

/// Persisted across invocations; the token/role pair issued at login plus
/// the email it was issued for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub role: Role,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Report {
    pub id: String,
    pub title: String,
    pub summary: String,
    #[serde(rename = "reportType")]
    pub report_type: String,
    pub industry: String,
    #[serde(rename = "confidenceScore")]
    pub confidence_score: i32,
    #[serde(default)]
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Source {
    pub origin: String,
    pub excerpt: String,
    #[serde(rename = "relevanceScore")]
    pub relevance_score: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feedback {
    #[serde(rename = "reportId")]
    pub report_id: String,
    #[serde(rename = "userComment")]
    pub user_comment: String,
    #[serde(rename = "flaggedSection")]
    pub flagged_section: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// The fixed report subsections feedback can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Summary,
    Title,
    ConfidenceScore,
    Sources,
    Overall,
}

pub const SECTIONS: [Section; 5] = [
    Section::Summary,
    Section::Title,
    Section::ConfidenceScore,
    Section::Sources,
    Section::Overall,
];

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Summary => "summary",
            Section::Title => "title",
            Section::ConfidenceScore => "confidenceScore",
            Section::Sources => "sources",
            Section::Overall => "overall",
        }
    }

    pub fn parse(value: &str) -> Option<Section> {
        SECTIONS.iter().copied().find(|s| s.as_str() == value)
    }
}
