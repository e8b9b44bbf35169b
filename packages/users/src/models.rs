use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, UsersError};

/// A persisted user record. The enrichment fields stay `None` until the
/// first successful analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub sentiment_score: Option<f64>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub last_analyzed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub engagement_level: Option<String>,
}

impl User {
    pub fn new(input: UserInput) -> Result<Self> {
        input.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email.trim().to_string(),
            notes: input.notes,
            created_at: Utc::now(),
            sentiment_score: None,
            tags: None,
            last_analyzed_at: None,
            engagement_level: None,
        })
    }

    /// Overwrite the editable fields. Enrichment fields are left alone.
    pub fn apply(&mut self, input: UserInput) -> Result<()> {
        input.validate()?;
        self.first_name = input.first_name;
        self.last_name = input.last_name;
        self.email = input.email.trim().to_string();
        self.notes = input.notes;
        Ok(())
    }

    /// Store the outcome of an analysis. Only the enrichment fields change.
    pub fn record_analysis(&mut self, analysis: &AnalysisUpdate) {
        self.sentiment_score = Some(analysis.sentiment_score);
        self.tags = Some(analysis.tags.clone());
        self.engagement_level = Some(analysis.engagement_level.clone());
        self.last_analyzed_at = Some(analysis.analyzed_at);
    }

    pub fn is_analyzed(&self) -> bool {
        self.last_analyzed_at.is_some()
    }
}

/// Body of `POST /api/users` and `PUT /api/users/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub notes: String,
}

impl UserInput {
    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() {
            return Err(UsersError::InvalidInput("email is required".into()));
        }
        Ok(())
    }
}

/// Enrichment fields written back by a successful analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisUpdate {
    pub sentiment_score: f64,
    pub tags: Vec<String>,
    pub engagement_level: String,
    pub analyzed_at: DateTime<Utc>,
}

/// Which of the three enrichment calls answered with fallback values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisFallbacks {
    pub sentiment: bool,
    pub tags: bool,
    pub insights: bool,
}

/// Result of `POST /api/users/{id}/analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub id: Uuid,
    pub sentiment_score: f64,
    pub label: String,
    pub tags: Vec<String>,
    pub engagement_level: String,
    pub last_analyzed_at: DateTime<Utc>,
    pub summary: String,
    pub recommended_actions: Vec<String>,
    pub fallback: AnalysisFallbacks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Aggregate view over all records, computed without enrichment calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersOverview {
    pub total_users: usize,
    pub analyzed_users: usize,
    pub average_sentiment: f64,
    pub top_tags: Vec<TagCount>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(email: &str) -> UserInput {
        UserInput {
            first_name: "Sara".into(),
            last_name: "Lind".into(),
            email: email.into(),
            notes: "Prefers email contact".into(),
        }
    }

    #[test]
    fn new_user_has_no_enrichment() {
        let user = User::new(input(" sara@example.com ")).expect("user");
        assert_eq!(user.email, "sara@example.com");
        assert!(user.sentiment_score.is_none());
        assert!(user.tags.is_none());
        assert!(!user.is_analyzed());
    }

    #[test]
    fn blank_email_is_rejected() {
        assert!(matches!(
            User::new(input("  ")),
            Err(UsersError::InvalidInput(_))
        ));
    }

    #[test]
    fn apply_keeps_enrichment_fields() {
        let mut user = User::new(input("sara@example.com")).expect("user");
        user.sentiment_score = Some(0.5);
        user.apply(input("sara.lind@example.com")).expect("apply");
        assert_eq!(user.email, "sara.lind@example.com");
        assert_eq!(user.sentiment_score, Some(0.5));
    }

    #[test]
    fn record_analysis_keeps_profile_fields() {
        let mut user = User::new(input("sara@example.com")).expect("user");
        let analyzed_at = Utc::now();
        user.record_analysis(&AnalysisUpdate {
            sentiment_score: -0.4,
            tags: vec!["billing".into()],
            engagement_level: "Low".into(),
            analyzed_at,
        });
        assert_eq!(user.email, "sara@example.com");
        assert_eq!(user.notes, "Prefers email contact");
        assert_eq!(user.sentiment_score, Some(-0.4));
        assert_eq!(user.tags, Some(vec!["billing".to_string()]));
        assert_eq!(user.engagement_level.as_deref(), Some("Low"));
        assert_eq!(user.last_analyzed_at, Some(analyzed_at));
    }

    #[test]
    fn user_json_is_camel_case() {
        let user = User::new(input("sara@example.com")).expect("user");
        let value = serde_json::to_value(&user).expect("serialize");
        assert_eq!(value["firstName"], json!("Sara"));
        assert_eq!(value["sentimentScore"], json!(null));
        assert!(value.get("createdAt").is_some());
        assert!(value.get("lastAnalyzedAt").is_some());
    }

    #[test]
    fn input_tolerates_missing_fields() {
        let input: UserInput =
            serde_json::from_value(json!({ "email": "a@b.c" })).expect("deserialize");
        assert_eq!(input.first_name, "");
        assert_eq!(input.notes, "");
    }
}
