//! Display values derived from job postings, with neutral defaults for
//! whatever the backend left out.

use std::time::Duration;

use shared::{
    domain::JobId,
    protocol::{JobPosting, MatchExplanation},
};
use tracing::warn;

use crate::board::JobBoard;

pub const DEFAULT_LOGO: &str = "🏢";
pub const DEFAULT_SENIORITY: &str = "Mid-Level";
pub const DEFAULT_DESCRIPTION: &str = "No description available.";
pub const DEFAULT_MATCH_REASON: &str = "Good fit based on your profile.";
pub const CARD_SKILL_LIMIT: usize = 5;
/// Longest a front card waits for its explanation before showing the default.
pub const EXPLANATION_WAIT: Duration = Duration::from_secs(2);

pub const APPLIED_DEFAULT_LOGO: &str = "💼";
pub const APPLIED_DEFAULT_LOCATION: &str = "Remote";
pub const APPLIED_DEFAULT_URL: &str = "#";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    High,
    Medium,
    Low,
}

impl MatchTier {
    pub fn from_score(score: i64) -> Self {
        if score >= 90 {
            Self::High
        } else if score < 30 {
            Self::Low
        } else {
            Self::Medium
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::High => "Perfect Match for you",
            Self::Medium => "Good Match",
            Self::Low => "This is not the match for you",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::High => "✨",
            Self::Medium => "👍",
            Self::Low => "⚠️",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplanationView {
    pub reason: String,
    pub missing_skills: Vec<String>,
    pub career_tip: Option<String>,
}

impl ExplanationView {
    pub fn from_explanation(explanation: &MatchExplanation) -> Self {
        let reason = explanation
            .match_reason
            .as_deref()
            .map(str::trim)
            .filter(|reason| !reason.is_empty())
            .unwrap_or(DEFAULT_MATCH_REASON)
            .to_string();
        Self {
            reason,
            missing_skills: explanation.missing_skills.clone(),
            career_tip: explanation
                .career_tip
                .clone()
                .filter(|tip| !tip.trim().is_empty()),
        }
    }

    pub fn fallback() -> Self {
        Self {
            reason: DEFAULT_MATCH_REASON.to_string(),
            missing_skills: Vec::new(),
            career_tip: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplanationState {
    /// No reason came with the posting; one has to be requested.
    Pending,
    Ready(ExplanationView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPresentation {
    pub job_id: JobId,
    pub title: String,
    pub company: String,
    pub logo: String,
    pub location: String,
    pub seniority: String,
    pub skills: Vec<String>,
    pub description: String,
    pub score: i64,
    pub tier: MatchTier,
    pub explanation: ExplanationState,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

impl CardPresentation {
    pub fn from_posting(job: &JobPosting) -> Self {
        let score = job.match_score.unwrap_or(0);
        let explanation = match &job.match_explanation {
            Some(explanation) if explanation.has_reason() => {
                ExplanationState::Ready(ExplanationView::from_explanation(explanation))
            }
            _ => ExplanationState::Pending,
        };
        Self {
            job_id: job.id,
            title: job.title.clone(),
            company: job.company.clone(),
            logo: non_blank(job.logo_emoji.as_deref())
                .unwrap_or(DEFAULT_LOGO)
                .to_string(),
            location: job.location.clone().unwrap_or_default(),
            seniority: non_blank(job.seniority.as_deref())
                .unwrap_or(DEFAULT_SENIORITY)
                .to_string(),
            skills: job.skills.iter().take(CARD_SKILL_LIMIT).cloned().collect(),
            description: non_blank(job.description.as_deref())
                .unwrap_or(DEFAULT_DESCRIPTION)
                .to_string(),
            score,
            tier: MatchTier::from_score(score),
            explanation,
        }
    }

    pub fn needs_explanation(&self) -> bool {
        self.explanation == ExplanationState::Pending
    }

    pub fn score_label(&self) -> String {
        format!("{}% Match", self.score)
    }
}

/// Requests the explanation for one job. Any failure yields the default reason.
pub async fn fetch_explanation(board: &dyn JobBoard, job_id: JobId) -> ExplanationView {
    match board.match_explanation(job_id).await {
        Ok(explanation) => ExplanationView::from_explanation(&explanation),
        Err(err) => {
            warn!(%job_id, "match explanation unavailable: {err}");
            ExplanationView::fallback()
        }
    }
}

/// Like [`fetch_explanation`], but gives up after `wait` so a slow backend
/// cannot hold the card back.
pub async fn fetch_explanation_within(
    board: &dyn JobBoard,
    job_id: JobId,
    wait: Duration,
) -> ExplanationView {
    match tokio::time::timeout(wait, fetch_explanation(board, job_id)).await {
        Ok(view) => view,
        Err(_) => {
            warn!(%job_id, ?wait, "match explanation timed out");
            ExplanationView::fallback()
        }
    }
}

/// One entry in the applied-jobs list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedJobRow {
    pub job_id: JobId,
    pub title: String,
    pub company: String,
    pub logo: String,
    pub location: String,
    pub skills: Vec<String>,
    pub posting_url: String,
}

impl AppliedJobRow {
    pub fn from_posting(job: &JobPosting) -> Self {
        Self {
            job_id: job.id,
            title: job.title.clone(),
            company: job.company.clone(),
            logo: non_blank(job.logo_emoji.as_deref())
                .unwrap_or(APPLIED_DEFAULT_LOGO)
                .to_string(),
            location: non_blank(job.location.as_deref())
                .unwrap_or(APPLIED_DEFAULT_LOCATION)
                .to_string(),
            skills: job.skills.clone(),
            posting_url: non_blank(job.source_url.as_deref())
                .unwrap_or(APPLIED_DEFAULT_URL)
                .to_string(),
        }
    }

    pub fn has_posting_url(&self) -> bool {
        self.posting_url != APPLIED_DEFAULT_URL
    }
}

#[cfg(test)]
#[path = "tests/card_tests.rs"]
mod tests;
