use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ChatMessageId, ChatSender, JobId, SwipeAction, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub company: String,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub seniority: Option<String>,
    #[serde(default, deserialize_with = "lenient::skills")]
    pub skills: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(
        default,
        alias = "url",
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::score")]
    pub match_score: Option<i64>,
    #[serde(
        default,
        deserialize_with = "lenient::explanation",
        skip_serializing_if = "Option::is_none"
    )]
    pub match_explanation: Option<MatchExplanation>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub logo_emoji: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchExplanation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_reason: Option<String>,
    #[serde(default, deserialize_with = "lenient::skills")]
    pub missing_skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub career_tip: Option<String>,
}

impl MatchExplanation {
    /// An explanation only counts once the backend produced a reason for it.
    pub fn has_reason(&self) -> bool {
        self.match_reason
            .as_deref()
            .is_some_and(|reason| !reason.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobListResponse {
    /// Records that cannot be read even leniently are dropped one by one.
    #[serde(default, deserialize_with = "lenient::postings")]
    pub jobs: Vec<JobPosting>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwipeRequest {
    pub job_id: JobId,
    pub action: SwipeAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ChatMessageId>,
    pub sender_type: ChatSender,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl ChatMessage {
    /// Parses `created_at`, which arrives either as RFC 3339 or as a bare
    /// `YYYY-MM-DD HH:MM:SS` UTC timestamp.
    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.as_deref()?.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(|naive| naive.and_utc())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatHistoryResponse {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendChatMessageRequest {
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendChatMessageResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employer_response: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::skills")]
    pub skills: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient::years",
        skip_serializing_if = "Option::is_none"
    )]
    pub experience_years: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_seniority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_text: Option<String>,
}

/// Body of `PUT /auth/profile/update`. Skills travel as one comma-joined string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_years: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_seniority: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumeUploadResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub parsed_data: ParsedResume,
    #[serde(default)]
    pub file_saved: bool,
}

/// Fields extracted from a résumé. Every field is optional: only the ones the
/// parser found are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_skills",
        skip_serializing_if = "Option::is_none"
    )]
    pub skills: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "lenient::years",
        skip_serializing_if = "Option::is_none"
    )]
    pub experience_years: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_seniority: Option<String>,
}

impl ParsedResume {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: UserProfile,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Tolerant decoders for fields the backend does not type consistently.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use tracing::warn;

    use super::{JobPosting, MatchExplanation};

    pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(text) => text,
            _ => String::new(),
        })
    }

    pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(text) => Some(text),
            _ => None,
        })
    }

    pub fn postings<'de, D>(deserializer: D) -> Result<Vec<JobPosting>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let records = match Value::deserialize(deserializer)? {
            Value::Array(records) => records,
            _ => return Ok(Vec::new()),
        };
        Ok(records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value(record) {
                Ok(posting) => Some(posting),
                Err(err) => {
                    warn!(index, "dropping unreadable job posting: {err}");
                    None
                }
            })
            .collect())
    }

    fn split_skills(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|skill| !skill.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn skills_from_value(value: Value) -> Option<Vec<String>> {
        match value {
            Value::Null => None,
            Value::String(raw) => Some(split_skills(&raw)),
            Value::Array(items) => Some(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(skill) => {
                            let skill = skill.trim();
                            (!skill.is_empty()).then(|| skill.to_string())
                        }
                        _ => None,
                    })
                    .collect(),
            ),
            _ => Some(Vec::new()),
        }
    }

    pub fn skills<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(skills_from_value(value).unwrap_or_default())
    }

    pub fn optional_skills<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(skills_from_value(value))
    }

    pub fn score<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|score| score.round() as i64)),
            Value::String(raw) => raw.trim().parse::<f64>().ok().map(|s| s.round() as i64),
            _ => None,
        })
    }

    pub fn years<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let years = match value {
            Value::Number(number) => number.as_f64(),
            Value::String(raw) => raw.trim().parse::<f64>().ok(),
            _ => None,
        };
        Ok(years
            .filter(|years| years.is_finite() && *years >= 0.0)
            .map(|years| years.round() as u32))
    }

    pub fn explanation<'de, D>(deserializer: D) -> Result<Option<MatchExplanation>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Object(_) => serde_json::from_value(value).ok(),
            Value::String(raw) => serde_json::from_str(&raw).ok(),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_posting_tolerates_missing_and_malformed_fields() {
        let job: JobPosting = serde_json::from_str(
            r#"{"id": 4, "title": "ML Engineer", "company": "AI Innovations",
                "skills": "Python, TensorFlow, ,NLP", "match_score": 78.6,
                "match_explanation": "not an object"}"#,
        )
        .expect("decode job");

        assert_eq!(job.id, JobId(4));
        assert_eq!(job.skills, vec!["Python", "TensorFlow", "NLP"]);
        assert_eq!(job.match_score, Some(79));
        assert!(job.match_explanation.is_none());
        assert!(job.location.is_none());
    }

    #[test]
    fn job_posting_reads_nested_explanation() {
        let job: JobPosting = serde_json::from_str(
            r#"{"id": 1, "title": "t", "company": "c", "skills": null, "match_score": null,
                "match_explanation": {"match_reason": "Strong Python", "missing_skills": ["Go"]}}"#,
        )
        .expect("decode job");

        assert!(job.skills.is_empty());
        assert_eq!(job.match_score, None);
        let explanation = job.match_explanation.expect("explanation");
        assert!(explanation.has_reason());
        assert_eq!(explanation.missing_skills, vec!["Go"]);
    }

    #[test]
    fn null_text_fields_fall_back_to_empty() {
        let job: JobPosting = serde_json::from_str(
            r#"{"id": 2, "title": "Bad", "company": null, "location": 12, "logo_emoji": null}"#,
        )
        .expect("decode job");

        assert_eq!(job.title, "Bad");
        assert_eq!(job.company, "");
        assert!(job.location.is_none());
        assert!(job.logo_emoji.is_none());
    }

    #[test]
    fn one_bad_record_keeps_the_rest_of_the_feed() {
        let feed: JobListResponse = serde_json::from_str(
            r#"{"jobs": [
                {"id": 1, "title": "Good", "company": "Acme"},
                {"id": 2, "title": "Bad", "company": null},
                {"title": "No id", "company": "Ghost"},
                {"id": "seven", "title": "Odd id"},
                "not a record"
            ]}"#,
        )
        .expect("decode feed");

        let ids: Vec<JobId> = feed.jobs.iter().map(|job| job.id).collect();
        assert_eq!(ids, vec![JobId(1), JobId(2)]);
        assert_eq!(feed.jobs[0].company, "Acme");
        assert_eq!(feed.jobs[1].company, "");
    }

    #[test]
    fn missing_or_null_job_list_is_empty() {
        let missing: JobListResponse = serde_json::from_str("{}").expect("decode");
        assert!(missing.jobs.is_empty());
        let null: JobListResponse = serde_json::from_str(r#"{"jobs": null}"#).expect("decode");
        assert!(null.jobs.is_empty());
    }

    #[test]
    fn parsed_resume_distinguishes_absent_skills() {
        let absent: ParsedResume = serde_json::from_str(r#"{"name": "Asha"}"#).expect("decode");
        assert_eq!(absent.skills, None);

        let present: ParsedResume =
            serde_json::from_str(r#"{"skills": ["Rust", "SQL"], "experience_years": "4"}"#)
                .expect("decode");
        assert_eq!(present.skills, Some(vec!["Rust".to_string(), "SQL".to_string()]));
        assert_eq!(present.experience_years, Some(4));
    }

    #[test]
    fn chat_message_parses_sqlite_timestamps() {
        let message: ChatMessage = serde_json::from_str(
            r#"{"id": 3, "sender_type": "employer", "message": "hi", "created_at": "2024-05-01 09:30:00"}"#,
        )
        .expect("decode message");

        assert_eq!(message.sender_type, ChatSender::Employer);
        let sent_at = message.sent_at().expect("timestamp");
        assert_eq!(sent_at.to_rfc3339(), "2024-05-01T09:30:00+00:00");
    }

    #[test]
    fn unknown_sender_type_does_not_reject_message() {
        let message: ChatMessage =
            serde_json::from_str(r#"{"sender_type": "bot", "message": "x"}"#).expect("decode");
        assert_eq!(message.sender_type, ChatSender::Unknown);
    }

    #[test]
    fn profile_update_omits_unset_fields() {
        let update = ProfileUpdate {
            name: Some("Asha".to_string()),
            skills: Some("Rust,SQL".to_string()),
            ..ProfileUpdate::default()
        };
        let json = serde_json::to_value(&update).expect("encode");
        assert_eq!(json, serde_json::json!({"name": "Asha", "skills": "Rust,SQL"}));
    }
}
