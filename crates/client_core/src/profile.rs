use std::path::Path;

use shared::protocol::{ParsedResume, ProfileUpdate, UserProfile};

use crate::error::{BoardError, BoardResult};

const PDF_MIME: &str = "application/pdf";
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeKind {
    Pdf,
    Word,
}

/// A résumé file that passed the type check, with the mime type it is sent as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeFile {
    pub kind: ResumeKind,
    mime: String,
}

impl ResumeFile {
    pub fn mime_type(&self) -> &str {
        &self.mime
    }
}

/// Accepts PDF and Word documents, judged by guessed mime type or extension.
pub fn validate_resume_file(path: &Path) -> BoardResult<ResumeFile> {
    let guessed = mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string());
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let is_pdf = guessed.as_deref() == Some(PDF_MIME) || extension.as_deref() == Some("pdf");
    if is_pdf {
        return Ok(ResumeFile {
            kind: ResumeKind::Pdf,
            mime: PDF_MIME.to_string(),
        });
    }

    let word_mime = guessed.filter(|mime| mime.contains("word"));
    if word_mime.is_some() || extension.as_deref() == Some("docx") {
        return Ok(ResumeFile {
            kind: ResumeKind::Word,
            mime: word_mime.unwrap_or_else(|| DOCX_MIME.to_string()),
        });
    }

    Err(BoardError::InvalidResume {
        path: path.to_path_buf(),
    })
}

/// Ordered set of skills. Entries are trimmed; blanks and repeats are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillSet {
    skills: Vec<String>,
}

impl<S: AsRef<str>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(skills: I) -> Self {
        let mut set = Self::default();
        for skill in skills {
            set.insert(skill.as_ref());
        }
        set
    }
}

impl SkillSet {
    /// Returns whether the skill was added.
    pub fn insert(&mut self, skill: &str) -> bool {
        let clean = skill.trim();
        if clean.is_empty() || self.contains(clean) {
            return false;
        }
        self.skills.push(clean.to_string());
        true
    }

    pub fn remove(&mut self, skill: &str) -> bool {
        let before = self.skills.len();
        self.skills.retain(|existing| existing != skill.trim());
        self.skills.len() != before
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.skills.iter().any(|existing| existing == skill)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.skills.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Wire form expected by the profile endpoint.
    pub fn to_comma_joined(&self) -> String {
        self.skills.join(",")
    }
}

/// Editable copy of the user's profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDraft {
    pub name: String,
    /// Shown but not editable; the profile endpoint does not accept it.
    pub email: String,
    pub phone: String,
    pub experience_years: u32,
    pub preferred_location: String,
    pub preferred_seniority: String,
    pub skills: SkillSet,
}

impl ProfileDraft {
    pub fn from_user(user: &UserProfile) -> Self {
        Self {
            name: user.name.clone().unwrap_or_default(),
            email: user.email.clone(),
            phone: user.phone.clone().unwrap_or_default(),
            experience_years: user.experience_years.unwrap_or(0),
            preferred_location: user.preferred_location.clone().unwrap_or_default(),
            preferred_seniority: user.preferred_seniority.clone().unwrap_or_default(),
            skills: user.skills.iter().collect(),
        }
    }

    pub fn to_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            name: Some(self.name.clone()),
            phone: Some(self.phone.clone()),
            skills: Some(self.skills.to_comma_joined()),
            experience_years: Some(self.experience_years),
            preferred_location: Some(self.preferred_location.clone()),
            preferred_seniority: Some(self.preferred_seniority.clone()),
        }
    }

    /// Copies every field the parser found; absent fields keep their value.
    /// Parsed skills are added to the existing set. Returns `false` when the
    /// parse produced nothing.
    pub fn merge_parsed_resume(&mut self, parsed: &ParsedResume) -> bool {
        if parsed.is_empty() {
            return false;
        }
        if let Some(name) = &parsed.name {
            self.name = name.clone();
        }
        if let Some(email) = &parsed.email {
            self.email = email.clone();
        }
        if let Some(phone) = &parsed.phone {
            self.phone = phone.clone();
        }
        if let Some(years) = parsed.experience_years {
            self.experience_years = years;
        }
        if let Some(location) = &parsed.preferred_location {
            self.preferred_location = location.clone();
        }
        if let Some(seniority) = &parsed.preferred_seniority {
            self.preferred_seniority = seniority.clone();
        }
        for skill in parsed.skills.iter().flatten() {
            self.skills.insert(skill);
        }
        true
    }
}

#[cfg(test)]
#[path = "tests/profile_tests.rs"]
mod tests;
