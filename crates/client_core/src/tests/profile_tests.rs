use super::*;
use std::path::PathBuf;

fn user() -> UserProfile {
    UserProfile {
        email: "dev@example.com".to_string(),
        name: Some("Ada".to_string()),
        skills: vec!["Rust".to_string(), " Go ".to_string(), "Rust".to_string()],
        experience_years: Some(4),
        preferred_location: Some("Berlin".to_string()),
        ..UserProfile::default()
    }
}

#[test]
fn resume_validation_accepts_pdf_and_word_documents() {
    let pdf = validate_resume_file(&PathBuf::from("cv.PDF")).expect("pdf accepted");
    assert_eq!(pdf.kind, ResumeKind::Pdf);
    assert_eq!(pdf.mime_type(), "application/pdf");

    let docx = validate_resume_file(&PathBuf::from("/tmp/cv.docx")).expect("docx accepted");
    assert_eq!(docx.kind, ResumeKind::Word);
    assert!(docx.mime_type().contains("word"));
}

#[test]
fn resume_validation_rejects_other_files() {
    for name in ["cv.txt", "cv.png", "cv"] {
        let err = validate_resume_file(&PathBuf::from(name)).expect_err("rejected");
        assert!(matches!(err, BoardError::InvalidResume { .. }), "{name}");
    }
}

#[test]
fn skill_set_trims_and_ignores_blanks_and_repeats() {
    let mut skills = SkillSet::default();
    assert!(skills.insert("  Rust "));
    assert!(!skills.insert("Rust"));
    assert!(!skills.insert("   "));
    assert!(skills.insert("SQL"));
    assert_eq!(skills.iter().collect::<Vec<_>>(), vec!["Rust", "SQL"]);
    assert_eq!(skills.to_comma_joined(), "Rust,SQL");

    assert!(skills.remove("Rust"));
    assert!(!skills.remove("Rust"));
    assert_eq!(skills.len(), 1);
}

#[test]
fn draft_from_user_fills_missing_fields_with_blanks() {
    let draft = ProfileDraft::from_user(&user());
    assert_eq!(draft.name, "Ada");
    assert_eq!(draft.phone, "");
    assert_eq!(draft.experience_years, 4);
    assert_eq!(draft.preferred_seniority, "");
    assert_eq!(draft.skills.iter().collect::<Vec<_>>(), vec!["Rust", "Go"]);

    let update = draft.to_update();
    assert_eq!(update.skills.as_deref(), Some("Rust,Go"));
    assert_eq!(update.preferred_location.as_deref(), Some("Berlin"));
}

#[test]
fn merging_parsed_resume_only_touches_present_fields() {
    let mut draft = ProfileDraft::from_user(&user());
    let parsed = ParsedResume {
        phone: Some("+49 123".to_string()),
        experience_years: Some(0),
        skills: Some(vec!["Go".to_string(), "Kubernetes".to_string()]),
        ..ParsedResume::default()
    };

    assert!(draft.merge_parsed_resume(&parsed));
    assert_eq!(draft.name, "Ada");
    assert_eq!(draft.phone, "+49 123");
    assert_eq!(draft.experience_years, 0);
    assert_eq!(draft.preferred_location, "Berlin");
    assert_eq!(
        draft.skills.iter().collect::<Vec<_>>(),
        vec!["Rust", "Go", "Kubernetes"]
    );
}

#[test]
fn merging_empty_parse_reports_nothing_found() {
    let mut draft = ProfileDraft::from_user(&user());
    let before = draft.clone();
    assert!(!draft.merge_parsed_resume(&ParsedResume::default()));
    assert_eq!(draft, before);
}
