use client_core::{
    card::{AppliedJobRow, CardPresentation, ExplanationState, ExplanationView},
    dashboard::DashboardSummary,
    deck::SessionCounters,
    profile::ProfileDraft,
};
use shared::{
    domain::ChatSender,
    protocol::{ChatMessage, JobPosting, ParsedResume},
};

pub fn card_lines(card: &CardPresentation, behind: usize) -> Vec<String> {
    let mut lines = vec![
        format!("{} {} @ {}", card.logo, card.title, card.company),
        format!(
            "   {} | {} | {} {}",
            card.location,
            card.seniority,
            card.tier.icon(),
            card.score_label()
        ),
    ];
    if !card.skills.is_empty() {
        lines.push(format!("   Skills: {}", card.skills.join(", ")));
    }
    lines.push(format!("   {}", card.description));
    if let ExplanationState::Ready(explanation) = &card.explanation {
        lines.extend(explanation_lines(card, explanation));
    }
    if behind > 0 {
        lines.push(format!("   (+{behind} more in the stack)"));
    }
    lines
}

fn explanation_lines(card: &CardPresentation, explanation: &ExplanationView) -> Vec<String> {
    let mut lines = vec![format!("   {}: {}", card.tier.title(), explanation.reason)];
    if !explanation.missing_skills.is_empty() {
        lines.push(format!(
            "   Missing: {}",
            explanation.missing_skills.join(", ")
        ));
    }
    if let Some(tip) = &explanation.career_tip {
        lines.push(format!("   Tip: {tip}"));
    }
    lines
}

pub fn print_card(card: &CardPresentation, behind: usize) {
    println!();
    for line in card_lines(card, behind) {
        println!("{line}");
    }
}

pub fn stats_line(counters: &SessionCounters) -> String {
    format!(
        "Viewed {} | Applied {} | Saved {} | Skipped {}",
        counters.viewed, counters.applied, counters.saved, counters.skipped
    )
}

pub fn print_job_list(jobs: &[JobPosting]) {
    for job in jobs {
        let card = CardPresentation::from_posting(job);
        println!(
            "#{:<4} {} {} @ {} ({})",
            card.job_id,
            card.logo,
            card.title,
            card.company,
            card.score_label()
        );
    }
}

pub fn print_applied_row(row: &AppliedJobRow) {
    println!("#{:<4} {} {} @ {}", row.job_id, row.logo, row.title, row.company);
    println!("      {}", row.location);
    if !row.skills.is_empty() {
        println!("      {}", row.skills.join(", "));
    }
    if row.has_posting_url() {
        println!("      {}", row.posting_url);
    }
    println!("      chat: jobswipe chat {}", row.job_id);
}

pub fn print_dashboard(summary: &DashboardSummary) {
    println!("Applied: {}", summary.applied);
    println!("Saved:   {}", summary.saved);
    println!("Viewed:  {}", summary.viewed);
    match &summary.strength {
        Some(strength) => {
            println!("Profile strength: {}%", strength.score);
            println!("{}", strength.message);
        }
        None => println!("Profile strength unavailable"),
    }
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

pub fn print_profile(draft: &ProfileDraft) {
    println!("Name:       {}", or_dash(&draft.name));
    println!("Email:      {}", or_dash(&draft.email));
    println!("Phone:      {}", or_dash(&draft.phone));
    println!("Experience: {} years", draft.experience_years);
    println!("Location:   {}", or_dash(&draft.preferred_location));
    println!("Seniority:  {}", or_dash(&draft.preferred_seniority));
    let skills: Vec<&str> = draft.skills.iter().collect();
    println!("Skills:     {}", or_dash(&skills.join(", ")));
}

pub fn print_parsed_resume(parsed: &ParsedResume) {
    if parsed.is_empty() {
        println!("No profile details found in the resume.");
        return;
    }
    if let Some(name) = &parsed.name {
        println!("Name:       {name}");
    }
    if let Some(email) = &parsed.email {
        println!("Email:      {email}");
    }
    if let Some(phone) = &parsed.phone {
        println!("Phone:      {phone}");
    }
    if let Some(years) = parsed.experience_years {
        println!("Experience: {years} years");
    }
    if let Some(skills) = &parsed.skills {
        println!("Skills:     {}", skills.join(", "));
    }
}

pub fn message_line(message: &ChatMessage) -> String {
    let who = match message.sender_type {
        ChatSender::User => "You",
        ChatSender::Employer => "Employer",
        ChatSender::Unknown => "?",
    };
    match message.sent_at() {
        Some(at) => format!("[{}] {who}: {}", at.format("%H:%M"), message.message),
        None => format!("{who}: {}", message.message),
    }
}

#[cfg(test)]
mod tests {
    use super::{card_lines, message_line, stats_line};
    use client_core::{
        card::{CardPresentation, ExplanationState, ExplanationView},
        deck::SessionCounters,
    };
    use shared::{
        domain::{ChatSender, JobId},
        protocol::{ChatMessage, JobPosting},
    };

    fn posting() -> JobPosting {
        serde_json::from_value(serde_json::json!({
            "id": 4,
            "title": "Backend Engineer",
            "company": "Acme",
            "location": "Berlin",
            "skills": ["Rust", "Postgres"],
            "match_score": 88
        }))
        .expect("posting")
    }

    #[test]
    fn card_shows_defaults_and_stack_depth() {
        let card = CardPresentation::from_posting(&posting());
        let lines = card_lines(&card, 2);
        assert_eq!(lines[0], "🏢 Backend Engineer @ Acme");
        assert!(lines[1].contains("Mid-Level"));
        assert!(lines[1].ends_with("88% Match"));
        assert!(lines.iter().any(|line| line.contains("Rust, Postgres")));
        assert_eq!(lines.last().map(String::as_str), Some("   (+2 more in the stack)"));
    }

    #[test]
    fn ready_explanation_is_listed() {
        let mut card = CardPresentation::from_posting(&posting());
        card.explanation = ExplanationState::Ready(ExplanationView {
            reason: "Strong Rust background".to_string(),
            missing_skills: vec!["Kafka".to_string()],
            career_tip: Some("Try a streaming side project".to_string()),
        });
        let lines = card_lines(&card, 0);
        assert!(lines.iter().any(|line| line.ends_with("Strong Rust background")));
        assert!(lines.contains(&"   Missing: Kafka".to_string()));
        assert!(lines.contains(&"   Tip: Try a streaming side project".to_string()));
        assert_eq!(card.job_id, JobId(4));
    }

    #[test]
    fn stats_and_chat_lines() {
        let counters = SessionCounters {
            viewed: 3,
            applied: 1,
            saved: 1,
            skipped: 1,
        };
        assert_eq!(
            stats_line(&counters),
            "Viewed 3 | Applied 1 | Saved 1 | Skipped 1"
        );

        let message = ChatMessage {
            id: None,
            sender_type: ChatSender::Employer,
            message: "Thanks for applying".to_string(),
            created_at: Some("2024-05-01 09:30:00".to_string()),
        };
        assert_eq!(message_line(&message), "[09:30] Employer: Thanks for applying");
    }
}
