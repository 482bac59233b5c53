use shared::protocol::UserProfile;
use tracing::warn;

use crate::{board::JobBoard, error::BoardResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileStrength {
    pub score: u8,
    pub message: String,
}

impl ProfileStrength {
    pub fn is_complete(&self) -> bool {
        self.score >= 100
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub applied: usize,
    pub saved: usize,
    pub viewed: u64,
    /// `None` when the profile could not be fetched.
    pub strength: Option<ProfileStrength>,
}

fn filled(value: Option<&str>) -> bool {
    value.is_some_and(|value| !value.trim().is_empty())
}

/// Weighted completeness of a profile, capped at 100.
pub fn profile_strength(user: &UserProfile) -> ProfileStrength {
    let checks: [(bool, u8); 7] = [
        (filled(user.name.as_deref()), 10),
        (filled(Some(&user.email)), 10),
        (!user.skills.is_empty(), 30),
        (user.experience_years.is_some_and(|years| years > 0), 15),
        (filled(user.preferred_location.as_deref()), 15),
        (filled(user.preferred_seniority.as_deref()), 10),
        (filled(user.resume_text.as_deref()), 10),
    ];
    let score = checks
        .iter()
        .filter(|(present, _)| *present)
        .map(|(_, points)| *points)
        .sum::<u8>()
        .min(100);

    let message = if score == 100 {
        "Your profile is rock solid! 🚀".to_string()
    } else if score > 70 {
        "Great profile! Add a few details to reach 100%.".to_string()
    } else {
        format!("{score}% Complete. Upload your resume to boost this!")
    };
    ProfileStrength { score, message }
}

/// Applied and saved counts are required; a missing profile only costs the
/// strength meter.
pub async fn load_dashboard(board: &dyn JobBoard, viewed: u64) -> BoardResult<DashboardSummary> {
    let (applied, saved, user) = futures::join!(
        board.applied_jobs(),
        board.saved_jobs(),
        board.current_user()
    );
    let strength = match user {
        Ok(user) => Some(profile_strength(&user)),
        Err(err) if err.requires_reauth() => return Err(err),
        Err(err) => {
            warn!("profile strength unavailable: {err}");
            None
        }
    };
    Ok(DashboardSummary {
        applied: applied?.len(),
        saved: saved?.len(),
        viewed,
        strength,
    })
}

#[cfg(test)]
#[path = "tests/dashboard_tests.rs"]
mod tests;
