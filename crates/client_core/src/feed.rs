//! Loading the candidate list for the deck.

use shared::{domain::JobId, protocol::JobPosting};
use tracing::{info, warn};

use crate::{board::JobBoard, error::BoardResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSource {
    Live,
    /// The backend could not be reached; the built-in sample list is shown.
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedLoad {
    pub jobs: Vec<JobPosting>,
    pub source: FeedSource,
}

/// Fetches the feed. A rejected session is returned as an error so the
/// caller can send the user to sign in; any other failure degrades to
/// [`fallback_jobs`].
pub async fn load_feed(board: &dyn JobBoard) -> BoardResult<FeedLoad> {
    match board.fetch_feed().await {
        Ok(jobs) => {
            info!(count = jobs.len(), "loaded job feed");
            Ok(FeedLoad {
                jobs,
                source: FeedSource::Live,
            })
        }
        Err(err) if err.requires_reauth() => Err(err),
        Err(err) => {
            warn!("job feed unavailable, showing sample jobs: {err}");
            Ok(FeedLoad {
                jobs: fallback_jobs(),
                source: FeedSource::Fallback,
            })
        }
    }
}

struct SampleJob {
    title: &'static str,
    company: &'static str,
    location: &'static str,
    seniority: &'static str,
    skills: [&'static str; 5],
    description: &'static str,
    match_score: i64,
    logo_emoji: &'static str,
}

const SAMPLE_JOBS: [SampleJob; 8] = [
    SampleJob {
        title: "Senior Python Developer",
        company: "Tech Solutions Inc.",
        location: "Bangalore, India",
        seniority: "Senior",
        skills: ["Python", "Django", "REST APIs", "PostgreSQL", "Docker"],
        description: "Join our dynamic team building scalable backend systems. You'll work on exciting projects involving AI/ML integration, microservices architecture, and cloud-native applications. Remote-friendly with competitive compensation.",
        match_score: 92,
        logo_emoji: "🚀",
    },
    SampleJob {
        title: "Full Stack Engineer",
        company: "Innovation Labs",
        location: "Mumbai, India",
        seniority: "Mid-Senior",
        skills: ["Python", "React", "Node.js", "AWS", "TypeScript"],
        description: "Build next-generation fintech products used by millions. Work with cutting-edge technologies in a fast-paced startup environment. Equity options available.",
        match_score: 87,
        logo_emoji: "💡",
    },
    SampleJob {
        title: "Backend Engineer",
        company: "DataFlow Systems",
        location: "Hyderabad, India",
        seniority: "Mid",
        skills: ["Python", "FastAPI", "Kafka", "Kubernetes", "Redis"],
        description: "Design and implement high-performance data pipelines processing millions of events per second. Great learning opportunity with mentorship from industry experts.",
        match_score: 85,
        logo_emoji: "📊",
    },
    SampleJob {
        title: "ML Engineer",
        company: "AI Innovations",
        location: "Pune, India",
        seniority: "Senior",
        skills: ["Python", "TensorFlow", "PyTorch", "NLP", "MLOps"],
        description: "Lead machine learning initiatives for our product suite. Build and deploy production ML models that impact millions of users. Research opportunities available.",
        match_score: 78,
        logo_emoji: "🤖",
    },
    SampleJob {
        title: "DevOps Engineer",
        company: "Cloud Solutions",
        location: "Chennai, India",
        seniority: "Mid",
        skills: ["Python", "Terraform", "Docker", "AWS", "CI/CD"],
        description: "Automate infrastructure and streamline deployments. Work with modern cloud architectures and help teams ship faster. Flexible work arrangements.",
        match_score: 75,
        logo_emoji: "☁️",
    },
    SampleJob {
        title: "Python Developer",
        company: "StartUp Ventures",
        location: "Delhi, India",
        seniority: "Junior-Mid",
        skills: ["Python", "Django", "JavaScript", "MySQL", "Git"],
        description: "Perfect for developers looking to grow. Mentorship program, learning budget, and opportunity to work on diverse projects. Great company culture.",
        match_score: 82,
        logo_emoji: "🌱",
    },
    SampleJob {
        title: "Platform Engineer",
        company: "Enterprise Tech",
        location: "Bangalore, India",
        seniority: "Senior",
        skills: ["Python", "Go", "Kubernetes", "gRPC", "Prometheus"],
        description: "Build the foundation that powers our entire engineering organization. Work on developer experience, CI/CD, and internal tooling. High impact role.",
        match_score: 88,
        logo_emoji: "🏗️",
    },
    SampleJob {
        title: "Software Engineer",
        company: "Fintech Innovations",
        location: "Mumbai, India",
        seniority: "Mid",
        skills: ["Python", "AsyncIO", "PostgreSQL", "Redis", "GraphQL"],
        description: "Build secure, scalable financial systems. Work in a regulated environment with high standards. Competitive salary with excellent benefits.",
        match_score: 80,
        logo_emoji: "💰",
    },
];

/// Sample postings shown when the feed cannot be fetched. Ids run from 1.
pub fn fallback_jobs() -> Vec<JobPosting> {
    SAMPLE_JOBS
        .iter()
        .zip(1..)
        .map(|(sample, id)| JobPosting {
            id: JobId(id),
            title: sample.title.to_string(),
            company: sample.company.to_string(),
            location: Some(sample.location.to_string()),
            seniority: Some(sample.seniority.to_string()),
            skills: sample.skills.iter().map(|skill| skill.to_string()).collect(),
            description: Some(sample.description.to_string()),
            source_url: None,
            match_score: Some(sample.match_score),
            match_explanation: None,
            logo_emoji: Some(sample.logo_emoji.to_string()),
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/feed_tests.rs"]
mod tests;
