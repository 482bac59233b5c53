use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    card::AppliedJobRow,
    config::load_settings,
    dashboard::load_dashboard,
    error::{BoardError, BoardResult},
    feed::{load_feed, FeedSource},
    profile::ProfileDraft,
    JobSwipeClient,
};
use shared::domain::JobId;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod chat;
mod deck;
mod render;

#[derive(Parser, Debug)]
#[command(name = "jobswipe", about = "Swipe through job matches from the terminal")]
struct Cli {
    /// Overrides the configured API base URL.
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Overrides the configured session file.
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        email: String,
        /// Read from stdin when omitted.
        #[arg(long)]
        password: Option<String>,
    },
    Register {
        email: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    Logout,
    /// Interactive deck: a/→ apply, s/↓ save, k/← skip, q quit.
    Deck,
    Feed,
    Applied,
    Saved,
    Dashboard,
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },
    /// Uploads a PDF or DOCX résumé and shows what was parsed from it.
    Resume {
        path: PathBuf,
        /// Merge the parsed fields into the profile and save it.
        #[arg(long)]
        save: bool,
    },
    Chat {
        job_id: i64,
        #[arg(long)]
        send: Option<String>,
        /// Keep polling for new messages until interrupted.
        #[arg(long)]
        watch: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    Show,
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        experience: Option<u32>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        seniority: Option<String>,
        #[arg(long = "add-skill")]
        add_skills: Vec<String>,
        #[arg(long = "remove-skill")]
        remove_skills: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(api_url) = cli.api_url {
        settings.api_url = api_url;
    }
    if let Some(session_file) = cli.session_file {
        settings.session_file = session_file;
    }
    let client = JobSwipeClient::from_settings(settings)?;

    match cli.command {
        Command::Login { email, password } => {
            let password = password_or_prompt(password).await?;
            client.login(&email, &password).await?;
            println!("Signed in as {email}");
        }
        Command::Register {
            email,
            name,
            password,
        } => {
            let password = password_or_prompt(password).await?;
            client.register(&email, &password, name.as_deref()).await?;
            println!("Account created for {email}");
        }
        Command::Logout => {
            client.logout().await?;
            println!("Signed out");
        }
        Command::Deck => {
            require_session(&client).await?;
            deck::run(&client).await?;
        }
        Command::Feed => {
            require_session(&client).await?;
            let feed = checked(&client, load_feed(client.board().as_ref()).await).await?;
            if feed.source == FeedSource::Fallback {
                println!("(job board unreachable, showing sample jobs)");
            }
            render::print_job_list(&feed.jobs);
        }
        Command::Applied => {
            require_session(&client).await?;
            let jobs = checked(&client, client.board().applied_jobs().await).await?;
            if jobs.is_empty() {
                println!("No applications yet. Swipe right on a job to apply.");
            }
            for job in &jobs {
                render::print_applied_row(&AppliedJobRow::from_posting(job));
            }
        }
        Command::Saved => {
            require_session(&client).await?;
            let jobs = checked(&client, client.board().saved_jobs().await).await?;
            if jobs.is_empty() {
                println!("No saved jobs.");
            }
            render::print_job_list(&jobs);
        }
        Command::Dashboard => {
            require_session(&client).await?;
            let summary = checked(
                &client,
                load_dashboard(client.board().as_ref(), client.viewed_total()).await,
            )
            .await?;
            render::print_dashboard(&summary);
        }
        Command::Profile { action } => {
            require_session(&client).await?;
            run_profile(&client, action).await?;
        }
        Command::Resume { path, save } => {
            require_session(&client).await?;
            upload_resume(&client, &path, save).await?;
        }
        Command::Chat {
            job_id,
            send,
            watch,
        } => {
            require_session(&client).await?;
            chat::run(&client, JobId(job_id), send, watch).await?;
        }
    }

    Ok(())
}

async fn password_or_prompt(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    eprint!("Password: ");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let line = lines
        .next_line()
        .await
        .context("failed to read password")?
        .ok_or_else(|| anyhow!("no password given"))?;
    Ok(line.trim_end().to_string())
}

async fn require_session(client: &JobSwipeClient) -> Result<()> {
    if !client.is_authenticated().await {
        bail!("not signed in; run `jobswipe login <email>` first");
    }
    Ok(())
}

/// Turns a rejected session into a sign-in hint and forgets the stale token.
pub(crate) async fn checked<T>(client: &JobSwipeClient, result: BoardResult<T>) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err) if err.requires_reauth() => {
            client.drop_rejected_session().await;
            Err(reauth_error(err))
        }
        Err(err) => Err(err.into()),
    }
}

fn reauth_error(err: BoardError) -> anyhow::Error {
    anyhow!("{err}; run `jobswipe login <email>` to sign in again")
}

async fn run_profile(client: &JobSwipeClient, action: ProfileCommand) -> Result<()> {
    let board = client.board();
    let user = checked(client, board.current_user().await).await?;
    match action {
        ProfileCommand::Show => {
            render::print_profile(&ProfileDraft::from_user(&user));
        }
        ProfileCommand::Update {
            name,
            phone,
            experience,
            location,
            seniority,
            add_skills,
            remove_skills,
        } => {
            let mut draft = ProfileDraft::from_user(&user);
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(phone) = phone {
                draft.phone = phone;
            }
            if let Some(experience) = experience {
                draft.experience_years = experience;
            }
            if let Some(location) = location {
                draft.preferred_location = location;
            }
            if let Some(seniority) = seniority {
                draft.preferred_seniority = seniority;
            }
            for skill in &remove_skills {
                draft.skills.remove(skill);
            }
            for skill in &add_skills {
                draft.skills.insert(skill);
            }
            checked(client, board.update_profile(&draft.to_update()).await).await?;
            println!("Profile updated successfully!");
            render::print_profile(&draft);
        }
    }
    Ok(())
}

async fn upload_resume(client: &JobSwipeClient, path: &std::path::Path, save: bool) -> Result<()> {
    let board = client.board();
    let response = checked(client, board.upload_resume(path).await)
        .await
        .with_context(|| format!("failed to process resume {}", path.display()))?;
    println!("Resume parsed successfully!");
    render::print_parsed_resume(&response.parsed_data);

    if !save {
        return Ok(());
    }
    let user = checked(client, board.current_user().await).await?;
    let mut draft = ProfileDraft::from_user(&user);
    if !draft.merge_parsed_resume(&response.parsed_data) {
        println!("Nothing to merge into the profile.");
        return Ok(());
    }
    checked(client, board.update_profile(&draft.to_update()).await).await?;
    println!("Profile updated from resume.");
    render::print_profile(&draft);
    Ok(())
}
