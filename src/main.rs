// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Canna-Connect command-line front end
//!
//! Each invocation is one page load: the requested route goes through the
//! access gate, then the matching action runs against the backend.

use canna_connect::{
    config::Config,
    gate::{Admission, Route},
    models::{Credentials, Decision, NewAd, NewComment, NewJob, RegisterForm, Role},
    session::{FileStore, SessionStore},
    views::{self, Notice},
    AppState,
};
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "canna-connect", version, about = "Connect with people in the industry")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Answer {
    Yes,
    No,
}

#[derive(Clone, Copy, ValueEnum)]
enum DecisionArg {
    Accept,
    Reject,
}

impl From<DecisionArg> for Decision {
    fn from(arg: DecisionArg) -> Self {
        match arg {
            DecisionArg::Accept => Decision::Connected,
            DecisionArg::Reject => Decision::Rejected,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Answer the "are you 21 or older?" prompt
    VerifyAge { answer: Answer },
    /// Forget the age verification
    ResetAge,
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        city: String,
        #[arg(long, default_value = "")]
        state: String,
        #[arg(long, default_value = "Customer")]
        role: String,
    },
    /// Sign in
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show your profile
    Profile,
    /// Find people to connect with
    Discover {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Send a connection request
    Connect { user_id: u64 },
    /// List incoming connection requests
    Pending,
    /// Accept or reject an incoming request
    Respond {
        request_id: u64,
        decision: DecisionArg,
    },
    /// List favorite connections
    Favorites,
    /// Mark a member as favorite
    Favorite { user_id: u64 },
    /// Remove a member from favorites
    Unfavorite { user_id: u64 },
    /// List notifications
    Notifications,
    /// Show advertisements
    Ads,
    /// Submit an advertisement
    SubmitAd {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        image_url: Option<String>,
        #[arg(long)]
        link: Option<String>,
    },
    /// Show job listings
    Jobs,
    /// Post a job
    PostJob {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        salary: Option<String>,
    },
    /// Apply to a job with a resume file
    ApplyJob {
        job_id: u64,
        #[arg(long)]
        resume: PathBuf,
    },
    /// Show the comments on a job
    JobComments { job_id: u64 },
    /// Comment on a job, or reply to a comment
    CommentJob {
        job_id: u64,
        #[arg(long)]
        content: String,
        #[arg(long)]
        parent_id: Option<u64>,
    },
}

impl Command {
    fn route(&self) -> Route {
        match self {
            Command::VerifyAge { .. } | Command::ResetAge => Route::AgeVerification,
            Command::Register { .. } => Route::Register,
            Command::Login { .. } => Route::Login,
            Command::Logout => Route::Logout,
            Command::Profile => Route::Profile,
            Command::Discover { .. } | Command::Connect { .. } => Route::FindConnections,
            Command::Pending | Command::Respond { .. } => Route::PendingRequests,
            Command::Favorites | Command::Favorite { .. } | Command::Unfavorite { .. } => {
                Route::Favorites
            }
            Command::Notifications => Route::Notifications,
            Command::Ads => Route::Ads,
            Command::SubmitAd { .. } => Route::SubmitAd,
            Command::Jobs | Command::JobComments { .. } => Route::Jobs,
            Command::PostJob { .. } => Route::PostJob,
            Command::ApplyJob { .. } => Route::ApplyJob,
            Command::CommentJob { .. } => Route::JobComments,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    match run(cli.command).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(notice) => {
            eprintln!("{}", notice);
            ExitCode::FAILURE
        }
    }
}

/// Load configuration and open the persisted session.
fn bootstrap() -> anyhow::Result<AppState> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let session_path = match &config.session_file {
        Some(path) => path.clone(),
        None => FileStore::default_path()?,
    };
    let storage = FileStore::open(&session_path)
        .with_context(|| format!("Failed to open session file {}", session_path.display()))?;
    tracing::debug!(api = %config.api_base_url, session = %session_path.display(), "Starting");

    let state = AppState::new(config, SessionStore::new(storage))
        .context("Failed to build HTTP client")?;
    Ok(state)
}

async fn run(command: Command) -> Result<String, Notice> {
    let state = bootstrap().map_err(|e| Notice::error(format!("{:#}", e)))?;

    // Reset is an explicit escape hatch and skips admission.
    if !matches!(command, Command::ResetAge) {
        let admission = state
            .gate
            .admit(command.route())
            .map_err(|e| Notice::error(e.user_message()))?;
        if let Admission::Redirect(target) = admission {
            // Answering the age prompt when already verified just lands on Home.
            if matches!(command, Command::VerifyAge { .. }) {
                return Ok(Notice::Redirect(target).to_string());
            }
            return Err(Notice::Redirect(target));
        }
    }

    dispatch(&state, command).await
}

async fn dispatch(state: &AppState, command: Command) -> Result<String, Notice> {
    let gate_err = |e: canna_connect::gate::GateError| Notice::error(e.user_message());
    let conn_err = |e: canna_connect::connections::ConnectionError| Notice::error(e.user_message());
    let api_err = |e: canna_connect::error::ApiError| Notice::error(e.user_message());

    match command {
        Command::VerifyAge { answer } => {
            let route = state
                .gate
                .verify_age(matches!(answer, Answer::Yes))
                .map_err(gate_err)?;
            Ok(Notice::Redirect(route).to_string())
        }
        Command::ResetAge => {
            let route = state.gate.reset_age_verification().map_err(gate_err)?;
            Ok(Notice::Redirect(route).to_string())
        }
        Command::Register {
            name,
            email,
            password,
            city,
            state: region,
            role,
        } => {
            let form = RegisterForm {
                name,
                email,
                password,
                city,
                state: region,
                role: Role::from(role),
            };
            state.gate.register(&form).await.map_err(gate_err)?;
            Ok(Notice::success(
                "Registration successful! Please check your email to verify your account.",
            )
            .to_string())
        }
        Command::Login { email, password } => {
            let route = state
                .gate
                .login(&Credentials { email, password })
                .await
                .map_err(gate_err)?;
            Ok(format!(
                "{}\n{}",
                Notice::success("Login successful!"),
                Notice::Redirect(route)
            ))
        }
        Command::Logout => {
            state.gate.logout().map_err(gate_err)?;
            Ok(Notice::success("Logged out.").to_string())
        }
        Command::Profile => {
            let user = state.api.fetch_profile().await.map_err(api_err)?;
            Ok(views::profile(&user))
        }
        Command::Discover { search, page } => {
            let mut connections = state.connections();
            let found = connections.discover(&search, page).await.map_err(conn_err)?;
            Ok(views::discover_page(found, page))
        }
        Command::Connect { user_id } => {
            let mut connections = state.connections();
            connections.send_request(user_id).await.map_err(conn_err)?;
            Ok(Notice::success("Connection request sent!").to_string())
        }
        Command::Pending => {
            let mut connections = state.connections();
            let pending = connections.load_pending().await.map_err(conn_err)?;
            Ok(views::pending_requests(pending))
        }
        Command::Respond {
            request_id,
            decision,
        } => {
            let mut connections = state.connections();
            connections.load_pending().await.map_err(conn_err)?;
            let decision = Decision::from(decision);
            connections
                .respond(request_id, decision)
                .await
                .map_err(conn_err)?;
            Ok(Notice::success(format!("Request {}", decision)).to_string())
        }
        Command::Favorites => {
            let mut connections = state.connections();
            let favorites = connections.load_favorites().await.map_err(conn_err)?;
            Ok(views::favorites(favorites))
        }
        Command::Favorite { user_id } => {
            let mut connections = state.connections();
            connections.add_favorite(user_id).await.map_err(conn_err)?;
            Ok(Notice::success("Added to favorites").to_string())
        }
        Command::Unfavorite { user_id } => {
            let mut connections = state.connections();
            connections
                .remove_favorite(user_id)
                .await
                .map_err(conn_err)?;
            Ok(Notice::success("Removed from favorites").to_string())
        }
        Command::Notifications => {
            let connections = state.connections();
            let items = connections.load_notifications().await.map_err(conn_err)?;
            Ok(views::notifications(&items))
        }
        Command::Ads => {
            let ads = state.api.list_ads().await.map_err(api_err)?;
            Ok(views::ads(&ads))
        }
        Command::SubmitAd {
            title,
            description,
            image_url,
            link,
        } => {
            let ad = NewAd {
                title,
                description,
                image_url,
                link,
            };
            state.api.create_ad(&ad).await.map_err(api_err)?;
            Ok(Notice::success("Ad submitted successfully!").to_string())
        }
        Command::Jobs => {
            let jobs = state.api.list_jobs().await.map_err(api_err)?;
            Ok(views::jobs(&jobs))
        }
        Command::PostJob {
            title,
            description,
            location,
            category,
            salary,
        } => {
            let job = NewJob {
                title,
                description,
                location,
                category,
                salary,
            };
            let created = state.api.create_job(&job).await.map_err(api_err)?;
            Ok(Notice::success(format!("Job {} posted!", created.id)).to_string())
        }
        Command::ApplyJob { job_id, resume } => {
            let app = state
                .api
                .apply_to_job(job_id, &resume)
                .await
                .map_err(api_err)?;
            Ok(views::application(&app))
        }
        Command::JobComments { job_id } => {
            let comments = state.api.list_job_comments(job_id).await.map_err(api_err)?;
            Ok(views::job_comments(&comments))
        }
        Command::CommentJob {
            job_id,
            content,
            parent_id,
        } => {
            let comment = NewComment { content, parent_id };
            state
                .api
                .add_job_comment(job_id, &comment)
                .await
                .map_err(api_err)?;
            Ok(Notice::success("Comment posted").to_string())
        }
    }
}

/// Initialize logging to stderr; JSON when `LOG_FORMAT=json`.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("canna_connect=info,warn"));

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}
