use careportal_core::config::{
    data_dir_from_env_value, feed_cap_from_env_value, seed_from_env_value,
    tick_period_from_env_value,
};
use careportal_core::models::{
    Appointment, AppointmentStatus, Article, ArticlePatch, ArticleStatus, AuthorType,
};
use careportal_core::{
    AppContext, AppointmentFilter, ArticleFilter, CoreConfig, Fallback, FileStorage,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "careportal")]
#[command(about = "CarePortal local data CLI")]
struct Cli {
    /// Data directory (defaults to CAREPORTAL_DATA_DIR, then ./careportal_data)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Health articles
    Articles {
        #[command(subcommand)]
        command: ArticleCommands,
    },
    /// Patient appointments
    Appointments {
        #[command(subcommand)]
        command: AppointmentCommands,
    },
    /// Active user profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Delete every persisted store
    Reset,
}

#[derive(Subcommand)]
enum ArticleCommands {
    /// List articles
    List {
        /// draft or published
        #[arg(long)]
        status: Option<String>,
        /// doctor or admin
        #[arg(long)]
        author_type: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Free-text search over title, content and author name
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one article
    Show { id: String },
    /// Mark an article as published
    Publish { id: String },
    /// Delete an article
    Delete { id: String },
}

#[derive(Subcommand)]
enum AppointmentCommands {
    /// List appointments
    List {
        #[arg(long)]
        patient: Option<String>,
        #[arg(long)]
        doctor: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Cancel an appointment
    Cancel { id: String },
    /// Delete an appointment
    Delete { id: String },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Print the profile and first-login state
    Show,
    /// Mark onboarding as completed
    CompleteOnboarding,
    /// Forget the persisted profile
    Clear,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("careportal=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| data_dir_from_env_value(std::env::var("CAREPORTAL_DATA_DIR").ok()));
    let cfg = CoreConfig::new(
        data_dir,
        seed_from_env_value(std::env::var("CAREPORTAL_SEED").ok())?,
        tick_period_from_env_value(std::env::var("CAREPORTAL_TICK_MS").ok())?,
        feed_cap_from_env_value(std::env::var("CAREPORTAL_FEED_CAP").ok())?,
    )?;

    match cli.command {
        Some(Commands::Articles { command }) => run_articles(&cfg, command)?,
        Some(Commands::Appointments { command }) => run_appointments(&cfg, command)?,
        Some(Commands::Profile { command }) => run_profile(&cfg, command)?,
        Some(Commands::Reset) => {
            let storage = FileStorage::open(cfg.data_dir())?;
            AppContext::reset_storage(&storage)?;
            println!("Cleared stores in {}", storage.dir().display());
        }
        None => {
            println!("Use 'careportal --help' for commands");
        }
    }

    Ok(())
}

/// Read-only commands never write seed data into a fresh data directory.
fn fallback_for(read_only: bool) -> Fallback {
    if read_only {
        Fallback::InMemory
    } else {
        Fallback::WriteBack
    }
}

fn run_articles(cfg: &CoreConfig, command: ArticleCommands) -> Result<(), Box<dyn std::error::Error>> {
    let read_only = matches!(
        command,
        ArticleCommands::List { .. } | ArticleCommands::Show { .. }
    );
    let mut ctx = AppContext::open_with(cfg, fallback_for(read_only))?;

    match command {
        ArticleCommands::List {
            status,
            author_type,
            author,
            category,
            search,
        } => {
            let filter = ArticleFilter {
                status: status.as_deref().map(str::parse::<ArticleStatus>).transpose()?,
                author_type: author_type
                    .as_deref()
                    .map(str::parse::<AuthorType>)
                    .transpose()?,
                author_id: author,
                category,
                text: search,
            };
            let articles = ctx.articles.filter(&filter);
            if articles.is_empty() {
                println!("No articles found.");
            }
            for article in articles {
                print_article_line(article);
            }
        }
        ArticleCommands::Show { id } => match ctx.articles.get_by_id(&id) {
            Some(article) => {
                print_article_line(article);
                println!("Category: {}", article.category);
                if !article.tags.is_empty() {
                    let tags: Vec<&str> = article.tags.iter().map(String::as_str).collect();
                    println!("Tags: {}", tags.join(", "));
                }
                println!("Created: {}, Updated: {}", article.created_at, article.updated_at);
                println!();
                println!("{}", article.content);
            }
            None => eprintln!("No article with ID: {}", id),
        },
        ArticleCommands::Publish { id } => {
            match ctx
                .articles
                .update(&id, ArticlePatch::status(ArticleStatus::Published))?
            {
                Some(article) => println!("Published article {}: {}", article.id, article.title),
                None => eprintln!("No article with ID: {}", id),
            }
        }
        ArticleCommands::Delete { id } => {
            if ctx.articles.delete(&id)? {
                println!("Deleted article {}", id);
            } else {
                eprintln!("No article with ID: {}", id);
            }
        }
    }

    Ok(())
}

fn run_appointments(
    cfg: &CoreConfig,
    command: AppointmentCommands,
) -> Result<(), Box<dyn std::error::Error>> {
    let read_only = matches!(command, AppointmentCommands::List { .. });
    let mut ctx = AppContext::open_with(cfg, fallback_for(read_only))?;

    match command {
        AppointmentCommands::List {
            patient,
            doctor,
            status,
        } => {
            let filter = AppointmentFilter {
                patient_id: patient,
                doctor_id: doctor,
                status: status
                    .as_deref()
                    .map(str::parse::<AppointmentStatus>)
                    .transpose()?,
            };
            let appointments = ctx.appointments.filter(&filter);
            if appointments.is_empty() {
                println!("No appointments found.");
            }
            for appointment in appointments {
                print_appointment_line(appointment);
            }
        }
        AppointmentCommands::Cancel { id } => match ctx.appointments.cancel(&id)? {
            Some(appointment) => println!("Cancelled appointment {}", appointment.id),
            None => eprintln!("No appointment with ID: {}", id),
        },
        AppointmentCommands::Delete { id } => {
            if ctx.appointments.delete(&id)? {
                println!("Deleted appointment {}", id);
            } else {
                eprintln!("No appointment with ID: {}", id);
            }
        }
    }

    Ok(())
}

fn run_profile(cfg: &CoreConfig, command: ProfileCommands) -> Result<(), Box<dyn std::error::Error>> {
    let read_only = matches!(command, ProfileCommands::Show);
    let mut ctx = AppContext::open_with(cfg, fallback_for(read_only))?;

    match command {
        ProfileCommands::Show => {
            let profile = ctx.profile.get();
            let name = profile.full_name();
            println!(
                "ID: {}, Name: {}, First login: {}",
                if profile.id.is_empty() { "-" } else { profile.id.as_str() },
                if name.is_empty() { "-" } else { name.as_str() },
                if ctx.profile.is_first_login() { "yes" } else { "no" }
            );
            if !profile.allergies.is_empty() {
                println!("Allergies: {}", profile.allergies.join(", "));
            }
            if !profile.medications.is_empty() {
                println!("Medications: {}", profile.medications.join(", "));
            }
            if !profile.conditions.is_empty() {
                println!("Conditions: {}", profile.conditions.join(", "));
            }
        }
        ProfileCommands::CompleteOnboarding => {
            ctx.profile.complete_onboarding()?;
            println!("Onboarding completed");
        }
        ProfileCommands::Clear => {
            ctx.profile.clear()?;
            println!("Cleared user profile");
        }
    }

    Ok(())
}

fn print_article_line(article: &Article) {
    println!(
        "ID: {}, Title: {}, Author: {} ({}), Status: {}",
        article.id, article.title, article.author_name, article.author_type, article.status
    );
}

fn print_appointment_line(appointment: &Appointment) {
    println!(
        "ID: {}, Patient: {}, Doctor: {}, When: {} {}, Type: {}, Status: {}",
        appointment.id,
        appointment.patient_name,
        appointment.doctor_name,
        appointment.date.format("%Y-%m-%d"),
        appointment.time,
        appointment.appointment_type,
        appointment.status
    );
}
