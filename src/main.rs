use std::sync::Arc;

use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use careportal_core::config::{
    data_dir_from_env_value, feed_cap_from_env_value, seed_from_env_value,
    tick_period_from_env_value,
};
use careportal_core::models::{AppointmentStatus, ArticleStatus};
use careportal_core::realtime::{NotificationFeed, OrderTracker, Scheduler};
use careportal_core::{AppContext, CoreConfig};

/// Main entry point for the CarePortal runner
///
/// Hydrates the article, appointment and profile stores from the data directory, logs a
/// summary, then runs the notification and order-tracking simulations until Ctrl-C.
///
/// # Environment Variables
/// - `CAREPORTAL_DATA_DIR`: Directory holding the store files (default: "careportal_data")
/// - `CAREPORTAL_SEED`: Seed sample data when a store is empty or unreadable (default: true)
/// - `CAREPORTAL_TICK_MS`: Simulation tick period in milliseconds (default: 30000)
/// - `CAREPORTAL_FEED_CAP`: Maximum notifications kept in the feed (default: 50)
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("careportal=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Resolve configuration once at startup.
    let cfg = Arc::new(CoreConfig::new(
        data_dir_from_env_value(std::env::var("CAREPORTAL_DATA_DIR").ok()),
        seed_from_env_value(std::env::var("CAREPORTAL_SEED").ok())?,
        tick_period_from_env_value(std::env::var("CAREPORTAL_TICK_MS").ok())?,
        feed_cap_from_env_value(std::env::var("CAREPORTAL_FEED_CAP").ok())?,
    )?);

    tracing::info!("++ Starting CarePortal in {}", cfg.data_dir().display());

    let ctx = AppContext::open(&cfg)?;
    log_summary(&ctx);

    let scheduler = Scheduler::new();
    let feed = scheduler.spawn(NotificationFeed::new(cfg.feed_cap()), cfg.tick_period());
    feed.subscribe(|feed| {
        tracing::debug!("{} unread notifications", feed.unread_count());
    });

    let orders = scheduler.spawn(OrderTracker::with_sample_orders(), cfg.tick_period());
    orders.subscribe(|tracker| {
        tracing::debug!("{} medicine orders in transit", tracker.active().count());
    });

    tracing::info!(
        "++ Simulations running every {:?}, press Ctrl-C to stop",
        cfg.tick_period()
    );
    tokio::signal::ctrl_c().await?;

    feed.stop();
    orders.stop();
    let unread = feed.with_state(|feed| feed.unread_count());
    tracing::info!("-- Stopped at {} with {} unread notifications", Utc::now(), unread);

    Ok(())
}

fn log_summary(ctx: &AppContext) {
    let articles = &ctx.articles;
    tracing::info!(
        "articles: {} total, {} published, {} drafts, categories: {}",
        articles.len(),
        articles.by_status(ArticleStatus::Published).len(),
        articles.by_status(ArticleStatus::Draft).len(),
        articles.categories().join(", ")
    );

    let appointments = &ctx.appointments;
    let upcoming = appointments
        .list()
        .iter()
        .filter(|a| {
            matches!(
                a.status,
                AppointmentStatus::Scheduled
                    | AppointmentStatus::Confirmed
                    | AppointmentStatus::Upcoming
                    | AppointmentStatus::Rescheduled
            )
        })
        .count();
    tracing::info!(
        "appointments: {} total, {} upcoming",
        appointments.len(),
        upcoming
    );

    let profile = ctx.profile.get();
    if ctx.profile.is_first_login() {
        tracing::info!("profile: first login, onboarding pending");
    } else {
        tracing::info!("profile: {} ({})", profile.full_name(), profile.id);
    }
}
