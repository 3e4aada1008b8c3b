use careportal_core::models::{
    AppointmentStatus, ArticlePatch, ArticleStatus, AuthorType, NewArticle, UserProfilePatch,
};
use careportal_core::seed::{sample_appointments, sample_articles};
use careportal_core::{AppContext, CoreConfig};
use std::collections::BTreeSet;
use tempfile::TempDir;

fn config(temp_dir: &TempDir) -> CoreConfig {
    CoreConfig::with_data_dir(temp_dir.path().join("store")).expect("valid config")
}

fn draft(title: &str) -> NewArticle {
    NewArticle {
        title: title.into(),
        content: "Drink water.".into(),
        author_id: "doc-1".into(),
        author_name: "Dr. Sarah Johnson".into(),
        author_type: AuthorType::Doctor,
        status: ArticleStatus::Draft,
        category: "Wellness".into(),
        tags: BTreeSet::from(["hydration".to_string()]),
        image_url: None,
    }
}

#[test]
fn test_changes_survive_a_restart() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let cfg = config(&temp_dir);

    let (article_id, articles, appointments, profile) = {
        let mut ctx = AppContext::open(&cfg).expect("first session");
        let article = ctx.articles.add(draft("A")).unwrap();
        ctx.articles
            .update(&article.id, ArticlePatch::status(ArticleStatus::Published))
            .unwrap();
        ctx.appointments.cancel("2").unwrap();
        ctx.profile
            .update(UserProfilePatch {
                first_name: Some("John".into()),
                last_name: Some("Doe".into()),
                ..UserProfilePatch::default()
            })
            .unwrap();
        ctx.profile.complete_onboarding().unwrap();

        (
            article.id,
            ctx.articles.list().to_vec(),
            ctx.appointments.list().to_vec(),
            ctx.profile.get().clone(),
        )
    };

    let ctx = AppContext::open(&cfg).expect("second session");

    assert_eq!(ctx.articles.list(), articles.as_slice());
    assert_eq!(ctx.appointments.list(), appointments.as_slice());
    assert_eq!(ctx.profile.get(), &profile);
    assert!(!ctx.profile.is_first_login());
    assert_eq!(
        ctx.articles.get_by_id(&article_id).unwrap().status,
        ArticleStatus::Published
    );
    assert_eq!(
        ctx.appointments.get_by_id("2").unwrap().status,
        AppointmentStatus::Cancelled
    );
}

#[test]
fn test_corrupt_articles_file_falls_back_to_seed() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let cfg = config(&temp_dir);
    {
        let mut ctx = AppContext::open(&cfg).unwrap();
        ctx.appointments.delete("1").unwrap();
    }
    std::fs::write(cfg.data_dir().join("articles.json"), "{ not json").unwrap();

    let ctx = AppContext::open(&cfg).expect("hydration must not fail on corrupt data");

    assert_eq!(ctx.articles.list(), sample_articles().as_slice());
    assert_eq!(ctx.appointments.len(), sample_appointments().len() - 1);

    let rewritten = std::fs::read_to_string(cfg.data_dir().join("articles.json")).unwrap();
    assert!(rewritten.trim_start().starts_with('['));
}

#[test]
fn test_ids_stay_unique_across_sessions() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let cfg = config(&temp_dir);

    let first = AppContext::open(&cfg)
        .unwrap()
        .articles
        .add(draft("first"))
        .unwrap();
    let mut ctx = AppContext::open(&cfg).unwrap();
    let second = ctx.articles.add(draft("second")).unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(ctx.articles.len(), sample_articles().len() + 2);
}

#[test]
fn test_reset_restores_seed_and_first_login() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let cfg = config(&temp_dir);
    {
        let mut ctx = AppContext::open(&cfg).unwrap();
        ctx.articles.delete("1").unwrap();
        ctx.profile.complete_onboarding().unwrap();
        AppContext::reset_storage(ctx.storage().as_ref()).unwrap();
    }

    let ctx = AppContext::open(&cfg).unwrap();

    assert_eq!(ctx.articles.len(), sample_articles().len());
    assert!(ctx.profile.is_first_login());
}
