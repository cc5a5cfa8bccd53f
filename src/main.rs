//! Command-line runner: restores or opens a session, then pages through the
//! public article list the way the article browser does.
//!
//! Credentials come from `BLOGGY_EMAIL` / `BLOGGY_PASSWORD`; without them the
//! runner stays anonymous (or reuses the session persisted in
//! `BLOGGY_SESSION_FILE`).

use std::sync::Arc;
use std::time::Duration;

use bloggy::api::{AdminArticles, ApiError, PublicArticles, SettingsApi};
use bloggy::articles::{ADMIN_PAGE_SIZE, ArticleFilter, ArticleList, ListView, PUBLIC_PAGE_SIZE};
use bloggy::auth::{AuthError, FileStore, Navigator, RouteGuard, SessionManager};
use bloggy::config::{ClientConfig, ConfigError};
use bloggy::net::transport::{ReqwestTransport, TransportError};

/// How often the session file is re-read for changes made by other clients.
const SESSION_POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[tokio::main]
async fn main() -> Result<(), RunError> {
    tracing_subscriber::fmt::init();
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "no .env loaded");
    }

    let config = ClientConfig::from_env()?;
    tracing::info!(environment = ?config.environment, blog = %config.blog_api_url, "bloggy starting");

    let transport = Arc::new(ReqwestTransport::new(config.timeouts)?);
    let store = Arc::new(FileStore::open(config.session_file.clone()));
    let navigator: Arc<dyn Navigator> = Arc::new(|to: &str| tracing::info!(to, "navigate"));
    let session = Arc::new(SessionManager::new(&config, transport.clone(), store, Arc::clone(&navigator)));

    if let (Ok(email), Ok(password)) = (std::env::var("BLOGGY_EMAIL"), std::env::var("BLOGGY_PASSWORD")) {
        session.login(&email, &password).await?;
    } else if let Some(info) = session.user_info() {
        tracing::info!(email = %info.email, "restored persisted session");
    }

    let guard = RouteGuard::mount(Arc::clone(&session), navigator, "/articles/manage", config.login_path.clone());
    let watcher = tokio::spawn(watch_session_file(Arc::clone(&session)));
    if guard.can_render() {
        show_admin_summary(&config, &session).await?;
    }

    let settings = SettingsApi::new(&config, transport.clone()).blog_settings_or_default().await;
    tracing::info!(title = %settings.blog_title, subtitle = %settings.blog_subtitle, "blog");

    browse_public(&config, transport).await;
    watcher.abort();
    Ok(())
}

/// Re-read the shared session file so a login or logout elsewhere reaches
/// the mounted guard.
async fn watch_session_file(session: Arc<SessionManager>) {
    let mut ticks = tokio::time::interval(SESSION_POLL_INTERVAL);
    loop {
        ticks.tick().await;
        session.sync_from_store();
    }
}

async fn show_admin_summary(config: &ClientConfig, session: &Arc<SessionManager>) -> Result<(), RunError> {
    let profile = session.fetch_profile().await?;
    tracing::info!(user = %profile.full_name, role = ?profile.role, "signed in");

    let drafts = ArticleList::new(Arc::new(AdminArticles::new(config, Arc::clone(session))), ADMIN_PAGE_SIZE);
    drafts.change_filter(ArticleFilter::from_toggles(true, false)).await;
    match drafts.view() {
        ListView::Failed { message, .. } => tracing::warn!(%message, "could not load drafts"),
        _ => {
            let total = drafts.snapshot().total_count().unwrap_or(0);
            tracing::info!(total, "draft articles");
        }
    }
    Ok(())
}

async fn browse_public(config: &ClientConfig, transport: Arc<ReqwestTransport>) {
    let list = ArticleList::new(Arc::new(PublicArticles::new(config, transport)), PUBLIC_PAGE_SIZE);
    list.change_filter(ArticleFilter::default()).await;

    let mut shown = 0;
    loop {
        match list.view() {
            ListView::NoResults => {
                tracing::info!("no published articles");
                return;
            }
            ListView::Items { items, show_sentinel, .. } => {
                for article in &items[shown..] {
                    tracing::info!(title = %article.title, slug = %article.slug, read = %article.reading_time(), "article");
                }
                shown = items.len();
                if !show_sentinel {
                    tracing::info!(count = shown, "end of list");
                    return;
                }
                list.sentinel_visible().await;
            }
            ListView::Failed { message, .. } => {
                tracing::warn!(%message, "article list failed");
                return;
            }
            ListView::Idle | ListView::Loading => return,
        }
    }
}
