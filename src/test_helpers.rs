//! Shared fixtures for unit tests: scripted transport, navigator, articles.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use crate::auth::{MemoryStore, Navigator, SessionManager};
use crate::config::{ClientConfig, Environment, Timeouts};
use crate::net::transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};
use crate::net::types::{Article, ArticlePage, ArticleStatus};

pub const IDENTITY_URL: &str = "http://identity.test";
pub const BLOG_URL: &str = "http://blog.test";

pub fn test_config() -> ClientConfig {
    ClientConfig {
        environment: Environment::Development,
        identity_api_url: IDENTITY_URL.to_owned(),
        blog_api_url: BLOG_URL.to_owned(),
        login_path: "/login".to_owned(),
        session_file: std::path::PathBuf::from("unused.json"),
        timeouts: Timeouts::default(),
    }
}

// =============================================================================
// MockTransport
// =============================================================================

type Reply = Result<HttpResponse, TransportError>;

struct Route {
    method: Method,
    path: String,
    queued: VecDeque<Reply>,
    always: Option<Reply>,
}

/// Transport that answers by method + URL path suffix.
///
/// Queued replies are consumed first, then the sticky `always` reply; an
/// unmatched request gets a 404.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn route_mut<R>(&self, method: &Method, path: &str, f: impl FnOnce(&mut Route) -> R) -> R {
        let mut routes = self.routes.lock().unwrap();
        if let Some(route) = routes.iter_mut().find(|r| &r.method == method && r.path == path) {
            return f(route);
        }
        routes.push(Route { method: method.clone(), path: path.to_owned(), queued: VecDeque::new(), always: None });
        let route = routes.last_mut().unwrap();
        f(route)
    }

    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        let reply = Ok(HttpResponse::new(status, body.to_string()));
        self.route_mut(&method, path, |r| r.queued.push_back(reply));
    }

    pub fn fail(&self, method: Method, path: &str, error: TransportError) {
        self.route_mut(&method, path, |r| r.queued.push_back(Err(error)));
    }

    pub fn always(&self, method: Method, path: &str, status: u16, body: Value) {
        let reply = Ok(HttpResponse::new(status, body.to_string()));
        self.route_mut(&method, path, |r| r.always = Some(reply));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| url_path(&r.url) == path)
            .count()
    }

    pub fn total(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

fn url_path(url: &str) -> &str {
    [IDENTITY_URL, BLOG_URL]
        .iter()
        .find_map(|base| url.strip_prefix(base))
        .unwrap_or(url)
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        let path = url_path(&request.url).to_owned();
        let mut routes = self.routes.lock().unwrap();
        let Some(route) = routes.iter_mut().find(|r| r.method == request.method && r.path == path) else {
            return Ok(HttpResponse::new(404, ""));
        };
        if let Some(reply) = route.queued.pop_front() {
            return reply;
        }
        route.always.clone().unwrap_or_else(|| Ok(HttpResponse::new(404, "")))
    }
}

// =============================================================================
// Navigator + session
// =============================================================================

#[derive(Default)]
pub struct RecordingNavigator {
    pub visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, to: &str) {
        self.visited.lock().unwrap().push(to.to_owned());
    }
}

pub struct Harness {
    pub transport: Arc<MockTransport>,
    pub store: Arc<MemoryStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub session: Arc<SessionManager>,
}

pub fn harness() -> Harness {
    let transport = MockTransport::new();
    let store = Arc::new(MemoryStore::new());
    let navigator = Arc::new(RecordingNavigator::default());
    let session = Arc::new(SessionManager::new(
        &test_config(),
        transport.clone(),
        store.clone(),
        navigator.clone(),
    ));
    Harness { transport, store, navigator, session }
}

pub fn login_body() -> Value {
    json!({ "email": "a@b.com", "fullName": "A B", "accessToken": "tok1" })
}

pub fn profile_body() -> Value {
    json!({
        "userId": "u1",
        "email": "a@b.com",
        "isEmailConfirmed": true,
        "firstName": "A",
        "lastName": "B",
        "fullName": "A B",
        "role": "Admin",
        "status": "Active",
        "lastLoginDate": "2025-01-01T00:00:00Z",
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-06-01T00:00:00Z"
    })
}

/// Script a successful login + profile and run it.
pub async fn logged_in() -> Harness {
    let h = harness();
    h.transport.respond(Method::POST, "/auth/login", 200, login_body());
    h.transport.respond(Method::GET, "/auth/profile", 200, profile_body());
    h.session.login("a@b.com", "x").await.unwrap();
    h
}

// =============================================================================
// Articles
// =============================================================================

pub fn article(n: usize) -> Article {
    Article {
        article_id: format!("a{n}"),
        author_id: "u1".to_owned(),
        title: format!("Article {n}"),
        subtitle: String::new(),
        summary: String::new(),
        content: String::new(),
        slug: format!("article-{n}"),
        thumbnail_url: String::new(),
        cover_image_url: String::new(),
        time_to_read_in_minute: 3,
        likes: 0,
        tags: Vec::new(),
        tag_ids: Vec::new(),
        status: ArticleStatus::Published,
        created_at: "2025-01-01T00:00:00Z".to_owned(),
        updated_at: "2025-01-01T00:00:00Z".to_owned(),
        published_at: None,
        archived_at: None,
        original_article_info: None,
    }
}

/// Page `page` of a `total`-item collection, `page_size` items per page.
pub fn page_of(page: u32, page_size: u32, total: u64) -> ArticlePage {
    let start = (page as usize - 1) * page_size as usize;
    let end = (start + page_size as usize).min(usize::try_from(total).unwrap());
    ArticlePage {
        page,
        page_size,
        total_count: total,
        results: (start..end).map(article).collect(),
    }
}
