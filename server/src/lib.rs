use anyhow::{Context, Result};
use axum::{extract::{Path, Query, State}, http::{HeaderMap, HeaderValue, StatusCode}, routing::{get, post}, Json, Router};
use notesearch_core::scanner::{ScanOptions, Scanner};
use notesearch_core::search::query_terms;
use notesearch_core::{DocId, IndexStats, NoteIndex, Posting};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

const MAX_K: usize = 100;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 20 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub path: String,
    pub score: f64,
    pub snippet: String,
    pub highlighted: String,
}

#[derive(Serialize)]
pub struct DocResponse {
    pub doc_id: DocId,
    pub path: String,
    pub content: String,
}

#[derive(Serialize)]
pub struct TermResponse {
    pub term: String,
    pub document_frequency: usize,
    pub postings: Vec<Posting>,
}

#[derive(Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: IndexStats,
    pub indexed_at: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub root: PathBuf,
    pub scan: ScanOptions,
    pub admin_token: Option<String>,
    /// Allowed CORS origins; empty allows any.
    pub cors_origins: Vec<HeaderValue>,
}

impl ServerConfig {
    /// Config for `root`, with `ADMIN_TOKEN` and `CORS_ALLOW_ORIGIN` taken from the environment.
    pub fn from_env<S: AsRef<str>>(root: &str, extensions: &[S]) -> Self {
        let cors_origins = std::env::var("CORS_ALLOW_ORIGIN").map(|v| parse_origins(&v)).unwrap_or_default();
        Self {
            root: PathBuf::from(root),
            scan: ScanOptions::with_extensions(extensions.iter().map(|e| e.as_ref())),
            admin_token: std::env::var("ADMIN_TOKEN").ok(),
            cors_origins,
        }
    }

    fn cors_layer(&self) -> CorsLayer {
        let allow = if self.cors_origins.is_empty() {
            AllowOrigin::from(Any)
        } else {
            AllowOrigin::list(self.cors_origins.iter().cloned())
        };
        CorsLayer::new().allow_origin(allow).allow_methods(Any).allow_headers(Any)
    }
}

/// Comma-separated origins; blanks and values that aren't valid header values are dropped.
pub fn parse_origins(raw: &str) -> Vec<HeaderValue> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect()
}

/// The live index and when it was built.
pub struct Corpus {
    pub notes: NoteIndex,
    pub indexed_at: String,
}

#[derive(Clone)]
pub struct AppState {
    pub corpus: Arc<RwLock<Corpus>>,
    pub root: PathBuf,
    pub scan: ScanOptions,
    pub admin_token: Option<String>,
}

pub fn build_app(config: ServerConfig) -> Result<Router> {
    let cors = config.cors_layer();
    // Index the root once at startup
    let mut notes = NoteIndex::new();
    load_into(&mut notes, &config.root, &config.scan)?;
    let corpus = Corpus { notes, indexed_at: now_rfc3339() };
    let app_state = AppState {
        corpus: Arc::new(RwLock::new(corpus)),
        root: config.root,
        scan: config.scan,
        admin_token: config.admin_token,
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .route("/term/:term", get(term_handler))
        .route("/stats", get(stats_handler))
        .route("/index/rebuild", post(rebuild_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

fn load_into(notes: &mut NoteIndex, root: &std::path::Path, scan: &ScanOptions) -> Result<()> {
    let mut scanner = Scanner::new(scan.clone());
    let files = scanner.scan(root).with_context(|| format!("failed to index {}", root.display()))?;
    notes.add_all(files.into_iter().map(|f| (f.path.display().to_string(), f.content)));
    Ok(())
}

fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "".into())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let k = if params.k == 0 { MAX_K } else { params.k.min(MAX_K) };
    let terms = query_terms(&params.q);

    let page = state.corpus.read().notes.search_page(&params.q, k);
    let results = page
        .results
        .into_iter()
        .map(|r| {
            let highlighted = highlight_terms(&r.snippet, &terms);
            SearchHit { doc_id: r.doc_id, path: r.path, score: r.score, snippet: r.snippet, highlighted }
        })
        .collect();

    let elapsed = start.elapsed();
    Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits: page.total_hits, results })
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<DocId>) -> Result<Json<DocResponse>, (StatusCode, Json<serde_json::Value>)> {
    let corpus = state.corpus.read();
    match corpus.notes.get_document(doc_id) {
        Some(doc) => Ok(Json(DocResponse { doc_id, path: doc.path.clone(), content: doc.content.clone() })),
        None => Err((StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "not found" })))),
    }
}

pub async fn term_handler(State(state): State<AppState>, Path(term): Path<String>) -> Json<TermResponse> {
    let term = term.to_ascii_lowercase();
    let corpus = state.corpus.read();
    let postings = corpus.notes.get_postings(&term).map(<[Posting]>::to_vec).unwrap_or_default();
    let document_frequency = corpus.notes.get_document_frequency(&term);
    Json(TermResponse { term, document_frequency, postings })
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let corpus = state.corpus.read();
    Json(StatsResponse { stats: corpus.notes.stats(), indexed_at: corpus.indexed_at.clone() })
}

fn highlight_terms(snippet: &str, terms: &[String]) -> String {
    if terms.is_empty() {
        return snippet.to_string();
    }
    // One alternation so inserted tags are never matched again; longer terms first.
    let mut sorted: Vec<&String> = terms.iter().collect();
    sorted.sort_by_key(|t| std::cmp::Reverse(t.len()));
    let alternation = sorted.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join("|");
    match regex::RegexBuilder::new(&alternation).case_insensitive(true).build() {
        Ok(pat) => pat.replace_all(snippet, |caps: &regex::Captures| format!("<em>{}</em>", &caps[0])).to_string(),
        Err(_) => snippet.to_string(),
    }
}

// --- Admin endpoints ---
async fn rebuild_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<StatsResponse>, (StatusCode, String)> {
    check_admin_token(state.admin_token.as_deref(), &headers)?;

    // Scan outside the lock; searches keep running against the old corpus.
    let root = state.root.clone();
    let scan = state.scan.clone();
    let fresh = tokio::task::spawn_blocking(move || -> Result<NoteIndex> {
        let mut notes = NoteIndex::new();
        load_into(&mut notes, &root, &scan)?;
        Ok(notes)
    })
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}")))?;

    let mut corpus = state.corpus.write();
    *corpus = Corpus { notes: fresh, indexed_at: now_rfc3339() };
    let stats = corpus.notes.stats();
    tracing::info!(documents = stats.documents, vocabulary = stats.vocabulary, "index rebuilt");
    Ok(Json(StatsResponse { stats, indexed_at: corpus.indexed_at.clone() }))
}

/// Rebuilds are refused outright unless a token is configured.
fn check_admin_token(expected: Option<&str>, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let Some(expected) = expected else {
        return Err((StatusCode::UNAUTHORIZED, "rebuild disabled: ADMIN_TOKEN not set".into()));
    };
    match headers.get("X-ADMIN-TOKEN").map(HeaderValue::to_str) {
        Some(Ok(given)) if given == expected => Ok(()),
        Some(_) => Err((StatusCode::UNAUTHORIZED, "invalid admin token".into())),
        None => Err((StatusCode::UNAUTHORIZED, "missing X-ADMIN-TOKEN header".into())),
    }
}
