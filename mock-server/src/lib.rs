//! In-memory text-search backend used for local development and integration
//! tests. Implements the same REST contract as the production service.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

pub type DocId = u64;

pub const GREETING: &str = "Hello from the text search API!";

#[derive(Clone, Debug)]
pub struct Document {
    pub id: DocId,
    pub name: String,
    pub content: String,
    pub word_counts: HashMap<String, usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub id: DocId,
    pub name: String,
}

#[derive(Deserialize)]
pub struct UploadedFile {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub total_files: usize,
    pub doc_ids: Vec<DocId>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub remaining: usize,
}

#[derive(Deserialize)]
pub struct SearchRequest {
    pub words: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PerDocCount {
    pub doc_id: DocId,
    pub doc_name: String,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WordResult {
    pub word: String,
    pub total_count: usize,
    pub per_doc: Vec<PerDocCount>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<WordResult>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocStats {
    pub total_documents: usize,
    pub total_words: usize,
    pub total_bytes: usize,
    pub average_words_per_doc: f64,
}

/// Documents in insertion order plus the next id to hand out.
#[derive(Default)]
pub struct Index {
    docs: Vec<Document>,
    next_id: DocId,
}

impl Index {
    pub fn insert(&mut self, name: String, content: String) -> DocId {
        let id = self.next_id;
        self.next_id += 1;
        let word_counts = build_word_counts(&content);
        self.docs.push(Document {
            id,
            name,
            content,
            word_counts,
        });
        id
    }

    pub fn remove(&mut self, id: DocId) -> bool {
        let before = self.docs.len();
        self.docs.retain(|d| d.id != id);
        self.docs.len() != before
    }

    /// Drop every document and restart ids from zero.
    pub fn clear(&mut self) {
        self.docs.clear();
        self.next_id = 0;
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Documents containing `raw_word`, most occurrences first, ties by id.
    pub fn search_word(&self, raw_word: &str) -> WordResult {
        let word = normalize_token(raw_word);
        let mut per_doc: Vec<PerDocCount> = self
            .docs
            .iter()
            .filter_map(|doc| {
                doc.word_counts
                    .get(&word)
                    .copied()
                    .filter(|&count| count > 0)
                    .map(|count| PerDocCount {
                        doc_id: doc.id,
                        doc_name: doc.name.clone(),
                        count,
                    })
            })
            .collect();
        per_doc.sort_by(|a, b| b.count.cmp(&a.count).then(a.doc_id.cmp(&b.doc_id)));
        let total_count = per_doc.iter().map(|pd| pd.count).sum();
        WordResult {
            word,
            total_count,
            per_doc,
        }
    }

    pub fn stats(&self) -> DocStats {
        let total_documents = self.docs.len();
        let total_words = self
            .docs
            .iter()
            .map(|d| d.word_counts.values().sum::<usize>())
            .sum();
        let total_bytes = self.docs.iter().map(|d| d.content.len()).sum();
        let average_words_per_doc = if total_documents > 0 {
            total_words as f64 / total_documents as f64
        } else {
            0.0
        };
        DocStats {
            total_documents,
            total_words,
            total_bytes,
            average_words_per_doc,
        }
    }
}

/// Keep alphanumeric characters, lowercased.
pub fn normalize_token(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(normalize_token)
        .filter(|w| !w.is_empty())
        .collect()
}

pub fn build_word_counts(text: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for word in tokenize(text) {
        *counts.entry(word).or_insert(0) += 1;
    }
    counts
}

pub type Db = Arc<RwLock<Index>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Index::default()));
    Router::new()
        .route("/upload", post(upload_files))
        .route("/docs", get(list_docs).delete(delete_all_docs))
        .route("/docs/{id}", delete(delete_doc))
        .route("/search", post(search))
        .route("/stats", get(get_stats))
        .route("/hello", get(hello))
        .with_state(db)
}

/// Serve the API under `/api`, matching the production deployment.
pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, Router::new().nest("/api", app())).await
}

async fn upload_files(
    State(db): State<Db>,
    Json(files): Json<Vec<UploadedFile>>,
) -> Json<UploadResponse> {
    let mut index = db.write().await;
    let doc_ids: Vec<DocId> = files
        .into_iter()
        .map(|f| index.insert(f.name, f.content))
        .collect();
    info!(uploaded = doc_ids.len(), total = index.len(), "indexed documents");
    Json(UploadResponse {
        total_files: index.len(),
        doc_ids,
    })
}

async fn list_docs(State(db): State<Db>) -> Json<Vec<DocumentInfo>> {
    let index = db.read().await;
    Json(
        index
            .docs
            .iter()
            .map(|d| DocumentInfo {
                id: d.id,
                name: d.name.clone(),
            })
            .collect(),
    )
}

async fn delete_doc(
    State(db): State<Db>,
    Path(id): Path<DocId>,
) -> Result<Json<DeleteResponse>, (StatusCode, String)> {
    let mut index = db.write().await;
    if !index.remove(id) {
        debug!(id, "delete of unknown document");
        return Err((StatusCode::NOT_FOUND, format!("Document with id {id} not found")));
    }
    info!(id, remaining = index.len(), "deleted document");
    Ok(Json(DeleteResponse {
        success: true,
        remaining: index.len(),
    }))
}

async fn delete_all_docs(State(db): State<Db>) -> Json<DeleteResponse> {
    db.write().await.clear();
    info!("deleted all documents");
    Json(DeleteResponse {
        success: true,
        remaining: 0,
    })
}

async fn search(State(db): State<Db>, Json(req): Json<SearchRequest>) -> Json<SearchResponse> {
    let index = db.read().await;
    let results = req
        .words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(|w| index.search_word(w))
        .collect();
    Json(SearchResponse { results })
}

async fn get_stats(State(db): State<Db>) -> Json<DocStats> {
    Json(db.read().await.stats())
}

async fn hello() -> &'static str {
    GREETING
}
