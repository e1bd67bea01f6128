//! Wire DTOs for the text-search API.
//!
//! # Design
//! These mirror the mock-server's schema but are defined independently;
//! integration tests catch drift between the two crates. Response types ignore
//! unknown fields so newer backends that add timing or snippet data still parse.

use serde::{Deserialize, Serialize};

/// Server-assigned document identifier.
pub type DocId = u64;

/// One file to index: its display name and full text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub content: String,
}

/// Result of `POST /upload`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadResponse {
    /// Documents held by the server after the upload.
    pub total_files: usize,
    /// Ids assigned to the uploaded files, in upload order.
    pub doc_ids: Vec<DocId>,
}

/// Entry of `GET /docs`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentInfo {
    pub id: DocId,
    pub name: String,
}

/// Acknowledgment for both `DELETE /docs/{id}` and `DELETE /docs`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteResponse {
    pub success: bool,
    pub remaining: usize,
}

/// Body of `POST /search`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchRequest {
    pub words: Vec<String>,
}

impl SearchRequest {
    /// Trim each term and drop the empty ones.
    pub fn new<S: AsRef<str>>(words: &[S]) -> Self {
        Self {
            words: words
                .iter()
                .map(|w| w.as_ref().trim())
                .filter(|w| !w.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Envelope returned by `POST /search`.
///
/// `benchmark` and `docs_with_all_words` are only sent by backends that time
/// their search or intersect the query words; both are `None` otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub results: Vec<WordResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<BenchmarkTiming>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs_with_all_words: Option<Vec<DocumentMatch>>,
}

/// Server-side search timings in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BenchmarkTiming {
    pub parallel_ms: f64,
    pub sequential_ms: f64,
    pub speedup: f64,
}

/// A document containing every query word.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentMatch {
    pub doc_id: DocId,
    pub doc_name: String,
    pub matched_words: usize,
}

/// Matches for one query word.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WordResult {
    /// The word as normalized by the server.
    pub word: String,
    pub total_count: usize,
    /// Matching documents, ranked by the server.
    pub per_doc: Vec<PerDocCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PerDocCount {
    pub doc_id: DocId,
    pub doc_name: String,
    pub count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub snippets: Vec<String>,
}

/// Result of `GET /stats`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocStats {
    pub total_documents: usize,
    pub total_words: usize,
    pub total_bytes: usize,
    pub average_words_per_doc: f64,
}
