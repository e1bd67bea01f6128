//! Blocking API client for the text-search backend.
//!
//! # Overview
//! Wraps the backend's REST endpoints (upload, list, delete, search, stats,
//! health check) behind one request helper with uniform error semantics: every
//! call issues exactly one HTTP request and returns either the decoded payload
//! or an `ApiError`.
//!
//! # Design
//! - `SearchClient` holds only an immutable `ClientConfig` and a `Transport`.
//! - Each operation is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit and both halves are
//!   testable without a network.
//! - `UreqTransport` is the default transport; anything implementing
//!   `Transport` can replace it.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::SearchClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{
    BenchmarkTiming, DeleteResponse, DocId, DocStats, DocumentInfo, DocumentMatch, PerDocCount,
    SearchRequest, SearchResponse, UploadFile, UploadResponse, WordResult,
};
