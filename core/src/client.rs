//! Request builder, response parser, and blocking request helper for the
//! text-search API.
//!
//! # Design
//! `SearchClient` holds an immutable `ClientConfig` and a `Transport`, and
//! carries no mutable state between calls. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`; the operation method itself runs one transport
//! call between the two. Status checking and failure construction live in
//! `parse_json` / `parse_text` only, so every endpoint fails the same way.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, JSON_CONTENT_TYPE};
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    DeleteResponse, DocId, DocStats, DocumentInfo, SearchRequest, SearchResponse, UploadFile,
    UploadResponse, WordResult,
};

/// Client for the text-search backend.
#[derive(Debug, Clone)]
pub struct SearchClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl SearchClient<UreqTransport> {
    /// Client backed by a `ureq` agent honoring the configured timeout.
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.timeout());
        Self { config, transport }
    }
}

impl<T> SearchClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Request building
    // -----------------------------------------------------------------------

    /// Build a request for `path`, serializing `body` as JSON when present.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<HttpRequest, ApiError> {
        match body {
            Some(body) => self.json_request(method, path, body),
            None => Ok(self.bare_request(method, path)),
        }
    }

    pub fn build_upload_documents(&self, files: &[UploadFile]) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/upload", files)
    }

    pub fn build_list_documents(&self) -> HttpRequest {
        self.bare_request(HttpMethod::Get, "/docs")
    }

    pub fn build_delete_document(&self, id: DocId) -> HttpRequest {
        self.bare_request(HttpMethod::Delete, &format!("/docs/{id}"))
    }

    pub fn build_delete_all_documents(&self) -> HttpRequest {
        self.bare_request(HttpMethod::Delete, "/docs")
    }

    /// Blank terms are dropped; the remaining ones are sent trimmed.
    pub fn build_search<S: AsRef<str>>(&self, words: &[S]) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/search", &SearchRequest::new(words))
    }

    pub fn build_hello(&self) -> HttpRequest {
        self.bare_request(HttpMethod::Get, "/hello")
    }

    pub fn build_stats(&self) -> HttpRequest {
        self.bare_request(HttpMethod::Get, "/stats")
    }

    fn bare_request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            url: self.config.url(path),
            headers: Vec::new(),
            body: None,
        }
    }

    fn json_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let (name, value) = JSON_CONTENT_TYPE;
        Ok(HttpRequest {
            method,
            url: self.config.url(path),
            headers: vec![(name.to_string(), value.to_string())],
            body: Some(body),
        })
    }

    // -----------------------------------------------------------------------
    // Response parsing
    // -----------------------------------------------------------------------

    /// Check for a 2xx status and decode the body as JSON.
    pub fn parse_json<R: DeserializeOwned>(&self, response: HttpResponse) -> Result<R, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Check for a 2xx status and return the body as text.
    pub fn parse_text(&self, response: HttpResponse) -> Result<String, ApiError> {
        check_status(&response)?;
        Ok(response.body)
    }

    pub fn parse_upload_documents(
        &self,
        response: HttpResponse,
    ) -> Result<UploadResponse, ApiError> {
        self.parse_json(response)
    }

    pub fn parse_list_documents(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<DocumentInfo>, ApiError> {
        self.parse_json(response)
    }

    pub fn parse_delete_document(
        &self,
        response: HttpResponse,
    ) -> Result<DeleteResponse, ApiError> {
        self.parse_json(response)
    }

    pub fn parse_delete_all_documents(
        &self,
        response: HttpResponse,
    ) -> Result<DeleteResponse, ApiError> {
        self.parse_json(response)
    }

    /// Unwraps the `results` envelope.
    pub fn parse_search(&self, response: HttpResponse) -> Result<Vec<WordResult>, ApiError> {
        Ok(self.parse_search_response(response)?.results)
    }

    /// Full envelope, including timing and all-words matches when sent.
    pub fn parse_search_response(
        &self,
        response: HttpResponse,
    ) -> Result<SearchResponse, ApiError> {
        self.parse_json(response)
    }

    pub fn parse_hello(&self, response: HttpResponse) -> Result<String, ApiError> {
        self.parse_text(response)
    }

    pub fn parse_stats(&self, response: HttpResponse) -> Result<DocStats, ApiError> {
        self.parse_json(response)
    }
}

impl<T: Transport> SearchClient<T> {
    /// Issue one request and decode a JSON payload.
    pub fn request<R: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<R, ApiError> {
        let request = self.build_request(method, path, body)?;
        self.parse_json(self.send(&request)?)
    }

    /// Issue one request and return the body as text.
    pub fn request_text(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<String, ApiError> {
        let request = self.build_request(method, path, body)?;
        self.parse_text(self.send(&request)?)
    }

    /// Execute a prepared request. Non-2xx responses are returned unchanged.
    pub fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.execute(request).inspect_err(|err| {
            warn!(
                method = %request.method,
                url = %request.url,
                error = %err,
                "request did not complete"
            );
        })?;
        debug!(status = response.status, bytes = response.body.len(), "received response");
        Ok(response)
    }

    pub fn upload_documents(&self, files: &[UploadFile]) -> Result<UploadResponse, ApiError> {
        let request = self.build_upload_documents(files)?;
        self.parse_upload_documents(self.send(&request)?)
    }

    pub fn list_documents(&self) -> Result<Vec<DocumentInfo>, ApiError> {
        self.parse_list_documents(self.send(&self.build_list_documents())?)
    }

    pub fn delete_document(&self, id: DocId) -> Result<DeleteResponse, ApiError> {
        self.parse_delete_document(self.send(&self.build_delete_document(id))?)
    }

    pub fn delete_all_documents(&self) -> Result<DeleteResponse, ApiError> {
        self.parse_delete_all_documents(self.send(&self.build_delete_all_documents())?)
    }

    pub fn search<S: AsRef<str>>(&self, words: &[S]) -> Result<Vec<WordResult>, ApiError> {
        let request = self.build_search(words)?;
        self.parse_search(self.send(&request)?)
    }

    /// Like `search`, but keeps the whole response envelope.
    pub fn search_response<S: AsRef<str>>(&self, words: &[S]) -> Result<SearchResponse, ApiError> {
        let request = self.build_search(words)?;
        self.parse_search_response(self.send(&request)?)
    }

    /// Health check against `GET /hello`.
    pub fn hello(&self) -> Result<String, ApiError> {
        self.parse_hello(self.send(&self.build_hello())?)
    }

    pub fn stats(&self) -> Result<DocStats, ApiError> {
        self.parse_stats(self.send(&self.build_stats())?)
    }
}

/// Map non-2xx status codes to `ApiError::Http`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let err = ApiError::from_response(response);
    warn!(status = response.status, error = %err, "request failed");
    Err(err)
}
