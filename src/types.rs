//! Result envelopes returned by [`Connection`] operations.
//!
//! [`Connection`]: crate::Connection

use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::doc::Doc;

/// Outcome of one dispatched request.
///
/// Transport and protocol failures are folded into the envelope rather than
/// raised: callers inspect [`Response::in_error`]. When `in_error` is true
/// the document is absent and [`Response::error`] carries the diagnostic;
/// when it is false no error field is populated (a document may still be
/// absent for calls without a response body, e.g. DELETE).
#[derive(Debug, Clone)]
pub struct Response {
    /// Whether the request failed
    pub in_error: bool,
    /// HTTP status, absent when the request never reached the server
    pub status: Option<StatusCode>,
    /// Response document, present on success for content-returning calls
    pub doc: Option<Doc>,
    /// Diagnostic text, present on failure
    pub error: Option<String>,
}

impl Response {
    /// Build a success envelope.
    pub fn success(status: StatusCode, doc: Option<Doc>) -> Self {
        Self {
            in_error: false,
            status: Some(status),
            doc,
            error: None,
        }
    }

    /// Build a failure envelope. `status` is `None` for transport failures
    /// that produced no HTTP response.
    pub fn failure(status: Option<StatusCode>, error: impl Into<String>) -> Self {
        Self {
            in_error: true,
            status,
            doc: None,
            error: Some(error.into()),
        }
    }

    /// Whether the request succeeded.
    pub fn is_success(&self) -> bool {
        !self.in_error
    }
}

/// One match in a search report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchMatch {
    /// 1-based position within the full result set
    #[serde(default)]
    pub index: u64,
    /// URI of the matched document
    #[serde(default)]
    pub uri: String,
    /// XPath to the matched node, when the server reports one
    #[serde(default)]
    pub path: Option<String>,
    /// Relevance score
    #[serde(default)]
    pub score: f64,
    /// Relevance confidence
    #[serde(default)]
    pub confidence: f64,
    /// Relevance fitness
    #[serde(default)]
    pub fitness: f64,
}

/// Deserialized body of a search call.
///
/// Hyphenated server keys are mapped with explicit renames; unknown fields
/// are ignored so the client tolerates schema additions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchReport {
    /// Total number of matches on the server
    #[serde(default)]
    pub total: u64,
    /// 1-based index of the first returned match
    #[serde(default)]
    pub start: u64,
    /// Page size used for this result set
    #[serde(rename = "page-length", default)]
    pub page_length: u64,
    /// The returned page of matches
    #[serde(default)]
    pub results: Vec<SearchMatch>,
}

/// Outcome of a search call: the result envelope plus the query parameters
/// it was issued with and, on success, the deserialized report.
#[derive(Debug, Clone)]
pub struct SearchResponse {
    /// Whether the search failed
    pub in_error: bool,
    /// HTTP status, absent when the request never reached the server
    pub status: Option<StatusCode>,
    /// Name of the saved search options used, if any
    pub options: Option<String>,
    /// The structured query issued, if any
    pub structured_query: Option<String>,
    /// Deserialized search results, present on success
    pub report: Option<SearchReport>,
    /// Diagnostic text, present on failure
    pub error: Option<String>,
}

impl SearchResponse {
    /// Build a success envelope around a deserialized report.
    pub fn success(
        status: StatusCode,
        report: SearchReport,
        options: Option<&str>,
        structured_query: Option<&str>,
    ) -> Self {
        Self {
            in_error: false,
            status: Some(status),
            options: options.map(str::to_string),
            structured_query: structured_query.map(str::to_string),
            report: Some(report),
            error: None,
        }
    }

    /// Build a failure envelope.
    pub fn failure(
        status: Option<StatusCode>,
        error: impl Into<String>,
        options: Option<&str>,
        structured_query: Option<&str>,
    ) -> Self {
        Self {
            in_error: true,
            status,
            options: options.map(str::to_string),
            structured_query: structured_query.map(str::to_string),
            report: None,
            error: Some(error.into()),
        }
    }

    /// Whether the search succeeded.
    pub fn is_success(&self) -> bool {
        !self.in_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_invariant_holds_for_constructors() {
        let ok = Response::success(StatusCode::OK, Some(Doc::json("{}")));
        assert!(ok.is_success());
        assert!(ok.error.is_none());
        assert!(ok.doc.is_some());

        let failed = Response::failure(Some(StatusCode::NOT_FOUND), "missing");
        assert!(failed.in_error);
        assert!(failed.doc.is_none());
        assert_eq!(failed.error.as_deref(), Some("missing"));
    }

    #[test]
    fn search_report_deserializes_hyphenated_keys() {
        let body = r#"{
            "snippet-format": "snippet",
            "total": 2,
            "start": 1,
            "page-length": 10,
            "results": [
                {"index": 1, "uri": "/docs/a.json", "score": 2048,
                 "confidence": 0.47, "fitness": 0.9},
                {"index": 2, "uri": "/docs/b.json", "path": "fn:doc(\"/docs/b.json\")"}
            ]
        }"#;
        let report: SearchReport = serde_json::from_str(body).unwrap();
        assert_eq!(report.total, 2);
        assert_eq!(report.page_length, 10);
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.results[0].uri, "/docs/a.json");
        assert!(report.results[1].path.is_some());
    }

    #[test]
    fn search_report_tolerates_minimal_body() {
        let report: SearchReport = serde_json::from_str(r#"{"total": 0}"#).unwrap();
        assert_eq!(report.total, 0);
        assert!(report.results.is_empty());
    }
}
