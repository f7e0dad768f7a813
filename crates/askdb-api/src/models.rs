//! Request models for the query endpoint.

use serde::{Deserialize, Serialize};

/// Request payload for `POST /api/v1/query`.
///
/// `namespace` and `conn_string` are opaque handles resolved by the
/// connection-management collaborator before the request reaches this
/// service: the namespace scopes the vector index to one target
/// database's schema, and the connection string points at that target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The natural-language question.
    pub question: String,
    /// Vector-index partition holding the target schema's table docs.
    pub namespace: String,
    /// Connection string for the target database.
    pub conn_string: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_request_round_trip() {
        let request = QueryRequest {
            question: "how many users are there".to_string(),
            namespace: "ns-1".to_string(),
            conn_string: "postgres://localhost/app".to_string(),
        };

        let json = serde_json::to_string(&request).unwrap();
        let back: QueryRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.question, request.question);
        assert_eq!(back.namespace, request.namespace);
    }

    #[test]
    fn test_query_request_requires_all_fields() {
        let json = r#"{"question": "count users"}"#;
        assert!(serde_json::from_str::<QueryRequest>(json).is_err());
    }
}
