//! Server-sent-event framing for pipeline events.
//!
//! Pure mapping from the internal event enum to the wire shape; the
//! pipeline itself knows nothing about transport.

use askdb_commons::PipelineEvent;
use serde_json::json;

/// One SSE frame: `data: <json>\n\n`.
pub fn sse_frame(event: &PipelineEvent) -> String {
    let payload = match event {
        PipelineEvent::Status(message) => json!({ "type": "status", "message": message }),
        PipelineEvent::SqlChunk(chunk) => json!({ "type": "sql_chunk", "chunk": chunk }),
        PipelineEvent::Results(result) => json!({
            "type": "results",
            "columns": result.columns,
            "rows": result.rows,
            "exec_time_ms": result.exec_time_ms,
            "row_count": result.row_count,
        }),
        PipelineEvent::Done => json!({ "type": "done" }),
        PipelineEvent::Error(message) => json!({ "type": "error", "message": message }),
    };
    format!("data: {}\n\n", payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use askdb_commons::QueryResult;

    fn payload(frame: &str) -> serde_json::Value {
        let data = frame
            .strip_prefix("data: ")
            .and_then(|s| s.strip_suffix("\n\n"))
            .expect("well-formed SSE frame");
        serde_json::from_str(data).unwrap()
    }

    #[test]
    fn test_status_frame() {
        let frame = sse_frame(&PipelineEvent::Status("Validating SQL...".to_string()));
        let json = payload(&frame);
        assert_eq!(json["type"], "status");
        assert_eq!(json["message"], "Validating SQL...");
    }

    #[test]
    fn test_sql_chunk_frame() {
        let frame = sse_frame(&PipelineEvent::SqlChunk("SELECT 1".to_string()));
        let json = payload(&frame);
        assert_eq!(json["type"], "sql_chunk");
        assert_eq!(json["chunk"], "SELECT 1");
    }

    #[test]
    fn test_results_frame() {
        let frame = sse_frame(&PipelineEvent::Results(QueryResult {
            columns: vec!["count".to_string()],
            rows: vec![vec![serde_json::json!(42)]],
            exec_time_ms: 7,
            row_count: 1,
        }));
        let json = payload(&frame);
        assert_eq!(json["type"], "results");
        assert_eq!(json["columns"], serde_json::json!(["count"]));
        assert_eq!(json["rows"], serde_json::json!([[42]]));
        assert_eq!(json["exec_time_ms"], 7);
        assert_eq!(json["row_count"], 1);
    }

    #[test]
    fn test_terminal_frames() {
        assert_eq!(payload(&sse_frame(&PipelineEvent::Done))["type"], "done");
        let error = payload(&sse_frame(&PipelineEvent::Error("boom".to_string())));
        assert_eq!(error["type"], "error");
        assert_eq!(error["message"], "boom");
    }
}
