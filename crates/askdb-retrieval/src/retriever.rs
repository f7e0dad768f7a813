//! Schema retriever: embed the question, query the index, map matches
//! to table descriptions.

use std::sync::Arc;

use askdb_commons::TableDescription;
use log::debug;

use crate::embedding::EmbeddingService;
use crate::error::Result;
use crate::index::VectorIndex;

/// Number of table descriptions fetched per question.
pub const TOP_K: usize = 6;

/// Retrieves the schema context for one question.
///
/// Owns no state beyond its two service handles; safe to share across
/// concurrent pipeline runs.
pub struct SchemaRetriever {
    embedder: Arc<dyn EmbeddingService>,
    index: Arc<dyn VectorIndex>,
}

impl SchemaRetriever {
    pub fn new(embedder: Arc<dyn EmbeddingService>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embedder, index }
    }

    /// Top-K table descriptions for the question, ordered by
    /// descending relevance score.
    pub async fn retrieve(&self, question: &str, namespace: &str) -> Result<Vec<TableDescription>> {
        let vector = self.embedder.embed(question).await?;
        let matches = self.index.query(&vector, TOP_K, namespace).await?;

        let mut docs: Vec<TableDescription> = matches
            .into_iter()
            .map(|m| TableDescription {
                table_name: m.metadata["table_name"]
                    .as_str()
                    .unwrap_or_default()
                    .to_string(),
                doc: m.metadata["doc"].as_str().unwrap_or_default().to_string(),
                score: m.score,
            })
            .collect();

        // Index responses are ranked already; keep the order defensive
        // against backends that do not guarantee it
        docs.sort_by(|a, b| b.score.total_cmp(&a.score));

        debug!(
            "Retrieved {} table description(s) for namespace {}",
            docs.len(),
            namespace
        );

        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RetrievalError;
    use crate::index::{IndexMatch, IndexRecord};
    use async_trait::async_trait;
    use serde_json::json;

    struct FixedEmbedding;

    #[async_trait]
    impl EmbeddingService for FixedEmbedding {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![0.1, 0.2, 0.3])
        }
    }

    struct ScriptedIndex {
        matches: Vec<IndexMatch>,
    }

    #[async_trait]
    impl VectorIndex for ScriptedIndex {
        async fn query(
            &self,
            _vector: &[f32],
            top_k: usize,
            _namespace: &str,
        ) -> Result<Vec<IndexMatch>> {
            Ok(self.matches.iter().take(top_k).cloned().collect())
        }

        async fn upsert(&self, _namespace: &str, _records: Vec<IndexRecord>) -> Result<()> {
            Ok(())
        }

        async fn delete_all(&self, _namespace: &str) -> Result<()> {
            Ok(())
        }
    }

    struct FailingEmbedding;

    #[async_trait]
    impl EmbeddingService for FailingEmbedding {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(RetrievalError::Embedding("service unavailable".into()))
        }
    }

    fn index_match(table: &str, score: f32) -> IndexMatch {
        IndexMatch {
            id: format!("tbl-{}", table),
            score,
            metadata: json!({ "table_name": table, "doc": format!("Table: {}", table) }),
        }
    }

    #[tokio::test]
    async fn test_retrieve_maps_matches_to_descriptions() {
        let retriever = SchemaRetriever::new(
            Arc::new(FixedEmbedding),
            Arc::new(ScriptedIndex {
                matches: vec![index_match("users", 0.95), index_match("orders", 0.88)],
            }),
        );

        let docs = retriever.retrieve("how many users", "ns-1").await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].table_name, "users");
        assert_eq!(docs[0].doc, "Table: users");
        assert!(docs[0].score > docs[1].score);
    }

    #[tokio::test]
    async fn test_retrieve_orders_by_descending_score() {
        let retriever = SchemaRetriever::new(
            Arc::new(FixedEmbedding),
            Arc::new(ScriptedIndex {
                matches: vec![index_match("orders", 0.5), index_match("users", 0.9)],
            }),
        );

        let docs = retriever.retrieve("question", "ns-1").await.unwrap();
        assert_eq!(docs[0].table_name, "users");
        assert_eq!(docs[1].table_name, "orders");
    }

    #[tokio::test]
    async fn test_retrieve_bounded_to_top_k() {
        let matches = (0..10)
            .map(|i| index_match(&format!("t{}", i), 1.0 - i as f32 * 0.05))
            .collect();
        let retriever = SchemaRetriever::new(
            Arc::new(FixedEmbedding),
            Arc::new(ScriptedIndex { matches }),
        );

        let docs = retriever.retrieve("question", "ns-1").await.unwrap();
        assert_eq!(docs.len(), TOP_K);
    }

    #[tokio::test]
    async fn test_embedding_failure_is_fatal() {
        let retriever = SchemaRetriever::new(
            Arc::new(FailingEmbedding),
            Arc::new(ScriptedIndex { matches: vec![] }),
        );

        let err = retriever.retrieve("question", "ns-1").await.unwrap_err();
        assert!(matches!(err, RetrievalError::Embedding(_)));
    }
}
