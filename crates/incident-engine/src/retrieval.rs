//! Context retrieval collaborator

use crate::error::RetrievalError;
use async_trait::async_trait;
use incident_types::Snippet;

/// Ranked runbook search
#[async_trait]
pub trait ContextRetriever: Send + Sync {
    /// Up to `top_k` snippets relevant to `query`, best first
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<Snippet>, RetrievalError>;

    fn name(&self) -> &str;
}

/// Deterministic retriever over a small built-in runbook set.
///
/// Used when no search index is loaded. The snippet returned depends on
/// what the query mentions: pod restarts, CPU or memory. Anything else
/// gets the first two generic snippets.
#[derive(Debug, Clone)]
pub struct StaticRunbookRetriever {
    snippets: Vec<Snippet>,
}

impl StaticRunbookRetriever {
    pub fn new() -> Self {
        Self {
            snippets: builtin_snippets(),
        }
    }

    fn select(&self, query: &str) -> Vec<Snippet> {
        let query = query.to_lowercase();
        let indices: &[usize] = if query.contains("restart") || query.contains("pod") {
            &[0]
        } else if query.contains("cpu") || query.contains("performance") {
            &[1]
        } else if query.contains("memory") {
            &[2]
        } else {
            &[0, 1]
        };
        indices
            .iter()
            .filter_map(|i| self.snippets.get(*i).cloned())
            .collect()
    }
}

impl Default for StaticRunbookRetriever {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContextRetriever for StaticRunbookRetriever {
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<Snippet>, RetrievalError> {
        let mut snippets = self.select(query);
        snippets.truncate(top_k);
        Ok(snippets)
    }

    fn name(&self) -> &str {
        "static-runbooks"
    }
}

fn builtin_snippets() -> Vec<Snippet> {
    vec![
        Snippet::new(
            "To restart a Kubernetes pod: 1) Identify the pod name using 'kubectl get pods', \
             2) Delete the pod with 'kubectl delete pod <pod-name>', \
             3) Kubernetes will automatically recreate the pod.",
            "runbook-k8s-restart.md",
            0.8,
        )
        .with_metadata("category", "kubernetes")
        .with_metadata("action", "restart"),
        Snippet::new(
            "For high CPU usage: 1) Check current resource limits, \
             2) Scale horizontally by increasing replica count, \
             3) Monitor CPU metrics after scaling.",
            "runbook-high-cpu.md",
            0.7,
        )
        .with_metadata("category", "performance")
        .with_metadata("action", "scale"),
        Snippet::new(
            "Memory leak remediation: 1) Identify pods with high memory usage, \
             2) Restart affected pods, 3) Check application logs for memory leak patterns, \
             4) Consider increasing memory limits if needed.",
            "runbook-memory-leak.md",
            0.75,
        )
        .with_metadata("category", "memory")
        .with_metadata("action", "restart"),
    ]
}
