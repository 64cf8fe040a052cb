//! Search execution for the `aisle` binary.
//!
//! Rule-based and backend-driven search, both run as a background task
//! that is held to a minimum display time.

use aisle_assistant::ai_search;
use aisle_backend_gemini::KnowledgeBackend;
use aisle_intent::extract_intent;
use aisle_model::{Catalog, SearchIntent, SearchResults};
use aisle_rank::{rank, RankConfig};
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinError;
use tracing::warn;

/// What a search produced.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    /// Absent when the backend picked the products
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<SearchIntent>,
    #[serde(flatten)]
    pub results: SearchResults,
}

/// Extract an intent and rank the catalog against it.
pub fn rule_search(catalog: &Catalog, query: &str, config: &RankConfig) -> SearchOutcome {
    let intent = extract_intent(query);
    let results = rank(&intent, catalog.products(), config);
    SearchOutcome {
        intent: Some(intent),
        results,
    }
}

/// Let the backend pick products, falling back to rule-based search when
/// it fails.
pub async fn ai_or_rule_search<B: KnowledgeBackend>(
    backend: &B,
    catalog: &Catalog,
    query: &str,
    config: &RankConfig,
) -> SearchOutcome {
    match ai_search(backend, catalog, query).await {
        Ok(products) => SearchOutcome {
            intent: None,
            results: SearchResults {
                strict: products,
                related: Vec::new(),
            },
        },
        Err(e) => {
            warn!(backend = backend.name(), error = %e, "Backend search failed, using rules");
            rule_search(catalog, query, config)
        }
    }
}

/// Run `work` as a task and wait at least `floor` for it.
///
/// Takes `max(work time, floor)`. A failed task still waits out the floor.
pub async fn with_display_floor<F>(floor: Duration, work: F) -> Result<F::Output, JoinError>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let task = tokio::spawn(work);
    let (outcome, ()) = tokio::join!(task, tokio::time::sleep(floor));
    outcome
}
