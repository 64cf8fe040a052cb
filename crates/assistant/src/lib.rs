//! Product question answering for the storefront.
//!
//! The `Assistant` answers shopper questions about a catalog product.
//! On-topic questions get templated answers varied by an injected RNG;
//! off-topic and nutrition questions go to a `KnowledgeBackend`. Each
//! session keeps a short question/answer history.

mod relevance;
mod search;
mod templates;

pub use search::{ai_search, parse_product_names};
pub use relevance::{classify_question, is_negative_answer, is_nutrition_question, is_question_relevant};
pub use templates::ProductKind;

use aisle_backend_gemini::KnowledgeBackend;
use aisle_model::{Catalog, Product, QaAnswer, QuestionKind, SentimentReport};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

const TEMPLATE_CONFIDENCE: f32 = 0.95;
const NUTRITION_CONFIDENCE: f32 = 0.95;
const GENERAL_CONFIDENCE: f32 = 0.90;
const REDIRECT_CONFIDENCE: f32 = 0.70;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Invalid product data for id: {0}")]
    InvalidProduct(String),
}

/// Configuration for the assistant.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Question/answer pairs kept per session
    pub history_limit: usize,
    /// Sessions idle this long are dropped
    pub session_ttl: Duration,
    /// Maximum alternatives offered after a negative answer
    pub max_alternatives: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            history_limit: 5,
            session_ttl: Duration::from_secs(30 * 60),
            max_alternatives: 3,
        }
    }
}

/// Recent exchanges in one shopper session.
#[derive(Debug, Clone)]
pub struct Conversation {
    questions: VecDeque<String>,
    responses: VecDeque<String>,
    last_activity: Instant,
}

impl Default for Conversation {
    fn default() -> Self {
        Self {
            questions: VecDeque::new(),
            responses: VecDeque::new(),
            last_activity: Instant::now(),
        }
    }
}

impl Conversation {
    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.questions.iter().map(String::as_str)
    }

    pub fn last_response(&self) -> Option<&str> {
        self.responses.back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    fn record(&mut self, question: &str, response: &str, limit: usize) {
        self.questions.push_back(question.to_string());
        self.responses.push_back(response.to_string());
        while self.questions.len() > limit {
            self.questions.pop_front();
            self.responses.pop_front();
        }
        self.last_activity = Instant::now();
    }
}

/// Product assistant with per-session conversation state.
pub struct Assistant<B, R = StdRng> {
    catalog: Catalog,
    backend: B,
    rng: R,
    config: AssistantConfig,
    sessions: HashMap<String, Conversation>,
}

impl<B: KnowledgeBackend> Assistant<B, StdRng> {
    /// Create an assistant whose answer variation is fixed by `seed`.
    pub fn with_seed(catalog: Catalog, backend: B, seed: u64) -> Self {
        Self::new(catalog, backend, StdRng::seed_from_u64(seed), AssistantConfig::default())
    }
}

impl<B: KnowledgeBackend, R: Rng> Assistant<B, R> {
    pub fn new(catalog: Catalog, backend: B, rng: R, config: AssistantConfig) -> Self {
        Self {
            catalog,
            backend,
            rng,
            config,
            sessions: HashMap::new(),
        }
    }

    pub fn session(&self, session_id: &str) -> Option<&Conversation> {
        self.sessions.get(session_id)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Sentiment breakdown for a product.
    pub fn sentiment(&self, product_id: &str) -> Result<SentimentReport, AssistantError> {
        self.catalog
            .get(product_id)
            .map(|p| SentimentReport::from(&p.sentiment))
            .ok_or_else(|| AssistantError::ProductNotFound(product_id.to_string()))
    }

    /// Answer a shopper's question about a product.
    ///
    /// Without a `session_id` the exchange is not remembered.
    pub async fn answer(
        &mut self,
        product_id: &str,
        question: &str,
        session_id: Option<&str>,
    ) -> Result<QaAnswer, AssistantError> {
        let product = self
            .catalog
            .get(product_id)
            .cloned()
            .ok_or_else(|| AssistantError::ProductNotFound(product_id.to_string()))?;
        if product.name.trim().is_empty() {
            return Err(AssistantError::InvalidProduct(product_id.to_string()));
        }

        self.evict_idle_sessions();
        let question_kind = classify_question(question);

        info!(
            product = %product.name,
            kind = question_kind.label(),
            "Answering product question"
        );

        if !is_question_relevant(question, &product.name) {
            debug!(question, "Question is off-topic, asking knowledge backend");
            return Ok(self.answer_off_topic(&product, question, question_kind).await);
        }

        if is_nutrition_question(question) {
            if let Some(answer) = self.answer_nutrition(&product, question_kind).await {
                return Ok(answer);
            }
        }

        let kind = ProductKind::of(&product);
        let previous = session_id
            .and_then(|id| self.sessions.get(id))
            .and_then(|c| c.last_response().map(str::to_string));
        let answer = self.pick_template(kind, &product, question, previous.as_deref());

        if let Some(id) = session_id {
            let limit = self.config.history_limit;
            self.sessions
                .entry(id.to_string())
                .or_default()
                .record(question, &answer, limit);
        }

        let alternatives = if is_negative_answer(&answer) {
            self.alternatives_for(&product)
        } else {
            Vec::new()
        };

        debug!(
            answer_len = answer.len(),
            alternatives = alternatives.len(),
            "Templated answer ready"
        );

        Ok(QaAnswer {
            answer,
            confidence: TEMPLATE_CONFIDENCE,
            follow_up_questions: templates::follow_up_questions(kind, question),
            alternatives,
            question_kind,
            relevant: true,
        })
    }

    async fn answer_off_topic(
        &self,
        product: &Product,
        question: &str,
        question_kind: QuestionKind,
    ) -> QaAnswer {
        let (answer, confidence) = match self.backend.ask(&general_prompt(question)).await {
            Ok(answer) => (answer, GENERAL_CONFIDENCE),
            Err(e) => {
                warn!(backend = self.backend.name(), error = %e, "General answer failed");
                (
                    format!(
                        "I can help with that! However, I'm primarily designed to assist with product questions. \
                         For questions about {}, I can provide detailed information about its features, usage, and specifications.",
                        product.name
                    ),
                    REDIRECT_CONFIDENCE,
                )
            }
        };

        QaAnswer {
            answer,
            confidence,
            follow_up_questions: to_strings(templates::OFF_TOPIC_FOLLOW_UPS),
            alternatives: Vec::new(),
            question_kind,
            relevant: false,
        }
    }

    async fn answer_nutrition(
        &self,
        product: &Product,
        question_kind: QuestionKind,
    ) -> Option<QaAnswer> {
        let question = format!(
            "How many calories are there in {}? Please provide calories per 100g (or standard serving) and keep the answer concise.",
            product.name
        );

        match self.backend.ask(&general_prompt(&question)).await {
            Ok(answer) => Some(QaAnswer {
                answer,
                confidence: NUTRITION_CONFIDENCE,
                follow_up_questions: to_strings(templates::NUTRITION_FOLLOW_UPS),
                alternatives: Vec::new(),
                question_kind,
                relevant: true,
            }),
            Err(e) => {
                warn!(backend = self.backend.name(), error = %e, "Nutrition lookup failed, using template");
                None
            }
        }
    }

    /// Pick a template at random, skipping a repeat of `previous`.
    fn pick_template(
        &mut self,
        kind: ProductKind,
        product: &Product,
        question: &str,
        previous: Option<&str>,
    ) -> String {
        let candidates = templates::answer_templates(kind, question);
        let index = self.rng.gen_range(0..candidates.len());
        let answer = templates::render(candidates[index], product);

        if candidates.len() > 1 && previous == Some(answer.as_str()) {
            templates::render(candidates[(index + 1) % candidates.len()], product)
        } else {
            answer
        }
    }

    fn alternatives_for(&self, product: &Product) -> Vec<Product> {
        self.catalog
            .products()
            .iter()
            .filter(|p| p.category == product.category && p.id != product.id)
            .take(self.config.max_alternatives)
            .cloned()
            .collect()
    }

    fn evict_idle_sessions(&mut self) {
        let ttl = self.config.session_ttl;
        let before = self.sessions.len();
        self.sessions.retain(|_, c| c.last_activity.elapsed() < ttl);
        let evicted = before - self.sessions.len();
        if evicted > 0 {
            debug!(evicted, "Dropped idle sessions");
        }
    }
}

fn general_prompt(question: &str) -> String {
    format!(
        "You are a helpful AI assistant. Please provide a clear, concise, and accurate answer to this question: {}",
        question
    )
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
