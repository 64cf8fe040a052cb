//! Storefront CLI for searching the catalog and asking about products.
//!
//! Usage:
//!     aisle search "Show me jackets under ₹3000"
//!     aisle search --ai "something warm for winter"
//!     aisle ask 1 "Is this good for biryani?" "How much water should I use?"
//!     aisle recommend 1 4
//!     aisle catalog
//!     aisle rules "make my face glow"
//!     aisle health

use aisle_assistant::{Assistant, AssistantConfig};
use aisle_backend_gemini::{GeminiBackend, GeminiConfig, KnowledgeBackend, OfflineBackend};
use aisle_cli::{ai_or_rule_search, rule_search, with_display_floor, SearchOutcome};
use aisle_intent::{classify, RULES};
use aisle_model::{Catalog, IntentType, Product};
use aisle_rank::{recommend, RankConfig, SortKey, DEFAULT_RECOMMENDATION_LIMIT};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "aisle")]
#[command(about = "Search the storefront and ask about products")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Catalog JSON file (defaults to the bundled catalog)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Seed for answer variation and recommendations
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog with a free-text query
    Search {
        /// Query text
        query: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,

        /// Minimum time the loading phase lasts, in milliseconds
        #[arg(long, default_value = "4000")]
        min_display_ms: u64,

        /// Order by positive minus negative sentiment
        #[arg(long)]
        net_sentiment: bool,

        /// Let the knowledge backend pick products by name
        #[arg(long)]
        ai: bool,
    },

    /// Ask questions about a product
    Ask {
        /// Product id
        product_id: String,

        /// One or more questions, answered in order within one session
        #[arg(required = true)]
        questions: Vec<String>,

        /// Session id used for conversation history
        #[arg(short, long, default_value = "cli")]
        session: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Suggest products for a cart (last id is the most recent item)
    Recommend {
        /// Cart product ids
        cart: Vec<String>,

        /// Maximum suggestions
        #[arg(short, long, default_value_t = DEFAULT_RECOMMENDATION_LIMIT)]
        limit: usize,
    },

    /// List catalog products
    Catalog,

    /// Show the intent classification rules, optionally against a query
    Rules {
        /// Query to classify
        query: Option<String>,
    },

    /// Check knowledge backend health
    Health,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "aisle=debug" } else { "aisle=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.parse()?),
        )
        .init();

    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
        None => Catalog::bundled().context("Bundled catalog is invalid")?,
    };
    info!(products = catalog.len(), "Catalog loaded");

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match cli.command {
        Commands::Search {
            query,
            format,
            min_display_ms,
            net_sentiment,
            ai,
        } => {
            let config = RankConfig {
                sort_key: if net_sentiment {
                    SortKey::NetPositive
                } else {
                    SortKey::Positive
                },
            };
            let floor = Duration::from_millis(min_display_ms);
            let gemini = GeminiConfig::from_env();
            if !ai {
                run_search(catalog, query, config, floor, format, None::<OfflineBackend>).await?;
            } else if gemini.api_key.is_some() {
                let backend = GeminiBackend::new(gemini)?;
                run_search(catalog, query, config, floor, format, Some(backend)).await?;
            } else {
                info!("GEMINI_API_KEY not set, searching with rules");
                run_search(catalog, query, config, floor, format, Some(OfflineBackend)).await?;
            }
        }
        Commands::Ask {
            product_id,
            questions,
            session,
            format,
        } => {
            let config = GeminiConfig::from_env();
            if config.api_key.is_some() {
                let backend = GeminiBackend::new(config)?;
                run_ask(catalog, backend, rng, &product_id, &questions, &session, format).await?;
            } else {
                info!("GEMINI_API_KEY not set, general questions get a redirect answer");
                run_ask(catalog, OfflineBackend, rng, &product_id, &questions, &session, format)
                    .await?;
            }
        }
        Commands::Recommend { cart, limit } => {
            run_recommend(&catalog, &cart, rng, limit);
        }
        Commands::Catalog => {
            run_catalog(&catalog);
        }
        Commands::Rules { query } => {
            run_rules(query.as_deref());
        }
        Commands::Health => {
            let config = GeminiConfig::from_env();
            if config.api_key.is_some() {
                let backend = GeminiBackend::new(config)?;
                println!("Model: {}", backend.config().model);
                run_health(&backend).await?;
            } else {
                run_health(&OfflineBackend).await?;
            }
        }
    }

    Ok(())
}

async fn run_search<B>(
    catalog: Catalog,
    query: String,
    config: RankConfig,
    min_display: Duration,
    format: Format,
    backend: Option<B>,
) -> Result<()>
where
    B: KnowledgeBackend + Send + Sync + 'static,
{
    println!("Searching for: {}", query);
    println!("---");

    let catalog = Arc::new(catalog);
    let outcome = with_display_floor(min_display, async move {
        match backend {
            Some(backend) => ai_or_rule_search(&backend, &catalog, &query, &config).await,
            None => rule_search(&catalog, &query, &config),
        }
    })
    .await;

    let SearchOutcome { intent, results } = match outcome {
        Ok(found) => found,
        Err(e) => {
            warn!(error = %e, "Search task failed");
            println!("Search failed, please try again.");
            return Ok(());
        }
    };

    info!(
        intent = intent.as_ref().map_or("backend", |i| i.intent_type.label()),
        strict = results.strict.len(),
        related = results.related.len(),
        "Search finished"
    );

    if format == Format::Json {
        let output = SearchOutcome { intent, results };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if let Some(intent) = &intent {
        println!("Intent: {}", intent.intent_type.label());
        if !intent.keywords.is_empty() {
            println!("Keywords: {}", intent.keywords.join(", "));
        }
        if let Some(budget) = intent.budget {
            println!("Budget: ₹{}", budget);
        }
        if let Some(skin_type) = &intent.skin_type {
            println!("Skin type: {}", skin_type);
        }
        if !intent.ingredients.is_empty() {
            println!("Ingredients: {}", intent.ingredients.join(", "));
        }
    }

    if results.is_empty() {
        println!("\nNo products found.");
        return Ok(());
    }

    print_products("Matches", &results.strict);
    let is_recipe = intent
        .as_ref()
        .is_some_and(|i| i.intent_type == IntentType::Recipe);
    if is_recipe && !results.strict.is_empty() {
        println!("\nShopping list total: ₹{:.2}", results.strict_total());
    }
    print_products("You might also like", &results.related);

    println!("\n---");
    println!(
        "Total: {} matches, {} related",
        results.strict.len(),
        results.related.len()
    );

    Ok(())
}

async fn run_ask<B: KnowledgeBackend>(
    catalog: Catalog,
    backend: B,
    rng: StdRng,
    product_id: &str,
    questions: &[String],
    session: &str,
    format: Format,
) -> Result<()> {
    let mut assistant = Assistant::new(catalog, backend, rng, AssistantConfig::default());

    for question in questions {
        let reply = assistant
            .answer(product_id, question, Some(session))
            .await?;

        if format == Format::Json {
            println!("{}", serde_json::to_string_pretty(&reply)?);
            continue;
        }

        println!("\nQ: {}", question);
        println!("A: {}", reply.answer);
        println!(
            "   Kind: {} | Confidence: {:.2}",
            reply.question_kind.label(),
            reply.confidence
        );
        if !reply.follow_up_questions.is_empty() {
            println!("   You could also ask:");
            for follow_up in &reply.follow_up_questions {
                println!("   - {}", follow_up);
            }
        }
        if !reply.alternatives.is_empty() {
            println!("   Alternatives:");
            for product in &reply.alternatives {
                println!("   - {} ({})", product.name, product.id);
            }
        }
    }

    let report = assistant.sentiment(product_id)?;
    if format == Format::Text {
        println!(
            "\nSentiment: {}% positive, {}% negative",
            report.positive, report.negative
        );
    }

    Ok(())
}

fn run_recommend(catalog: &Catalog, cart: &[String], mut rng: StdRng, limit: usize) {
    let picks = recommend(catalog.products(), cart, &mut rng, limit);
    if picks.is_empty() {
        println!("No recommendations.");
        return;
    }
    print_products("Recommended", &picks);
}

fn run_catalog(catalog: &Catalog) {
    for category in catalog.categories() {
        let products: Vec<Product> = catalog
            .products()
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect();
        print_products(category, &products);
    }
    println!("\n---");
    println!("Total: {} products", catalog.len());
}

fn run_rules(query: Option<&str>) {
    println!("Classification rules (first match wins):");
    for (i, rule) in RULES.iter().enumerate() {
        println!("{}. {}: {}", i + 1, rule.intent_type.label(), rule.description);
    }
    println!("{}. {}: anything else", RULES.len() + 1, IntentType::Product.label());

    if let Some(query) = query {
        let q = query.to_lowercase();
        let matched = RULES.iter().find(|rule| rule.matches(&q));
        println!("\n---");
        match matched {
            Some(rule) => println!("\"{}\" → {} ({})", query, classify(&q).label(), rule.description),
            None => println!("\"{}\" → {}", query, classify(&q).label()),
        }
    }
}

async fn run_health<B: KnowledgeBackend>(backend: &B) -> Result<()> {
    print!("Checking {} backend... ", backend.name());

    match backend.health_check().await {
        Ok(()) => {
            println!("OK");
            Ok(())
        }
        Err(e) => {
            println!("FAILED: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_products(heading: &str, products: &[Product]) {
    if products.is_empty() {
        return;
    }
    println!("\n{}:", heading);
    for (i, product) in products.iter().enumerate() {
        println!(
            "{}. {} (id: {}) ₹{} [{}]",
            i + 1,
            product.name,
            product.id,
            product.price,
            product.category
        );
        println!(
            "   Sentiment: +{} / -{}",
            product.sentiment.positive, product.sentiment.negative
        );
    }
}
