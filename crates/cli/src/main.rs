use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use engine::{
    EngineConfig, FeedbackSignal, RecommendContext, RecommendRequest, Recommendation, Strategy,
    WellnessEngine,
};
use rand::seq::IndexedRandom;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// WellRec - Hybrid wellness recommendation engine
#[derive(Parser)]
#[command(name = "wellrec")]
#[command(about = "Hybrid wellness recommendation engine (content + collaborative)", long_about = None)]
struct Cli {
    /// Path to the dataset directory (items.csv + interactions.csv)
    #[arg(short, long, default_value = "data/reco")]
    data_dir: PathBuf,

    /// Feedback audit log path (JSONL); omit to disable logging
    #[arg(long)]
    feedback_log: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get recommendations for a user
    Recommend {
        /// User ID to get recommendations for
        #[arg(long)]
        user_id: String,

        /// Number of recommendations to return
        #[arg(long, default_value = "5")]
        top_n: usize,

        /// Scoring strategy: hybrid, cb, or cf (unknown values fall back to hybrid)
        #[arg(long, default_value = "hybrid")]
        strategy: String,

        /// Blend weight toward content-based scoring (clamped to [0,1])
        #[arg(long, default_value = "0.5")]
        alpha: f32,

        /// Current mood label to boost matching items (e.g. "anxious")
        #[arg(long)]
        mood: Option<String>,
    },

    /// Record a feedback event for a (user, item) pair
    Feedback {
        #[arg(long)]
        user_id: String,

        #[arg(long)]
        item_id: String,

        /// "like", "dislike", "skip", or an explicit positive rating
        #[arg(long)]
        action: String,

        /// Override the action's default delta
        #[arg(long)]
        weight: Option<f32>,
    },

    /// Show dataset and model counts
    Info,

    /// Run leave-one-out holdout evaluation
    Evaluate {
        #[arg(long, default_value = "5")]
        k: usize,

        #[arg(long, default_value = "hybrid")]
        strategy: String,
    },

    /// Run concurrent read benchmark against the engine
    Benchmark {
        /// Number of recommend requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent workers
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Load + train (this is the whole lifecycle before serving)
    println!("Loading dataset from {}...", cli.data_dir.display());
    let start = Instant::now();
    let config = EngineConfig {
        feedback_log: cli.feedback_log.clone(),
        ..EngineConfig::default()
    };
    let engine = Arc::new(
        WellnessEngine::load_with_config(&cli.data_dir, config)
            .context("Failed to load the recommendation dataset")?,
    );
    println!("{} Engine trained in {:?}", "✓".green(), start.elapsed());

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            user_id,
            top_n,
            strategy,
            alpha,
            mood,
        } => handle_recommend(engine, user_id, top_n, strategy, alpha, mood)?,
        Commands::Feedback {
            user_id,
            item_id,
            action,
            weight,
        } => handle_feedback(engine, user_id, item_id, action, weight)?,
        Commands::Info => handle_info(engine)?,
        Commands::Evaluate { k, strategy } => handle_evaluate(engine, k, strategy)?,
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(engine, requests, concurrent).await?,
    }

    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(
    engine: Arc<WellnessEngine>,
    user_id: String,
    top_n: usize,
    strategy: String,
    alpha: f32,
    mood: Option<String>,
) -> Result<()> {
    let mut context = RecommendContext::default();
    context.mood = mood;

    let request = RecommendRequest::default()
        .with_top_n(top_n)
        .with_strategy(Strategy::parse(&strategy))
        .with_alpha(alpha)
        .with_context(context);

    let start = Instant::now();
    let recommendations = engine.recommend(&user_id, &request)?;
    let elapsed = start.elapsed();

    println!(
        "\n{} for {} ({} strategy, {:?}):\n",
        "Recommendations".bold(),
        user_id.cyan(),
        request.strategy,
        elapsed
    );
    print_recommendations(&recommendations);
    Ok(())
}

fn print_recommendations(recommendations: &[Recommendation]) {
    if recommendations.is_empty() {
        println!("  {}", "No recommendations available".yellow());
        return;
    }
    for (i, rec) in recommendations.iter().enumerate() {
        let tags: Vec<&str> = rec.tags.iter().map(|t| t.as_str()).collect();
        println!(
            "  {}. {} [{}] - score {:.3}",
            i + 1,
            rec.title.bold(),
            rec.category,
            rec.score
        );
        if !tags.is_empty() {
            println!("     tags: {}", tags.join(", ").dimmed());
        }
    }
}

/// Handle the 'feedback' command
fn handle_feedback(
    engine: Arc<WellnessEngine>,
    user_id: String,
    item_id: String,
    action: String,
    weight: Option<f32>,
) -> Result<()> {
    let signal = FeedbackSignal::parse(&action)
        .with_context(|| format!("Unrecognized action '{}' (use like/dislike/skip or a positive rating)", action))?;

    let updated = engine.record(&user_id, &item_id, signal, weight)?;
    println!(
        "{} Recorded {} for ({}, {}); interaction value is now {:.2}",
        "✓".green(),
        action.cyan(),
        user_id,
        item_id,
        updated
    );
    Ok(())
}

/// Handle the 'info' command
fn handle_info(engine: Arc<WellnessEngine>) -> Result<()> {
    let info = engine.info()?;
    println!("\n{}", "Engine info".bold());
    println!("  users:             {}", info.user_count);
    println!("  items:             {}", info.item_count);
    println!("  interactions:      {}", info.interaction_count);
    println!("  feature dimension: {}", info.feature_dimension);
    Ok(())
}

/// Handle the 'evaluate' command
fn handle_evaluate(engine: Arc<WellnessEngine>, k: usize, strategy: String) -> Result<()> {
    let strategy = Strategy::parse(&strategy);

    println!("Running leave-one-out holdout at k={} ({})...", k, strategy);
    let start = Instant::now();
    let metrics = engine.evaluate(k, strategy)?;
    let elapsed = start.elapsed();

    println!("\n{} (computed in {:?})", "Ranking metrics".bold(), elapsed);
    println!("  precision@{}: {:.6}", k, metrics.precision);
    println!("  recall@{}:    {:.6}", k, metrics.recall);
    println!("  f1@{}:        {:.6}", k, metrics.f1);
    println!("  map@{}:       {:.6}", k, metrics.map);
    Ok(())
}

/// Handle the 'benchmark' command
///
/// Fires concurrent read-only recommend requests; `recommend` and `info`
/// share the read lock, so throughput should scale with workers.
async fn handle_benchmark(
    engine: Arc<WellnessEngine>,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    let users = engine.user_ids()?;
    if users.is_empty() {
        println!("{}", "No users in the dataset; nothing to benchmark".yellow());
        return Ok(());
    }

    let concurrent = concurrent.max(1);
    let per_worker = requests.div_ceil(concurrent);

    println!(
        "Benchmarking {} requests across {} workers...",
        requests, concurrent
    );
    let start = Instant::now();

    let mut handles = Vec::with_capacity(concurrent);
    for _ in 0..concurrent {
        let engine = engine.clone();
        let users = users.clone();
        handles.push(tokio::task::spawn_blocking(move || -> Result<usize> {
            let mut rng = rand::rng();
            let request = RecommendRequest::default();
            let mut served = 0;
            for _ in 0..per_worker {
                let user_id = users
                    .choose(&mut rng)
                    .expect("user list checked non-empty above");
                engine.recommend(user_id, &request)?;
                served += 1;
            }
            Ok(served)
        }));
    }

    let mut total = 0;
    for handle in handles {
        total += handle.await.context("Benchmark worker panicked")??;
    }
    let elapsed = start.elapsed();

    println!(
        "{} {} requests in {:?} ({:.0} req/s)",
        "✓".green(),
        total,
        elapsed,
        total as f64 / elapsed.as_secs_f64()
    );
    Ok(())
}
