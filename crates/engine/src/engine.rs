//! # Service façade
//!
//! `WellnessEngine` owns the engine lifecycle (load → train → serve) and the
//! synchronization boundary around all mutable state.
//!
//! ## Lock discipline
//! - `recommend` and `info` take the read lock and may run concurrently
//! - `feedback` and `evaluate` take the write lock (single writer); a reader
//!   therefore never observes a half-updated matrix or a scorer mid-retrain
//! - `recommend` for a previously unseen user upgrades to the write lock
//!   once, synthesizes an all-zero row, and serves through the cold-start
//!   path — never a not-found error

use crate::error::{EngineError, Result};
use crate::evaluation::{evaluate_holdout, EvalMetrics};
use crate::feedback::{self, FeedbackEvent, FeedbackLog, FeedbackSignal};
use data_loader::{load_dataset, InteractionMatrix, ItemCatalog};
use fusion::{
    clamp_alpha, fuse_scores, rank_top_n, BoostPipeline, MoodTagBoost, Recommendation,
    RecommendContext, Strategy,
};
use scorers::{CollabConfig, CollabScorer, ContentScorer};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Parameters for one `recommend` call; defaults mirror the service API
/// (`top_n=5, strategy=hybrid, alpha=0.5, context={}`).
#[derive(Debug, Clone)]
pub struct RecommendRequest {
    pub top_n: usize,
    pub strategy: Strategy,
    pub alpha: f32,
    pub context: RecommendContext,
}

impl Default for RecommendRequest {
    fn default() -> Self {
        Self {
            top_n: 5,
            strategy: Strategy::Hybrid,
            alpha: 0.5,
            context: RecommendContext::default(),
        }
    }
}

impl RecommendRequest {
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_context(mut self, context: RecommendContext) -> Self {
        self.context = context;
        self
    }
}

/// Engine construction knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub collab: CollabConfig,
    /// Multiplicative factor for mood-matched items
    pub boost_factor: f32,
    /// Audit log path; `None` disables the log
    pub feedback_log: Option<PathBuf>,
    /// How long an evaluation result stays cached
    pub eval_cache_ttl: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            collab: CollabConfig::default(),
            boost_factor: fusion::boosts::mood_tag::DEFAULT_BOOST_FACTOR,
            feedback_log: None,
            eval_cache_ttl: Duration::from_secs(60),
        }
    }
}

/// Counts exposed to health/info endpoints.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EngineInfo {
    pub user_count: usize,
    pub item_count: usize,
    pub interaction_count: usize,
    pub feature_dimension: usize,
}

/// Everything that lives behind the lock: the dataset plus both trained
/// scorers.
pub(crate) struct EngineState {
    pub(crate) catalog: ItemCatalog,
    pub(crate) interactions: InteractionMatrix,
    pub(crate) content: ContentScorer,
    pub(crate) collab: CollabScorer,
}

impl EngineState {
    /// Create the user's zero row if needed and keep the collaborative
    /// scorer's cache in step.
    pub(crate) fn ensure_user(&mut self, user_id: &str) -> bool {
        let created = self.interactions.ensure_row(user_id);
        if created {
            self.collab.refresh_user(&self.interactions, user_id);
        }
        created
    }

    /// Score, fuse, boost, and rank for one user.
    ///
    /// Alpha is forced to 1.0 (content only) when the user's row is all
    /// zero: with no history the collaborative signal is meaningless.
    pub(crate) fn recommend_with(
        &self,
        boosts: &BoostPipeline,
        user_id: &str,
        request: &RecommendRequest,
    ) -> Result<Vec<Recommendation>> {
        let content = self.content.score(&self.interactions, user_id);
        let collab = self.collab.score(&self.interactions, user_id);

        let mut alpha = clamp_alpha(request.alpha);
        if self.interactions.is_cold(user_id) {
            debug!(user_id, "Cold-start user, forcing content-only blend");
            alpha = 1.0;
        }

        let fused = fuse_scores(request.strategy, alpha, content, collab);
        let boosted = boosts
            .apply(fused, &self.catalog, &request.context)
            .map_err(EngineError::Boost)?;

        Ok(rank_top_n(&boosted, &self.catalog, request.top_n))
    }
}

struct EvalCacheEntry {
    at: Instant,
    k: usize,
    strategy: Strategy,
    metrics: EvalMetrics,
}

/// The recommendation engine façade consumed by the chat/routing layer.
pub struct WellnessEngine {
    state: RwLock<EngineState>,
    boosts: BoostPipeline,
    feedback_log: FeedbackLog,
    eval_cache: Mutex<Option<EvalCacheEntry>>,
    eval_cache_ttl: Duration,
}

impl WellnessEngine {
    /// Load the dataset from `data_dir` and train both scorers.
    ///
    /// Any load failure is fatal: the engine cannot serve without its base
    /// dataset.
    pub fn load(data_dir: &Path) -> Result<Self> {
        Self::load_with_config(data_dir, EngineConfig::default())
    }

    /// Load with explicit configuration.
    pub fn load_with_config(data_dir: &Path, config: EngineConfig) -> Result<Self> {
        let (catalog, interactions) = load_dataset(data_dir)?;
        Self::from_parts(catalog, interactions, config)
    }

    /// Build an engine from already-loaded tables (tests, embedding).
    pub fn from_parts(
        catalog: ItemCatalog,
        interactions: InteractionMatrix,
        config: EngineConfig,
    ) -> Result<Self> {
        if catalog.is_empty() {
            return Err(EngineError::Load(data_loader::DataLoadError::ValidationError(
                "items table contains no items".to_string(),
            )));
        }
        if interactions.item_ids() != catalog.item_ids().as_slice() {
            return Err(EngineError::Load(data_loader::DataLoadError::ValidationError(
                "interaction columns do not match the catalog".to_string(),
            )));
        }

        let content = ContentScorer::train(&catalog);
        let collab = CollabScorer::train(config.collab.clone(), &interactions);

        let boosts =
            BoostPipeline::new().add_boost(MoodTagBoost::new().with_factor(config.boost_factor));

        let feedback_log = match config.feedback_log {
            Some(path) => FeedbackLog::new(path),
            None => FeedbackLog::disabled(),
        };

        info!(
            items = catalog.len(),
            users = interactions.user_count(),
            dimension = content.dimension(),
            "Engine trained and ready"
        );

        Ok(Self {
            state: RwLock::new(EngineState {
                catalog,
                interactions,
                content,
                collab,
            }),
            boosts,
            feedback_log,
            eval_cache: Mutex::new(None),
            eval_cache_ttl: config.eval_cache_ttl,
        })
    }

    /// Ranked recommendations for `user_id`, at most `request.top_n` items.
    ///
    /// Unknown users are synthesized as zero rows (visible to subsequent
    /// calls) and served through the content/popularity cold-start path.
    #[instrument(skip(self, request))]
    pub fn recommend(
        &self,
        user_id: &str,
        request: &RecommendRequest,
    ) -> Result<Vec<Recommendation>> {
        if user_id.trim().is_empty() {
            return Err(EngineError::MissingUserId);
        }

        {
            let state = self.state.read().map_err(|_| EngineError::LockPoisoned)?;
            if state.interactions.has_user(user_id) {
                return state.recommend_with(&self.boosts, user_id, request);
            }
        }

        // First sighting of this user: take the write lock once to create
        // the zero row, then serve from the same guard.
        let mut state = self.state.write().map_err(|_| EngineError::LockPoisoned)?;
        if state.ensure_user(user_id) {
            info!(user_id, "Cold-start user added to the interaction store");
        }
        state.recommend_with(&self.boosts, user_id, request)
    }

    /// Record a feedback event; returns the updated interaction value.
    ///
    /// `weight` overrides the signal's default delta. The matrix update is
    /// the source of truth; the audit log append happens afterwards and its
    /// failure is non-fatal.
    #[instrument(skip(self))]
    pub fn record(
        &self,
        user_id: &str,
        item_id: &str,
        signal: FeedbackSignal,
        weight: Option<f32>,
    ) -> Result<f32> {
        feedback::validate(user_id, item_id, signal, weight)?;

        let delta = weight.unwrap_or_else(|| signal.delta());
        let updated = {
            let mut guard = self.state.write().map_err(|_| EngineError::LockPoisoned)?;
            let state = &mut *guard;
            let col = state
                .catalog
                .position(item_id)
                .ok_or_else(|| EngineError::UnknownItem {
                    item_id: item_id.to_string(),
                })?;
            state.interactions.ensure_row(user_id);
            let updated = feedback::apply_delta(&mut state.interactions, user_id, col, delta);
            // Synchronous retrain of the affected row: the next recommend
            // call must reflect this update
            state.collab.refresh_user(&state.interactions, user_id);
            updated
        };

        self.feedback_log
            .append(&FeedbackEvent::now(user_id, item_id, signal, delta));

        debug!(user_id, item_id, delta, updated, "Feedback recorded");
        Ok(updated)
    }

    /// Convenience wrapper over [`WellnessEngine::record`] without a weight
    /// override.
    pub fn feedback(&self, user_id: &str, item_id: &str, signal: FeedbackSignal) -> Result<f32> {
        self.record(user_id, item_id, signal, None)
    }

    /// Dataset and model counts for health reporting.
    pub fn info(&self) -> Result<EngineInfo> {
        let state = self.state.read().map_err(|_| EngineError::LockPoisoned)?;
        Ok(EngineInfo {
            user_count: state.interactions.user_count(),
            item_count: state.catalog.len(),
            interaction_count: state.interactions.interaction_count(),
            feature_dimension: state.content.dimension(),
        })
    }

    /// Leave-one-out holdout evaluation at `k`.
    ///
    /// Holds the write lock for the whole sweep (the holdout procedure masks
    /// and restores matrix cells in place) and caches the result for the
    /// configured TTL, since evaluation is comparatively expensive and does
    /// not need per-request freshness.
    pub fn evaluate(&self, k: usize, strategy: Strategy) -> Result<EvalMetrics> {
        {
            let cache = self.eval_cache.lock().map_err(|_| EngineError::LockPoisoned)?;
            if let Some(entry) = cache.as_ref() {
                if entry.k == k
                    && entry.strategy == strategy
                    && entry.at.elapsed() < self.eval_cache_ttl
                {
                    debug!(k, %strategy, "Serving cached evaluation");
                    return Ok(entry.metrics);
                }
            }
        }

        let metrics = {
            let mut state = self.state.write().map_err(|_| EngineError::LockPoisoned)?;
            evaluate_holdout(&mut state, &self.boosts, k, strategy)
        };

        let mut cache = self.eval_cache.lock().map_err(|_| EngineError::LockPoisoned)?;
        *cache = Some(EvalCacheEntry {
            at: Instant::now(),
            k,
            strategy,
            metrics,
        });
        Ok(metrics)
    }

    /// Snapshot of a user's interaction row (debugging/CLI output).
    pub fn interaction_row(&self, user_id: &str) -> Result<Option<Vec<f32>>> {
        let state = self.state.read().map_err(|_| EngineError::LockPoisoned)?;
        Ok(state.interactions.row(user_id).map(|row| row.to_vec()))
    }

    /// Known user ids in row insertion order (CLI sampling/inspection).
    pub fn user_ids(&self) -> Result<Vec<String>> {
        let state = self.state.read().map_err(|_| EngineError::LockPoisoned)?;
        Ok(state.interactions.user_order().to_vec())
    }
}
