//! Sift Search: the retrieval engine's public entry point.
//!
//! [`SearchOrchestrator`] answers queries with cosine-similarity ranking
//! over stored document vectors and falls back to escaped substring search
//! when vectors are unavailable, fail, or find nothing.
//!
//! # Modules
//!
//! - [`orchestrator`]: `SearchOrchestrator` (search, suggest, find_related)
//! - [`strategy`]: `SearchStrategy` with vector and substring implementations
//! - [`ranking`]: Hybrid ranking of vector hits
//! - [`result`]: `SearchResult` and `SearchType`

pub mod orchestrator;
pub mod ranking;
pub mod result;
pub mod strategy;

pub use orchestrator::{MIN_SUGGEST_PREFIX, SearchOrchestrator};
pub use ranking::{hybrid_rank, hybrid_score, recency_signal, title_overlap};
pub use result::{SearchResult, SearchType};
pub use strategy::{
    SearchRequest, SearchStrategy, StrategyFailure, SubstringStrategy, VectorStrategy,
    like_proxy_score,
};
