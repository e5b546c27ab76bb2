// Semantic matching core: chunk → embed → store → score → rank.
// Chunking, scoring and ranking are synchronous; only the embedding calls suspend.

pub mod chunker;
pub mod handlers;
pub mod matcher;
pub mod models;
pub mod pipeline;
pub mod ranker;
pub mod store;
pub mod summary;
