/// Embedding, global max-pool and dense layers
pub mod embedding_pool;
