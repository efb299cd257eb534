//! VendorMatch embedding providers
//!
//! Provider trait, Ollama HTTP client, offline hashing embedder and cosine similarity

mod hashing;
mod ollama;
mod provider;
mod similarity;
mod types;

pub use hashing::HashingEmbedder;
pub use ollama::OllamaEmbedder;
pub use provider::{provider_from_config, EmbeddingProvider};
pub use similarity::{cosine_similarity, l2_normalize_in_place};
pub use types::{EmbedRequest, EmbedResponse};
