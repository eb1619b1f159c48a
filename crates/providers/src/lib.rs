pub mod catalog;
pub mod openrouter;
pub mod traits;

pub use catalog::{rank_free_models, ModelCache};
pub use openrouter::OpenRouterClient;
pub use traits::{Architecture, CatalogEntry, ChatProvider, Pricing, ProviderError};
