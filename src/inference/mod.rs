pub mod provider;
pub mod providers;

pub use provider::{GenerationRequest, GenerativeProvider, ProviderError};
pub use providers::GeminiProvider;
