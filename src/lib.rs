pub mod cache;
pub mod config;
pub mod logging;
pub mod research;
pub mod search;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use research::context::ResearchContext;
pub use research::execute;
pub use search::{FetchOutcome, SearchProvider, SourceFetcher};
pub use types::entity::{EntityInput, EntityKind};
pub use types::state::{QualityTier, ReflectionState, ResearchState};
