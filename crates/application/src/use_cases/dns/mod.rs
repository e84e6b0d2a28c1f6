pub mod handle_query;

pub use handle_query::{HandleDnsQueryUseCase, HashPrefixDefaults, QueryOutcome};
