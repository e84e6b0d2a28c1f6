pub mod cache;
pub mod chain;
pub mod crypto;
pub mod trust_anchor;
pub mod types;
pub mod validator;

pub use cache::{CacheStatsSnapshot, DnssecCache};
pub use chain::{ChainVerifier, ValidationResult};
pub use crypto::SignatureVerifier;
pub use trust_anchor::{TrustAnchor, TrustAnchorStore};
pub use types::{DnskeyRecord, DsRecord, RrsigRecord};
pub use validator::{DnssecValidator, ValidatedResponse};
