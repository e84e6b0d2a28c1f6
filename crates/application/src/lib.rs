//! Application layer: ports (traits the infrastructure layer implements)
//! and the use cases that compose them into the request-processing
//! pipeline. Nothing here touches sockets, the database, or the
//! filesystem directly.

pub mod ports;
pub mod services;
pub mod use_cases;

pub use use_cases::{HandleDnsQueryUseCase, HashPrefixDefaults, QueryOutcome};
