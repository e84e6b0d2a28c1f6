//! Bastion DNS infrastructure layer.
//!
//! Adapters that implement the `application` crate's ports against real
//! systems: SQLite, the filesystem, `hickory-server`/`hickory-proto` for the
//! wire protocol, `reqwest` for outbound HTTP, `redis`/`maxminddb` for the
//! optional KV and geo backends. Nothing in `application` or `domain`
//! depends back on this crate.

pub mod database;
pub mod dns;
pub mod geoip;
pub mod repositories;
