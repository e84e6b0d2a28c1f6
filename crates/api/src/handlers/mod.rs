pub mod blocklist;
pub mod cache;
pub mod groups;
pub mod health;
pub mod hostname;
pub mod queries;
pub mod stats;
pub mod timeline;

pub use blocklist::get_blocklist;
pub use cache::{get_cache_metrics, get_cache_stats};
pub use health::health_check;
pub use hostname::get_hostname;
pub use queries::get_queries;
pub use stats::get_stats;
pub use timeline::get_timeline;
