pub mod block_index;
pub mod compiler;
pub mod decision_cache;
pub mod engine;
pub mod hash_prefix;
pub mod suffix_trie;

pub use block_index::{AllowlistIndex, BlockIndex, SourceMeta};
pub use engine::BlockFilterEngine;
pub use hash_prefix::HashPrefixFilter;
pub use suffix_trie::SuffixTrie;
