/// Which hash-prefix list a lookup is checked against. Each category is an
/// independently loaded/reloaded list and an independent per-profile
/// `FilterPolicy` toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashPrefixCategory {
    SafeBrowsing,
    Parental,
    NewlyRegistered,
}

impl HashPrefixCategory {
    /// The `list_id` recorded against a block caused by this category,
    /// reusing `QueryOutcome::Blocked` rather than a dedicated outcome.
    pub fn list_id(&self) -> &'static str {
        match self {
            HashPrefixCategory::SafeBrowsing => "safe_browsing",
            HashPrefixCategory::Parental => "parental",
            HashPrefixCategory::NewlyRegistered => "newly_registered",
        }
    }
}

/// Threat/category lists looked up by truncated hash rather than full
/// domain string — the lists themselves (safe-browsing, parental/adult,
/// newly-registered-domain) are too large or too sensitive to ship as
/// plaintext domain sets. Hot-reloaded the same way the block filter engine
/// is: readers never see a torn generation.
#[async_trait::async_trait]
pub trait HashPrefixPort: Send + Sync {
    fn is_listed(&self, domain: &str, category: HashPrefixCategory) -> bool;

    /// Re-fetch every configured source and atomically swap in the result.
    async fn reload(&self) -> Result<(), bastion_dns_domain::DomainError>;
}
