//! Public-suffix-aware domain helpers: subdomain enumeration, subdomain
//! tests, and the Android metric-domain cache-amplification rewrite.
//!
//! These are pure, allocation-light functions following the style of
//! `crate::validators` — free functions over `&str`, no new types beyond
//! what the caller needs.

use std::sync::Arc;

/// A minimal public-suffix lookup. Real deployments would load the full
/// Mozilla public suffix list; this covers the common single- and
/// two-label suffixes needed to classify eTLD+1 correctly without pulling
/// in the ~9k-line PSL dataset.
pub trait PublicSuffixList: Send + Sync {
    /// Number of labels, counted from the right, that make up the public
    /// suffix of `labels` (e.g. 1 for "org", 2 for "co.uk"). Returns 1 if
    /// no match is found so unknown TLDs degrade to plain single-label.
    fn suffix_len(&self, labels: &[&str]) -> usize;
}

/// Built-in suffix list covering common ICANN TLDs plus a handful of
/// well-known two-label second-level suffixes.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultPsl;

const TWO_LABEL_SUFFIXES: &[&str] = &[
    "co.uk", "org.uk", "ac.uk", "gov.uk", "com.au", "net.au", "org.au", "co.jp", "co.nz",
    "com.br", "co.in",
];

impl PublicSuffixList for DefaultPsl {
    fn suffix_len(&self, labels: &[&str]) -> usize {
        if labels.len() >= 2 {
            let last_two = format!(
                "{}.{}",
                labels[labels.len() - 2],
                labels[labels.len() - 1]
            );
            if TWO_LABEL_SUFFIXES.iter().any(|s| s.eq_ignore_ascii_case(&last_two)) {
                return 2;
            }
        }
        1
    }
}

fn split_labels(fqdn: &str) -> Vec<&str> {
    let trimmed = fqdn.strip_suffix('.').unwrap_or(fqdn);
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('.').collect()
}

/// Append up to `n` proper subdomains of `fqdn` strictly above its eTLD,
/// shortest first, to `dst`, and return it.
///
/// `n` bounds the number of suffix *lengths* considered starting from the
/// bare public suffix itself (which is never emitted) — so the number of
/// domains actually appended is `min(n - 1, labels(fqdn) - suffix_len)`.
pub fn append_subdomains<'a>(
    dst: &'a mut Vec<Arc<str>>,
    fqdn: &str,
    n: usize,
    psl: &dyn PublicSuffixList,
) -> &'a mut Vec<Arc<str>> {
    let labels = split_labels(fqdn);
    if labels.is_empty() || n == 0 {
        return dst;
    }
    let suffix_len = psl.suffix_len(&labels).min(labels.len());
    let total_labels = labels.len();
    let max_len = (suffix_len + n - 1).min(total_labels);

    for len in (suffix_len + 1)..=max_len {
        let start = total_labels - len;
        let candidate = labels[start..].join(".");
        dst.push(Arc::from(candidate.as_str()));
    }
    dst
}

/// True if `child` is a strict subdomain of `parent` at any depth.
pub fn is_subdomain(child: &str, parent: &str) -> bool {
    let child = child.strip_suffix('.').unwrap_or(child);
    let parent = parent.strip_suffix('.').unwrap_or(parent);
    if child.eq_ignore_ascii_case(parent) {
        return false;
    }
    child
        .to_ascii_lowercase()
        .ends_with(&format!(".{}", parent.to_ascii_lowercase()))
}

/// True if `child` is exactly one label below `parent`.
pub fn is_immediate_subdomain(child: &str, parent: &str) -> bool {
    if !is_subdomain(child, parent) {
        return false;
    }
    let child = child.strip_suffix('.').unwrap_or(child);
    let parent = parent.strip_suffix('.').unwrap_or(parent);
    child.matches('.').count() == parent.matches('.').count() + 1
}

/// Collapse Android's per-device metric probe domains
/// (`<id>-dnsotls-ds.metric.gstatic.com.` / `<id>-dnsohttps-ds.metric.gstatic.com.`)
/// to a canonical all-zero form so identical probes from different devices
/// share one cache entry. Returns an empty string if `fqdn` doesn't match.
pub fn android_metric_domain_replacement(fqdn: &str) -> String {
    const SUFFIX: &str = ".metric.gstatic.com.";
    let Some(rest) = fqdn.strip_suffix(SUFFIX) else {
        return String::new();
    };
    let Some((first_label, _)) = rest.split_once('.') else {
        return String::new();
    };
    let marker = ["-dnsotls-ds", "-dnsohttps-ds"]
        .iter()
        .find(|m| first_label.ends_with(*m));
    let Some(marker) = marker else {
        return String::new();
    };
    let id_len = first_label.len() - marker.len();
    if id_len == 0 || !first_label[..id_len].chars().all(|c| c.is_ascii_alphanumeric()) {
        return String::new();
    }
    format!("{}{}{}", "0".repeat(id_len), marker, SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(items: &[&str]) -> Vec<Arc<str>> {
        items.iter().map(|s| Arc::from(*s)).collect()
    }

    #[test]
    fn append_subdomains_full_budget() {
        let mut dst = Vec::new();
        append_subdomains(&mut dst, "example.a.b.c.org", 5, &DefaultPsl);
        assert_eq!(dst, v(&["c.org", "b.c.org", "a.b.c.org", "example.a.b.c.org"]));
    }

    #[test]
    fn append_subdomains_bare_tld_is_empty() {
        let mut dst = Vec::new();
        append_subdomains(&mut dst, "org", 100, &DefaultPsl);
        assert!(dst.is_empty());
    }

    #[test]
    fn append_subdomains_truncated_budget() {
        let mut dst = Vec::new();
        append_subdomains(&mut dst, "example.a.b.c.org", 3, &DefaultPsl);
        assert_eq!(dst, v(&["c.org", "b.c.org"]));
    }

    #[test]
    fn android_metric_domain_replacement_dnsotls() {
        assert_eq!(
            android_metric_domain_replacement("12345678-dnsotls-ds.metric.gstatic.com."),
            "00000000-dnsotls-ds.metric.gstatic.com."
        );
    }

    #[test]
    fn android_metric_domain_replacement_dnsohttps() {
        assert_eq!(
            android_metric_domain_replacement("123456-dnsohttps-ds.metric.gstatic.com."),
            "000000-dnsohttps-ds.metric.gstatic.com."
        );
    }

    #[test]
    fn android_metric_domain_replacement_no_match() {
        assert_eq!(android_metric_domain_replacement("example.com"), "");
    }

    #[test]
    fn subdomain_checks() {
        assert!(is_subdomain("sub.example.com", "example.com"));
        assert!(!is_subdomain("example.com", "example.com"));
        assert!(is_subdomain("subsub.sub.example.com", "example.com"));
        assert!(!is_immediate_subdomain("subsub.sub.example.com", "example.com"));
        assert!(is_immediate_subdomain("sub.example.com", "example.com"));
    }
}
