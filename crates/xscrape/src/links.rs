//! t.co URL recovery and link classification.
//!
//! X rewrites every outbound link through its t.co shortener, but the
//! rendered anchor text usually still shows the true destination, split
//! across lines and possibly truncated with an ellipsis. This module
//! reassembles that text into a real URL and tags it by domain.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use url::Url;

/// arXiv paper IDs like `2301.00001` or `2301.00001v2`.
static ARXIV_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4}\.\d{4,5}(?:v\d+)?)\b").unwrap());

/// Known domains and the category each maps to.
///
/// Matched exactly or as a subdomain suffix (`sub.arxiv.org` counts).
const KNOWN_DOMAINS: &[(&str, LinkCategory)] = &[
    ("arxiv.org", LinkCategory::Arxiv),
    ("openreview.net", LinkCategory::Openreview),
    ("papers.nips.cc", LinkCategory::Neurips),
    ("proceedings.mlr.press", LinkCategory::Mlr),
    ("ieeexplore.ieee.org", LinkCategory::Ieee),
    ("dl.acm.org", LinkCategory::Acm),
    ("paperswithcode.com", LinkCategory::PapersWithCode),
    ("scholar.google.com", LinkCategory::Scholar),
    ("semanticscholar.org", LinkCategory::SemanticScholar),
    ("huggingface.co", LinkCategory::HuggingFace),
    ("github.com", LinkCategory::Github),
];

/// Category of a resolved link's domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkCategory {
    /// arxiv.org preprints.
    Arxiv,
    /// OpenReview submissions.
    Openreview,
    /// NeurIPS proceedings.
    Neurips,
    /// PMLR proceedings.
    Mlr,
    /// IEEE Xplore.
    Ieee,
    /// ACM digital library.
    Acm,
    /// Papers with Code.
    PapersWithCode,
    /// Google Scholar.
    Scholar,
    /// Semantic Scholar.
    SemanticScholar,
    /// Hugging Face models/datasets.
    HuggingFace,
    /// GitHub repositories.
    Github,
    /// `*.github.io` personal project pages.
    ProjectPage,
}

impl fmt::Display for LinkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LinkCategory::Arxiv => "arxiv",
            LinkCategory::Openreview => "openreview",
            LinkCategory::Neurips => "neurips",
            LinkCategory::Mlr => "mlr",
            LinkCategory::Ieee => "ieee",
            LinkCategory::Acm => "acm",
            LinkCategory::PapersWithCode => "paperswithcode",
            LinkCategory::Scholar => "scholar",
            LinkCategory::SemanticScholar => "semanticscholar",
            LinkCategory::HuggingFace => "huggingface",
            LinkCategory::Github => "github",
            LinkCategory::ProjectPage => "project_page",
        };
        write!(f, "{s}")
    }
}

/// Reconstruct a URL from X's line-wrapped anchor text.
///
/// Returns `None` when the text doesn't look like a displayed URL.
#[must_use]
pub fn recover_url_from_anchor_text(text: &str) -> Option<String> {
    let lines: Vec<&str> = text
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let first = *lines.first()?;

    let recovered = if first.to_lowercase().starts_with("http") {
        // Multi-line URL: accumulate lines until trailing prose appears.
        let mut parts: Vec<&str> = Vec::new();
        for line in &lines {
            let clean = line.trim_end_matches('\u{2026}').trim();
            if clean.is_empty() {
                continue;
            }
            if clean.contains(' ') {
                break;
            }
            parts.push(clean);
        }
        parts.concat()
    } else {
        // Bare domain display like "github.com".
        let clean = first.trim_end_matches('\u{2026}').trim();
        if clean.contains(' ') || clean.len() > 80 {
            return None;
        }
        format!("https://{clean}")
    };

    if recovered.starts_with("http") {
        Some(recovered)
    } else {
        Some(format!("https://{recovered}"))
    }
}

/// Return `(domain, category)` for a URL.
///
/// A malformed URL yields an empty domain and no category - this is a
/// data-quality signal, not a failure.
#[must_use]
pub fn classify_domain(url: &str) -> (String, Option<LinkCategory>) {
    let Some(domain) = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
    else {
        return (String::new(), None);
    };

    for (known, category) in KNOWN_DOMAINS {
        if domain == *known || domain.ends_with(&format!(".{known}")) {
            return (domain, Some(*category));
        }
    }

    if domain.ends_with(".github.io") {
        return (domain, Some(LinkCategory::ProjectPage));
    }

    (domain, None)
}

/// Resolve a link, returning `(resolved_url, domain, category)`.
///
/// For t.co hrefs the anchor text is tried first; when recovery fails the
/// literal href is classified instead (it will tag as t.co, signaling an
/// unresolved shortener link).
#[must_use]
pub fn resolve_link(href: &str, anchor_text: &str) -> (String, String, Option<LinkCategory>) {
    if href.contains("t.co/") {
        if let Some(recovered) = recover_url_from_anchor_text(anchor_text) {
            let (domain, category) = classify_domain(&recovered);
            return (recovered, domain, category);
        }
    }

    let (domain, category) = classify_domain(href);
    (href.to_string(), domain, category)
}

/// Extract arXiv paper IDs from free text, in order of appearance.
#[must_use]
pub fn extract_arxiv_ids(text: &str) -> Vec<String> {
    ARXIV_ID_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recover_multiline_url() {
        let text = "https://\narxiv.org/\nabs/2301.00001";
        assert_eq!(
            recover_url_from_anchor_text(text),
            Some("https://arxiv.org/abs/2301.00001".to_string())
        );
    }

    #[test]
    fn test_recover_strips_ellipsis() {
        let text = "https://github.com/\u{2026}\nexample/repo";
        assert_eq!(
            recover_url_from_anchor_text(text),
            Some("https://github.com/example/repo".to_string())
        );
    }

    #[test]
    fn test_recover_stops_at_prose() {
        let text = "https://arxiv.org/abs/1\nmore details inside";
        assert_eq!(
            recover_url_from_anchor_text(text),
            Some("https://arxiv.org/abs/1".to_string())
        );
    }

    #[test]
    fn test_recover_bare_domain() {
        assert_eq!(
            recover_url_from_anchor_text("github.com"),
            Some("https://github.com".to_string())
        );
    }

    #[test]
    fn test_recover_rejects_prose() {
        assert_eq!(recover_url_from_anchor_text("click here for more"), None);
    }

    #[test]
    fn test_recover_rejects_overlong_domain() {
        let long = "a".repeat(81);
        assert_eq!(recover_url_from_anchor_text(&long), None);
    }

    #[test]
    fn test_recover_empty_text() {
        assert_eq!(recover_url_from_anchor_text(""), None);
        assert_eq!(recover_url_from_anchor_text("  \n  "), None);
    }

    #[test]
    fn test_classify_exact_and_subdomain() {
        assert_eq!(
            classify_domain("https://arxiv.org/abs/2301.00001"),
            ("arxiv.org".to_string(), Some(LinkCategory::Arxiv))
        );
        assert_eq!(
            classify_domain("https://www.arxiv.org/abs/1"),
            ("www.arxiv.org".to_string(), Some(LinkCategory::Arxiv))
        );
    }

    #[test]
    fn test_classify_project_page() {
        let (domain, category) = classify_domain("https://someone.github.io/paper");
        assert_eq!(domain, "someone.github.io");
        assert_eq!(category, Some(LinkCategory::ProjectPage));
    }

    #[test]
    fn test_classify_unknown() {
        let (domain, category) = classify_domain("https://example.com/page");
        assert_eq!(domain, "example.com");
        assert_eq!(category, None);
    }

    #[test]
    fn test_classify_malformed() {
        assert_eq!(classify_domain("not a url"), (String::new(), None));
    }

    #[test]
    fn test_resolve_tco_recovers_from_anchor() {
        let (url, domain, category) =
            resolve_link("https://t.co/abc123", "https://\narxiv.org/\nabs/2301.00001");
        assert_eq!(url, "https://arxiv.org/abs/2301.00001");
        assert_eq!(domain, "arxiv.org");
        assert_eq!(category, Some(LinkCategory::Arxiv));
    }

    #[test]
    fn test_resolve_tco_fallback_to_href() {
        let (url, domain, category) = resolve_link("https://t.co/abc123", "click here for more");
        assert_eq!(url, "https://t.co/abc123");
        assert_eq!(domain, "t.co");
        assert_eq!(category, None);
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let a = resolve_link("https://t.co/x", "github.com");
        let b = resolve_link("https://t.co/x", "github.com");
        assert_eq!(a, b);
        assert_eq!(a.2, Some(LinkCategory::Github));
    }

    #[test]
    fn test_extract_arxiv_ids() {
        let ids = extract_arxiv_ids("see 2301.00001 and 2206.12345v2, not 12.34");
        assert_eq!(ids, vec!["2301.00001", "2206.12345v2"]);
    }
}
