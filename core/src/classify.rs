// core/src/classify.rs
//! URL classification.
//!
//! Pure and total: any string maps to a [`PageKind`], no match is `Unknown`.

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use crate::types::PageKind;

lazy_static! {
    static ref PULL_RE: Regex = Regex::new(r"^/[^/]+/[^/]+/pull/\d+").expect("pull pattern");
    static ref FILE_RE: Regex = Regex::new(r"^/[^/]+/[^/]+/blob/").expect("blob pattern");
    static ref TREE_RE: Regex = Regex::new(r"^/[^/]+/[^/]+/tree/").expect("tree pattern");
    static ref REPO_RE: Regex = Regex::new(r"^/[^/]+/[^/]+/?$").expect("repo pattern");
}

/// Classify a GitHub URL path. First matching pattern wins.
pub fn classify(path: &str) -> PageKind {
    if PULL_RE.is_match(path) {
        PageKind::PullRequest
    } else if FILE_RE.is_match(path) {
        PageKind::File
    } else if TREE_RE.is_match(path) {
        PageKind::Directory
    } else if REPO_RE.is_match(path) {
        PageKind::Repository
    } else {
        PageKind::Unknown
    }
}

/// Classify a parsed URL by its path component.
pub fn page_kind_of_url(url: &Url) -> PageKind {
    classify(url.path())
}

/// Whether the URL points at a recognizable GitHub host.
pub fn is_github_host(url: &Url) -> bool {
    matches!(url.host_str(), Some(host) if host == "github.com" || host.ends_with(".github.com"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pull_request_paths_win_regardless_of_trailing_segments() {
        assert_eq!(classify("/acme/widgets/pull/42"), PageKind::PullRequest);
        assert_eq!(classify("/acme/widgets/pull/42/files"), PageKind::PullRequest);
        assert_eq!(
            classify("/acme/widgets/pull/42/commits/abc123"),
            PageKind::PullRequest
        );
    }

    #[test]
    fn bare_repository_paths_with_and_without_trailing_slash() {
        assert_eq!(classify("/acme/widgets"), PageKind::Repository);
        assert_eq!(classify("/acme/widgets/"), PageKind::Repository);
    }

    #[test]
    fn blob_and_tree_segments_refine_the_kind() {
        assert_eq!(classify("/acme/widgets/blob/main/src/lib.rs"), PageKind::File);
        assert_eq!(classify("/acme/widgets/tree/main/src"), PageKind::Directory);
    }

    #[test]
    fn unmatched_paths_are_unknown_not_errors() {
        assert_eq!(classify(""), PageKind::Unknown);
        assert_eq!(classify("/"), PageKind::Unknown);
        assert_eq!(classify("/acme"), PageKind::Unknown);
        assert_eq!(classify("/acme/widgets/issues/7"), PageKind::Unknown);
        assert_eq!(classify("not a path at all"), PageKind::Unknown);
    }

    #[test]
    fn classification_is_deterministic() {
        for path in ["/a/b", "/a/b/pull/1", "", "/x"] {
            assert_eq!(classify(path), classify(path));
        }
    }

    #[test]
    fn github_host_check() {
        let ok = Url::parse("https://github.com/acme/widgets").unwrap();
        let sub = Url::parse("https://gist.github.com/acme").unwrap();
        let no = Url::parse("https://example.com/not-github").unwrap();
        assert!(is_github_host(&ok));
        assert!(is_github_host(&sub));
        assert!(!is_github_host(&no));
    }
}
