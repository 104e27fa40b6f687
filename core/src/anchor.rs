// core/src/anchor.rs
//! Anchor resolution.
//!
//! The host UI's markup changes across releases, so every page kind carries
//! an ordered chain of independent strategies instead of one selector. The
//! chain is evaluated top to bottom; the first strategy with a visible match
//! wins. An empty result is not an error; the caller falls back to a
//! fixed-position control.

use crate::dom::{Dom, InsertionPoint, NodeId, Placement};
use crate::types::PageKind;

/// Additional markup evidence required around a labeled control.
#[derive(Clone, Copy, Debug)]
pub enum Evidence {
    /// The control or one of its ancestors matches the selector.
    SelfOrAncestor(&'static str),
    /// Some descendant of the control matches the selector.
    Descendant(&'static str),
}

/// Scan for a control by its visible label.
#[derive(Clone, Copy, Debug)]
pub struct LabelScan {
    /// Elements to scan, e.g. `"button"` or `"button, summary"`.
    pub scope: &'static str,
    pub labels: &'static [&'static str],
    /// Accept labels that merely start with the wanted text ("Code ▾").
    pub prefix: bool,
    /// Exact attribute requirements on the control.
    pub attrs: &'static [(&'static str, &'static str)],
    /// At least one evidence item must hold (empty slice: none required).
    pub evidence: &'static [Evidence],
    /// Hop to an enclosing container before insertion.
    pub container: Option<&'static str>,
    pub placement: Placement,
}

#[derive(Clone, Copy, Debug)]
pub enum AnchorStrategy {
    /// Plain selector lookup; insertion is relative to the match (or to the
    /// container resolved via `closest`, falling back to the parent).
    Css {
        selector: &'static str,
        container: Option<&'static str>,
        placement: Placement,
    },
    Label(LabelScan),
}

const PULL_REQUEST_CHAIN: &[AnchorStrategy] = &[
    // "Code" dropdown in the PR header actions
    AnchorStrategy::Label(LabelScan {
        scope: "button",
        labels: &["Code"],
        prefix: true,
        attrs: &[("aria-haspopup", "true"), ("data-size", "small")],
        evidence: &[],
        container: None,
        placement: Placement::Before,
    }),
    // visible "Edit" button next to the title
    AnchorStrategy::Label(LabelScan {
        scope: "button",
        labels: &["Edit"],
        prefix: false,
        attrs: &[("data-size", "small")],
        evidence: &[],
        container: None,
        placement: Placement::After,
    }),
    AnchorStrategy::Css {
        selector: ".gh-header-actions",
        container: None,
        placement: Placement::Prepend,
    },
    AnchorStrategy::Css {
        selector: "[data-testid=\"issue-header-actions\"]",
        container: None,
        placement: Placement::Prepend,
    },
];

const FILE_CHAIN: &[AnchorStrategy] = &[
    AnchorStrategy::Css {
        selector: ".react-blob-header-edit-and-raw-actions",
        container: Some(".d-flex, .BtnGroup"),
        placement: Placement::Prepend,
    },
    AnchorStrategy::Css {
        selector: "[data-testid=\"raw-button\"]",
        container: Some(".d-flex, .BtnGroup"),
        placement: Placement::Prepend,
    },
    AnchorStrategy::Css {
        selector: ".Box-header .d-flex.gap-2",
        container: Some(".d-flex, .BtnGroup"),
        placement: Placement::Prepend,
    },
    AnchorStrategy::Css {
        selector: ".Box-header button[data-hotkey]",
        container: Some(".d-flex, .BtnGroup"),
        placement: Placement::Prepend,
    },
];

const REPOSITORY_CHAIN: &[AnchorStrategy] = &[
    // the green "Code" dropdown
    AnchorStrategy::Label(LabelScan {
        scope: "button, summary",
        labels: &["Code"],
        prefix: true,
        attrs: &[],
        evidence: &[
            Evidence::SelfOrAncestor(".btn-primary"),
            Evidence::Descendant(".octicon-code"),
            Evidence::SelfOrAncestor("[data-component=\"IconButton\"]"),
        ],
        container: None,
        placement: Placement::Before,
    }),
    AnchorStrategy::Css {
        selector: "[class*=\"react-code-view\"] .d-flex.gap-2",
        container: None,
        placement: Placement::Prepend,
    },
    AnchorStrategy::Css {
        selector: "get-repo",
        container: None,
        placement: Placement::Prepend,
    },
    AnchorStrategy::Css {
        selector: "#repo-content-pjax-container .d-flex.gap-2",
        container: None,
        placement: Placement::Prepend,
    },
    AnchorStrategy::Css {
        selector: ".file-navigation .d-flex.gap-2",
        container: None,
        placement: Placement::Prepend,
    },
    AnchorStrategy::Css {
        selector: ".Box-header .d-flex.gap-2",
        container: None,
        placement: Placement::Prepend,
    },
    // "Edit" / "Go to file" as a last resort, appended into their row
    AnchorStrategy::Label(LabelScan {
        scope: "button, a",
        labels: &["Edit", "Go to file"],
        prefix: false,
        attrs: &[],
        evidence: &[],
        container: Some(".d-flex, .gap-2"),
        placement: Placement::Append,
    }),
];

/// Ordered strategy chain for a page kind. `Unknown` has no chain.
pub fn chain(kind: PageKind) -> &'static [AnchorStrategy] {
    match kind {
        PageKind::PullRequest => PULL_REQUEST_CHAIN,
        PageKind::File => FILE_CHAIN,
        PageKind::Repository | PageKind::Directory => REPOSITORY_CHAIN,
        PageKind::Unknown => &[],
    }
}

/// Walk the chain for `kind` and return the first visible insertion point.
pub fn resolve(dom: &dyn Dom, kind: PageKind) -> Option<InsertionPoint> {
    for strategy in chain(kind) {
        if let Some(point) = apply(dom, strategy) {
            return Some(point);
        }
    }
    None
}

fn apply(dom: &dyn Dom, strategy: &AnchorStrategy) -> Option<InsertionPoint> {
    match strategy {
        AnchorStrategy::Css {
            selector,
            container,
            placement,
        } => {
            let target = dom.query(selector)?;
            let node = match container {
                Some(sel) => dom.closest(target, sel).or_else(|| dom.parent(target))?,
                None => target,
            };
            if !dom.is_visible(node) {
                return None;
            }
            Some(InsertionPoint {
                node,
                placement: *placement,
            })
        }
        AnchorStrategy::Label(scan) => {
            for candidate in dom.query_all(scan.scope) {
                if !label_matches(dom, candidate, scan) {
                    continue;
                }
                // hidden duplicates stay in the DOM; require a rendered parent
                let parent = match dom.parent(candidate) {
                    Some(p) if dom.is_visible(p) => p,
                    _ => continue,
                };
                let node = match scan.container {
                    Some(sel) => dom.closest(candidate, sel).unwrap_or(parent),
                    None => candidate,
                };
                return Some(InsertionPoint {
                    node,
                    placement: scan.placement,
                });
            }
            None
        }
    }
}

fn label_matches(dom: &dyn Dom, node: NodeId, scan: &LabelScan) -> bool {
    let text = dom.text(node);
    let labeled = scan.labels.iter().any(|label| {
        if scan.prefix {
            text == *label || text.starts_with(label)
        } else {
            text == *label
        }
    });
    if !labeled {
        return false;
    }
    for (name, value) in scan.attrs {
        if dom.attr(node, name).as_deref() != Some(*value) {
            return false;
        }
    }
    if scan.evidence.is_empty() {
        return true;
    }
    scan.evidence.iter().any(|evidence| match evidence {
        Evidence::SelfOrAncestor(sel) => dom.closest(node, sel).is_some(),
        Evidence::Descendant(sel) => dom.has_descendant(node, sel),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::{el, MemoryDom};

    fn pr_page_with_code_button() -> (MemoryDom, NodeId) {
        let mut dom = MemoryDom::new();
        let actions = dom.append(MemoryDom::BODY, el("div"));
        let code = dom.append(
            actions,
            el("button")
                .text("Code")
                .attr("aria-haspopup", "true")
                .attr("data-size", "small"),
        );
        (dom, code)
    }

    #[test]
    fn pull_request_prefers_the_code_dropdown() {
        let (dom, code) = pr_page_with_code_button();
        let point = resolve(&dom, PageKind::PullRequest).unwrap();
        assert_eq!(point.node, code);
        assert_eq!(point.placement, Placement::Before);
    }

    #[test]
    fn hidden_duplicate_buttons_are_rejected() {
        let mut dom = MemoryDom::new();
        let stale = dom.append(MemoryDom::BODY, el("div").hidden());
        dom.append(
            stale,
            el("button")
                .text("Code")
                .attr("aria-haspopup", "true")
                .attr("data-size", "small"),
        );
        let live = dom.append(MemoryDom::BODY, el("div"));
        let visible = dom.append(
            live,
            el("button")
                .text("Code")
                .attr("aria-haspopup", "true")
                .attr("data-size", "small"),
        );

        let point = resolve(&dom, PageKind::PullRequest).unwrap();
        assert_eq!(point.node, visible);
    }

    #[test]
    fn pull_request_falls_back_to_header_actions() {
        let mut dom = MemoryDom::new();
        let header = dom.append(MemoryDom::BODY, el("div").class("gh-header-actions"));
        let point = resolve(&dom, PageKind::PullRequest).unwrap();
        assert_eq!(point.node, header);
        assert_eq!(point.placement, Placement::Prepend);
    }

    #[test]
    fn file_pages_anchor_into_the_enclosing_button_group() {
        let mut dom = MemoryDom::new();
        let group = dom.append(MemoryDom::BODY, el("div").class("BtnGroup"));
        dom.append(group, el("button").attr("data-testid", "raw-button").text("Raw"));

        let point = resolve(&dom, PageKind::File).unwrap();
        assert_eq!(point.node, group);
        assert_eq!(point.placement, Placement::Prepend);
    }

    #[test]
    fn repository_code_button_needs_supporting_evidence() {
        let mut dom = MemoryDom::new();
        let row = dom.append(MemoryDom::BODY, el("div"));
        // a random "Code" label without any dropdown markup is skipped
        dom.append(row, el("button").text("Code"));
        assert!(resolve(&dom, PageKind::Repository).is_none());

        let primary = dom.append(row, el("button").class("btn-primary").text("Code"));
        let point = resolve(&dom, PageKind::Repository).unwrap();
        assert_eq!(point.node, primary);
        assert_eq!(point.placement, Placement::Before);
    }

    #[test]
    fn directory_pages_share_the_repository_chain() {
        let mut dom = MemoryDom::new();
        let nav = dom.append(MemoryDom::BODY, el("div").class("file-navigation"));
        let row = dom.append(nav, el("div").class("d-flex").class("gap-2"));
        let point = resolve(&dom, PageKind::Directory).unwrap();
        assert_eq!(point.node, row);
    }

    #[test]
    fn no_strategy_match_yields_none() {
        let dom = MemoryDom::new();
        assert!(resolve(&dom, PageKind::PullRequest).is_none());
        assert!(resolve(&dom, PageKind::Unknown).is_none());
    }
}
