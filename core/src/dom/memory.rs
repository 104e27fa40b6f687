// core/src/dom/memory.rs
//! Arena-backed [`Dom`] implementation.
//!
//! Nodes are visible by default (rendered height 1); fixtures model hidden
//! duplicate markup with [`ElementBuilder::hidden`].

use std::collections::BTreeMap;

use super::{Dom, ElementSpec, InsertionPoint, NodeId, Placement};

#[derive(Clone, Debug)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    text: String,
    height: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    removed: bool,
}

/// Builder for fixture nodes.
#[derive(Clone, Debug)]
pub struct ElementBuilder {
    tag: String,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    text: String,
    height: u32,
}

/// Shorthand constructor: `el("button").text("Code")`.
pub fn el(tag: impl Into<String>) -> ElementBuilder {
    ElementBuilder {
        tag: tag.into(),
        classes: Vec::new(),
        attrs: BTreeMap::new(),
        text: String::new(),
        height: 1,
    }
}

impl ElementBuilder {
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    pub fn hidden(self) -> Self {
        self.height(0)
    }
}

pub struct MemoryDom {
    arena: Vec<Node>,
}

impl MemoryDom {
    pub const BODY: NodeId = NodeId(0);

    pub fn new() -> Self {
        Self {
            arena: vec![Node {
                tag: "body".into(),
                classes: Vec::new(),
                attrs: BTreeMap::new(),
                text: String::new(),
                height: 1,
                parent: None,
                children: Vec::new(),
                removed: false,
            }],
        }
    }

    /// Append a fixture node under `parent`.
    pub fn append(&mut self, parent: NodeId, element: ElementBuilder) -> NodeId {
        let id = NodeId(self.arena.len());
        self.arena.push(Node {
            tag: element.tag,
            classes: element.classes,
            attrs: element.attrs,
            text: element.text,
            height: element.height,
            parent: Some(parent),
            children: Vec::new(),
            removed: false,
        });
        self.arena[parent.0].children.push(id);
        id
    }

    /// Count live elements carrying `class`.
    pub fn count_class(&self, class: &str) -> usize {
        self.live_ids()
            .filter(|id| self.node(*id).classes.iter().any(|c| c == class))
            .count()
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.arena[id.0]
    }

    fn live_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.arena.len())
            .map(NodeId)
            .filter(|id| !self.arena[id.0].removed && !self.detached(*id))
    }

    fn detached(&self, id: NodeId) -> bool {
        let mut cur = id;
        loop {
            if self.arena[cur.0].removed {
                return true;
            }
            match self.arena[cur.0].parent {
                Some(p) => cur = p,
                None => return cur != Self::BODY,
            }
        }
    }

    /// Document-order traversal of live nodes.
    fn document_order(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![Self::BODY];
        while let Some(id) = stack.pop() {
            if self.arena[id.0].removed {
                continue;
            }
            out.push(id);
            for child in self.arena[id.0].children.iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    fn matches_simple(&self, id: NodeId, simple: &SimpleSelector) -> bool {
        let node = self.node(id);
        if let Some(tag) = &simple.tag {
            if &node.tag != tag {
                return false;
            }
        }
        if let Some(wanted) = &simple.id {
            if node.attrs.get("id") != Some(wanted) {
                return false;
            }
        }
        for class in &simple.classes {
            if !node.classes.iter().any(|c| c == class) {
                return false;
            }
        }
        for attr in &simple.attrs {
            match (&attr.op, node.attrs.get(&attr.name)) {
                (AttrOp::Exists, Some(_)) => {}
                (AttrOp::Equals(v), Some(actual)) if actual == v => {}
                (AttrOp::Contains(v), Some(actual)) if actual.contains(v.as_str()) => {}
                _ => {
                    // class attribute doubles as a selector target
                    if attr.name == "class" {
                        let joined = node.classes.join(" ");
                        match &attr.op {
                            AttrOp::Exists if !node.classes.is_empty() => continue,
                            AttrOp::Equals(v) if &joined == v => continue,
                            AttrOp::Contains(v) if joined.contains(v.as_str()) => continue,
                            _ => {}
                        }
                    }
                    return false;
                }
            }
        }
        true
    }

    /// Descendant-chain match: `id` matches the last simple selector and
    /// some ancestor chain matches the earlier ones in order.
    fn matches_chain(&self, id: NodeId, chain: &[SimpleSelector]) -> bool {
        let Some((last, rest)) = chain.split_last() else {
            return false;
        };
        if !self.matches_simple(id, last) {
            return false;
        }
        let mut remaining = rest;
        let mut cur = self.node(id).parent;
        while let Some(ancestor) = cur {
            let Some((tail, head)) = remaining.split_last() else {
                break;
            };
            if self.matches_simple(ancestor, tail) {
                remaining = head;
            }
            cur = self.node(ancestor).parent;
        }
        remaining.is_empty()
    }

    fn matches_selector(&self, id: NodeId, selector: &Selector) -> bool {
        selector
            .alternatives
            .iter()
            .any(|chain| self.matches_chain(id, chain))
    }
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom for MemoryDom {
    fn query(&self, selector: &str) -> Option<NodeId> {
        let parsed = Selector::parse(selector);
        self.document_order()
            .into_iter()
            .find(|id| self.matches_selector(*id, &parsed))
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        let parsed = Selector::parse(selector);
        self.document_order()
            .into_iter()
            .filter(|id| self.matches_selector(*id, &parsed))
            .collect()
    }

    fn text(&self, node: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if self.arena[id.0].removed {
                continue;
            }
            out.push_str(&self.arena[id.0].text);
            for child in self.arena[id.0].children.iter().rev() {
                stack.push(*child);
            }
        }
        out.trim().to_string()
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.node(node).attrs.get(name).cloned()
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node).classes.iter().any(|c| c == class)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    fn closest(&self, node: NodeId, selector: &str) -> Option<NodeId> {
        let parsed = Selector::parse(selector);
        let mut cur = Some(node);
        while let Some(id) = cur {
            if self.matches_selector(id, &parsed) {
                return Some(id);
            }
            cur = self.node(id).parent;
        }
        None
    }

    fn has_descendant(&self, node: NodeId, selector: &str) -> bool {
        let parsed = Selector::parse(selector);
        let mut stack: Vec<NodeId> = self.node(node).children.clone();
        while let Some(id) = stack.pop() {
            if self.arena[id.0].removed {
                continue;
            }
            if self.matches_selector(id, &parsed) {
                return true;
            }
            stack.extend(self.arena[id.0].children.iter().copied());
        }
        false
    }

    fn rendered_height(&self, node: NodeId) -> u32 {
        if self.detached(node) {
            0
        } else {
            self.node(node).height
        }
    }

    fn insert(&mut self, point: InsertionPoint, element: ElementSpec) -> NodeId {
        let id = NodeId(self.arena.len());
        let mut attrs = BTreeMap::new();
        if let Some(title) = element.title {
            attrs.insert("title".to_string(), title);
        }
        self.arena.push(Node {
            tag: element.tag,
            classes: element.classes,
            attrs,
            text: element.text,
            height: 1,
            parent: None,
            children: Vec::new(),
            removed: false,
        });
        if let Some(icon) = element.icon {
            let svg = NodeId(self.arena.len());
            self.arena.push(Node {
                tag: "svg".into(),
                classes: vec!["octicon".into(), icon],
                attrs: BTreeMap::new(),
                text: String::new(),
                height: 1,
                parent: Some(id),
                children: Vec::new(),
                removed: false,
            });
            self.arena[id.0].children.push(svg);
        }
        match point.placement {
            Placement::Before | Placement::After => {
                let parent = self.node(point.node).parent.unwrap_or(Self::BODY);
                let siblings = &mut self.arena[parent.0].children;
                let at = siblings
                    .iter()
                    .position(|c| *c == point.node)
                    .map(|i| match point.placement {
                        Placement::Before => i,
                        _ => i + 1,
                    })
                    .unwrap_or(siblings.len());
                siblings.insert(at, id);
                self.arena[id.0].parent = Some(parent);
            }
            Placement::Prepend => {
                self.arena[point.node.0].children.insert(0, id);
                self.arena[id.0].parent = Some(point.node);
            }
            Placement::Append => {
                self.arena[point.node.0].children.push(id);
                self.arena[id.0].parent = Some(point.node);
            }
        }
        id
    }

    fn append_body(&mut self, element: ElementSpec) -> NodeId {
        self.insert(
            InsertionPoint {
                node: Self::BODY,
                placement: Placement::Append,
            },
            element,
        )
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        let classes = &mut self.arena[node.0].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn remove(&mut self, node: NodeId) {
        if let Some(parent) = self.arena[node.0].parent {
            self.arena[parent.0].children.retain(|c| *c != node);
        }
        self.arena[node.0].removed = true;
    }

    fn remove_all(&mut self, class: &str) {
        let doomed: Vec<NodeId> = self
            .live_ids()
            .filter(|id| self.node(*id).classes.iter().any(|c| c == class))
            .collect();
        for id in doomed {
            self.remove(id);
        }
    }

    fn is_attached(&self, node: NodeId) -> bool {
        !self.detached(node)
    }
}

#[derive(Clone, Debug)]
enum AttrOp {
    Exists,
    Equals(String),
    Contains(String),
}

#[derive(Clone, Debug)]
struct AttrSelector {
    name: String,
    op: AttrOp,
}

#[derive(Clone, Debug, Default)]
struct SimpleSelector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrSelector>,
}

#[derive(Clone, Debug)]
struct Selector {
    alternatives: Vec<Vec<SimpleSelector>>,
}

impl Selector {
    fn parse(input: &str) -> Self {
        let alternatives = input
            .split(',')
            .map(|alt| {
                alt.split_whitespace()
                    .map(parse_simple)
                    .collect::<Vec<_>>()
            })
            .filter(|chain| !chain.is_empty())
            .collect();
        Self { alternatives }
    }
}

fn parse_simple(input: &str) -> SimpleSelector {
    let mut sel = SimpleSelector::default();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;

    let word = |chars: &[char], start: usize| -> (String, usize) {
        let mut end = start;
        while end < chars.len() && !matches!(chars[end], '.' | '#' | '[') {
            end += 1;
        }
        (chars[start..end].iter().collect(), end)
    };

    if i < chars.len() && !matches!(chars[i], '.' | '#' | '[') {
        let (tag, next) = word(&chars, i);
        sel.tag = Some(tag);
        i = next;
    }
    while i < chars.len() {
        match chars[i] {
            '.' => {
                let (class, next) = word(&chars, i + 1);
                sel.classes.push(class);
                i = next;
            }
            '#' => {
                let (id, next) = word(&chars, i + 1);
                sel.id = Some(id);
                i = next;
            }
            '[' => {
                let close = chars[i..]
                    .iter()
                    .position(|c| *c == ']')
                    .map(|p| i + p)
                    .unwrap_or(chars.len());
                let body: String = chars[i + 1..close].iter().collect();
                sel.attrs.push(parse_attr(&body));
                i = close + 1;
            }
            _ => i += 1,
        }
    }
    sel
}

fn parse_attr(body: &str) -> AttrSelector {
    let unquote = |value: &str| value.trim_matches(|c| c == '"' || c == '\'').to_string();
    if let Some((name, value)) = body.split_once("*=") {
        AttrSelector {
            name: name.trim().to_string(),
            op: AttrOp::Contains(unquote(value.trim())),
        }
    } else if let Some((name, value)) = body.split_once('=') {
        AttrSelector {
            name: name.trim().to_string(),
            op: AttrOp::Equals(unquote(value.trim())),
        }
    } else {
        AttrSelector {
            name: body.trim().to_string(),
            op: AttrOp::Exists,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_by_class_tag_and_attribute() {
        let mut dom = MemoryDom::new();
        let header = dom.append(MemoryDom::BODY, el("div").class("Box-header"));
        let row = dom.append(header, el("div").class("d-flex").class("gap-2"));
        let btn = dom.append(row, el("button").attr("data-hotkey", "r"));

        assert_eq!(dom.query(".Box-header"), Some(header));
        assert_eq!(dom.query(".Box-header .d-flex.gap-2"), Some(row));
        assert_eq!(dom.query(".Box-header button[data-hotkey]"), Some(btn));
        assert_eq!(dom.query("[data-testid=\"raw-button\"]"), None);
    }

    #[test]
    fn comma_alternatives_and_closest() {
        let mut dom = MemoryDom::new();
        let group = dom.append(MemoryDom::BODY, el("div").class("BtnGroup"));
        let btn = dom.append(group, el("button").text("Raw"));

        assert_eq!(dom.closest(btn, ".d-flex, .BtnGroup"), Some(group));
        assert_eq!(dom.closest(btn, ".missing"), None);
    }

    #[test]
    fn contains_attribute_operator() {
        let mut dom = MemoryDom::new();
        let view = dom.append(MemoryDom::BODY, el("div").class("react-code-view-header"));
        let row = dom.append(view, el("div").class("d-flex").class("gap-2"));

        assert_eq!(dom.query("[class*=\"react-code-view\"] .d-flex.gap-2"), Some(row));
    }

    #[test]
    fn removal_detaches_subtrees() {
        let mut dom = MemoryDom::new();
        let note = dom.append(MemoryDom::BODY, el("div").class("note"));
        let child = dom.append(note, el("span").text("hi"));

        dom.remove_all("note");
        assert_eq!(dom.query(".note"), None);
        assert_eq!(dom.rendered_height(child), 0);
        assert_eq!(dom.count_class("note"), 0);
    }

    #[test]
    fn hidden_markup_reports_zero_height() {
        let mut dom = MemoryDom::new();
        let hidden = dom.append(MemoryDom::BODY, el("div").hidden());
        let shown = dom.append(MemoryDom::BODY, el("div"));
        assert!(!dom.is_visible(hidden));
        assert!(dom.is_visible(shown));
    }
}
