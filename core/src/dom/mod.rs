// core/src/dom/mod.rs
//! The DOM seam.
//!
//! The anchor resolver and trigger controller never touch a browser API
//! directly; they operate on this trait so the heuristics stay testable
//! outside a page context. [`memory::MemoryDom`] is the in-process
//! implementation used by tests and embeddable hosts.

pub mod memory;

/// Handle to a node inside a [`Dom`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// Where to place an inserted element relative to its reference node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Before,
    After,
    Prepend,
    Append,
}

/// A resolved anchor: reference node plus relative placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InsertionPoint {
    pub node: NodeId,
    pub placement: Placement,
}

/// Blueprint for an element the trigger controller inserts.
#[derive(Clone, Debug, Default)]
pub struct ElementSpec {
    pub tag: String,
    pub classes: Vec<String>,
    pub text: String,
    pub title: Option<String>,
    /// Octicon class for a leading icon child, e.g. `octicon-code`.
    pub icon: Option<String>,
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Read/write access to the host page.
///
/// Selector strings use the small subset the anchor strategies need: tags,
/// `#id`, `.class`, `[attr]`, `[attr="v"]`, `[attr*="v"]`, compounds,
/// descendant chains, and comma-separated alternatives.
pub trait Dom {
    /// First node matching `selector`, in document order.
    fn query(&self, selector: &str) -> Option<NodeId>;

    /// All nodes matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<NodeId>;

    /// Trimmed text content of the subtree under `node`.
    fn text(&self, node: NodeId) -> String;

    fn attr(&self, node: NodeId, name: &str) -> Option<String>;

    fn has_class(&self, node: NodeId, class: &str) -> bool;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Nearest ancestor (including `node` itself) matching `selector`.
    fn closest(&self, node: NodeId, selector: &str) -> Option<NodeId>;

    /// Whether any descendant of `node` matches `selector`.
    fn has_descendant(&self, node: NodeId, selector: &str) -> bool;

    /// Rendered height; zero for hidden or detached markup.
    fn rendered_height(&self, node: NodeId) -> u32;

    /// Insert a new element at the given point, returning its id.
    fn insert(&mut self, point: InsertionPoint, element: ElementSpec) -> NodeId;

    /// Append a new element to the document body.
    fn append_body(&mut self, element: ElementSpec) -> NodeId;

    /// Add `class` to an existing element.
    fn add_class(&mut self, node: NodeId, class: &str);

    /// Detach `node` and its subtree.
    fn remove(&mut self, node: NodeId);

    /// Remove every element carrying `class`.
    fn remove_all(&mut self, class: &str);

    /// Whether `node` is still part of the document.
    fn is_attached(&self, node: NodeId) -> bool;

    /// Whether any element carrying `class` exists.
    fn contains_class(&self, class: &str) -> bool {
        self.query(&format!(".{class}")).is_some()
    }

    /// Visibility predicate used by anchor strategies.
    fn is_visible(&self, node: NodeId) -> bool {
        self.rendered_height(node) > 0
    }
}
