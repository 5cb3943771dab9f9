use std::cell::Cell;
use std::rc::Rc;

use crate::{Color, Modifier};

pub type ViewId = u64;

pub type Callback = Rc<dyn Fn()>;

/// Identity of a committed element, shared between a `NodeRef` and the view
/// it is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

thread_local! {
    static NEXT_ELEMENT: Cell<u64> = const { Cell::new(1) };
}

impl ElementId {
    pub fn next() -> Self {
        NEXT_ELEMENT.with(|n| {
            let id = n.get();
            n.set(id + 1);
            ElementId(id)
        })
    }
}

/// Handle to a single view in the committed tree.
///
/// Create it with `remember(NodeRef::new)` and attach it with
/// `Modifier::node_ref`. It reports `is_bound()` only after a commit that
/// contained the attached view, and is unbound again once a commit no
/// longer does (or the composition is disposed).
#[derive(Clone, Debug)]
pub struct NodeRef {
    id: ElementId,
    bound: Rc<Cell<bool>>,
}

impl NodeRef {
    pub fn new() -> Self {
        Self {
            id: ElementId::next(),
            bound: Rc::new(Cell::new(false)),
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// The element id, if the referenced view is currently committed.
    pub fn get(&self) -> Option<ElementId> {
        self.bound.get().then_some(self.id)
    }

    pub fn is_bound(&self) -> bool {
        self.bound.get()
    }

    pub(crate) fn set_bound(&self, bound: bool) {
        self.bound.set(bound);
    }
}

impl Default for NodeRef {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

#[derive(Clone)]
pub enum ViewKind {
    Surface,
    Box,
    Row,
    Column,
    Text {
        text: String,
        color: Color,
        font_size: f32,
    },
    Button {
        text: String,
        on_click: Option<Callback>,
    },
    Image {
        source: String,
        alt: String,
    },
    Link {
        text: String,
        href: String,
        new_tab: bool,
    },
}

impl std::fmt::Debug for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewKind::Surface => write!(f, "Surface"),
            ViewKind::Box => write!(f, "Box"),
            ViewKind::Row => write!(f, "Row"),
            ViewKind::Column => write!(f, "Column"),
            ViewKind::Text {
                text,
                color,
                font_size,
            } => f
                .debug_struct("Text")
                .field("text", text)
                .field("color", color)
                .field("font_size", font_size)
                .finish(),
            ViewKind::Button { text, .. } => f
                .debug_struct("Button")
                .field("text", text)
                .field("on_click", &"<callback>")
                .finish(),
            ViewKind::Image { source, alt } => f
                .debug_struct("Image")
                .field("source", source)
                .field("alt", alt)
                .finish(),
            ViewKind::Link {
                text,
                href,
                new_tab,
            } => f
                .debug_struct("Link")
                .field("text", text)
                .field("href", href)
                .field("new_tab", new_tab)
                .finish(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct View {
    pub id: ViewId,
    pub kind: ViewKind,
    pub modifier: Modifier,
    pub children: Vec<View>,
    pub semantics: Option<crate::semantics::Semantics>,
}

impl View {
    pub fn new(id: ViewId, kind: ViewKind) -> Self {
        View {
            id,
            kind,
            modifier: Modifier::default(),
            children: vec![],
            semantics: None,
        }
    }
    pub fn modifier(mut self, m: Modifier) -> Self {
        self.modifier = m;
        self
    }
    pub fn with_children(mut self, kids: Vec<View>) -> Self {
        self.children = kids;
        self
    }
    pub fn semantics(mut self, s: crate::semantics::Semantics) -> Self {
        self.semantics = Some(s);
        self
    }

    /// Depth-first walk over this view and all descendants.
    pub fn visit(&self, f: &mut impl FnMut(&View)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    /// First view (depth-first) matching `pred`.
    pub fn find(&self, pred: &impl Fn(&View) -> bool) -> Option<&View> {
        if pred(self) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(pred))
    }

    /// Invokes the click handler of the first button labelled `label`.
    /// Returns `false` if no such button exists.
    pub fn click(&self, label: &str) -> bool {
        let target = self.find(&|v| matches!(&v.kind, ViewKind::Button { text, .. } if text == label));
        match target.map(|v| &v.kind) {
            Some(ViewKind::Button {
                on_click: Some(cb), ..
            }) => {
                cb();
                true
            }
            _ => false,
        }
    }
}
