//! # Draggable and resizable elements
//!
//! `use_interact` turns one view into a freely positioned box that follows
//! drag and resize gestures:
//!
//! ```rust,ignore
//! let card = use_interact(PositionOverride::new().width(240.0));
//! Box(card.modifier()).with_children(vec![Text("Drag me")])
//! ```
//!
//! The gestures themselves come from an [`Interactor`] provided for the
//! subtree with [`with_interactor`]. The hook only attaches handlers while
//! enabled and folds every event into a single accumulator owned by the
//! call site, so each published [`Position`] is a full snapshot of one event.

use std::cell::RefCell;
use std::rc::Rc;

use bitflags::bitflags;
use drift_core::{
    Dispose, ElementId, Modifier, NodeRef, PositionType, Rect, Translate3d, local, on_unmount,
    remember, signal, use_effect, with_local,
};

/// Placement of an interactive element, in px.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
        }
    }
}

impl Position {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Fields to override on top of `Position::default()`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionOverride {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl PositionOverride {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn x(mut self, x: f32) -> Self {
        self.x = Some(x);
        self
    }
    pub fn y(mut self, y: f32) -> Self {
        self.y = Some(y);
        self
    }
    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }
    pub fn height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn apply(self, base: Position) -> Position {
        Position {
            x: self.x.unwrap_or(base.x),
            y: self.y.unwrap_or(base.y),
            width: self.width.unwrap_or(base.width),
            height: self.height.unwrap_or(base.height),
        }
    }

    pub fn resolve(self) -> Position {
        self.apply(Position::default())
    }
}

impl From<Position> for PositionOverride {
    fn from(p: Position) -> Self {
        Self {
            x: Some(p.x),
            y: Some(p.y),
            width: Some(p.width),
            height: Some(p.height),
        }
    }
}

/// Inline style for an interactive element: absolutely positioned and
/// moved with a translate so layout of siblings is unaffected.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementStyle {
    pub position: PositionType,
    pub transform: Translate3d,
    pub width: f32,
    pub height: f32,
}

impl ElementStyle {
    pub fn from_position(p: &Position) -> Self {
        Self {
            position: PositionType::Absolute,
            transform: Translate3d::xy(p.x, p.y),
            width: p.width,
            height: p.height,
        }
    }

    pub fn width_px(&self) -> String {
        format!("{}px", self.width)
    }

    pub fn height_px(&self) -> String {
        format!("{}px", self.height)
    }

    pub fn modifier(&self) -> Modifier {
        let mut m = Modifier::new()
            .translate(self.transform.x, self.transform.y)
            .size(self.width, self.height);
        m.position_type = Some(self.position);
        m
    }

    pub fn to_css(&self) -> String {
        self.modifier().to_css()
    }
}

bitflags! {
    /// Element edges a resize may grab.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Edges: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const TOP = 1 << 2;
        const BOTTOM = 1 << 3;
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
        const VERTICAL = Self::TOP.bits() | Self::BOTTOM.bits();
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragOptions {
    pub inertia: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeOptions {
    pub edges: Edges,
    pub preserve_aspect_ratio: bool,
    pub inertia: bool,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            edges: Edges::all(),
            preserve_aspect_ratio: false,
            inertia: false,
        }
    }
}

/// Which behaviors to attach. `None` leaves the behavior off.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InteractOptions {
    pub drag: Option<DragOptions>,
    pub resize: Option<ResizeOptions>,
}

impl InteractOptions {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn draggable(mut self, opts: DragOptions) -> Self {
        self.drag = Some(opts);
        self
    }
    pub fn resizable(mut self, opts: ResizeOptions) -> Self {
        self.resize = Some(opts);
        self
    }
}

/// Incremental pointer movement while dragging.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragMoveEvent {
    pub dx: f32,
    pub dy: f32,
}

/// Per-edge movement of a resize step. `left`/`top` are the offsets to add
/// to the element origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DeltaRect {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

impl DeltaRect {
    pub fn between(old: Rect, new: Rect) -> Self {
        Self {
            left: new.x - old.x,
            right: new.right() - old.right(),
            top: new.y - old.y,
            bottom: new.bottom() - old.bottom(),
            width: new.w - old.w,
            height: new.h - old.h,
        }
    }
}

/// A resize step: the new absolute rect plus how each edge moved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeMoveEvent {
    pub rect: Rect,
    pub delta_rect: DeltaRect,
    pub edges: Edges,
}

#[derive(Clone)]
pub struct InteractHandlers {
    pub on_move: Rc<dyn Fn(&DragMoveEvent)>,
    pub on_resize: Rc<dyn Fn(&ResizeMoveEvent)>,
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum InteractError {
    #[error("element {0:?} is not bound to a committed view")]
    Unbound(ElementId),
    #[error("no interactor was provided for this subtree")]
    NoInteractor,
    #[error("element {0:?} already has interaction handlers attached")]
    AlreadyAttached(ElementId),
}

/// Gesture source for interactive elements.
pub trait Interactor {
    fn attach(
        &self,
        target: ElementId,
        options: &InteractOptions,
        handlers: InteractHandlers,
    ) -> Result<(), InteractError>;

    /// Removes every handler from `target`. Unknown targets are ignored.
    fn detach(&self, target: ElementId);

    fn is_attached(&self, target: ElementId) -> bool;
}

/// Provides `interactor` to every `use_interact` composed inside `f`.
pub fn with_interactor<R>(interactor: Rc<dyn Interactor>, f: impl FnOnce() -> R) -> R {
    with_local(interactor, f)
}

pub fn interactor() -> Option<Rc<dyn Interactor>> {
    local::<Rc<dyn Interactor>>()
}

/// Result of [`use_interact`] for one frame.
#[derive(Clone)]
pub struct Interactable {
    /// Attach to exactly one view, e.g. through [`Interactable::modifier`].
    pub node: NodeRef,
    pub style: ElementStyle,
    pub position: Position,
    pub is_enabled: bool,
    enable: Rc<dyn Fn()>,
    disable: Rc<dyn Fn()>,
}

impl Interactable {
    pub fn enable(&self) {
        (self.enable)()
    }

    pub fn disable(&self) {
        (self.disable)()
    }

    /// The element style with the node ref attached.
    pub fn modifier(&self) -> Modifier {
        self.style.modifier().node_ref(&self.node)
    }
}

impl std::fmt::Debug for Interactable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interactable")
            .field("node", &self.node.id())
            .field("position", &self.position)
            .field("is_enabled", &self.is_enabled)
            .finish()
    }
}

fn controller_options() -> InteractOptions {
    InteractOptions::new()
        .draggable(DragOptions { inertia: false })
        .resizable(ResizeOptions {
            edges: Edges::all(),
            preserve_aspect_ratio: false,
            inertia: false,
        })
}

fn controller_handlers(
    accumulator: Rc<RefCell<Position>>,
    publish: Rc<dyn Fn(Position)>,
) -> InteractHandlers {
    let on_move = {
        let accumulator = accumulator.clone();
        let publish = publish.clone();
        move |e: &DragMoveEvent| {
            let snapshot = {
                let mut acc = accumulator.borrow_mut();
                acc.x += e.dx;
                acc.y += e.dy;
                *acc
            };
            publish(snapshot);
        }
    };
    let on_resize = move |e: &ResizeMoveEvent| {
        let snapshot = {
            let mut acc = accumulator.borrow_mut();
            acc.width = e.rect.w.max(0.0);
            acc.height = e.rect.h.max(0.0);
            acc.x += e.delta_rect.left;
            acc.y += e.delta_rect.top;
            *acc
        };
        publish(snapshot);
    };
    InteractHandlers {
        on_move: Rc::new(on_move),
        on_resize: Rc::new(on_resize),
    }
}

fn attach_controller(
    backend: Option<Rc<dyn Interactor>>,
    node: &NodeRef,
    handlers: InteractHandlers,
) -> Result<Dispose, InteractError> {
    let backend = backend.ok_or(InteractError::NoInteractor)?;
    let target = node.get().ok_or(InteractError::Unbound(node.id()))?;
    backend.attach(target, &controller_options(), handlers)?;
    log::debug!("interact: attached {target:?}");
    Ok(on_unmount(move || {
        backend.detach(target);
        log::debug!("interact: detached {target:?}");
    }))
}

/// Makes one view draggable and resizable.
///
/// Starts from `initial` merged over `Position::default()`, enabled. While
/// enabled, handlers are attached to the view carrying [`Interactable::node`]
/// after each commit that flips the flag; disabling or tearing down the
/// composition detaches them.
pub fn use_interact(initial: PositionOverride) -> Interactable {
    let position = remember(|| signal(initial.resolve()));
    let accumulator = remember(|| RefCell::new(position.get()));
    let enabled = remember(|| signal(true));
    let node = remember(NodeRef::new);

    let backend = interactor();
    let is_enabled = enabled.get();

    {
        let node = (*node).clone();
        let publish: Rc<dyn Fn(Position)> = {
            let position = position.clone();
            Rc::new(move |p| position.set(p))
        };
        let accumulator = accumulator.clone();
        use_effect(is_enabled, move || {
            if !is_enabled {
                if let Some(backend) = &backend {
                    backend.detach(node.id());
                }
                return Dispose::noop();
            }
            let handlers = controller_handlers(accumulator, publish);
            match attach_controller(backend, &node, handlers) {
                Ok(dispose) => dispose,
                Err(err) => {
                    log::warn!("use_interact: cannot enable: {err}");
                    Dispose::noop()
                }
            }
        });
    }

    let current = position.get();
    Interactable {
        node: (*node).clone(),
        style: ElementStyle::from_position(&current),
        position: current,
        is_enabled,
        enable: {
            let enabled = enabled.clone();
            Rc::new(move || enabled.set(true))
        },
        disable: Rc::new(move || enabled.set(false)),
    }
}

/// In-memory [`Interactor`] that lets callers emit gestures directly.
pub mod testing {
    use super::*;
    use std::collections::HashMap;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum FakeCall {
        Attach(ElementId),
        Detach(ElementId),
    }

    #[derive(Default)]
    pub struct FakeInteractor {
        attached: RefCell<HashMap<ElementId, (InteractOptions, InteractHandlers)>>,
        calls: RefCell<Vec<FakeCall>>,
    }

    impl FakeInteractor {
        pub fn new() -> Rc<Self> {
            Rc::new(Self::default())
        }

        pub fn calls(&self) -> Vec<FakeCall> {
            self.calls.borrow().clone()
        }

        pub fn options(&self, target: ElementId) -> Option<InteractOptions> {
            self.attached.borrow().get(&target).map(|(o, _)| *o)
        }

        fn handlers(&self, target: ElementId) -> Option<InteractHandlers> {
            self.attached.borrow().get(&target).map(|(_, h)| h.clone())
        }

        /// Delivers a drag step. Returns `false` if nothing is attached.
        pub fn emit_drag(&self, target: ElementId, dx: f32, dy: f32) -> bool {
            match self.handlers(target) {
                Some(h) => {
                    (h.on_move)(&DragMoveEvent { dx, dy });
                    true
                }
                None => false,
            }
        }

        /// Delivers a resize step. Returns `false` if nothing is attached.
        pub fn emit_resize(&self, target: ElementId, event: ResizeMoveEvent) -> bool {
            match self.handlers(target) {
                Some(h) => {
                    (h.on_resize)(&event);
                    true
                }
                None => false,
            }
        }
    }

    impl Interactor for FakeInteractor {
        fn attach(
            &self,
            target: ElementId,
            options: &InteractOptions,
            handlers: InteractHandlers,
        ) -> Result<(), InteractError> {
            let mut attached = self.attached.borrow_mut();
            if attached.contains_key(&target) {
                return Err(InteractError::AlreadyAttached(target));
            }
            attached.insert(target, (*options, handlers));
            self.calls.borrow_mut().push(FakeCall::Attach(target));
            Ok(())
        }

        fn detach(&self, target: ElementId) {
            if self.attached.borrow_mut().remove(&target).is_some() {
                self.calls.borrow_mut().push(FakeCall::Detach(target));
            }
        }

        fn is_attached(&self, target: ElementId) -> bool {
            self.attached.borrow().contains_key(&target)
        }
    }
}
