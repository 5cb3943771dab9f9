use std::cell::RefCell;
use std::collections::HashMap;

use drift_core::{ElementId, PointerButton, PointerEvent, PointerEventKind, Rect, Vec2};
use smallvec::SmallVec;

use crate::interact::{
    DeltaRect, DragMoveEvent, Edges, InteractError, InteractHandlers, InteractOptions, Interactor,
    ResizeMoveEvent,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractConfig {
    /// Distance in px from an edge, inside the element, that grabs the edge
    /// for resizing instead of dragging.
    pub edge_margin: f32,
}

impl Default for InteractConfig {
    fn default() -> Self {
        Self { edge_margin: 8.0 }
    }
}

struct Target {
    id: ElementId,
    options: InteractOptions,
    handlers: InteractHandlers,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum GestureKind {
    Drag,
    Resize(Edges),
}

#[derive(Clone, Copy, Debug)]
struct Gesture {
    target: ElementId,
    kind: GestureKind,
    last: Vec2,
    rect: Rect,
    aspect: Option<f32>,
}

enum Emit {
    Drag(DragMoveEvent),
    Resize(ResizeMoveEvent),
}

/// Turns raw pointer events into drag and resize steps for attached
/// elements.
///
/// The host reports each element's on-screen bounds with `set_bounds` after
/// layout; the interactor keeps them current while a gesture moves the
/// element. Later attachments are hit-tested first.
pub struct PointerInteractor {
    config: InteractConfig,
    targets: RefCell<SmallVec<[Target; 4]>>,
    bounds: RefCell<HashMap<ElementId, Rect>>,
    gesture: RefCell<Option<Gesture>>,
}

impl PointerInteractor {
    pub fn new() -> Self {
        Self::with_config(InteractConfig::default())
    }

    pub fn with_config(config: InteractConfig) -> Self {
        Self {
            config,
            targets: RefCell::new(SmallVec::new()),
            bounds: RefCell::new(HashMap::new()),
            gesture: RefCell::new(None),
        }
    }

    pub fn set_bounds(&self, target: ElementId, rect: Rect) {
        self.bounds.borrow_mut().insert(target, rect);
    }

    pub fn bounds(&self, target: ElementId) -> Option<Rect> {
        self.bounds.borrow().get(&target).copied()
    }

    pub fn is_active(&self) -> bool {
        self.gesture.borrow().is_some()
    }

    fn edges_at(&self, rect: Rect, p: Vec2) -> Edges {
        let m = self.config.edge_margin;
        let mut edges = Edges::empty();
        if p.x - rect.x <= m {
            edges |= Edges::LEFT;
        } else if rect.right() - p.x <= m {
            edges |= Edges::RIGHT;
        }
        if p.y - rect.y <= m {
            edges |= Edges::TOP;
        } else if rect.bottom() - p.y <= m {
            edges |= Edges::BOTTOM;
        }
        edges
    }

    fn begin(&self, p: Vec2) -> bool {
        let targets = self.targets.borrow();
        let bounds = self.bounds.borrow();
        let hit = targets.iter().rev().find_map(|t| {
            let rect = *bounds.get(&t.id)?;
            rect.contains(p).then_some((t, rect))
        });
        let Some((target, rect)) = hit else {
            return false;
        };

        let (kind, aspect) = match target.options.resize {
            Some(resize) => {
                let edges = self.edges_at(rect, p) & resize.edges;
                let aspect = (resize.preserve_aspect_ratio && rect.h != 0.0)
                    .then_some(rect.w / rect.h);
                if edges.is_empty() {
                    (None, None)
                } else {
                    (Some(GestureKind::Resize(edges)), aspect)
                }
            }
            None => (None, None),
        };
        let kind = match kind {
            Some(k) => k,
            None if target.options.drag.is_some() => GestureKind::Drag,
            None => return false,
        };

        log::debug!("pointer: {kind:?} started on {:?}", target.id);
        *self.gesture.borrow_mut() = Some(Gesture {
            target: target.id,
            kind,
            last: p,
            rect,
            aspect,
        });
        true
    }

    fn step(&self, p: Vec2) -> Option<(ElementId, Emit)> {
        let mut slot = self.gesture.borrow_mut();
        let g = slot.as_mut()?;
        let d = p - g.last;
        g.last = p;

        let old = g.rect;
        let emit = match g.kind {
            GestureKind::Drag => {
                g.rect = old.translate(d);
                Emit::Drag(DragMoveEvent { dx: d.x, dy: d.y })
            }
            GestureKind::Resize(edges) => {
                g.rect = resized(old, edges, d, g.aspect);
                Emit::Resize(ResizeMoveEvent {
                    rect: g.rect,
                    delta_rect: DeltaRect::between(old, g.rect),
                    edges,
                })
            }
        };
        self.bounds.borrow_mut().insert(g.target, g.rect);
        Some((g.target, emit))
    }

    /// Feeds one pointer event. Returns `true` when it was consumed by a
    /// gesture on an attached element.
    pub fn handle_pointer(&self, event: &PointerEvent) -> bool {
        match event.event {
            PointerEventKind::Down(PointerButton::Primary) => self.begin(event.position),
            PointerEventKind::Move => {
                let Some((target, emit)) = self.step(event.position) else {
                    return false;
                };
                // Handlers run with no borrows held; they may re-enter.
                let handlers = self
                    .targets
                    .borrow()
                    .iter()
                    .find(|t| t.id == target)
                    .map(|t| t.handlers.clone());
                if let Some(h) = handlers {
                    match emit {
                        Emit::Drag(e) => (h.on_move)(&e),
                        Emit::Resize(e) => (h.on_resize)(&e),
                    }
                }
                true
            }
            PointerEventKind::Up(PointerButton::Primary) | PointerEventKind::Cancel => {
                let ended = self.gesture.borrow_mut().take();
                if let Some(g) = &ended {
                    log::debug!("pointer: {:?} ended on {:?}", g.kind, g.target);
                }
                ended.is_some()
            }
            _ => false,
        }
    }
}

impl Default for PointerInteractor {
    fn default() -> Self {
        Self::new()
    }
}

fn resized(old: Rect, edges: Edges, d: Vec2, aspect: Option<f32>) -> Rect {
    let mut r = old;
    if edges.contains(Edges::LEFT) {
        r.x += d.x;
        r.w -= d.x;
    } else if edges.contains(Edges::RIGHT) {
        r.w += d.x;
    }
    if edges.contains(Edges::TOP) {
        r.y += d.y;
        r.h -= d.y;
    } else if edges.contains(Edges::BOTTOM) {
        r.h += d.y;
    }
    // An edge dragged past its opposite edge stops there at zero size.
    if r.w < 0.0 {
        if edges.contains(Edges::LEFT) {
            r.x = old.right();
        }
        r.w = 0.0;
    }
    if r.h < 0.0 {
        if edges.contains(Edges::TOP) {
            r.y = old.bottom();
        }
        r.h = 0.0;
    }

    if let Some(ratio) = aspect {
        if edges.intersects(Edges::HORIZONTAL) {
            r.h = r.w / ratio;
            if edges.contains(Edges::TOP) {
                r.y = old.bottom() - r.h;
            }
        } else {
            r.w = r.h * ratio;
            if edges.contains(Edges::LEFT) {
                r.x = old.right() - r.w;
            }
        }
    }
    r
}

impl Interactor for PointerInteractor {
    fn attach(
        &self,
        target: ElementId,
        options: &InteractOptions,
        handlers: InteractHandlers,
    ) -> Result<(), InteractError> {
        let mut targets = self.targets.borrow_mut();
        if targets.iter().any(|t| t.id == target) {
            return Err(InteractError::AlreadyAttached(target));
        }
        if options.drag.is_some_and(|d| d.inertia) || options.resize.is_some_and(|r| r.inertia) {
            log::debug!("pointer: inertia is not supported, ignoring for {target:?}");
        }
        targets.push(Target {
            id: target,
            options: *options,
            handlers,
        });
        Ok(())
    }

    fn detach(&self, target: ElementId) {
        self.targets.borrow_mut().retain(|t| t.id != target);
        let mut gesture = self.gesture.borrow_mut();
        if gesture.is_some_and(|g| g.target == target) {
            *gesture = None;
        }
    }

    fn is_attached(&self, target: ElementId) -> bool {
        self.targets.borrow().iter().any(|t| t.id == target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interact::{DragOptions, ResizeOptions};
    use std::rc::Rc;

    #[derive(Debug, PartialEq)]
    enum Seen {
        Drag(f32, f32),
        Resize(Rect, f32, f32),
    }

    fn attach(
        pi: &PointerInteractor,
        id: ElementId,
        options: InteractOptions,
    ) -> Rc<RefCell<Vec<Seen>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (seen.clone(), seen.clone());
        pi.attach(
            id,
            &options,
            InteractHandlers {
                on_move: Rc::new(move |e| a.borrow_mut().push(Seen::Drag(e.dx, e.dy))),
                on_resize: Rc::new(move |e| {
                    b.borrow_mut()
                        .push(Seen::Resize(e.rect, e.delta_rect.left, e.delta_rect.top))
                }),
            },
        )
        .unwrap();
        seen
    }

    fn full() -> InteractOptions {
        InteractOptions::new()
            .draggable(DragOptions::default())
            .resizable(ResizeOptions::default())
    }

    #[test]
    fn drag_from_interior() {
        let pi = PointerInteractor::new();
        let id = ElementId(1);
        pi.set_bounds(id, Rect::new(0.0, 0.0, 100.0, 100.0));
        let seen = attach(&pi, id, full());

        assert!(pi.handle_pointer(&PointerEvent::down(50.0, 50.0)));
        pi.handle_pointer(&PointerEvent::moved(55.0, 47.0));
        pi.handle_pointer(&PointerEvent::moved(57.0, 49.0));
        assert!(pi.handle_pointer(&PointerEvent::up(57.0, 49.0)));
        assert!(!pi.handle_pointer(&PointerEvent::moved(90.0, 90.0)));

        assert_eq!(*seen.borrow(), vec![Seen::Drag(5.0, -3.0), Seen::Drag(2.0, 2.0)]);
        assert_eq!(pi.bounds(id), Some(Rect::new(7.0, -1.0, 100.0, 100.0)));
    }

    #[test]
    fn resize_from_top_left_corner() {
        let pi = PointerInteractor::new();
        let id = ElementId(2);
        pi.set_bounds(id, Rect::new(10.0, 10.0, 100.0, 100.0));
        let seen = attach(&pi, id, full());

        pi.handle_pointer(&PointerEvent::down(12.0, 12.0));
        pi.handle_pointer(&PointerEvent::moved(2.0, 22.0));

        assert_eq!(
            *seen.borrow(),
            vec![Seen::Resize(Rect::new(0.0, 20.0, 110.0, 90.0), -10.0, 10.0)]
        );
    }

    #[test]
    fn resize_from_right_edge_keeps_origin() {
        let pi = PointerInteractor::new();
        let id = ElementId(3);
        pi.set_bounds(id, Rect::new(0.0, 0.0, 100.0, 100.0));
        let seen = attach(&pi, id, full());

        pi.handle_pointer(&PointerEvent::down(98.0, 50.0));
        pi.handle_pointer(&PointerEvent::moved(118.0, 60.0));

        assert_eq!(
            *seen.borrow(),
            vec![Seen::Resize(Rect::new(0.0, 0.0, 120.0, 100.0), 0.0, 0.0)]
        );
    }

    #[test]
    fn disallowed_edge_falls_back_to_drag() {
        let pi = PointerInteractor::new();
        let id = ElementId(4);
        pi.set_bounds(id, Rect::new(0.0, 0.0, 100.0, 100.0));
        let options = InteractOptions::new()
            .draggable(DragOptions::default())
            .resizable(ResizeOptions {
                edges: Edges::RIGHT | Edges::BOTTOM,
                ..ResizeOptions::default()
            });
        let seen = attach(&pi, id, options);

        pi.handle_pointer(&PointerEvent::down(2.0, 50.0));
        pi.handle_pointer(&PointerEvent::moved(4.0, 50.0));
        assert_eq!(*seen.borrow(), vec![Seen::Drag(2.0, 0.0)]);
    }

    #[test]
    fn preserve_aspect_ratio_follows_width() {
        let pi = PointerInteractor::new();
        let id = ElementId(5);
        pi.set_bounds(id, Rect::new(0.0, 0.0, 200.0, 100.0));
        let options = InteractOptions::new().resizable(ResizeOptions {
            preserve_aspect_ratio: true,
            ..ResizeOptions::default()
        });
        let seen = attach(&pi, id, options);

        pi.handle_pointer(&PointerEvent::down(198.0, 50.0));
        pi.handle_pointer(&PointerEvent::moved(218.0, 80.0));
        assert_eq!(
            *seen.borrow(),
            vec![Seen::Resize(Rect::new(0.0, 0.0, 220.0, 110.0), 0.0, 0.0)]
        );
    }

    #[test]
    fn misses_and_detached_targets_are_ignored() {
        let pi = PointerInteractor::new();
        let id = ElementId(6);
        pi.set_bounds(id, Rect::new(0.0, 0.0, 50.0, 50.0));
        let seen = attach(&pi, id, full());

        assert!(!pi.handle_pointer(&PointerEvent::down(80.0, 80.0)));
        assert!(pi.handle_pointer(&PointerEvent::down(25.0, 25.0)));
        pi.detach(id);
        assert!(!pi.is_active());
        assert!(!pi.handle_pointer(&PointerEvent::moved(30.0, 30.0)));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn double_attach_is_rejected() {
        let pi = PointerInteractor::new();
        let id = ElementId(7);
        attach(&pi, id, full());
        let err = pi
            .attach(
                id,
                &full(),
                InteractHandlers {
                    on_move: Rc::new(|_| {}),
                    on_resize: Rc::new(|_| {}),
                },
            )
            .unwrap_err();
        assert_eq!(err, InteractError::AlreadyAttached(id));
    }

    #[test]
    fn resize_past_opposite_edge_stops_at_zero() {
        let pi = PointerInteractor::new();
        let id = ElementId(8);
        pi.set_bounds(id, Rect::new(0.0, 0.0, 100.0, 100.0));
        let seen = attach(&pi, id, full());

        pi.handle_pointer(&PointerEvent::down(2.0, 50.0));
        pi.handle_pointer(&PointerEvent::moved(152.0, 50.0));

        assert_eq!(
            *seen.borrow(),
            vec![Seen::Resize(Rect::new(100.0, 0.0, 0.0, 100.0), 100.0, 0.0)]
        );
        assert_eq!(pi.bounds(id), Some(Rect::new(100.0, 0.0, 0.0, 100.0)));
    }
}
