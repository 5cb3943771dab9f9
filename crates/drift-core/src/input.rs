use crate::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,   // Left mouse, touch
    Secondary, // Right mouse
    Tertiary,  // Middle mouse
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down(PointerButton),
    Up(PointerButton),
    Move,
    Cancel,
}

#[derive(Clone, Debug)]
pub struct PointerEvent {
    pub id: PointerId,
    pub kind: PointerKind,
    pub event: PointerEventKind,
    pub position: Vec2,
}

impl PointerEvent {
    pub fn mouse(event: PointerEventKind, position: Vec2) -> Self {
        Self {
            id: PointerId(0),
            kind: PointerKind::Mouse,
            event,
            position,
        }
    }

    pub fn down(x: f32, y: f32) -> Self {
        Self::mouse(PointerEventKind::Down(PointerButton::Primary), Vec2 { x, y })
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::mouse(PointerEventKind::Move, Vec2 { x, y })
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self::mouse(PointerEventKind::Up(PointerButton::Primary), Vec2 { x, y })
    }
}
