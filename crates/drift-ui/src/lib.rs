#![allow(non_snake_case)]
//! Widgets and reusable hooks.
//!
//! - [`previous::use_previous`]: the value a call site saw last frame.
//! - [`watch::use_watch`]: an effect that skips the mounting commit.
//! - [`interact::use_interact`]: drag/resize positioning for one view,
//!   driven by an [`interact::Interactor`] such as [`pointer::PointerInteractor`].

pub mod interact;
pub mod pointer;
pub mod previous;
pub mod watch;

use std::fmt::Write as _;
use std::rc::Rc;

use drift_core::*;

pub use interact::{
    ElementStyle, Interactable, Interactor, Position, PositionOverride, use_interact,
    with_interactor,
};
pub use pointer::{InteractConfig, PointerInteractor};
pub use previous::{DeepCopy, PreviousOptions, use_previous, use_previous_with};
pub use watch::{use_watch, use_watch_with_destroy};

pub fn Surface(modifier: Modifier, child: View) -> View {
    let mut v = View::new(0, ViewKind::Surface).modifier(modifier);
    v.children = vec![child];
    v
}

pub fn Box(modifier: Modifier) -> View {
    View::new(0, ViewKind::Box).modifier(modifier)
}

pub fn Row(modifier: Modifier) -> View {
    View::new(0, ViewKind::Row).modifier(modifier)
}

pub fn Column(modifier: Modifier) -> View {
    View::new(0, ViewKind::Column).modifier(modifier)
}

pub fn Text(text: impl Into<String>) -> View {
    View::new(
        0,
        ViewKind::Text {
            text: text.into(),
            color: Color::WHITE,
            font_size: 16.0,
        },
    )
    .semantics(Semantics::new(Role::Text))
}

pub fn Button(text: impl Into<String>, on_click: impl Fn() + 'static) -> View {
    View::new(
        0,
        ViewKind::Button {
            text: text.into(),
            on_click: Some(Rc::new(on_click)),
        },
    )
    .semantics(Semantics::new(Role::Button))
}

pub fn Image(source: impl Into<String>, alt: impl Into<String>) -> View {
    let alt = alt.into();
    View::new(
        0,
        ViewKind::Image {
            source: source.into(),
            alt: alt.clone(),
        },
    )
    .semantics(Semantics::new(Role::Image).label(alt))
}

/// Hyperlink. Opens in a new tab/window by default.
pub fn Link(text: impl Into<String>, href: impl Into<String>) -> View {
    View::new(
        0,
        ViewKind::Link {
            text: text.into(),
            href: href.into(),
            new_tab: true,
        },
    )
    .semantics(Semantics::new(Role::Link))
}

/// Indented, one-line-per-view description of a tree.
///
/// Handy for logging and snapshot tests; callbacks are omitted.
pub fn dump(view: &View) -> String {
    let mut out = String::new();
    dump_into(view, 0, &mut out);
    out
}

fn dump_into(view: &View, depth: usize, out: &mut String) {
    let _ = write!(out, "{:indent$}", "", indent = depth * 2);
    let _ = match &view.kind {
        ViewKind::Surface => write!(out, "Surface"),
        ViewKind::Box => write!(out, "Box"),
        ViewKind::Row => write!(out, "Row"),
        ViewKind::Column => write!(out, "Column"),
        ViewKind::Text { text, .. } => write!(out, "Text {text:?}"),
        ViewKind::Button { text, .. } => write!(out, "Button {text:?}"),
        ViewKind::Image { source, alt } => write!(out, "Image src={source:?} alt={alt:?}"),
        ViewKind::Link { text, href, .. } => write!(out, "Link {text:?} -> {href}"),
    };
    if let Some(class) = &view.modifier.class {
        let _ = write!(out, " .{class}");
    }
    let css = view.modifier.to_css();
    if !css.is_empty() {
        let _ = write!(out, " [{css}]");
    }
    out.push('\n');
    for child in &view.children {
        dump_into(child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_describes_nested_views() {
        let tree = Column(Modifier::new().class("card").padding(4.0)).with_children(vec![
            Text("Hello"),
            Row(Modifier::new()).with_children(vec![
                Button("Go", || {}),
                Link("Docs", "https://docs.rs"),
            ]),
        ]);

        insta::assert_snapshot!(dump(&tree).trim_end(), @r#"
        Column .card [padding: 4px]
          Text "Hello"
          Row
            Button "Go"
            Link "Docs" -> https://docs.rs
        "#);
    }

    #[test]
    fn button_click_invokes_handler() {
        let hits = Rc::new(std::cell::Cell::new(0));
        let h = hits.clone();
        let tree = Column(Modifier::new()).with_children(vec![Button("+1", move || {
            h.set(h.get() + 1)
        })]);

        assert!(tree.click("+1"));
        assert!(tree.click("+1"));
        assert!(!tree.click("missing"));
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn image_alt_becomes_semantic_label() {
        let img = Image("logo.svg", "logo");
        assert_eq!(
            img.semantics,
            Some(Semantics::new(Role::Image).label("logo"))
        );
    }

    #[test]
    fn interactive_box_dumps_its_style() {
        let style = ElementStyle::from_position(&PositionOverride::new().x(12.0).resolve());
        let tree = Box(style.modifier());
        insta::assert_snapshot!(
            dump(&tree).trim_end(),
            @"Box [position: absolute; transform: translate3D(12px, 0px, 0); width: 100px; height: 100px]"
        );
    }
}
