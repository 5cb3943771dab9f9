#![allow(non_snake_case)]
//! The counter page and a draggable card, composed headlessly.

use drift_core::*;
use drift_ui::*;

pub const INCREMENT_LABEL: &str = "Add to A";

/// Counter page: a button that bumps `a`, a watcher that logs every change
/// after mount, and the static branding header.
pub fn RootView() -> View {
    let a = remember(|| signal(0i32));
    let value = a.get();

    use_watch(value, move || log::info!("{value}"));

    Column(Modifier::new().class("App")).with_children(vec![
        Column(
            Modifier::new()
                .class("App-header")
                .background(Color::from_hex("#282c34")),
        )
        .with_children(vec![
            Image("logo.svg", "logo").modifier(Modifier::new().class("App-logo")),
            Button(INCREMENT_LABEL, {
                let a = a.clone();
                move || a.update(|v| *v += 1)
            }),
            Text("Edit src/lib.rs and save to reload."),
            Link("Learn Rust", "https://www.rust-lang.org")
                .modifier(Modifier::new().class("App-link")),
        ]),
    ])
}

/// A single card that can be dragged and resized, with a toggle.
pub fn CardView() -> View {
    let card = use_interact(PositionOverride::new().width(240.0).height(160.0));
    let label = if card.is_enabled { "Lock" } else { "Unlock" };

    Box(Modifier::new()).with_children(vec![
        Box(card.modifier().class("card")).with_children(vec![Text(format!(
            "{} x {} at ({}, {})",
            card.position.width, card.position.height, card.position.x, card.position.y
        ))]),
        Button(label, {
            let card = card.clone();
            move || {
                if card.is_enabled {
                    card.disable()
                } else {
                    card.enable()
                }
            }
        }),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_core::ViewKind;
    use drift_ui::interact::testing::FakeInteractor;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn counter_text(view: &View) -> Option<String> {
        view.find(&|v| matches!(v.kind, ViewKind::Text { .. }))
            .and_then(|v| match &v.kind {
                ViewKind::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
    }

    #[test]
    fn root_view_markup() {
        let composition = Composition::new();
        let view = composition.compose(RootView).unwrap();
        insta::assert_snapshot!(dump(&view).trim_end(), @r#"
        Column .App
          Column .App-header [background: #282c34]
            Image src="logo.svg" alt="logo" .App-logo
            Button "Add to A"
            Text "Edit src/lib.rs and save to reload."
            Link "Learn Rust" -> https://www.rust-lang.org .App-link
        "#);
    }

    #[test]
    fn clicking_requests_a_frame() {
        let composition = Composition::new();
        let view = composition.compose(RootView).unwrap();
        composition.take_frame_request();

        assert!(view.click(INCREMENT_LABEL));
        assert!(composition.take_frame_request());
        assert!(!composition.take_frame_request());
    }

    /// Counter values logged since the last call.
    fn logged_changes() -> Vec<String> {
        let out = RefCell::new(Vec::new());
        testing_logger::validate(|logs| {
            *out.borrow_mut() = logs
                .iter()
                .filter(|l| l.level == log::Level::Info && l.target == "counter")
                .map(|l| l.body.clone())
                .collect();
        });
        out.into_inner()
    }

    #[test]
    fn watcher_logs_each_change_after_mount() {
        testing_logger::setup();
        let composition = Composition::new();

        let first = composition.compose(RootView).unwrap();
        assert!(logged_changes().is_empty());

        assert!(first.click(INCREMENT_LABEL));
        let view = composition.compose(RootView).unwrap();
        assert!(view.click(INCREMENT_LABEL));
        composition.compose(RootView).unwrap();
        assert_eq!(logged_changes(), vec!["1", "2"]);

        // A handler captured on the first frame still targets the same state.
        assert!(first.click(INCREMENT_LABEL));
        composition.compose(RootView).unwrap();
        assert_eq!(logged_changes(), vec!["3"]);

        composition.compose(RootView).unwrap();
        assert!(logged_changes().is_empty());
    }

    #[test]
    fn card_follows_drags_and_toggles() {
        let composition = Composition::new();
        let fake = FakeInteractor::new();
        let backend: Rc<dyn Interactor> = fake.clone();
        let frame = || {
            let backend = backend.clone();
            composition
                .compose(move || with_interactor(backend, CardView))
                .unwrap()
        };

        let view = frame();
        let card = view
            .find(&|v| v.modifier.class.as_deref() == Some("card"))
            .and_then(|v| v.modifier.node_ref.clone())
            .unwrap();
        assert!(fake.emit_drag(card.id(), 5.0, -3.0));

        let view = frame();
        assert_eq!(counter_text(&view).as_deref(), Some("240 x 160 at (5, -3)"));

        assert!(view.click("Lock"));
        let view = frame();
        assert!(!fake.is_attached(card.id()));
        assert!(view.click("Unlock"));
        frame();
        assert!(fake.is_attached(card.id()));
    }
}
