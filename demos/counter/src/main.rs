use std::rc::Rc;

use counter::{CardView, INCREMENT_LABEL, RootView};
use drift_core::{Composition, PointerEvent, Rect};
use drift_ui::{Interactor, PointerInteractor, dump, with_interactor};

fn run_counter() -> anyhow::Result<()> {
    let composition = Composition::new();
    let mut view = composition.compose(RootView)?;
    log::info!("mounted:\n{}", dump(&view));

    for _ in 0..3 {
        if !view.click(INCREMENT_LABEL) {
            anyhow::bail!("button {INCREMENT_LABEL:?} not found");
        }
        if composition.take_frame_request() {
            view = composition.compose(RootView)?;
        }
    }
    composition.dispose();
    Ok(())
}

fn run_card() -> anyhow::Result<()> {
    let composition = Composition::new();
    let pointer = Rc::new(PointerInteractor::new());
    let backend: Rc<dyn Interactor> = pointer.clone();
    let frame = || {
        let backend = backend.clone();
        composition.compose(move || with_interactor(backend, CardView))
    };

    let view = frame()?;
    let card = view
        .find(&|v| v.modifier.class.as_deref() == Some("card"))
        .and_then(|v| v.modifier.node_ref.clone())
        .ok_or_else(|| anyhow::anyhow!("card view is missing its node ref"))?;
    pointer.set_bounds(card.id(), Rect::new(0.0, 0.0, 240.0, 160.0));

    // Drag from the middle, then pull the bottom-right corner out.
    let gestures = [
        PointerEvent::down(120.0, 80.0),
        PointerEvent::moved(150.0, 100.0),
        PointerEvent::up(150.0, 100.0),
        PointerEvent::down(268.0, 178.0),
        PointerEvent::moved(300.0, 200.0),
        PointerEvent::up(300.0, 200.0),
    ];
    for event in &gestures {
        pointer.handle_pointer(event);
        if composition.take_frame_request() {
            let view = frame()?;
            log::info!("card:\n{}", dump(&view));
        }
    }
    composition.dispose();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    run_counter()?;
    run_card()
}
