use std::cell::{Cell, RefCell};

use drift_core::{after_commit, on_unmount, remember, scoped_effect};

/// Runs `func` after every commit in which `deps` changed, except the
/// commit that mounts the call site.
pub fn use_watch<K: PartialEq + Clone + 'static>(deps: K, func: impl FnOnce() + 'static) {
    use_watch_with_destroy(deps, func, || {});
}

/// Like [`use_watch`], and also runs `on_destroy` once when the composition
/// is torn down. Only the `on_destroy` passed at mount is kept.
pub fn use_watch_with_destroy<K: PartialEq + Clone + 'static>(
    deps: K,
    func: impl FnOnce() + 'static,
    on_destroy: impl FnOnce() + 'static,
) {
    let mounted = remember(|| Cell::new(false));
    let last_deps = remember(|| RefCell::new(None::<K>));
    let destroy_installed = remember(|| Cell::new(false));

    if !destroy_installed.replace(true) {
        scoped_effect(move || on_unmount(on_destroy));
    }

    if last_deps.borrow().as_ref() == Some(&deps) {
        return;
    }
    *last_deps.borrow_mut() = Some(deps);

    after_commit(move || {
        if mounted.get() {
            func();
        } else {
            mounted.set(true);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_core::{Composition, View, ViewKind};
    use std::rc::Rc;

    fn frame(
        calls: &Rc<Cell<u32>>,
        destroyed: &Rc<Cell<u32>>,
        deps: Vec<i32>,
    ) -> impl FnOnce() -> View + 'static {
        let calls = calls.clone();
        let destroyed = destroyed.clone();
        move || {
            use_watch_with_destroy(
                deps,
                move || calls.set(calls.get() + 1),
                move || destroyed.set(destroyed.get() + 1),
            );
            View::new(0, ViewKind::Box)
        }
    }

    #[test]
    fn skips_mount_then_fires_on_each_change() {
        let composition = Composition::new();
        let calls = Rc::new(Cell::new(0));
        let destroyed = Rc::new(Cell::new(0));

        composition.compose(frame(&calls, &destroyed, vec![1])).unwrap();
        assert_eq!(calls.get(), 0);
        composition.compose(frame(&calls, &destroyed, vec![2])).unwrap();
        composition.compose(frame(&calls, &destroyed, vec![3])).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn unchanged_deps_do_not_fire() {
        let composition = Composition::new();
        let calls = Rc::new(Cell::new(0));
        let destroyed = Rc::new(Cell::new(0));

        for deps in [vec![1], vec![1], vec![2], vec![2], vec![2]] {
            composition.compose(frame(&calls, &destroyed, deps)).unwrap();
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn on_destroy_runs_once_at_teardown() {
        let composition = Composition::new();
        let calls = Rc::new(Cell::new(0));
        let destroyed = Rc::new(Cell::new(0));

        for deps in 0..5 {
            composition
                .compose(frame(&calls, &destroyed, vec![deps]))
                .unwrap();
        }
        assert_eq!(destroyed.get(), 0);

        composition.dispose();
        assert_eq!(destroyed.get(), 1);
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn dropping_the_composition_tears_down() {
        let calls = Rc::new(Cell::new(0));
        let destroyed = Rc::new(Cell::new(0));
        {
            let composition = Composition::new();
            composition.compose(frame(&calls, &destroyed, vec![1])).unwrap();
        }
        assert_eq!(destroyed.get(), 1);
    }
}
