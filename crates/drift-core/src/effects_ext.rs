use crate::{Dispose, after_commit, on_unmount, remember, scoped_effect};
use std::cell::RefCell;

/// Post-commit effect keyed on `key`.
///
/// `effect` runs after the first commit and after every commit where `key`
/// differs from the previously seen key. The `Dispose` it returns runs
/// before the next run and once at teardown.
pub fn use_effect<K: PartialEq + Clone + 'static>(
    key: K,
    effect: impl FnOnce() -> Dispose + 'static,
) {
    let last_key = remember(|| RefCell::new(None::<K>));
    let cleanup_slot = remember(|| RefCell::new(None::<Dispose>));
    let installed = remember(|| RefCell::new(false));

    // Install a single unmount disposer for this callsite.
    if !installed.replace(true) {
        let cleanup_slot = cleanup_slot.clone();
        scoped_effect(move || {
            on_unmount(move || {
                let d = cleanup_slot.borrow_mut().take();
                if let Some(d) = d {
                    d.run();
                }
            })
        });
    }

    let changed = last_key.borrow().as_ref() != Some(&key);
    if changed {
        *last_key.borrow_mut() = Some(key);
        after_commit(move || {
            let previous = cleanup_slot.borrow_mut().take();
            if let Some(d) = previous {
                d.run();
            }
            let d = effect();
            *cleanup_slot.borrow_mut() = Some(d);
        });
    }
}

/// Runs once at mount; the returned `Dispose` runs at teardown.
pub fn use_mount_effect(effect: impl FnOnce() -> Dispose + 'static) {
    use_effect((), effect);
}
