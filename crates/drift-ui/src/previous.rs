//! Access to the value a call site was composed with on the previous frame.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::rc::Rc;

use drift_core::{after_commit, remember};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PreviousOptions {
    /// Store a structural copy instead of sharing the value.
    pub deep_copy: bool,
}

/// A copy that shares nothing with the original.
///
/// For owned data this is `Clone`; for shared handles (`Rc`, `RefCell`)
/// it copies what the handle points to, so later writes through the
/// original handle are not observed by the copy.
pub trait DeepCopy: Clone {
    fn deep_copy(&self) -> Self;
}

/// Implements `DeepCopy` as `Clone` for types that own all their data.
#[macro_export]
macro_rules! impl_deep_copy_via_clone {
    ($($t:ty),* $(,)?) => {
        $(impl $crate::previous::DeepCopy for $t {
            fn deep_copy(&self) -> Self {
                self.clone()
            }
        })*
    };
}

impl_deep_copy_via_clone!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    &'static str,
    drift_core::Rect,
    drift_core::Vec2,
    drift_core::Size,
    drift_core::Color,
    crate::interact::Position,
);

impl<T: DeepCopy> DeepCopy for Rc<T> {
    fn deep_copy(&self) -> Self {
        Rc::new((**self).deep_copy())
    }
}

impl<T: DeepCopy> DeepCopy for RefCell<T> {
    fn deep_copy(&self) -> Self {
        RefCell::new(self.borrow().deep_copy())
    }
}

impl<T: DeepCopy> DeepCopy for Box<T> {
    fn deep_copy(&self) -> Self {
        Box::new((**self).deep_copy())
    }
}

impl<T: DeepCopy> DeepCopy for Option<T> {
    fn deep_copy(&self) -> Self {
        self.as_ref().map(DeepCopy::deep_copy)
    }
}

impl<T: DeepCopy> DeepCopy for Vec<T> {
    fn deep_copy(&self) -> Self {
        self.iter().map(DeepCopy::deep_copy).collect()
    }
}

impl<K: DeepCopy + Ord, V: DeepCopy> DeepCopy for BTreeMap<K, V> {
    fn deep_copy(&self) -> Self {
        self.iter()
            .map(|(k, v)| (k.deep_copy(), v.deep_copy()))
            .collect()
    }
}

impl<K: DeepCopy + Eq + Hash, V: DeepCopy> DeepCopy for HashMap<K, V> {
    fn deep_copy(&self) -> Self {
        self.iter()
            .map(|(k, v)| (k.deep_copy(), v.deep_copy()))
            .collect()
    }
}

impl<A: DeepCopy, B: DeepCopy> DeepCopy for (A, B) {
    fn deep_copy(&self) -> Self {
        (self.0.deep_copy(), self.1.deep_copy())
    }
}

/// Returns the `value` this call site received on the previous composition,
/// or `None` on the first one. The new value is stored after commit.
///
/// Shared handles such as `Rc<RefCell<T>>` are stored as handles; use
/// [`use_previous_with`] and `deep_copy` to keep a snapshot instead.
pub fn use_previous<T: Clone + 'static>(value: T) -> Option<T> {
    let slot = remember(|| RefCell::new(None::<T>));
    let previous = slot.borrow().clone();
    after_commit(move || *slot.borrow_mut() = Some(value));
    previous
}

pub fn use_previous_with<T: DeepCopy + 'static>(value: T, options: PreviousOptions) -> Option<T> {
    if !options.deep_copy {
        return use_previous(value);
    }
    // Copy now: the snapshot reflects the value as it was passed in.
    use_previous(value.deep_copy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_core::{Composition, View, ViewKind};

    fn probe<T: Clone + 'static>(
        composition: &Composition,
        f: impl FnOnce() -> Option<T> + 'static,
    ) -> Option<T> {
        let out = Rc::new(RefCell::new(None));
        let o = out.clone();
        composition
            .compose(move || {
                *o.borrow_mut() = f();
                View::new(0, ViewKind::Box)
            })
            .unwrap();
        out.take()
    }

    #[test]
    fn returns_value_from_previous_composition() {
        let composition = Composition::new();
        assert_eq!(probe(&composition, || use_previous("v1")), None);
        assert_eq!(probe(&composition, || use_previous("v2")), Some("v1"));
        assert_eq!(probe(&composition, || use_previous("v3")), Some("v2"));
        assert_eq!(probe(&composition, || use_previous("v3")), Some("v3"));
    }

    #[test]
    fn shared_handle_sees_later_mutation() {
        let composition = Composition::new();
        let data = Rc::new(RefCell::new(vec![1, 2]));

        let d = data.clone();
        probe(&composition, move || use_previous(d));
        data.borrow_mut().push(3);

        let d = data.clone();
        let prev = probe(&composition, move || use_previous(d)).unwrap();
        assert_eq!(*prev.borrow(), vec![1, 2, 3]);
        assert!(Rc::ptr_eq(&prev, &data));
    }

    #[test]
    fn deep_copy_snapshots_value_at_pass_time() {
        let composition = Composition::new();
        let data = Rc::new(RefCell::new(vec![1, 2]));
        let deep = PreviousOptions { deep_copy: true };

        let d = data.clone();
        probe(&composition, move || use_previous_with(d, deep));
        data.borrow_mut().push(3);

        let d = data.clone();
        let prev = probe(&composition, move || use_previous_with(d, deep)).unwrap();
        assert_eq!(*prev.borrow(), vec![1, 2]);
        assert!(!Rc::ptr_eq(&prev, &data));
    }

    #[test]
    fn two_call_sites_track_independently() {
        let composition = Composition::new();
        let first = probe(&composition, || {
            let a = use_previous(1);
            let b = use_previous(10);
            Some((a, b))
        });
        assert_eq!(first, Some((None, None)));

        let second = probe(&composition, || {
            let a = use_previous(2);
            let b = use_previous(20);
            Some((a, b))
        });
        assert_eq!(second, Some((Some(1), Some(10))));
    }
}
