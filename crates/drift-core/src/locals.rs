//! # Composition locals
//!
//! Thread‑local values scoped to a subtree of the composition. A parent
//! provides a value with `with_local`, and any hook or widget composed
//! inside reads it back with `local::<T>()`:
//!
//! ```rust
//! use drift_core::*;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Accent(Color);
//!
//! with_local(Accent(Color::WHITE), || {
//!     assert_eq!(local::<Accent>(), Some(Accent(Color::WHITE)));
//! });
//! assert_eq!(local::<Accent>(), None);
//! ```
//!
//! Locals are only visible while the closure runs. Code that needs a local
//! after commit (effects, event handlers) must read it during composition
//! and capture the value.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;

thread_local! {
    static LOCALS_STACK: RefCell<Vec<HashMap<TypeId, Box<dyn Any>>>> = RefCell::new(Vec::new());
}

fn with_locals_frame<R>(f: impl FnOnce() -> R) -> R {
    // Non-panicking frame guard (ensures pop on unwind)
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            LOCALS_STACK.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }
    LOCALS_STACK.with(|st| st.borrow_mut().push(HashMap::new()));
    let _guard = Guard;
    f()
}

fn set_local_boxed(t: TypeId, v: Box<dyn Any>) {
    LOCALS_STACK.with(|st| {
        if let Some(top) = st.borrow_mut().last_mut() {
            top.insert(t, v);
        }
    });
}

/// Provides `value` to everything composed inside `f`.
pub fn with_local<T: Clone + 'static, R>(value: T, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<T>(), Box::new(value));
        f()
    })
}

/// Innermost provided value of type `T`, if any.
pub fn local<T: Clone + 'static>() -> Option<T> {
    LOCALS_STACK.with(|st| {
        for frame in st.borrow().iter().rev() {
            if let Some(v) = frame.get(&TypeId::of::<T>())
                && let Some(t) = v.downcast_ref::<T>()
            {
                return Some(t.clone());
            }
        }
        None
    })
}

