use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::error::DriftError;
use crate::scope::Scope;
use crate::{NodeRef, View};

thread_local! {
    pub static COMPOSER: RefCell<Composer> = RefCell::new(Composer::default());
    static COMPOSING: Cell<bool> = const { Cell::new(false) };
    static PENDING_EFFECTS: RefCell<Vec<Box<dyn FnOnce()>>> = RefCell::new(Vec::new());
    static FRAME_REQUESTED: Cell<bool> = const { Cell::new(false) };
}

#[derive(Default)]
pub struct Composer {
    pub slots: Vec<Box<dyn Any>>,
    pub cursor: usize,
    pub keyed_slots: HashMap<String, Box<dyn Any>>,
}

/// Installs a composition's slots as the thread's active composer for the
/// duration of a build, and moves them back on drop (including on unwind).
pub struct ComposeGuard<'a> {
    owned: &'a RefCell<Composer>,
}

impl<'a> ComposeGuard<'a> {
    pub fn begin(owned: &'a RefCell<Composer>) -> Result<Self, DriftError> {
        if COMPOSING.with(|c| c.replace(true)) {
            return Err(DriftError::Reentrant);
        }
        COMPOSER.with(|c| {
            let mut active = c.borrow_mut();
            std::mem::swap(&mut *active, &mut *owned.borrow_mut());
            active.cursor = 0;
        });
        Ok(ComposeGuard { owned })
    }
}

impl Drop for ComposeGuard<'_> {
    fn drop(&mut self) {
        // A build that unwinds never commits; its queued effects go with it.
        if std::thread::panicking() {
            PENDING_EFFECTS.with(|p| p.borrow_mut().clear());
        }
        COMPOSER.with(|c| {
            std::mem::swap(&mut *c.borrow_mut(), &mut *self.owned.borrow_mut());
        });
        COMPOSING.with(|c| c.set(false));
    }
}

/// Slot-based remember (sequential composition only)
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Rc<T> {
    COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        let cursor = c.cursor;
        c.cursor += 1;

        if cursor >= c.slots.len() {
            let rc: Rc<T> = Rc::new(init());
            c.slots.push(Box::new(rc.clone()));
            return rc;
        }

        if let Some(rc) = c.slots[cursor].downcast_ref::<Rc<T>>() {
            rc.clone()
        } else {
            log::warn!(
                "remember: slot {} type changed; replacing. \
                 If this is due to conditional composition, prefer remember_with_key.",
                cursor
            );
            let rc: Rc<T> = Rc::new(init());
            c.slots[cursor] = Box::new(rc.clone());
            rc
        }
    })
}

/// Key-based remember
pub fn remember_with_key<T: 'static>(key: impl Into<String>, init: impl FnOnce() -> T) -> Rc<T> {
    COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        let key = key.into();

        if let Some(existing) = c.keyed_slots.get(&key) {
            if let Some(rc) = existing.downcast_ref::<Rc<T>>() {
                return rc.clone();
            }
            log::warn!(
                "remember_with_key: key '{}' reused with a different type; replacing.",
                key
            );
        }

        let rc: Rc<T> = Rc::new(init());
        c.keyed_slots.insert(key, Box::new(rc.clone()));
        rc
    })
}

/// Queues `f` to run once the current composition has committed.
///
/// Outside of a composition the callback still waits for the next commit
/// drain, so ordering relative to other queued effects is preserved.
pub fn after_commit(f: impl FnOnce() + 'static) {
    PENDING_EFFECTS.with(|p| p.borrow_mut().push(Box::new(f)));
}

/// Marks the UI as stale; hosts poll `Composition::take_frame_request`.
pub fn request_frame() {
    FRAME_REQUESTED.with(|f| f.set(true));
}

fn run_pending_effects() {
    loop {
        let batch = PENDING_EFFECTS.with(|p| std::mem::take(&mut *p.borrow_mut()));
        if batch.is_empty() {
            break;
        }
        for effect in batch {
            effect();
        }
    }
}

/// A mounted view instance: remembered slots, a root scope that lives until
/// teardown, and the set of `NodeRef`s bound by the last commit.
pub struct Composition {
    composer: RefCell<Composer>,
    scope: Scope,
    bound: RefCell<Vec<NodeRef>>,
    disposed: Cell<bool>,
    frames: Cell<u64>,
}

impl Composition {
    pub fn new() -> Self {
        Self {
            composer: RefCell::new(Composer::default()),
            scope: Scope::new(),
            bound: RefCell::new(Vec::new()),
            disposed: Cell::new(false),
            frames: Cell::new(0),
        }
    }

    /// Builds the view tree, commits it, then runs post-commit effects in
    /// registration order.
    pub fn compose(&self, build: impl FnOnce() -> View) -> Result<View, DriftError> {
        if self.disposed.get() {
            return Err(DriftError::Disposed);
        }
        let root = {
            let _guard = ComposeGuard::begin(&self.composer)?;
            self.scope.run(build)
        };
        self.commit(&root);
        self.frames.set(self.frames.get() + 1);
        log::debug!("commit #{} done", self.frames.get());
        run_pending_effects();
        Ok(root)
    }

    fn commit(&self, root: &View) {
        let mut next: SmallVec<[NodeRef; 8]> = SmallVec::new();
        root.visit(&mut |v| {
            if let Some(node) = &v.modifier.node_ref {
                if next.contains(node) {
                    log::warn!("NodeRef {:?} attached to more than one view", node.id());
                } else {
                    next.push(node.clone());
                }
            }
        });

        let mut bound = self.bound.borrow_mut();
        for old in bound.iter() {
            if !next.contains(old) {
                old.set_bound(false);
            }
        }
        for node in &next {
            node.set_bound(true);
        }
        *bound = next.into_vec();
    }

    /// Number of completed commits.
    pub fn frame_count(&self) -> u64 {
        self.frames.get()
    }

    /// Returns and clears the pending frame request raised by signal writes.
    pub fn take_frame_request(&self) -> bool {
        FRAME_REQUESTED.with(|f| f.replace(false))
    }

    /// Tears the instance down: runs every registered cleanup exactly once
    /// and unbinds all node refs. Later `compose` calls fail.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        self.scope.clone().dispose();
        for node in self.bound.borrow_mut().drain(..) {
            node.set_bound(false);
        }
        // Cleanups may have queued work; flush it so nothing leaks into
        // another composition's commit.
        run_pending_effects();
        log::debug!("composition disposed after {} commits", self.frames.get());
    }
}

impl Default for Composition {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Composition {
    fn drop(&mut self) {
        self.dispose();
    }
}
