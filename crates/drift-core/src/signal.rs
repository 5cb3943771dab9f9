use std::cell::RefCell;
use std::rc::Rc;

pub type SubId = usize;

/// Observable value. Every write notifies subscribers and requests a frame.
#[derive(Clone)]
pub struct Signal<T: 'static>(Rc<RefCell<Inner<T>>>);

struct Inner<T> {
    value: T,
    subs: Vec<(SubId, Rc<dyn Fn(&T)>)>,
    next_id: SubId,
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(Inner {
            value,
            subs: Vec::new(),
            next_id: 0,
        })))
    }
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow().value)
    }
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> SubId {
        let mut inner = self.0.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subs.push((id, Rc::new(f)));
        id
    }
    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubId) -> bool {
        let mut inner = self.0.borrow_mut();
        let before = inner.subs.len();
        inner.subs.retain(|(sid, _)| *sid != id);
        inner.subs.len() != before
    }
}

impl<T: Clone> Signal<T> {
    pub fn get(&self) -> T {
        self.0.borrow().value.clone()
    }
    pub fn set(&self, v: T) {
        self.0.borrow_mut().value = v;
        self.notify();
    }
    pub fn update<F: FnOnce(&mut T)>(&self, f: F) {
        f(&mut self.0.borrow_mut().value);
        self.notify();
    }

    // Subscribers get a snapshot and run with no borrow held, so they may
    // write back to this signal.
    fn notify(&self) {
        crate::runtime::request_frame();
        let (subs, value) = {
            let inner = self.0.borrow();
            let subs: Vec<Rc<dyn Fn(&T)>> = inner.subs.iter().map(|(_, s)| s.clone()).collect();
            (subs, inner.value.clone())
        };
        for s in &subs {
            s(&value);
        }
    }
}

pub fn signal<T>(t: T) -> Signal<T> {
    Signal::new(t)
}
