//! Single-threaded event emitter.
//!
//! An `Emitter<T>` is an explicit instance handed to whoever needs to
//! publish or observe `T`; there is no global bus. Listeners stay registered
//! for as long as the returned `Subscription` is alive.

use slotmap::{new_key_type, SlotMap};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

new_key_type! {
    struct ListenerKey;
}

type Listener<T> = Rc<dyn Fn(&T)>;
type Listeners<T> = RefCell<SlotMap<ListenerKey, Listener<T>>>;

pub struct Emitter<T> {
    listeners: Rc<Listeners<T>>,
}

impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
        }
    }
}

impl<T: 'static> Emitter<T> {
    pub fn new() -> Self {
        Self {
            listeners: Rc::new(RefCell::new(SlotMap::with_key())),
        }
    }

    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let key = self.listeners.borrow_mut().insert(Rc::new(listener));
        let weak: Weak<Listeners<T>> = Rc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = weak.upgrade() {
                listeners.borrow_mut().remove(key);
            }
        })
    }

    /// Delivers `event` to the listeners registered when the call starts.
    /// Listeners may subscribe or unsubscribe while being notified.
    pub fn fire(&self, event: &T) {
        let snapshot: Vec<Listener<T>> = self.listeners.borrow().values().cloned().collect();
        for listener in snapshot {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl<T: 'static> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Unregisters its listener when disposed or dropped.
#[must_use = "dropping a Subscription unregisters the listener"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    pub fn empty() -> Self {
        Self { unsubscribe: None }
    }

    /// One subscription that disposes all of `parts`.
    pub fn merge(parts: Vec<Subscription>) -> Self {
        Self::new(move || drop(parts))
    }

    pub fn dispose(mut self) {
        if let Some(f) = self.unsubscribe.take() {
            f();
        }
    }

    /// Keeps the listener registered for the emitter's whole lifetime.
    pub fn detach(mut self) {
        self.unsubscribe = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(f) = self.unsubscribe.take() {
            f();
        }
    }
}

#[derive(Default)]
pub struct SubscriptionSet {
    items: Vec<Subscription>,
}

impl SubscriptionSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, subscription: Subscription) {
        self.items.push(subscription);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/event.rs"]
mod tests;
