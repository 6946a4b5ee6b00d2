// Copyright 2025 the Dragline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered listener lists for outbound notifications.
//!
//! Listeners receive the arguments mutably, so cancelable notifications expose
//! a `cancel` flag that any listener may set. Every listener still runs; the
//! emitter's owner inspects the flag after [`Emitter::emit`] returns.
//!
//! ```
//! use dragline_dragdrop::notify::Emitter;
//!
//! struct Args { cancel: bool }
//!
//! let mut emitter = Emitter::<Args>::new();
//! let id = emitter.subscribe(|a| a.cancel = true);
//! let mut args = Args { cancel: false };
//! emitter.emit(&mut args);
//! assert!(args.cancel);
//!
//! assert!(emitter.unsubscribe(id));
//! let mut args = Args { cancel: false };
//! emitter.emit(&mut args);
//! assert!(!args.cancel);
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

/// Handle returned by [`Emitter::subscribe`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

type Listener<A> = Box<dyn FnMut(&mut A)>;

/// A list of listeners invoked in subscription order.
pub struct Emitter<A> {
    next: u32,
    listeners: Vec<(ListenerId, Listener<A>)>,
}

impl<A> Default for Emitter<A> {
    fn default() -> Self {
        Self {
            next: 0,
            listeners: Vec::new(),
        }
    }
}

impl<A> fmt::Debug for Emitter<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<A> Emitter<A> {
    /// Creates an emitter without listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a listener at the end of the list.
    pub fn subscribe(&mut self, listener: impl FnMut(&mut A) + 'static) -> ListenerId {
        let id = ListenerId(self.next);
        self.next = self.next.wrapping_add(1);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        before != self.listeners.len()
    }

    /// Invokes every listener with `args`.
    pub fn emit(&mut self, args: &mut A) {
        for (_, listener) in &mut self.listeners {
            listener(args);
        }
    }

    /// Number of listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns `true` if nobody listens.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    #[test]
    fn listeners_run_in_subscription_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut e = Emitter::<u32>::new();
        for tag in 0..3 {
            let seen = seen.clone();
            e.subscribe(move |v| seen.borrow_mut().push((tag, *v)));
        }
        e.emit(&mut 7);
        assert_eq!(*seen.borrow(), vec![(0, 7), (1, 7), (2, 7)]);
    }

    #[test]
    fn later_listeners_see_earlier_changes() {
        let mut e = Emitter::<i32>::new();
        e.subscribe(|v| *v += 1);
        e.subscribe(|v| *v *= 10);
        let mut v = 1;
        e.emit(&mut v);
        assert_eq!(v, 20);
    }

    #[test]
    fn unsubscribe_unknown_is_false() {
        let mut e = Emitter::<()>::new();
        let id = e.subscribe(|_| {});
        assert!(e.unsubscribe(id));
        assert!(!e.unsubscribe(id));
        assert!(e.is_empty());
    }
}
