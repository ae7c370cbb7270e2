//! Dispose-once handles for host-side registrations.

use std::fmt;

/// Handle to something registered with the host. Implementations must
/// tolerate repeated `dispose` calls.
pub trait Disposable: Send {
    fn dispose(&mut self);
}

/// Runs a closure on dispose. The closure runs at most once, whether
/// `dispose` is called explicitly or the handle is dropped.
pub struct FnDisposable {
    on_dispose: Option<Box<dyn FnOnce() + Send>>,
}

impl FnDisposable {
    pub fn new(f: impl FnOnce() + Send + 'static) -> Self {
        Self {
            on_dispose: Some(Box::new(f)),
        }
    }
}

impl Disposable for FnDisposable {
    fn dispose(&mut self) {
        if let Some(f) = self.on_dispose.take() {
            f();
        }
    }
}

impl Drop for FnDisposable {
    fn drop(&mut self) {
        self.dispose();
    }
}

// ─── Resource Set ─────────────────────────────────────────────────

/// Ordered collection of registration handles backing one feature
/// activation. `dispose` drains the handles in registration order and
/// further calls are no-ops. Dropping the set disposes whatever is still
/// held, so a partially built set abandoned on a registration error
/// releases the handles acquired up to that point.
#[derive(Default)]
pub struct ResourceSet {
    handles: Vec<Box<dyn Disposable>>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, handle: Box<dyn Disposable>) {
        self.handles.push(handle);
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn dispose(&mut self) {
        for mut handle in self.handles.drain(..) {
            handle.dispose();
        }
    }
}

impl Drop for ResourceSet {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for ResourceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceSet")
            .field("handles", &self.handles.len())
            .finish()
    }
}

// ─── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn counting_handle(counter: &Arc<AtomicUsize>) -> FnDisposable {
        let counter = Arc::clone(counter);
        FnDisposable::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn fn_disposable_runs_exactly_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut handle = counting_handle(&counter);
        handle.dispose();
        handle.dispose();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn fn_disposable_drop_runs_closure() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let _handle = counting_handle(&counter);
        }
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn fn_disposable_dispose_then_drop_runs_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let mut handle = counting_handle(&counter);
            handle.dispose();
        }
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn resource_set_disposes_in_registration_order() {
        let order: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));
        let mut set = ResourceSet::new();
        for label in ["provider", "command", "source"] {
            let order = Arc::clone(&order);
            set.push(Box::new(FnDisposable::new(move || {
                order.lock().expect("order lock").push(label);
            })));
        }
        assert_eq!(set.len(), 3);

        set.dispose();

        assert!(set.is_empty());
        assert_eq!(
            *order.lock().expect("order lock"),
            vec!["provider", "command", "source"]
        );
    }

    #[test]
    fn resource_set_dispose_is_idempotent() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut set = ResourceSet::new();
        set.push(Box::new(counting_handle(&counter)));

        set.dispose();
        set.dispose();
        set.dispose();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn resource_set_drop_disposes_remaining_handles() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let mut set = ResourceSet::new();
            set.push(Box::new(counting_handle(&counter)));
            set.push(Box::new(counting_handle(&counter)));
        }
        assert_eq!(
            counter.load(Ordering::SeqCst),
            2,
            "abandoned set must release everything it acquired"
        );
    }

    #[test]
    fn empty_set_dispose_is_noop() {
        let mut set = ResourceSet::new();
        assert!(set.is_empty());
        set.dispose();
        assert!(set.is_empty());
    }
}
