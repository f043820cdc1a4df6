//! A single observable value in the store.
//!
//! `Slice<T>` wraps a `tokio::sync::watch` channel: reads are cheap snapshot
//! borrows, writes replace or modify the value in place, and any number of
//! subscribers can await changes.

use tokio::sync::watch;

/// Typed get/set/subscribe cell.
///
/// ## Design Note
/// Writes go through `send_replace` / `send_if_modified`, which update the
/// value even when nobody is subscribed (plain `send` would drop it).
#[derive(Debug)]
pub struct Slice<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> Slice<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Snapshot of the current value
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Run `f` against the current value without cloning it
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Replace the value and wake subscribers
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Modify the value in place.
    ///
    /// `f` returns whether it changed anything; subscribers are only woken
    /// when it did.
    pub fn update(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }

    /// Receive change notifications
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone + Default> Default for Slice<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_without_subscribers_keeps_value() {
        let slice = Slice::new(0u32);
        slice.set(7);
        assert_eq!(slice.get(), 7);
    }

    #[test]
    fn test_update_reports_modification() {
        let slice = Slice::new(vec![1, 2, 3]);
        assert!(slice.update(|v| {
            v.push(4);
            true
        }));
        assert!(!slice.update(|_| false));
        assert_eq!(slice.read(|v| v.len()), 4);
    }

    #[tokio::test]
    async fn test_subscriber_sees_changes() {
        let slice = Slice::new(String::from("a"));
        let mut rx = slice.subscribe();

        slice.set("b".to_string());
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), "b");

        // An unmodified update must not wake the subscriber
        slice.update(|_| false);
        assert!(!rx.has_changed().unwrap());
    }
}
