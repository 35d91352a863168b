//! Blocking queues between the pipeline stages.
//!
//! The candidate queue is a bounded `sync_channel` whose receiver is shared by
//! every matcher. Dropping the [`Producer`] closes it for all of them at once:
//! blocked and future calls to [`Consumer::recv`] return `None`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Create a bounded multi-consumer queue holding at most `capacity` items.
pub fn bounded<T>(capacity: usize) -> (Producer<T>, Consumer<T>) {
    let (tx, rx) = mpsc::sync_channel(capacity);
    (
        Producer { tx },
        Consumer {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

/// Sending half of a bounded queue
#[derive(Debug)]
pub struct Producer<T> {
    tx: SyncSender<T>,
}

impl<T> Producer<T> {
    /// Block until there is room for `item`.
    ///
    /// Hands the item back if every consumer is gone.
    pub fn send(&self, item: T) -> Result<(), T> {
        self.tx.send(item).map_err(|e| e.0)
    }

    /// Close the queue for every consumer.
    pub fn close(self) {
        drop(self.tx);
    }
}

/// Receiving half of a bounded queue, cloned once per consumer
#[derive(Debug)]
pub struct Consumer<T> {
    rx: Arc<Mutex<Receiver<T>>>,
}

impl<T> Clone for Consumer<T> {
    fn clone(&self) -> Self {
        Consumer {
            rx: Arc::clone(&self.rx),
        }
    }
}

impl<T> Consumer<T> {
    /// Block until an item arrives. `None` once the queue is closed and drained.
    pub fn recv(&self) -> Option<T> {
        // A poisoned lock means another consumer panicked mid-receive;
        // treat the queue as closed.
        let rx = self.rx.lock().ok()?;
        rx.recv().ok()
    }
}

/// Cooperative cancellation shared by every pipeline stage.
///
/// Trips when [`CancelToken::cancel`] is called or when the optional
/// deadline passes.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        CancelToken {
            flag: Arc::new(AtomicBool::new(false)),
            deadline: Some(deadline),
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        if self.flag.load(Ordering::Relaxed) {
            return true;
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.flag.store(true, Ordering::Relaxed);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_items_arrive_in_order() {
        let (tx, rx) = bounded(4);
        for i in 0..4 {
            tx.send(i).unwrap();
        }
        tx.close();

        let got: Vec<i32> = std::iter::from_fn(|| rx.recv()).collect();
        assert_eq!(got, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_close_wakes_every_consumer() {
        let (tx, rx) = bounded::<u32>(1);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let rx = rx.clone();
                thread::spawn(move || rx.recv())
            })
            .collect();
        drop(rx);

        thread::sleep(Duration::from_millis(20));
        tx.close();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), None);
        }
    }

    #[test]
    fn test_each_item_reaches_one_consumer() {
        let (tx, rx) = bounded(2);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let rx = rx.clone();
                thread::spawn(move || std::iter::from_fn(|| rx.recv()).collect::<Vec<u32>>())
            })
            .collect();
        drop(rx);

        for i in 0..100 {
            tx.send(i).unwrap();
        }
        tx.close();

        let mut all: Vec<u32> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_send_fails_without_consumers() {
        let (tx, rx) = bounded(1);
        drop(rx);
        assert_eq!(tx.send(5), Err(5));
    }

    #[test]
    fn test_cancel_token() {
        let token = CancelToken::new();
        let shared = token.clone();
        assert!(!shared.is_cancelled());
        token.cancel();
        assert!(shared.is_cancelled());
    }

    #[test]
    fn test_deadline_trips_token() {
        let token = CancelToken::with_deadline(Instant::now());
        assert!(token.is_cancelled());

        let later = CancelToken::with_deadline(Instant::now() + Duration::from_secs(3600));
        assert!(!later.is_cancelled());
    }
}
