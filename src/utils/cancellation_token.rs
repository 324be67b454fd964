use std::{
    sync::{Condvar, Mutex},
    time::Duration,
};

/// A cancellation token shared between the tick loop and the termination handler.
#[derive(Debug)]
pub struct CancellationToken {
    // Setting this to true marks the token as cancelled.
    mutex: Mutex<bool>,
    cvar: Condvar,
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self {
            mutex: Mutex::new(false),
            cvar: Condvar::new(),
        }
    }
}

impl CancellationToken {
    /// Mark the [`CancellationToken`] as cancelled.
    ///
    /// This is idempotent, and once cancelled, will stay cancelled. Sending it
    /// again will not do anything.
    pub fn cancel(&self) {
        let mut guard = self
            .mutex
            .lock()
            .expect("cancellation token lock should not be poisoned");

        if !*guard {
            *guard = true;
            self.cvar.notify_all();
        }
    }

    /// Returns whether the token has been cancelled. Blocks only for as long as
    /// another thread holds the lock, which is never across a sleep.
    pub fn is_cancelled(&self) -> bool {
        *self
            .mutex
            .lock()
            .expect("cancellation token lock should not be poisoned")
    }

    /// Allows a thread to sleep while still being interruptible by the token.
    ///
    /// Returns the condition state after either sleeping or being woken up.
    pub fn sleep_with_cancellation(&self, duration: Duration) -> bool {
        let guard = self
            .mutex
            .lock()
            .expect("cancellation token lock should not be poisoned");

        let (result, _) = self
            .cvar
            .wait_timeout_while(guard, duration, |cancelled| !*cancelled)
            .expect("cancellation token lock should not be poisoned");

        *result
    }
}

#[cfg(test)]
mod test {
    use std::{sync::Arc, thread, time::Instant};

    use super::*;

    #[test]
    fn cancel_is_idempotent() {
        let token = CancellationToken::default();
        assert!(!token.is_cancelled());

        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn sleep_returns_early_on_cancel() {
        let token = Arc::new(CancellationToken::default());
        let other = token.clone();

        let start = Instant::now();
        let handle = thread::spawn(move || other.sleep_with_cancellation(Duration::from_secs(30)));

        thread::sleep(Duration::from_millis(50));
        token.cancel();

        assert!(handle.join().unwrap());
        assert!(start.elapsed() < Duration::from_secs(30));
    }

    #[test]
    fn sleep_times_out_without_cancel() {
        let token = CancellationToken::default();
        assert!(!token.sleep_with_cancellation(Duration::from_millis(10)));
    }
}
