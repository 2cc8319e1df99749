//! The one-shot timer that ends a form's success window.

use std::time::Duration;

use tokio::task::JoinHandle;

/// A cancellable one-shot timer.
///
/// Each arm gets a new generation number. The elapsed callback receives it
/// and should confirm it with [`SuccessTimer::finish`] before acting, so
/// a timer that fired just as it was being replaced does nothing.
#[derive(Debug, Default)]
pub(crate) struct SuccessTimer {
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl SuccessTimer {
    /// Cancels any pending timer and starts a new one.
    pub(crate) fn arm<F>(&mut self, window: Duration, on_elapsed: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            on_elapsed(generation);
        }));
        generation
    }

    /// Stops the pending timer, if any.
    pub(crate) fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Consumes the pending timer if `generation` is still current.
    pub(crate) fn finish(&mut self, generation: u64) -> bool {
        if self.handle.is_some() && self.generation == generation {
            self.handle = None;
            true
        } else {
            false
        }
    }

    #[cfg(test)]
    pub(crate) const fn is_armed(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for SuccessTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
