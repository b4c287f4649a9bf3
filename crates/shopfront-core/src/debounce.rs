//! Search input debouncing.
//!
//! Raw keystrokes go in, committed search terms come out once the input has
//! been quiet for the configured interval.

use std::time::Duration;

use async_stream::stream;
use futures_core::Stream;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};

/// Buffers raw input and decides when to commit it.
#[derive(Debug, Clone)]
pub struct Debouncer {
    interval: Duration,
    pending: Option<(String, Instant)>,
    committed: String,
}

impl Debouncer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
            committed: String::new(),
        }
    }

    /// Record new raw input, restarting the quiet period.
    pub fn input(&mut self, value: impl Into<String>, now: Instant) {
        self.pending = Some((value.into(), now));
    }

    /// When the pending input will be committed, if there is any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.interval)
    }

    /// Commit the pending input if the quiet period has passed.
    ///
    /// Returns the newly committed term, or `None` if nothing is due or the
    /// due value equals the term already in effect.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let deadline = self.deadline()?;
        if now < deadline {
            return None;
        }

        let (value, _) = self.pending.take()?;
        if value == self.committed {
            return None;
        }
        self.committed = value.clone();
        Some(value)
    }

    /// The term currently in effect.
    pub fn committed(&self) -> &str {
        &self.committed
    }
}

enum Event {
    Input(Option<String>),
    Quiet,
}

/// Turn a channel of raw input into a stream of committed terms.
///
/// The stream ends when the sender is dropped. Input still inside its quiet
/// period at that point is discarded.
pub fn debounced(
    mut input: mpsc::Receiver<String>,
    interval: Duration,
) -> impl Stream<Item = String> + Send {
    stream! {
        let mut debouncer = Debouncer::new(interval);

        loop {
            let event = match debouncer.deadline() {
                Some(deadline) => tokio::select! {
                    value = input.recv() => Event::Input(value),
                    _ = sleep_until(deadline) => Event::Quiet,
                },
                None => Event::Input(input.recv().await),
            };

            match event {
                Event::Input(Some(value)) => debouncer.input(value, Instant::now()),
                Event::Input(None) => break,
                Event::Quiet => {
                    if let Some(term) = debouncer.poll(Instant::now()) {
                        yield term;
                    }
                }
            }
        }
    }
}
