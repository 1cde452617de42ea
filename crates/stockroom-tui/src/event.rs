//! Terminal input and clock pulses, merged into one channel.
//!
//! A background task owns the crossterm stream and two intervals: the tick
//! (spinners, toast expiry) and the render pulse. Rates come from the
//! command line.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Debug, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
    Render,
}

/// Pulse rates for the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rates {
    pub tick: Duration,
    pub render: Duration,
}

impl Rates {
    /// Both rates in Hz; zero is treated as one.
    pub fn from_hz(tick_hz: u32, fps: u32) -> Self {
        Self {
            tick: period(tick_hz),
            render: period(fps),
        }
    }
}

impl Default for Rates {
    fn default() -> Self {
        Self::from_hz(4, 30)
    }
}

fn period(hz: u32) -> Duration {
    Duration::from_secs(1) / hz.max(1)
}

/// Only key presses and resizes reach the app. Key repeats and releases,
/// mouse, focus, and paste events are dropped.
fn translate(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
        _ => None,
    }
}

fn interval(every: Duration) -> Interval {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

async fn pump(tx: mpsc::UnboundedSender<Event>, rates: Rates, cancel: CancellationToken) {
    let mut terminal = EventStream::new();
    let mut tick = interval(rates.tick);
    let mut render = interval(rates.render);

    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => return,
            _ = tick.tick() => Event::Tick,
            _ = render.tick() => Event::Render,
            input = terminal.next() => match input {
                Some(Ok(raw)) => match translate(raw) {
                    Some(event) => event,
                    None => continue,
                },
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "terminal read failed");
                    continue;
                }
                None => return,
            },
        };

        if tx.send(event).is_err() {
            return;
        }
    }
}

/// Handle to the background reader. Dropping it stops the task.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    pub fn new(rates: Rates) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        tokio::spawn(pump(tx, rates, cancel.clone()));
        Self { rx, cancel }
    }

    /// `None` once the reader has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
