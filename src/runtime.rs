use std::io;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Input consumed by the game loop. `Tick` means nothing arrived within the poll interval.
#[derive(Clone, Debug)]
pub enum GameEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal input
pub trait GameEventSource {
    /// Wait up to `timeout` for the next event. `Ok(None)` on timeout.
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<GameEvent>>;
}

/// Polls crossterm on the calling thread; the game never runs background work.
#[derive(Debug, Default)]
pub struct CrosstermEventSource;

impl GameEventSource for CrosstermEventSource {
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<GameEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        Ok(match event::read()? {
            // windows reports releases too
            CtEvent::Key(key) if key.kind != KeyEventKind::Release => Some(GameEvent::Key(key)),
            CtEvent::Resize(_, _) => Some(GameEvent::Resize),
            _ => None,
        })
    }
}

/// Channel-backed source for headless tests
pub struct TestEventSource {
    rx: Receiver<GameEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<GameEvent>) -> Self {
        Self { rx }
    }
}

impl GameEventSource for TestEventSource {
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<GameEvent>> {
        match self.rx.recv_timeout(timeout) {
            Ok(ev) => Ok(Some(ev)),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => Ok(None),
        }
    }
}

/// Runner that advances the game one event at a time
pub struct Runner<E: GameEventSource> {
    event_source: E,
    poll_interval: Duration,
}

impl<E: GameEventSource> Runner<E> {
    pub fn new(event_source: E, poll_interval: Duration) -> Self {
        Self {
            event_source,
            poll_interval,
        }
    }

    /// Blocks up to the poll interval and returns the next event, or Tick on timeout
    pub fn step(&mut self) -> io::Result<GameEvent> {
        Ok(self
            .event_source
            .next_event(self.poll_interval)?
            .unwrap_or(GameEvent::Tick))
    }
}
