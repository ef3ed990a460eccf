use std::sync::mpsc::Receiver;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::warn;

use crate::{
    controller::{SessionController, StateChange},
    input::Key,
    runtime::AppEvent,
    session::Status,
    timer::PRESET_SECS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Terminal host around a [`SessionController`]
#[derive(Debug)]
pub struct App {
    pub controller: SessionController,
    /// Duration applied on start-up and after every restart
    pub preferred_secs: u32,
    pub words_pending: bool,
    changes: Receiver<StateChange>,
}

impl App {
    pub fn new(mut controller: SessionController, preferred_secs: u32) -> Self {
        let changes = controller.subscribe();
        let mut app = Self {
            controller,
            preferred_secs,
            words_pending: true,
            changes,
        };
        app.apply_preferred_duration();
        app
    }

    fn apply_preferred_duration(&mut self) {
        if let Err(e) = self.controller.set_duration(self.preferred_secs) {
            warn!("cannot apply duration {}s: {e}", self.preferred_secs);
        }
    }

    fn restart(&mut self) {
        self.controller.restart();
        self.apply_preferred_duration();
    }

    /// Drain pending state changes; true when the screen needs redrawing
    pub fn take_changes(&mut self) -> bool {
        self.changes.try_iter().count() > 0
    }

    pub fn on_event(&mut self, event: AppEvent, now: Instant) -> Flow {
        // Due ticks fire before anything else, so a key that arrives after
        // the deadline sees a finished session.
        self.controller.poll(now);

        match event {
            AppEvent::Key(key) => return self.on_key(key, now),
            AppEvent::Words(words) => {
                self.words_pending = false;
                self.controller.load_words(words);
            }
            AppEvent::Tick | AppEvent::Resize => {}
        }
        Flow::Continue
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Flow {
        if key.kind == KeyEventKind::Release {
            return Flow::Continue;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('c') if ctrl => return Flow::Quit,
            KeyCode::Tab => {
                self.restart();
                return Flow::Continue;
            }
            _ => {}
        }

        if self.controller.status() == Status::Started {
            for k in Key::from_event(&key) {
                self.controller.handle_key(k);
            }
            return Flow::Continue;
        }

        match key.code {
            KeyCode::Enter => self.controller.start(now),
            KeyCode::Char('r') => self.restart(),
            KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                let secs = PRESET_SECS[idx];
                if let Err(e) = self.controller.set_duration(secs) {
                    warn!("cannot set duration {secs}s: {e}");
                }
            }
            _ => {}
        }
        Flow::Continue
    }
}
