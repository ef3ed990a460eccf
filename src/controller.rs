use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Instant;

use log::{debug, info, warn};

use crate::{
    error::TimerError,
    input::{Applied, CharClass, Cursor, InputTracker, Key},
    scorer::{Results, Tally},
    session::{Session, Status},
    timer::{Countdown, TickOutcome, DEFAULT_SECS},
    word_source::WordSource,
};

/// Published to subscribers after every state mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    WordsLoaded(usize),
    DurationChanged(u32),
    Started,
    Input,
    WordCommitted { correct: bool },
    Tick(u32),
    Finished(Results),
    Restarted,
}

/// Owns the whole typing test: word list, countdown, input and tally
#[derive(Debug)]
pub struct SessionController {
    status: Status,
    duration_secs: u32,
    words: Vec<String>,
    words_loaded: bool,
    timer: Countdown,
    tracker: InputTracker,
    tally: Tally,
    subscribers: Vec<Sender<StateChange>>,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(Countdown::default())
    }
}

impl SessionController {
    pub fn new(timer: Countdown) -> Self {
        Self {
            status: Status::Waiting,
            duration_secs: timer.remaining_secs(),
            words: Vec::new(),
            words_loaded: false,
            timer,
            tracker: InputTracker::default(),
            tally: Tally::default(),
            subscribers: Vec::new(),
        }
    }

    /// Observe state changes. Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<StateChange> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn publish(&mut self, change: StateChange) {
        self.subscribers.retain(|tx| tx.send(change.clone()).is_ok());
    }

    /// Install the word list. Only the first call takes effect.
    pub fn load_words(&mut self, words: Vec<String>) -> bool {
        if self.words_loaded {
            warn!("word list already loaded, ignoring {} words", words.len());
            return false;
        }
        info!("loaded {} words", words.len());
        self.words = words;
        self.words_loaded = true;
        self.publish(StateChange::WordsLoaded(self.words.len()));
        true
    }

    pub fn load_from(&mut self, source: &dyn WordSource) -> bool {
        self.load_words(source.load())
    }

    pub fn set_duration(&mut self, secs: u32) -> Result<(), TimerError> {
        if self.status == Status::Started {
            return Err(TimerError::Running);
        }
        self.timer.set_duration(secs)?;
        self.duration_secs = secs;
        debug!("duration set to {secs}s");
        self.publish(StateChange::DurationChanged(secs));
        Ok(())
    }

    pub fn start(&mut self, now: Instant) {
        if self.status == Status::Finished {
            self.tracker.reset();
            self.tally = Tally::default();
        }
        self.status = Status::Started;
        self.timer.start(now);
        self.publish(StateChange::Started);
    }

    /// Back to the freshly loaded state; the word list is kept
    pub fn restart(&mut self) {
        self.timer.reset();
        self.status = Status::Waiting;
        self.duration_secs = DEFAULT_SECS;
        self.tracker.reset();
        self.tally = Tally::default();
        info!("session restarted");
        self.publish(StateChange::Restarted);
    }

    pub fn handle_key(&mut self, key: Key) {
        if self.status != Status::Started {
            return;
        }

        let word_index = self.tracker.cursor().word_index;
        match self.tracker.apply(key, self.words.len()) {
            Applied::Commit(typed) => {
                let expected = self.words.get(word_index).map(String::as_str);
                let correct = self.tally.evaluate(expected, &typed);
                debug!("committed {typed:?} against {expected:?}: {correct}");
                self.publish(StateChange::WordCommitted { correct });
            }
            Applied::Edit => self.publish(StateChange::Input),
        }
    }

    /// Advance the countdown by one tick
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.timer.tick();
        self.on_tick_outcome(outcome);
        outcome
    }

    /// Fire any ticks that are due by `now`
    pub fn poll(&mut self, now: Instant) -> Option<TickOutcome> {
        let outcome = self.timer.poll(now)?;
        self.on_tick_outcome(outcome);
        Some(outcome)
    }

    fn on_tick_outcome(&mut self, outcome: TickOutcome) {
        match outcome {
            TickOutcome::Dormant => {}
            TickOutcome::Counting(remaining) => self.publish(StateChange::Tick(remaining)),
            TickOutcome::Expired => {
                if self.status == Status::Started {
                    self.status = Status::Finished;
                    let results = self.results();
                    info!(
                        "session finished: {} wpm, {}% accuracy",
                        results.wpm, results.accuracy
                    );
                    self.publish(StateChange::Finished(results));
                }
            }
        }
    }

    pub fn session(&self) -> Session {
        Session {
            status: self.status,
            duration_secs: self.duration_secs,
            remaining_secs: self.timer.remaining_secs(),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn cursor(&self) -> Cursor {
        self.tracker.cursor()
    }

    pub fn typed(&self) -> &str {
        self.tracker.typed()
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn results(&self) -> Results {
        Results::from(self.tally)
    }

    pub fn timer(&self) -> &Countdown {
        &self.timer
    }

    pub fn classify(&self, word: usize, pos: usize, ch: char) -> CharClass {
        self.tracker.classify(word, pos, ch)
    }
}
