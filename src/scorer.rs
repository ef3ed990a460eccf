/// Committed-word counts for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub correct: u32,
    pub incorrect: u32,
}

impl Tally {
    /// Score one committed word. A missing expected word never matches.
    pub fn evaluate(&mut self, expected: Option<&str>, typed: &str) -> bool {
        let matched = expected.is_some_and(|word| word == typed.trim());
        if matched {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
        matched
    }

    pub fn total(&self) -> u32 {
        self.correct + self.incorrect
    }

    /// Rounded share of correct words; 0 when nothing was committed
    pub fn accuracy_percent(&self) -> u32 {
        match self.total() {
            0 => 0,
            total => ((self.correct as f64 / total as f64) * 100.0).round() as u32,
        }
    }

    /// Headline "WPM" figure: the number of correct words in the session
    pub fn words_per_minute(&self) -> u32 {
        self.correct
    }
}

/// Frozen figures shown once the countdown expires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Results {
    pub wpm: u32,
    pub accuracy: u32,
    pub tally: Tally,
}

impl From<Tally> for Results {
    fn from(tally: Tally) -> Self {
        Self {
            wpm: tally.words_per_minute(),
            accuracy: tally.accuracy_percent(),
            tally,
        }
    }
}
