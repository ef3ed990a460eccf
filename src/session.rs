use crate::timer::DEFAULT_SECS;

/// Lifecycle of a single typing test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    #[default]
    Waiting,
    Started,
    Finished,
}

/// Snapshot of the session as seen by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub status: Status,
    pub duration_secs: u32,
    pub remaining_secs: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            status: Status::Waiting,
            duration_secs: DEFAULT_SECS,
            remaining_secs: DEFAULT_SECS,
        }
    }
}

impl Session {
    pub fn is_started(&self) -> bool {
        self.status == Status::Started
    }

    pub fn is_finished(&self) -> bool {
        self.status == Status::Finished
    }
}
