use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Key events the tracker understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Backspace,
    /// Shift and other modifier keys pressed on their own
    Modifier,
    Char(char),
}

impl Key {
    /// Map a terminal key event to tracker keys, in the order they apply.
    ///
    /// A shifted character arrives as a single `Char` carrying `SHIFT`; it is
    /// split into the shift press followed by the character. Navigation and
    /// other non-printable keys map to nothing.
    pub fn from_event(event: &KeyEvent) -> Vec<Self> {
        if event.kind == KeyEventKind::Release {
            return Vec::new();
        }
        match event.code {
            KeyCode::Char(' ') => vec![Key::Space],
            KeyCode::Char(c) if event.modifiers.contains(KeyModifiers::SHIFT) => {
                vec![Key::Modifier, Key::Char(c)]
            }
            KeyCode::Char(c) => vec![Key::Char(c)],
            KeyCode::Backspace => vec![Key::Backspace],
            KeyCode::Modifier(_) | KeyCode::CapsLock => vec![Key::Modifier],
            _ => Vec::new(),
        }
    }
}

/// Position within the word list. `char_index` is `None` until a character
/// of the current word has been typed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub word_index: usize,
    pub char_index: Option<usize>,
}

/// Render class of a single character in the word grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Correct,
    Incorrect,
    Untyped,
}

/// Classify the character `ch` at (`word`, `pos`) against the cursor.
///
/// Pure: the result depends only on its arguments.
pub fn classify(
    cursor: &Cursor,
    last_typed: Option<char>,
    word: usize,
    pos: usize,
    ch: char,
) -> CharClass {
    if word < cursor.word_index {
        return CharClass::Correct;
    }
    if word > cursor.word_index {
        return CharClass::Untyped;
    }
    match cursor.char_index {
        Some(current) if pos < current => CharClass::Correct,
        Some(current) if pos == current => {
            if last_typed == Some(ch) {
                CharClass::Correct
            } else {
                CharClass::Incorrect
            }
        }
        _ => CharClass::Untyped,
    }
}

/// What a key did to the tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// Space was pressed; carries the text typed for the finished word
    Commit(String),
    Edit,
}

/// Cursor, in-progress word and last-typed-character marker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputTracker {
    cursor: Cursor,
    typed: String,
    last_typed: Option<char>,
}

impl InputTracker {
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn last_typed(&self) -> Option<char> {
        self.last_typed
    }

    /// Apply a key. `word_count` is the length of the word list.
    pub fn apply(&mut self, key: Key, word_count: usize) -> Applied {
        match key {
            Key::Space => {
                let committed = std::mem::take(&mut self.typed);
                self.cursor.word_index = (self.cursor.word_index + 1) % word_count.max(1);
                self.cursor.char_index = None;
                Applied::Commit(committed)
            }
            Key::Backspace => {
                self.cursor.char_index = self.cursor.char_index.and_then(|i| i.checked_sub(1));
                self.last_typed = None;
                self.typed.pop();
                Applied::Edit
            }
            Key::Modifier => {
                self.last_typed = None;
                self.cursor.char_index = None;
                Applied::Edit
            }
            Key::Char(c) => {
                self.cursor.char_index = Some(self.cursor.char_index.map_or(0, |i| i + 1));
                self.last_typed = Some(c);
                self.typed.push(c);
                Applied::Edit
            }
        }
    }

    pub fn classify(&self, word: usize, pos: usize, ch: char) -> CharClass {
        classify(&self.cursor, self.last_typed, word, pos, ch)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
