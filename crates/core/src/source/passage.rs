//! Passage source: the player types running text.
//!
//! Each passage is normalised (newlines become spaces, other control characters
//! are dropped), word-wrapped to [`WRAP_WIDTH`] columns and joined back into a
//! single read text with a trailing space.
//!
//! Two cursors run over the text:
//!
//! - the **read** cursor feeds the queue and runs ahead of the player, spilling
//!   into the preloaded next passage
//! - the **typed** cursor follows correct keystrokes; reaching the end of the
//!   current passage swaps in the next one

use tracing::debug;

use super::{CharacterSource, SourceKind};
use crate::error::{ConfigError, SourceError};
use crate::rng::SimpleRng;
use crate::types::WRAP_WIDTH;

/// A block of text plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage {
    pub text: String,
    pub attribution: String,
}

impl Passage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attribution: String::new(),
        }
    }

    pub fn with_attribution(mut self, attribution: impl Into<String>) -> Self {
        self.attribution = attribution.into();
        self
    }
}

/// How the next passage is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PassageOrder {
    /// Cycle through the list, wrapping around.
    Sequential,
    /// Uniform pick with replacement.
    #[default]
    Random,
}

/// Line view of the passage being typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassageDisplay<'a> {
    pub previous_line: &'a str,
    pub current_line: &'a str,
    /// Following line, or the first line of the preloaded passage.
    pub next_line: &'a str,
    /// Characters typed on the current line, within `0..=current_line.len()`.
    pub local_progress: usize,
    pub line_index: usize,
    pub attribution: &'a str,
}

#[derive(Debug, Clone, Default)]
struct Prepared {
    lines: Vec<String>,
    line_lens: Vec<usize>,
    text: Vec<char>,
    attribution: String,
}

impl Prepared {
    fn from_passage(p: &Passage) -> Self {
        let raw: String = normalize(&p.text);
        let lines = word_wrap(&raw, WRAP_WIDTH);
        let line_lens = lines.iter().map(|l| l.chars().count()).collect();

        let mut text: Vec<char> = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                text.push(' ');
            }
            text.extend(line.chars());
        }
        if !text.is_empty() {
            text.push(' ');
        }

        Self {
            lines,
            line_lens,
            text,
            attribution: p.attribution.clone(),
        }
    }
}

/// Newlines become spaces; every other control character is dropped.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .map(|c| if c == '\n' { ' ' } else { c })
        .filter(|c| !c.is_control())
        .collect()
}

/// Greedy word wrap on spaces.
///
/// Words are never split: a word longer than `limit` sits alone on its line.
/// Runs of spaces collapse.
pub fn word_wrap(text: &str, limit: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0usize;

    for word in text.split(' ').filter(|w| !w.is_empty()) {
        let word_len = word.chars().count();
        let space = usize::from(line_len > 0);

        if line_len + space + word_len <= limit {
            if space == 1 {
                line.push(' ');
            }
            line.push_str(word);
            line_len += space + word_len;
        } else {
            if line_len > 0 {
                lines.push(std::mem::take(&mut line));
            }
            line.push_str(word);
            line_len = word_len;
        }
    }

    if line_len > 0 {
        lines.push(line);
    }
    lines
}

#[derive(Debug, Clone)]
pub struct PassageSource {
    passages: Vec<Passage>,
    order: PassageOrder,
    list_index: usize,
    current: Prepared,
    next: Prepared,
    read: usize,
    typed: usize,
    rng: SimpleRng,
}

impl PassageSource {
    /// Passages that normalise to no text are discarded. At least one must remain.
    pub fn new(
        passages: impl IntoIterator<Item = Passage>,
        order: PassageOrder,
        seed: u32,
    ) -> Result<Self, ConfigError> {
        let passages: Vec<Passage> = passages
            .into_iter()
            .filter(|p| !Prepared::from_passage(p).text.is_empty())
            .collect();
        if passages.is_empty() {
            return Err(ConfigError::EmptyPassages);
        }

        let mut src = Self {
            passages,
            order,
            list_index: 0,
            current: Prepared::default(),
            next: Prepared::default(),
            read: 0,
            typed: 0,
            rng: SimpleRng::new(seed),
        };

        let first = match order {
            PassageOrder::Sequential => 0,
            PassageOrder::Random => src.random_index(),
        };
        src.current = Prepared::from_passage(&src.passages[first]);
        src.preload_next();
        Ok(src)
    }

    fn random_index(&mut self) -> usize {
        self.rng.next_range(self.passages.len() as u32) as usize
    }

    fn preload_next(&mut self) {
        let idx = match self.order {
            PassageOrder::Sequential => {
                self.list_index = (self.list_index + 1) % self.passages.len();
                self.list_index
            }
            PassageOrder::Random => self.random_index(),
        };
        self.next = Prepared::from_passage(&self.passages[idx]);
    }

    fn swap(&mut self) {
        let finished_len = self.current.text.len();
        self.current = std::mem::take(&mut self.next);
        // Whatever was read past the finished passage now sits at the start of the
        // new one. The queue types before it refills, so with a full queue that is
        // one less than the queue depth.
        self.read = self.read.saturating_sub(finished_len);
        self.typed = 0;
        self.preload_next();
        debug!(lines = self.current.lines.len(), "passage swapped");
    }

    /// Processed text of the passage being typed.
    pub fn current_text(&self) -> String {
        self.current.text.iter().collect()
    }

    pub fn current_lines(&self) -> &[String] {
        &self.current.lines
    }

    pub fn typed_index(&self) -> usize {
        self.typed
    }

    pub fn attribution(&self) -> &str {
        &self.current.attribution
    }
}

impl CharacterSource for PassageSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Passage
    }

    fn next_char(&mut self) -> Result<char, SourceError> {
        let cur_len = self.current.text.len();
        let ch = if self.read < cur_len {
            self.current.text[self.read]
        } else {
            *self
                .next
                .text
                .get(self.read - cur_len)
                .ok_or(SourceError::Exhausted)?
        };
        self.read += 1;
        Ok(ch)
    }

    fn on_char_typed(&mut self, _ch: char) {
        self.typed += 1;
        if self.typed >= self.current.text.len() {
            self.swap();
        }
    }

    fn on_crash(&mut self, _ch: char) {}

    fn progress_label(&self) -> String {
        "Inf".to_string()
    }

    fn passage_display(&self) -> Option<PassageDisplay<'_>> {
        let lens = &self.current.line_lens;
        let mut start = 0usize;
        let mut line_index = 0usize;
        for (i, &len) in lens.iter().enumerate() {
            line_index = i;
            if self.typed < start + len + 1 {
                break;
            }
            if i + 1 < lens.len() {
                start += len + 1;
            }
        }

        let lines = &self.current.lines;
        let current_line = lines.get(line_index).map(String::as_str).unwrap_or("");
        let next_line = lines
            .get(line_index + 1)
            .or_else(|| self.next.lines.first())
            .map(String::as_str)
            .unwrap_or("");
        let previous_line = if line_index > 0 {
            lines[line_index - 1].as_str()
        } else {
            ""
        };
        let current_len = lens.get(line_index).copied().unwrap_or(0);

        Some(PassageDisplay {
            previous_line,
            current_line,
            next_line,
            local_progress: self.typed.saturating_sub(start).min(current_len),
            line_index,
            attribution: &self.current.attribution,
        })
    }
}
