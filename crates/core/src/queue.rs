//! Typing queue: the characters the player has to type next.
//!
//! A fixed ring buffer kept topped up to a target depth from a
//! [`CharacterSource`]. Only the head can be matched.

use std::fmt;

use tracing::warn;

use crate::source::{CharacterSource, Unlocked};
use crate::types::{MATCH_REWARD, QUEUE_CAPACITY, QUEUE_DEPTH};

pub struct TypingQueue {
    slots: [char; QUEUE_CAPACITY],
    head: usize,
    len: usize,
    depth: usize,
    source: Box<dyn CharacterSource>,
}

impl fmt::Debug for TypingQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypingQueue")
            .field("pending", &self.iter().collect::<String>())
            .field("depth", &self.depth)
            .field("source", &self.source.kind())
            .finish()
    }
}

impl TypingQueue {
    /// Queue at the default depth, filled immediately.
    pub fn new(source: Box<dyn CharacterSource>) -> Self {
        Self::with_depth(source, QUEUE_DEPTH)
    }

    /// `depth` is clamped to `1..=QUEUE_CAPACITY`.
    pub fn with_depth(source: Box<dyn CharacterSource>, depth: usize) -> Self {
        let mut queue = Self {
            slots: ['\0'; QUEUE_CAPACITY],
            head: 0,
            len: 0,
            depth: depth.clamp(1, QUEUE_CAPACITY),
            source,
        };
        queue.refill();
        queue
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Character the player must type next.
    pub fn first(&self) -> Option<char> {
        (self.len > 0).then(|| self.slots[self.head])
    }

    /// Pending characters, head first.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        (0..self.len).map(move |i| self.slots[(self.head + i) % QUEUE_CAPACITY])
    }

    /// Append the pending characters to `out`, head first, separated by `sep`.
    pub fn append_to(&self, out: &mut String, sep: &str) {
        for (i, ch) in self.iter().enumerate() {
            if i > 0 {
                out.push_str(sep);
            }
            out.push(ch);
        }
    }

    /// Try to match `ch` against the head.
    ///
    /// On a match the head is consumed, the source is told about it when
    /// `update_weights` is set, the queue is topped back up, and the fixed reward
    /// is returned. A mismatch changes nothing.
    pub fn handle_input(&mut self, ch: char, update_weights: bool) -> Option<u32> {
        if self.is_empty() {
            self.refill();
        }
        if self.first()? != ch {
            return None;
        }

        self.pop_front();
        if update_weights {
            self.source.on_char_typed(ch);
        }
        self.refill();
        Some(MATCH_REWARD)
    }

    pub fn on_crash(&mut self, ch: char) {
        self.source.on_crash(ch);
    }

    pub fn expand_pool(&mut self) -> Unlocked {
        self.source.expand_pool()
    }

    pub fn is_fully_unlocked(&self) -> bool {
        self.source.is_complete()
    }

    pub fn set_capitals_enabled(&mut self, enabled: bool) {
        self.source.set_capitals_enabled(enabled);
    }

    pub fn source(&self) -> &dyn CharacterSource {
        self.source.as_ref()
    }

    pub fn source_mut(&mut self) -> &mut dyn CharacterSource {
        self.source.as_mut()
    }

    /// Top up to the target depth. A failing source leaves the queue short; the
    /// next refill tries again.
    pub fn refill(&mut self) {
        while self.len < self.depth {
            match self.source.next_char() {
                Ok(ch) => self.push_back(ch),
                Err(err) => {
                    warn!(error = %err, pending = self.len, "character source failed, queue left short");
                    break;
                }
            }
        }
    }

    fn push_back(&mut self, ch: char) {
        debug_assert!(self.len < QUEUE_CAPACITY);
        let tail = (self.head + self.len) % QUEUE_CAPACITY;
        self.slots[tail] = ch;
        self.len += 1;
    }

    fn pop_front(&mut self) -> Option<char> {
        let ch = self.first()?;
        self.head = (self.head + 1) % QUEUE_CAPACITY;
        self.len -= 1;
        Some(ch)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::error::SourceError;
    use crate::source::{FixedPoolSource, SourceKind};

    /// Replays a script forever; fails while `failing` is set.
    #[derive(Default)]
    struct Scripted {
        script: Vec<char>,
        pos: usize,
        failing: Rc<Cell<bool>>,
        typed: Rc<RefCell<Vec<char>>>,
        crashed: Rc<RefCell<Vec<char>>>,
    }

    impl Scripted {
        fn new(script: &str) -> Self {
            Self {
                script: script.chars().collect(),
                ..Self::default()
            }
        }
    }

    impl CharacterSource for Scripted {
        fn kind(&self) -> SourceKind {
            SourceKind::FixedPool
        }

        fn next_char(&mut self) -> Result<char, SourceError> {
            if self.failing.get() {
                return Err(SourceError::Exhausted);
            }
            let ch = self.script[self.pos % self.script.len()];
            self.pos += 1;
            Ok(ch)
        }

        fn on_char_typed(&mut self, ch: char) {
            self.typed.borrow_mut().push(ch);
        }

        fn on_crash(&mut self, ch: char) {
            self.crashed.borrow_mut().push(ch);
        }

        fn progress_label(&self) -> String {
            String::new()
        }
    }

    fn rendered(q: &TypingQueue) -> String {
        let mut out = String::new();
        q.append_to(&mut out, "   ");
        out
    }

    #[test]
    fn renders_head_first_and_advances_on_match() {
        let mut q = TypingQueue::new(Box::new(Scripted::new("xyzw")));
        assert_eq!(rendered(&q), "x   y   z");

        assert_eq!(q.handle_input('x', true), Some(MATCH_REWARD));
        assert_eq!(rendered(&q), "y   z   w");
    }

    #[test]
    fn mismatch_changes_nothing() {
        let mut q = TypingQueue::new(Box::new(Scripted::new("abc")));
        assert_eq!(q.handle_input('z', true), None);
        assert_eq!(rendered(&q), "a   b   c");
    }

    #[test]
    fn length_stays_at_depth() {
        let source = FixedPoolSource::new(['q', 'w', 'e'], 4).unwrap();
        let mut q = TypingQueue::new(Box::new(source));
        for i in 0..500 {
            let guess = if i % 3 == 0 { '!' } else { q.first().unwrap() };
            q.handle_input(guess, true);
            assert_eq!(q.len(), QUEUE_DEPTH);
        }
    }

    #[test]
    fn ring_buffer_wraps_past_capacity() {
        let mut q = TypingQueue::with_depth(Box::new(Scripted::new("abcdefg")), 5);
        let mut typed = String::new();
        for _ in 0..(QUEUE_CAPACITY * 3) {
            let head = q.first().unwrap();
            q.handle_input(head, false);
            typed.push(head);
        }
        assert!(typed.starts_with("abcdefgabcdefg"));
        assert_eq!(q.len(), 5);
    }

    #[test]
    fn source_notified_only_when_weights_update() {
        let scripted = Scripted::new("ab");
        let typed = Rc::clone(&scripted.typed);
        let crashed = Rc::clone(&scripted.crashed);
        let mut q = TypingQueue::new(Box::new(scripted));

        q.handle_input('a', false);
        q.handle_input('b', true);
        q.on_crash('a');

        assert_eq!(*typed.borrow(), vec!['b']);
        assert_eq!(*crashed.borrow(), vec!['a']);
    }

    #[test]
    fn failing_source_leaves_queue_short_then_heals() {
        let scripted = Scripted::new("abcdef");
        let failing = Rc::clone(&scripted.failing);
        let mut q = TypingQueue::new(Box::new(scripted));
        assert_eq!(q.len(), QUEUE_DEPTH);

        failing.set(true);
        assert_eq!(q.handle_input('a', true), Some(MATCH_REWARD));
        assert_eq!(q.len(), QUEUE_DEPTH - 1);
        assert_eq!(q.handle_input('b', true), Some(MATCH_REWARD));
        assert_eq!(q.len(), QUEUE_DEPTH - 2);

        failing.set(false);
        assert_eq!(q.handle_input('c', true), Some(MATCH_REWARD));
        assert_eq!(q.len(), QUEUE_DEPTH);
        assert_eq!(rendered(&q), "d   e   f");
    }

    #[test]
    fn empty_queue_refills_before_matching() {
        let scripted = Scripted::new("abc");
        let failing = Rc::clone(&scripted.failing);
        failing.set(true);
        let mut q = TypingQueue::new(Box::new(scripted));
        assert!(q.is_empty());
        assert_eq!(q.handle_input('a', true), None);

        failing.set(false);
        assert_eq!(q.handle_input('a', true), Some(MATCH_REWARD));
        assert_eq!(rendered(&q), "b   c   a");
    }
}
