//! Raw character filtering ahead of the session.

/// Drops NUL and carriage returns, and repeats of the same character that arrive
/// within the debounce window.
///
/// Some touch keyboards deliver every key twice; a 200 ms window hides that. On
/// desktops the window is 0 and only the NUL/CR filter applies.
#[derive(Debug, Clone, Default)]
pub struct InputFilter {
    window_secs: f64,
    last: Option<(char, f64)>,
}

impl InputFilter {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_secs: window_ms as f64 / 1000.0,
            last: None,
        }
    }

    /// Returns whether `ch`, arriving at `now` seconds, should reach the game.
    pub fn accept(&mut self, ch: char, now: f64) -> bool {
        if ch == '\0' || ch == '\r' {
            return false;
        }
        if let Some((last_ch, at)) = self.last {
            if last_ch == ch && now - at < self.window_secs {
                return false;
            }
        }
        self.last = Some((ch, now));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_nul_and_carriage_return() {
        let mut f = InputFilter::new(0);
        assert!(!f.accept('\0', 0.0));
        assert!(!f.accept('\r', 0.0));
        assert!(f.accept('a', 0.0));
    }

    #[test]
    fn zero_window_accepts_repeats() {
        let mut f = InputFilter::new(0);
        assert!(f.accept('a', 1.0));
        assert!(f.accept('a', 1.0));
    }

    #[test]
    fn touch_window_drops_quick_duplicates() {
        let mut f = InputFilter::new(200);
        assert!(f.accept('a', 1.0));
        assert!(!f.accept('a', 1.1));
        assert!(f.accept('b', 1.15));
        assert!(f.accept('a', 1.2));
        assert!(f.accept('a', 1.45));
    }
}
