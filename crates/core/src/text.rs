//! Text provider: turns raw text assets into passages.
//!
//! Passage files separate blocks with `~`. Credits files are one entry per line.

use crate::source::Passage;

/// Passages bundled with the game.
pub const DEFAULT_PASSAGES: &str = include_str!("../assets/passages.txt");

/// Credits roll bundled with the game.
pub const DEFAULT_CREDITS: &str = include_str!("../assets/credits.txt");

/// Split `~`-delimited blocks, trimming each and dropping empty ones.
pub fn parse_passages(content: &str) -> Vec<Passage> {
    content
        .split('~')
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(Passage::new)
        .collect()
}

/// One passage per line, trimmed. Blank lines are kept; the passage source skips them.
pub fn parse_credits(content: &str) -> Vec<Passage> {
    content.lines().map(|l| Passage::new(l.trim())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passages_split_on_tilde() {
        let parsed = parse_passages("  first one \n~\n\n~ second\n");
        let texts: Vec<&str> = parsed.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["first one", "second"]);
    }

    #[test]
    fn credits_keep_blank_lines() {
        let parsed = parse_credits("A\n\n  B  \n");
        let texts: Vec<&str> = parsed.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["A", "", "B"]);
    }

    #[test]
    fn bundled_assets_parse() {
        assert!(parse_passages(DEFAULT_PASSAGES).len() >= 5);
        assert!(parse_credits(DEFAULT_CREDITS)
            .iter()
            .any(|p| p.text == "TYPING TOUCAN"));
    }
}
