//! Action grammar
//!
//! Turns one input line into a command. Total: anything that is neither an
//! integer nor a reserved single letter is free-form chat.

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// An ease code. Bounds are the scheduler's business.
    Grade(i64),
    /// Reserved; no dispatch behavior is defined for it.
    Skip,
    Abort,
    Next,
    /// Free-form text for the conversation, unchanged.
    Chat(String),
}

impl Action {
    /// Integer parse wins first; then the exact literals `s`, `a`, `n`.
    /// No case folding and no whitespace tolerance, so `" 3"` and `"A"`
    /// are chat.
    pub fn parse(line: &str) -> Action {
        if let Ok(ease) = line.parse::<i64>() {
            return Action::Grade(ease);
        }
        match line {
            "s" => Action::Skip,
            "a" => Action::Abort,
            "n" => Action::Next,
            _ => Action::Chat(line.to_string()),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Action::Grade(_) => "answer",
            Action::Skip => "skip",
            Action::Abort => "abort",
            Action::Next => "next",
            Action::Chat(_) => "chat",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_parse_as_grades() {
        assert_eq!(Action::parse("3"), Action::Grade(3));
        assert_eq!(Action::parse("0"), Action::Grade(0));
        assert_eq!(Action::parse("-2"), Action::Grade(-2));
        assert_eq!(Action::parse("+4"), Action::Grade(4));
    }

    #[test]
    fn reserved_letters_parse_as_commands() {
        assert_eq!(Action::parse("s"), Action::Skip);
        assert_eq!(Action::parse("a"), Action::Abort);
        assert_eq!(Action::parse("n"), Action::Next);
    }

    #[test]
    fn everything_else_is_chat_unchanged() {
        assert_eq!(Action::parse("hello"), Action::Chat("hello".into()));
        assert_eq!(Action::parse(""), Action::Chat(String::new()));
        // numeric-looking but not an integer
        assert_eq!(Action::parse("3.5"), Action::Chat("3.5".into()));
        assert_eq!(Action::parse("3x"), Action::Chat("3x".into()));
        // whitespace defeats the integer parse
        assert_eq!(Action::parse(" 3"), Action::Chat(" 3".into()));
        // no case normalization
        assert_eq!(Action::parse("A"), Action::Chat("A".into()));
        assert_eq!(Action::parse("N"), Action::Chat("N".into()));
    }
}
