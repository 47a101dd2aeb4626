//! Property-based tests for the action grammar

use super::action::Action;
use proptest::prelude::*;

proptest! {
    #[test]
    fn integers_always_become_grades(value in any::<i64>()) {
        prop_assert_eq!(Action::parse(&value.to_string()), Action::Grade(value));
    }

    #[test]
    fn non_reserved_text_is_chat_unchanged(line in "\\PC{0,40}") {
        prop_assume!(line.parse::<i64>().is_err());
        prop_assume!(!matches!(line.as_str(), "s" | "a" | "n"));
        prop_assert_eq!(Action::parse(&line), Action::Chat(line.clone()));
    }

    #[test]
    fn parsing_never_panics(line in any::<String>()) {
        let _ = Action::parse(&line);
    }
}
