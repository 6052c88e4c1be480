use prefix_nfa::{Classification, EndMode, Matcher, StateSet};

use crate::compiled::CompiledRegex;

/// A buffer being typed into, one keystroke at a time.
///
/// Where [`CompiledRegex::try_append`] re-reads the whole buffer on every
/// call, a session remembers the automaton configuration reached after each
/// accepted character. Typing a character is a single step from the last
/// configuration and backspacing just drops it.
///
/// Characters that would make the buffer impossible to complete are never
/// added, so [`TypedInput::status`] is never `Invalid` unless the pattern
/// matches nothing at all.
#[derive(Clone, Debug)]
pub struct TypedInput {
    regex: CompiledRegex,
    buffer: String,
    start: StateSet,
    // trail[i] is the configuration after the first i + 1 characters.
    trail: Vec<StateSet>,
}

impl TypedInput {
    pub(crate) fn new(regex: CompiledRegex) -> TypedInput {
        let start = Matcher::new(regex.automaton()).start_configuration(EndMode::Tolerate);
        TypedInput { regex, buffer: String::new(), start, trail: Vec::new() }
    }

    /// The pattern this session validates against.
    pub fn regex(&self) -> &CompiledRegex {
        &self.regex
    }

    /// Type `ch`. Returns false, leaving the buffer alone, if no
    /// continuation of the buffer with `ch` appended could match.
    pub fn push(&mut self, ch: char) -> bool {
        let matcher = Matcher::new(self.regex.automaton());
        let at = self.trail.len() + 1;
        let next = matcher.step(self.current(), ch, at, EndMode::Tolerate);
        if next.is_empty() {
            return false;
        }
        self.buffer.push(ch);
        self.trail.push(next);
        true
    }

    /// Type every character of `text` in order, skipping the ones that are
    /// rejected. Returns how many were accepted.
    pub fn push_str(&mut self, text: &str) -> usize {
        text.chars().filter(|&ch| self.push(ch)).count()
    }

    /// Remove the last character, if any.
    pub fn backspace(&mut self) -> Option<char> {
        let ch = self.buffer.pop()?;
        self.trail.pop();
        Some(ch)
    }

    /// Empty the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.trail.clear();
    }

    /// The text typed so far.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// The number of characters typed so far.
    pub fn len(&self) -> usize {
        self.trail.len()
    }

    /// Whether nothing has been typed.
    pub fn is_empty(&self) -> bool {
        self.trail.is_empty()
    }

    /// The classification of the current buffer. Always equal to
    /// `self.regex().classify(self.as_str())`.
    pub fn status(&self) -> Classification {
        let config = self.current();
        // `$` only ends a top-level alternative, so nothing past it consumes
        // input and the tolerant configuration agrees with a full pass here.
        if Matcher::new(self.regex.automaton()).accepts(config, true) {
            Classification::Valid
        } else if !config.is_empty() {
            Classification::Incomplete
        } else {
            Classification::Invalid
        }
    }

    fn current(&self) -> &StateSet {
        self.trail.last().unwrap_or(&self.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Builder;

    use Classification::*;

    fn session(pattern: &str) -> TypedInput {
        Builder::new(pattern).build().unwrap().typed_input()
    }

    #[test]
    fn rejects_dead_keystrokes() {
        let mut input = session("^[A-Z]{2}[0-9]$");
        assert!(input.push('A'));
        assert!(!input.push('1'));
        assert!(input.push('B'));
        assert!(input.push('7'));
        assert!(!input.push('7'));
        assert_eq!(input.as_str(), "AB7");
        assert_eq!(input.len(), 3);
        assert_eq!(input.status(), Valid);
    }

    #[test]
    fn backspace_restores_previous_state() {
        let mut input = session("ab|ac");
        assert_eq!(input.push_str("ab"), 2);
        assert_eq!(input.status(), Valid);
        assert_eq!(input.backspace(), Some('b'));
        assert_eq!(input.status(), Incomplete);
        assert!(input.push('c'));
        assert_eq!(input.as_str(), "ac");
        assert_eq!(input.backspace(), Some('c'));
        assert_eq!(input.backspace(), Some('a'));
        assert_eq!(input.backspace(), None);
        assert!(input.is_empty());
        assert_eq!(input.status(), Incomplete);
    }

    #[test]
    fn clear_starts_over() {
        let mut input = session("x+");
        input.push_str("xxx");
        input.clear();
        assert_eq!(input.as_str(), "");
        assert_eq!(input.status(), Incomplete);
        assert!(input.push('x'));
        assert_eq!(input.status(), Valid);
    }

    #[test]
    fn start_anchor_only_at_start() {
        let mut input = session("^a|ba");
        assert!(input.push('b'));
        assert!(input.push('a'));
        assert!(!input.push('a'));
        assert_eq!(input.status(), Valid);
    }

    #[test]
    fn end_anchor_mid_buffer() {
        let mut input = session("a$|ab");
        assert!(input.push('a'));
        assert_eq!(input.status(), Valid);
        assert!(input.push('b'));
        assert_eq!(input.status(), Valid);
        assert!(!input.push('b'));
    }

    #[test]
    fn status_matches_classify() {
        let mut input = session(r"\d{3}-?\d{2}-?\d{4}");
        for ch in "12x3-4-56--789-0a1".chars() {
            input.push(ch);
            assert_eq!(input.status(), input.regex().classify(input.as_str()), "{:?}", input);
        }
    }

    #[test]
    fn pattern_matching_nothing() {
        let mut input = session(r"[^\s\S]");
        assert_eq!(input.status(), Invalid);
        assert!(!input.push('a'));
        assert_eq!(input.push_str("abc"), 0);
    }
}
