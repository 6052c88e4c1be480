use std::{fmt, str::FromStr, sync::Arc};

use prefix_nfa::{Automaton, Cache, Classification, Compiler, Config, Matcher};

use crate::{input::TypedInput, PatternSyntaxError};

/// A compiled pattern, ready to classify buffers.
///
/// Cloning is cheap: the automaton is shared, never copied.
#[derive(Clone)]
pub struct CompiledRegex {
    pattern: Arc<str>,
    nfa: Arc<Automaton>,
}

/// The outcome of [`CompiledRegex::try_append`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Append {
    /// Whether the character was kept.
    pub accepted: bool,
    /// The buffer after the keystroke. Unchanged when the character was
    /// rejected.
    pub buffer: String,
    /// The classification of `buffer`.
    pub status: Classification,
}

impl CompiledRegex {
    /// Compile `pattern` through the process-wide cache. This is the same as
    /// [`crate::compile`].
    pub fn new(pattern: &str) -> Result<CompiledRegex, PatternSyntaxError> {
        crate::compile(pattern)
    }

    pub(crate) fn from_parts(pattern: Arc<str>, nfa: Arc<Automaton>) -> CompiledRegex {
        CompiledRegex { pattern, nfa }
    }

    /// The source text this was compiled from.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// The underlying automaton.
    pub fn automaton(&self) -> &Automaton {
        &self.nfa
    }

    /// Classify `buffer` against the whole pattern.
    ///
    /// This never fails. The empty buffer is `Valid` when the pattern
    /// accepts the empty string, and otherwise `Incomplete` (or `Invalid`
    /// for a pattern that cannot match anything).
    pub fn classify(&self, buffer: &str) -> Classification {
        Matcher::new(&self.nfa).classify(buffer)
    }

    /// Whether `haystack` as a whole matches the pattern.
    pub fn is_match(&self, haystack: &str) -> bool {
        Matcher::new(&self.nfa).is_match(haystack)
    }

    /// Type `ch` at the end of `buffer`.
    ///
    /// If no continuation of `buffer + ch` can match, the character is
    /// rejected: the returned buffer is `buffer` unchanged and the status is
    /// `buffer`'s own classification. Otherwise the character is kept and
    /// the status is the classification of the extended buffer, which is
    /// never `Invalid`.
    pub fn try_append(&self, buffer: &str, ch: char) -> Append {
        let matcher = Matcher::new(&self.nfa);
        let mut cache = Cache::new(&self.nfa);
        let mut extended = String::with_capacity(buffer.len() + ch.len_utf8());
        extended.push_str(buffer);
        extended.push(ch);
        if matcher.is_viable_prefix_with(&mut cache, &extended) {
            let status = matcher.classify_with(&mut cache, &extended);
            Append { accepted: true, buffer: extended, status }
        } else {
            let status = matcher.classify_with(&mut cache, buffer);
            Append { accepted: false, buffer: buffer.to_string(), status }
        }
    }

    /// The buffer to start typing from.
    pub fn reset(&self) -> String {
        String::new()
    }

    /// Start a keystroke session with an empty buffer.
    pub fn typed_input(&self) -> TypedInput {
        TypedInput::new(self.clone())
    }
}

impl fmt::Display for CompiledRegex {
    /// Shows the original pattern.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Debug for CompiledRegex {
    /// Shows the original pattern.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CompiledRegex").field(&self.as_str()).finish()
    }
}

impl FromStr for CompiledRegex {
    type Err = PatternSyntaxError;

    /// Attempts to parse a string into a compiled pattern.
    fn from_str(s: &str) -> Result<CompiledRegex, PatternSyntaxError> {
        CompiledRegex::new(s)
    }
}

/// Compiles a pattern with explicit limits, outside of any cache.
///
/// ```
/// use prefix_regex::{Builder, ErrorKind};
///
/// let err = Builder::new("(a{10}){10}").size_limit(Some(50)).build().unwrap_err();
/// assert_eq!(err.kind(), &ErrorKind::TooLarge { limit: 50 });
/// ```
#[derive(Clone, Debug)]
pub struct Builder {
    pattern: String,
    config: Config,
}

impl Builder {
    /// Create a new builder with the default limits.
    pub fn new(pattern: &str) -> Builder {
        Builder { pattern: pattern.to_string(), config: Config::default() }
    }

    /// Set how deeply groups, classes and repetitions may nest.
    pub fn nest_limit(&mut self, limit: u32) -> &mut Builder {
        self.config = self.config.clone().nest_limit(limit);
        self
    }

    /// Set the largest number of states the automaton may have. `None`
    /// removes the limit.
    pub fn size_limit(&mut self, limit: Option<usize>) -> &mut Builder {
        self.config = self.config.clone().size_limit(limit);
        self
    }

    /// Compile the pattern.
    pub fn build(&self) -> Result<CompiledRegex, PatternSyntaxError> {
        let nfa = Compiler::new().with_config(self.config.clone()).compile(&self.pattern)?;
        Ok(CompiledRegex::from_parts(Arc::from(self.pattern.as_str()), Arc::new(nfa)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use Classification::*;

    fn regex(pattern: &str) -> CompiledRegex {
        Builder::new(pattern).build().unwrap()
    }

    #[test]
    fn accepted_append_classifies_extended_buffer() {
        let re = regex("ab?c");
        assert_eq!(
            re.try_append("", 'a'),
            Append { accepted: true, buffer: "a".to_string(), status: Incomplete }
        );
        assert_eq!(
            re.try_append("a", 'c'),
            Append { accepted: true, buffer: "ac".to_string(), status: Valid }
        );
    }

    #[test]
    fn rejected_append_keeps_buffer_and_its_status() {
        let re = regex("ab?c");
        assert_eq!(
            re.try_append("ac", 'c'),
            Append { accepted: false, buffer: "ac".to_string(), status: Valid }
        );
        assert_eq!(
            re.try_append("a", 'x'),
            Append { accepted: false, buffer: "a".to_string(), status: Incomplete }
        );
        // A pasted buffer that is already hopeless stays hopeless.
        assert_eq!(
            re.try_append("x", 'c'),
            Append { accepted: false, buffer: "x".to_string(), status: Invalid }
        );
    }

    #[test]
    fn non_ascii_append() {
        let re = regex("[é-ë]+ñ");
        let append = re.try_append("éê", 'ñ');
        assert!(append.accepted);
        assert_eq!(append.buffer, "éêñ");
        assert_eq!(append.status, Valid);
    }

    #[test]
    fn reset_is_empty() {
        assert_eq!(regex("a").reset(), "");
    }

    #[test]
    fn formatting_shows_pattern() {
        let re = regex(r"\d+");
        assert_eq!(re.to_string(), r"\d+");
        assert_eq!(format!("{:?}", re), r#"CompiledRegex("\\d+")"#);
        assert_eq!(re.as_str(), r"\d+");
    }

    #[test]
    fn builder_limits() {
        let err = Builder::new("((a))").nest_limit(1).build().unwrap_err();
        assert!(matches!(err.kind(), crate::ErrorKind::NestLimitExceeded(1)));
        assert!(Builder::new("(a{30}){30}").size_limit(None).build().is_ok());
    }

    #[test]
    fn builder_bypasses_cache() {
        let pattern = "builder-only-[0-9]";
        let re = Builder::new(pattern).build().unwrap();
        assert!(re.is_match("builder-only-7"));
        assert!(!crate::PatternCache::global().contains(pattern));
    }
}
