//! Thompson NFA compiler and prefix-tolerant simulator.
//!
//! This crate answers the question an input field asks on every keystroke:
//! given a pattern and the text typed so far, is the text already a full
//! match, could it still become one, or is it hopeless? Answering the middle
//! case needs *prefix acceptance*, which ordinary match engines don't expose.
//!
//! The pipeline is:
//!
//! ```text
//! pattern ──Parser──> SyntaxNode ──Compiler──> Automaton ──Matcher──> Classification
//! ```
//!
//! Only a practical subset of regular expressions is supported: literals,
//! character classes, concatenation, alternation, groups, `*`, `+`, `?`,
//! `{m,n}` and the anchors `^`/`$` at the edges of a top-level alternative.
//! Everything else (lookaround, backreferences, lazy quantifiers, inline
//! flags, Unicode classes) fails to compile with a [`PatternSyntaxError`]
//! that names the construct and its character offset.
//!
//! ```
//! use prefix_nfa::{Classification, Compiler, Matcher};
//!
//! let nfa = Compiler::new().compile(r"^[A-Z]{2}[0-9]{3}$").unwrap();
//! let matcher = Matcher::new(&nfa);
//! assert_eq!(matcher.classify("AB1"), Classification::Incomplete);
//! assert_eq!(matcher.classify("AB123"), Classification::Valid);
//! assert_eq!(matcher.classify("A1"), Classification::Invalid);
//! ```

#[macro_use]
mod macros;

pub mod compiler;
pub mod matcher;
pub mod nfa;
pub mod sparse;
pub mod syntax;

pub use compiler::{Compiler, Config};
pub use matcher::{Cache, Classification, EndMode, Matcher, Pass};
pub use nfa::{Automaton, CharSet, Look, State, StateId};
pub use sparse::StateSet;
pub use syntax::{Parser, SyntaxNode};

/// The result of compiling a pattern.
pub type CompileResult<T> = Result<T, PatternSyntaxError>;

/// Parse and compile `pattern` with the default [`Config`].
pub fn compile(pattern: &str) -> CompileResult<Automaton> {
    Compiler::new().compile(pattern)
}

/// An error raised while compiling a pattern.
///
/// These are configuration-time failures: patterns are static, so this is
/// expected at start-up and never while classifying input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSyntaxError {
    kind: ErrorKind,
    offset: usize,
}

impl PatternSyntaxError {
    pub(crate) fn new(kind: ErrorKind, offset: usize) -> PatternSyntaxError {
        PatternSyntaxError { kind, offset }
    }

    /// What went wrong.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The offset, in characters (not bytes), of the offending construct.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// The kinds of [`PatternSyntaxError`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Malformed syntax, as described by the tokenizer.
    Parse(String),
    /// Well-formed syntax outside the supported subset.
    Unsupported(Unsupported),
    /// A `^` or `$` somewhere other than the edge of a top-level alternative.
    MisplacedAnchor,
    /// A `{m,n}` repetition with `m > n`.
    InvalidBound,
    /// Groups, classes or repetitions nested deeper than the configured limit.
    NestLimitExceeded(u32),
    /// The automaton would exceed the configured number of states.
    ///
    /// The offset of this kind is always 0: the size comes from the pattern
    /// as a whole, typically from nested bounded repetitions multiplying,
    /// rather than from one construct.
    TooLarge { limit: usize },
}

/// A construct that parses but is deliberately not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Unsupported {
    LookAround,
    Backreference,
    LazyQuantifier,
    InlineFlags,
    UnicodeClass,
    PosixClass,
    ClassSetOperation,
    WordBoundary,
}

impl std::fmt::Display for PatternSyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (at offset {})", self.kind, self.offset)
    }
}

impl std::error::Error for PatternSyntaxError {}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Parse(msg) => write!(f, "syntax error: {}", msg),
            ErrorKind::Unsupported(construct) => write!(f, "unsupported construct: {}", construct),
            ErrorKind::MisplacedAnchor => write!(
                f,
                "anchors are only allowed at the start or end of a top-level alternative"
            ),
            ErrorKind::InvalidBound => {
                write!(f, "repetition minimum is greater than its maximum")
            }
            ErrorKind::NestLimitExceeded(limit) => {
                write!(f, "pattern nests deeper than the limit of {}", limit)
            }
            ErrorKind::TooLarge { limit } => {
                write!(f, "compiled automaton exceeds the limit of {} states", limit)
            }
        }
    }
}

impl std::fmt::Display for Unsupported {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Unsupported::LookAround => "look-around assertion",
            Unsupported::Backreference => "backreference",
            Unsupported::LazyQuantifier => "lazy quantifier",
            Unsupported::InlineFlags => "inline flags",
            Unsupported::UnicodeClass => "Unicode property class",
            Unsupported::PosixClass => "POSIX character class",
            Unsupported::ClassSetOperation => "character class set operation",
            Unsupported::WordBoundary => "word boundary assertion",
        };
        f.write_str(name)
    }
}
