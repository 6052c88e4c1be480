/*!
Keystroke-time validation of text against a regular expression.

An input field that validates a fixed format (a tax identifier, a passport
number) needs more than "does this match". While the user is still typing,
the buffer is usually *not* a match yet, and the field has to tell apart a
buffer that can still become valid from one that never will. This crate
answers that question for every keystroke:

* [`Classification::Valid`]: the buffer is already a full match.
* [`Classification::Incomplete`]: not a match, but some continuation is.
* [`Classification::Invalid`]: no continuation can ever match.

It also decides whether a keystroke should be accepted at all: a character
that would make the buffer impossible to complete is rejected and the
buffer is left as it was.

# Example

```
use prefix_regex::Classification;

let pan = prefix_regex::compile(r"^[A-Z]{3}[PCFTABGHLJE]{1}[A-Z]{1}[0-9]{4}[A-Z]{1}$")?;

assert_eq!(pan.classify(""), Classification::Incomplete);
assert_eq!(pan.classify("AAAPA1234"), Classification::Incomplete);
assert_eq!(pan.classify("AAAPA1234A"), Classification::Valid);
assert_eq!(pan.classify("AAAPA12345A"), Classification::Invalid);

// 'Z' is not an allowed fourth character, so the keystroke is dropped.
let append = pan.try_append("AAA", 'Z');
assert!(!append.accepted);
assert_eq!(append.buffer, "AAA");
assert_eq!(append.status, Classification::Incomplete);
# Ok::<(), prefix_regex::PatternSyntaxError>(())
```

# Compiling patterns

[`compile`] memoizes every pattern in a process-wide [`PatternCache`], so the
first call for a given pattern parses and builds its automaton and every
later call is a lookup. Patterns are expected to be a small, fixed set known
when the application starts, and the cache never evicts.

To compile with non-default limits, or to bypass the cache, use a
[`Builder`]. A private cache can be created with [`PatternCache::new`].

# Keystroke sessions

[`CompiledRegex::try_append`] is stateless: it re-reads the whole buffer. A
[`TypedInput`] instead keeps one automaton configuration per accepted
character, so typing and backspacing cost a single step each.

```
use prefix_regex::Classification;

let ssn = prefix_regex::compile(r"^\d{3}-?\d{2}-?\d{4}$")?;
let mut input = ssn.typed_input();
assert_eq!(input.push_str("123-x45"), 6);
assert_eq!(input.as_str(), "123-45");
assert_eq!(input.status(), Classification::Incomplete);
assert_eq!(input.push_str("6789"), 4);
assert_eq!(input.status(), Classification::Valid);
assert_eq!(input.backspace(), Some('9'));
assert_eq!(input.status(), Classification::Incomplete);
# Ok::<(), prefix_regex::PatternSyntaxError>(())
```

# Syntax

The supported grammar is a deliberate subset of the usual regex syntax:
literals (with escapes), `.`, bracket classes with ranges, negation and
nesting, the ASCII classes `\d`, `\s` and `\w` (and their negations),
concatenation, alternation, groups, the repetitions `*`, `+`, `?`, `{n}`,
`{m,}` and `{m,n}`, and the anchors `^` and `$`.

Anchors may only appear at the very start (`^`) or very end (`$`) of a
top-level alternative. Lookaround, backreferences, lazy quantifiers, inline
flags, Unicode and POSIX classes, class set operations and word boundaries
are rejected with a [`PatternSyntaxError`] that names the construct and its
offset in characters.

Every pattern is matched against the *whole* buffer, so `^` and `$` are
optional: `[0-9]{4}` and `^[0-9]{4}$` accept exactly the same buffers.

# Crate features

* **logging** - Enables the `log` crate. Compilation, cache hits and, in the
  engine, every simulation step are logged. This is only useful when
  working on the matcher itself.
*/

#![deny(missing_docs)]

#[macro_use]
mod macros;

mod cache;
mod compiled;
mod input;

pub use prefix_nfa::{Classification, Config, ErrorKind, PatternSyntaxError, Unsupported};

pub use crate::cache::PatternCache;
pub use crate::compiled::{Append, Builder, CompiledRegex};
pub use crate::input::TypedInput;

/// Compile `pattern` through the process-wide [`PatternCache`].
///
/// The first call for a given pattern text parses and compiles it. Later
/// calls, from any thread, share the automaton built the first time.
///
/// # Errors
///
/// Returns a [`PatternSyntaxError`] if the pattern is malformed or uses a
/// construct outside the supported subset. Failed compilations are not
/// cached.
pub fn compile(pattern: &str) -> Result<CompiledRegex, PatternSyntaxError> {
    PatternCache::global().get_or_compile(pattern)
}

#[cfg(doctest)]
doc_comment::doctest!("../README.md");
