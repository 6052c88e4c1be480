use crate::nfa::{Automaton, Look, State, StateId};
use crate::sparse::StateSet;

/// Where a buffer stands with respect to a pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    /// The buffer is a full match.
    Valid,
    /// The buffer is not a match, but some continuation of it is.
    Incomplete,
    /// No continuation of the buffer can match.
    Invalid,
}

/// How `$` is evaluated while computing an epsilon closure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndMode {
    /// `$` holds iff `at_end`.
    Enforce { at_end: bool },
    /// `$` always holds: more input may or may not arrive.
    Tolerate,
}

/// The two walks used to classify a buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pass {
    /// `$` holds only at the true end of the buffer. Decides `Valid`.
    Full,
    /// `$` is assumed satisfiable. Decides `Incomplete` vs `Invalid`.
    Prefix,
}

impl Pass {
    fn end_mode(self, at: usize, len: usize) -> EndMode {
        match self {
            Pass::Full => EndMode::Enforce { at_end: at == len },
            Pass::Prefix => EndMode::Tolerate,
        }
    }
}

/// Scratch space for a [`Matcher`], reusable across calls to avoid
/// allocating two state sets per classification.
#[derive(Clone, Debug)]
pub struct Cache {
    curr: StateSet,
    next: StateSet,
    stack: Vec<StateId>,
}

impl Cache {
    pub fn new(nfa: &Automaton) -> Cache {
        Cache { curr: StateSet::new(nfa.len()), next: StateSet::new(nfa.len()), stack: Vec::new() }
    }
}

/// Simulates an [`Automaton`] over a buffer one character at a time.
///
/// A configuration is the epsilon closure of the states reachable after the
/// characters consumed so far. Only live states (those with a path to the
/// accept state) are ever kept, so an empty configuration means no
/// continuation can match.
#[derive(Clone, Copy, Debug)]
pub struct Matcher<'a> {
    nfa: &'a Automaton,
}

impl<'a> Matcher<'a> {
    /// Create a new matcher for the given NFA
    pub fn new(nfa: &'a Automaton) -> Self {
        Self { nfa }
    }

    pub fn automaton(&self) -> &'a Automaton {
        self.nfa
    }

    /// The closure of `roots` at position `at` (in characters).
    pub fn epsilon_closure(&self, roots: &[StateId], at: usize, mode: EndMode) -> StateSet {
        let mut set = StateSet::new(self.nfa.len());
        let mut stack = Vec::new();
        for &root in roots {
            self.close_into(&mut set, &mut stack, root, at, mode);
        }
        set
    }

    /// The configuration before any input has been consumed.
    pub fn start_configuration(&self, mode: EndMode) -> StateSet {
        self.epsilon_closure(&[self.nfa.start()], 0, mode)
    }

    /// Consume `ch` from every state in `config`. `at` is the position
    /// *after* `ch`. An empty result is a dead configuration.
    pub fn step(&self, config: &StateSet, ch: char, at: usize, mode: EndMode) -> StateSet {
        let mut next = StateSet::new(self.nfa.len());
        let mut stack = Vec::new();
        self.step_into(config, &mut next, &mut stack, ch, at, mode);
        next
    }

    /// Whether `config` accepts. When `at_end` is true, `$` assertions that
    /// were left pending in `config` are resolved as satisfied.
    pub fn accepts(&self, config: &StateSet, at_end: bool) -> bool {
        let accept = self.nfa.accept();
        if config.contains(accept) {
            return true;
        }
        if !at_end {
            return false;
        }
        let mut seen = StateSet::new(self.nfa.len());
        let mut stack: Vec<StateId> = config
            .iter()
            .filter(|&id| matches!(self.nfa.state(id), State::Look { look: Look::End, .. }))
            .collect();
        while let Some(id) = stack.pop() {
            if id == accept {
                return true;
            }
            if !seen.insert(id) {
                continue;
            }
            match *self.nfa.state(id) {
                State::Empty { next } | State::Look { look: Look::End, next } => stack.push(next),
                State::Union { ref alternates } => stack.extend(alternates.iter().copied()),
                _ => {}
            }
        }
        false
    }

    /// Run one pass over `haystack` and return the final configuration.
    pub fn configuration<'c>(
        &self,
        cache: &'c mut Cache,
        haystack: &str,
        pass: Pass,
    ) -> &'c StateSet {
        self.run(cache, haystack, pass);
        &cache.curr
    }

    /// Check if the entire input matches
    pub fn is_match(&self, haystack: &str) -> bool {
        self.is_match_with(&mut Cache::new(self.nfa), haystack)
    }

    pub fn is_match_with(&self, cache: &mut Cache, haystack: &str) -> bool {
        self.run(cache, haystack, Pass::Full);
        self.accepts(&cache.curr, true)
    }

    /// Whether some continuation of `haystack` (possibly empty) matches.
    pub fn is_viable_prefix(&self, haystack: &str) -> bool {
        self.is_viable_prefix_with(&mut Cache::new(self.nfa), haystack)
    }

    pub fn is_viable_prefix_with(&self, cache: &mut Cache, haystack: &str) -> bool {
        self.run(cache, haystack, Pass::Prefix);
        !cache.curr.is_empty()
    }

    pub fn classify(&self, haystack: &str) -> Classification {
        self.classify_with(&mut Cache::new(self.nfa), haystack)
    }

    /// Full pass first, so a `Valid` buffer is never reported `Incomplete`.
    pub fn classify_with(&self, cache: &mut Cache, haystack: &str) -> Classification {
        if self.is_match_with(cache, haystack) {
            Classification::Valid
        } else if self.is_viable_prefix_with(cache, haystack) {
            Classification::Incomplete
        } else {
            Classification::Invalid
        }
    }

    fn run(&self, cache: &mut Cache, haystack: &str, pass: Pass) {
        if cache.curr.capacity() < self.nfa.len() {
            *cache = Cache::new(self.nfa);
        }
        let len = match pass {
            Pass::Full => haystack.chars().count(),
            Pass::Prefix => 0,
        };
        let Cache { curr, next, stack } = cache;
        curr.clear();
        self.close_into(curr, stack, self.nfa.start(), 0, pass.end_mode(0, len));
        for (i, ch) in haystack.chars().enumerate() {
            if curr.is_empty() {
                break;
            }
            let at = i + 1;
            self.step_into(curr, next, stack, ch, at, pass.end_mode(at, len));
            std::mem::swap(curr, next);
        }
    }

    fn step_into(
        &self,
        from: &StateSet,
        to: &mut StateSet,
        stack: &mut Vec<StateId>,
        ch: char,
        at: usize,
        mode: EndMode,
    ) {
        to.clear();
        for id in from.iter() {
            if let State::Range { ref set, next } = *self.nfa.state(id) {
                if set.contains(ch) {
                    self.close_into(to, stack, next, at, mode);
                }
            }
        }
        trace!("step {:?} at {}: {} -> {} states", ch, at, from.len(), to.len());
    }

    fn close_into(
        &self,
        set: &mut StateSet,
        stack: &mut Vec<StateId>,
        root: StateId,
        at: usize,
        mode: EndMode,
    ) {
        stack.push(root);
        while let Some(id) = stack.pop() {
            if !self.nfa.is_live(id) || !set.insert(id) {
                continue;
            }
            match *self.nfa.state(id) {
                State::Range { .. } | State::Match => {}
                State::Empty { next } => stack.push(next),
                State::Union { ref alternates } => stack.extend(alternates.iter().rev().copied()),
                State::Look { look, next } => {
                    if holds(look, at, mode) {
                        stack.push(next);
                    }
                }
            }
        }
    }
}

fn holds(look: Look, at: usize, mode: EndMode) -> bool {
    match look {
        Look::Start => at == 0,
        Look::End => match mode {
            EndMode::Enforce { at_end } => at_end,
            EndMode::Tolerate => true,
        },
    }
}
