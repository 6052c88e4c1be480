use std::cmp::Ordering;
use std::fmt;

use regex_syntax::hir::{ClassUnicode, ClassUnicodeRange};

/// A state ID in the NFA
pub type StateId = usize;

/// Marker for a successor that hasn't been wired up yet during construction.
pub(crate) const UNPATCHED: StateId = usize::MAX;

/// A set of characters, stored as sorted, non-overlapping inclusive ranges.
///
/// Negation and union happen while parsing, so by the time a set guards a
/// transition the only question left is membership.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CharSet {
    ranges: Box<[(char, char)]>,
}

impl CharSet {
    /// Build a set from arbitrary (possibly overlapping or reversed) ranges.
    pub fn new<I>(ranges: I) -> CharSet
    where
        I: IntoIterator<Item = (char, char)>,
    {
        let class = ClassUnicode::new(
            ranges.into_iter().map(|(start, end)| ClassUnicodeRange::new(start, end)),
        );
        CharSet::from(&class)
    }

    /// The set matching nothing.
    pub fn empty() -> CharSet {
        CharSet { ranges: Box::new([]) }
    }

    /// The set containing exactly `ch`.
    pub fn single(ch: char) -> CharSet {
        CharSet { ranges: Box::new([(ch, ch)]) }
    }

    /// Every character except `\n`, which is what `.` means.
    pub fn any_except_newline() -> CharSet {
        CharSet::new([('\0', '\x09'), ('\x0B', char::MAX)])
    }

    /// Whether `ch` is a member of this set.
    pub fn contains(&self, ch: char) -> bool {
        self.ranges
            .binary_search_by(|&(start, end)| {
                if end < ch {
                    Ordering::Less
                } else if start > ch {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            })
            .is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &[(char, char)] {
        &self.ranges
    }
}

impl From<&ClassUnicode> for CharSet {
    fn from(class: &ClassUnicode) -> CharSet {
        let ranges = class.iter().map(|r| (r.start(), r.end())).collect();
        CharSet { ranges }
    }
}

impl fmt::Debug for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let &[(start, end)] = &*self.ranges {
            if start == end {
                return write!(f, "{:?}", start);
            }
        }
        f.write_str("[")?;
        for &(start, end) in self.ranges.iter() {
            if start == end {
                write!(f, "{}", start.escape_debug())?;
            } else {
                write!(f, "{}-{}", start.escape_debug(), end.escape_debug())?;
            }
        }
        f.write_str("]")
    }
}

/// A zero-width assertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Look {
    /// `^`: holds only before the first character.
    Start,
    /// `$`: holds only after the last character.
    End,
}

/// A Thompson NFA state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum State {
    /// Consume one character in `set` and move to `next`.
    Range { set: CharSet, next: StateId },
    /// Epsilon transition (no input consumed).
    Empty { next: StateId },
    /// Epsilon transitions to every alternate.
    Union { alternates: Vec<StateId> },
    /// Epsilon transition to `next`, taken only when `look` holds.
    Look { look: Look, next: StateId },
    /// The accepting state.
    Match,
}

impl State {
    /// Every state reachable from this one in a single transition.
    fn successors(&self) -> &[StateId] {
        match self {
            State::Range { set, next } => {
                if set.is_empty() {
                    &[]
                } else {
                    std::slice::from_ref(next)
                }
            }
            State::Empty { next } | State::Look { next, .. } => std::slice::from_ref(next),
            State::Union { alternates } => alternates,
            State::Match => &[],
        }
    }
}

/// A compiled Thompson NFA.
///
/// States live in an arena and refer to each other by index, so the epsilon
/// cycles introduced by `*` and `+` are plain backward edges. The automaton
/// never changes after construction.
#[derive(Clone, PartialEq, Eq)]
pub struct Automaton {
    states: Vec<State>,
    start: StateId,
    accept: StateId,
    /// `live[id]` is true when the accept state is reachable from `id`.
    live: Vec<bool>,
}

impl Automaton {
    pub(crate) fn new(states: Vec<State>, start: StateId, accept: StateId) -> Automaton {
        let live = liveness(&states, accept);
        Automaton { states, start, accept, live }
    }

    /// The initial state.
    pub fn start(&self) -> StateId {
        self.start
    }

    /// The single accepting state.
    pub fn accept(&self) -> StateId {
        self.accept
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Whether the accept state can still be reached from `id`, assuming
    /// any `$` on the way will eventually hold.
    pub fn is_live(&self, id: StateId) -> bool {
        self.live[id]
    }

    /// The number of states from which the accept state is reachable.
    pub fn live_count(&self) -> usize {
        self.live.iter().filter(|&&live| live).count()
    }
}

/// Mark every state that has a path to `accept`, by walking the reversed
/// transition graph from it.
fn liveness(states: &[State], accept: StateId) -> Vec<bool> {
    let mut predecessors = vec![Vec::new(); states.len()];
    for (id, state) in states.iter().enumerate() {
        for &next in state.successors() {
            predecessors[next].push(id);
        }
    }
    let mut live = vec![false; states.len()];
    live[accept] = true;
    let mut stack = vec![accept];
    while let Some(id) = stack.pop() {
        for &prev in &predecessors[id] {
            if !live[prev] {
                live[prev] = true;
                stack.push(prev);
            }
        }
    }
    live
}

impl fmt::Debug for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Automaton(")?;
        for (id, state) in self.states.iter().enumerate() {
            let marker = if id == self.start { '>' } else { ' ' };
            let dead = if self.live[id] { "" } else { " (dead)" };
            write!(f, "{}{:06}: ", marker, id)?;
            match state {
                State::Range { set, next } => writeln!(f, "{:?} => {}{}", set, next, dead)?,
                State::Empty { next } => writeln!(f, "empty => {}{}", next, dead)?,
                State::Union { alternates } => {
                    let alts: Vec<String> = alternates.iter().map(|id| id.to_string()).collect();
                    writeln!(f, "union({}){}", alts.join(", "), dead)?
                }
                State::Look { look, next } => writeln!(f, "{:?} => {}{}", look, next, dead)?,
                State::Match => writeln!(f, "MATCH")?,
            }
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_membership() {
        let set = CharSet::new([('0', '9'), ('A', 'Z'), ('_', '_')]);
        assert!(set.contains('0'));
        assert!(set.contains('5'));
        assert!(set.contains('Z'));
        assert!(set.contains('_'));
        assert!(!set.contains('a'));
        assert!(!set.contains('@'));
    }

    #[test]
    fn charset_merges_overlapping_ranges() {
        let set = CharSet::new([('c', 'f'), ('a', 'd'), ('g', 'h')]);
        assert_eq!(set.ranges(), &[('a', 'h')]);
    }

    #[test]
    fn charset_dot_excludes_newline() {
        let dot = CharSet::any_except_newline();
        assert!(dot.contains('a'));
        assert!(dot.contains('\u{10FFFF}'));
        assert!(!dot.contains('\n'));
    }

    #[test]
    fn liveness_marks_unreachable_accept() {
        // 0: 'a' => 2, 1: [] => 2, 2: MATCH
        let states = vec![
            State::Range { set: CharSet::single('a'), next: 2 },
            State::Range { set: CharSet::empty(), next: 2 },
            State::Match,
        ];
        let nfa = Automaton::new(states, 0, 2);
        assert!(nfa.is_live(0));
        assert!(!nfa.is_live(1));
        assert!(nfa.is_live(2));
        assert_eq!(nfa.live_count(), 2);
    }
}
