use crate::nfa::{Automaton, CharSet, Look, State, StateId, UNPATCHED};
use crate::syntax::{Parser, SyntaxNode};
use crate::{CompileResult, ErrorKind, PatternSyntaxError};

/// Options shared by the parser and the compiler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    nest_limit: u32,
    size_limit: Option<usize>,
}

impl Config {
    pub fn new() -> Config {
        Config { nest_limit: 250, size_limit: Some(10_000) }
    }

    /// How deeply groups, classes and repetitions may nest.
    pub fn nest_limit(mut self, limit: u32) -> Config {
        self.nest_limit = limit;
        self
    }

    /// The most states a compiled automaton may have, or `None` for no
    /// limit. Bounded repetitions are unrolled, so `((a{50}){50}){50}` is a
    /// short pattern with a very large automaton.
    pub fn size_limit(mut self, limit: Option<usize>) -> Config {
        self.size_limit = limit;
        self
    }

    pub fn get_nest_limit(&self) -> u32 {
        self.nest_limit
    }

    pub fn get_size_limit(&self) -> Option<usize> {
        self.size_limit
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// A partially built piece of the automaton. `end`'s successor is left
/// dangling until the fragment is wired to whatever follows it.
#[derive(Debug, Clone, Copy)]
struct Fragment {
    start: StateId,
    end: StateId,
}

/// Compiler that turns a pattern into a Thompson NFA.
pub struct Compiler {
    config: Config,
    states: Vec<State>,
}

impl Compiler {
    /// Create a new compiler
    pub fn new() -> Self {
        Self { config: Config::default(), states: Vec::new() }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Parse and compile `pattern`.
    pub fn compile(self, pattern: &str) -> CompileResult<Automaton> {
        let tree = Parser::new(&self.config).parse(pattern)?;
        let nfa = self.build(&tree)?;
        debug!("compiled {:?} into {} states ({} live)", pattern, nfa.len(), nfa.live_count());
        Ok(nfa)
    }

    /// Compile an already parsed syntax tree.
    pub fn build(mut self, tree: &SyntaxNode) -> CompileResult<Automaton> {
        let fragment = self.compile_node(tree)?;
        let accept = self.add(State::Match)?;
        self.connect(fragment.end, accept);
        Ok(Automaton::new(self.states, fragment.start, accept))
    }

    fn add(&mut self, state: State) -> CompileResult<StateId> {
        if let Some(limit) = self.config.size_limit {
            if self.states.len() >= limit {
                return Err(PatternSyntaxError::new(ErrorKind::TooLarge { limit }, 0));
            }
        }
        let id = self.states.len();
        self.states.push(state);
        Ok(id)
    }

    /// Wire the dangling successor of `from` to `to`.
    fn connect(&mut self, from: StateId, to: StateId) {
        match &mut self.states[from] {
            State::Range { next, .. } | State::Empty { next } | State::Look { next, .. } => {
                if *next == UNPATCHED {
                    *next = to;
                }
            }
            State::Union { alternates } => alternates.push(to),
            State::Match => {}
        }
    }

    fn compile_node(&mut self, node: &SyntaxNode) -> CompileResult<Fragment> {
        match node {
            SyntaxNode::Empty => self.compile_empty(),
            SyntaxNode::Literal(set) => self.compile_literal(set),
            SyntaxNode::Concat(nodes) => self.compile_concat(nodes),
            SyntaxNode::Alternate(nodes) => self.compile_alternation(nodes),
            SyntaxNode::Group { node, min, max } => self.compile_repetition(node, *min, *max),
            SyntaxNode::StartAnchor => self.compile_look(Look::Start),
            SyntaxNode::EndAnchor => self.compile_look(Look::End),
        }
    }

    fn compile_empty(&mut self) -> CompileResult<Fragment> {
        let id = self.add(State::Empty { next: UNPATCHED })?;
        Ok(Fragment { start: id, end: id })
    }

    fn compile_literal(&mut self, set: &CharSet) -> CompileResult<Fragment> {
        let id = self.add(State::Range { set: set.clone(), next: UNPATCHED })?;
        Ok(Fragment { start: id, end: id })
    }

    fn compile_look(&mut self, look: Look) -> CompileResult<Fragment> {
        let id = self.add(State::Look { look, next: UNPATCHED })?;
        Ok(Fragment { start: id, end: id })
    }

    fn compile_concat(&mut self, nodes: &[SyntaxNode]) -> CompileResult<Fragment> {
        let mut iter = nodes.iter();
        let mut result = match iter.next() {
            None => return self.compile_empty(),
            Some(node) => self.compile_node(node)?,
        };
        for node in iter {
            let next = self.compile_node(node)?;
            self.connect(result.end, next.start);
            result.end = next.end;
        }
        Ok(result)
    }

    fn compile_alternation(&mut self, nodes: &[SyntaxNode]) -> CompileResult<Fragment> {
        if nodes.len() == 1 {
            return self.compile_node(&nodes[0]);
        }
        let start = self.add(State::Union { alternates: Vec::with_capacity(nodes.len()) })?;
        let end = self.add(State::Empty { next: UNPATCHED })?;
        for node in nodes {
            let branch = self.compile_node(node)?;
            self.connect(start, branch.start);
            self.connect(branch.end, end);
        }
        Ok(Fragment { start, end })
    }

    /// `min` mandatory copies in sequence, then either `max - min` copies
    /// that can each be skipped, or (unbounded) a loop back over the last
    /// copy. A fresh copy of `node` is compiled each time, so every copy has
    /// its own states.
    fn compile_repetition(
        &mut self,
        node: &SyntaxNode,
        min: u32,
        max: Option<u32>,
    ) -> CompileResult<Fragment> {
        if max == Some(0) {
            return self.compile_empty();
        }
        if (min, max) == (1, Some(1)) {
            return self.compile_node(node);
        }
        let end = self.add(State::Empty { next: UNPATCHED })?;
        let mut start = None;
        let mut tail: Option<Fragment> = None;
        for _ in 0..min {
            let copy = self.compile_node(node)?;
            match tail {
                Some(prev) => self.connect(prev.end, copy.start),
                None => start = Some(copy.start),
            }
            tail = Some(copy);
        }
        match max {
            None => match tail {
                // x{m,} with m >= 1: loop back over the last mandatory copy.
                Some(last) => {
                    let again = self.add(State::Union { alternates: vec![last.start, end] })?;
                    self.connect(last.end, again);
                }
                // x*: a skippable copy whose end loops back to the choice.
                None => {
                    let copy = self.compile_node(node)?;
                    let choice = self.add(State::Union { alternates: vec![copy.start, end] })?;
                    self.connect(copy.end, choice);
                    start = Some(choice);
                }
            },
            Some(max) => {
                for _ in min..max {
                    let copy = self.compile_node(node)?;
                    let choice = self.add(State::Union { alternates: vec![copy.start, end] })?;
                    match tail {
                        Some(prev) => self.connect(prev.end, choice),
                        None => start = Some(choice),
                    }
                    tail = Some(copy);
                }
                if let Some(last) = tail {
                    self.connect(last.end, end);
                }
            }
        }
        Ok(Fragment { start: start.unwrap_or(end), end })
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Matcher;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn compile(pattern: &str) -> Automaton {
        init_logger();
        Compiler::new().compile(pattern).unwrap()
    }

    fn count_ranges(nfa: &Automaton) -> usize {
        nfa.states().iter().filter(|s| matches!(s, State::Range { .. })).count()
    }

    #[test]
    fn literal_is_one_consuming_state() {
        let nfa = compile("a");
        assert_eq!(nfa.len(), 2);
        assert_eq!(nfa.state(nfa.start()), &State::Range { set: CharSet::single('a'), next: 1 });
        assert_eq!(nfa.state(nfa.accept()), &State::Match);
    }

    #[test]
    fn every_successor_is_patched() {
        for pattern in ["", "a|", "(ab|c)*d{2,4}", "^x{3,}y?$", "a{0}b", "(a*)*"] {
            let nfa = compile(pattern);
            for state in nfa.states() {
                let successors: Vec<StateId> = match state {
                    State::Range { next, .. }
                    | State::Empty { next }
                    | State::Look { next, .. } => vec![*next],
                    State::Union { alternates } => alternates.clone(),
                    State::Match => vec![],
                };
                for next in successors {
                    assert!(next < nfa.len(), "{}: dangling successor in {:?}", pattern, nfa);
                }
            }
        }
    }

    #[test]
    fn bounded_repetition_unrolls() {
        assert_eq!(count_ranges(&compile("a{3}")), 3);
        assert_eq!(count_ranges(&compile("a{2,5}")), 5);
        assert_eq!(count_ranges(&compile("a?")), 1);
    }

    #[test]
    fn unbounded_repetition_loops_instead_of_unrolling() {
        assert_eq!(count_ranges(&compile("a*")), 1);
        assert_eq!(count_ranges(&compile("a+")), 1);
        assert_eq!(count_ranges(&compile("a{4,}")), 4);
        let nfa = compile("a+");
        let has_back_edge = nfa.states().iter().enumerate().any(|(id, state)| match state {
            State::Union { alternates } => alternates.iter().any(|&alt| alt < id),
            _ => false,
        });
        assert!(has_back_edge, "{:?}", nfa);
    }

    #[test]
    fn state_count_is_linear_in_pattern_length() {
        let short = compile("(ab|cd)*e").len();
        let long = compile("(ab|cd)*e(ab|cd)*e(ab|cd)*e(ab|cd)*e").len();
        assert!(long <= 4 * short + 4, "{} vs {}", short, long);
    }

    #[test]
    fn size_limit() {
        let config = Config::new().size_limit(Some(100));
        let err = Compiler::new().with_config(config).compile("(a{20}){20}").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::TooLarge { limit: 100 });
        assert_eq!(err.offset(), 0);

        let config = Config::new().size_limit(None);
        assert!(Compiler::new().with_config(config).compile("(a{20}){20}").is_ok());
    }

    #[test]
    fn zero_repetition_matches_empty() {
        let nfa = compile("a{0}b");
        let matcher = Matcher::new(&nfa);
        assert!(matcher.is_match("b"));
        assert!(!matcher.is_match("ab"));
    }

    #[test]
    fn nested_nullable_loops_terminate() {
        let nfa = compile("(a*)*b");
        let matcher = Matcher::new(&nfa);
        assert!(matcher.is_match("b"));
        assert!(matcher.is_match("aaab"));
        assert!(!matcher.is_match("aaa"));
    }

    #[test]
    fn empty_class_is_dead() {
        let nfa = compile(r"a[^\s\S]");
        assert!(!nfa.is_live(nfa.start()));
    }
}
