use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

use once_cell::sync::Lazy;
use prefix_nfa::{Automaton, Compiler, Config};

use crate::{compiled::CompiledRegex, PatternSyntaxError};

static GLOBAL: Lazy<PatternCache> = Lazy::new(PatternCache::new);

/// A map from pattern text to its compiled automaton.
///
/// Entries are inserted once and never evicted or replaced. When two
/// threads compile the same new pattern at the same time, both compile
/// outside the lock and the first to insert wins; the other result is
/// dropped. Since compilation is deterministic, callers cannot tell the
/// difference.
pub struct PatternCache {
    config: Config,
    map: RwLock<HashMap<Arc<str>, Arc<Automaton>>>,
}

impl PatternCache {
    /// An empty cache that compiles with the default [`Config`].
    pub fn new() -> PatternCache {
        PatternCache::with_config(Config::default())
    }

    /// An empty cache that compiles every pattern with `config`.
    pub fn with_config(config: Config) -> PatternCache {
        PatternCache { config, map: RwLock::new(HashMap::new()) }
    }

    /// The process-wide cache used by [`crate::compile`]. It is created on
    /// first use.
    pub fn global() -> &'static PatternCache {
        &GLOBAL
    }

    /// Return the cached automaton for `pattern`, compiling and inserting it
    /// first if this is the first request for that text.
    ///
    /// Errors are returned to the caller and nothing is inserted.
    pub fn get_or_compile(&self, pattern: &str) -> Result<CompiledRegex, PatternSyntaxError> {
        if let Some(re) = self.get(pattern) {
            debug!("pattern cache hit for {:?}", pattern);
            return Ok(re);
        }
        let nfa = Arc::new(Compiler::new().with_config(self.config.clone()).compile(pattern)?);
        // Entries are immutable once inserted, so a writer that panicked
        // cannot have left a half-built one behind.
        let mut map = self.map.write().unwrap_or_else(PoisonError::into_inner);
        if let Some((key, first)) = map.get_key_value(pattern) {
            debug!("dropping duplicate compilation of {:?}", pattern);
            return Ok(CompiledRegex::from_parts(Arc::clone(key), Arc::clone(first)));
        }
        let key: Arc<str> = Arc::from(pattern);
        map.insert(Arc::clone(&key), Arc::clone(&nfa));
        debug!("cached {:?} ({} patterns)", pattern, map.len());
        Ok(CompiledRegex::from_parts(key, nfa))
    }

    /// The number of cached patterns.
    pub fn len(&self) -> usize {
        self.map.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `pattern` has been compiled into this cache.
    pub fn contains(&self, pattern: &str) -> bool {
        self.map.read().unwrap_or_else(PoisonError::into_inner).contains_key(pattern)
    }

    fn get(&self, pattern: &str) -> Option<CompiledRegex> {
        let map = self.map.read().unwrap_or_else(PoisonError::into_inner);
        map.get_key_value(pattern)
            .map(|(key, nfa)| CompiledRegex::from_parts(Arc::clone(key), Arc::clone(nfa)))
    }
}

impl Default for PatternCache {
    fn default() -> PatternCache {
        PatternCache::new()
    }
}

impl fmt::Debug for PatternCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternCache")
            .field("config", &self.config)
            .field("len", &self.len())
            .finish()
    }
}
