//! Test tokens — deterministic `TokenGenerator` implementation for tests.

use std::sync::Mutex;

use rendezvous_core::token::TokenGenerator;

/// A generator that hands out tokens from a predetermined list, then falls
/// back to `token-<n>` once the list is exhausted. Repeating a value in the
/// list is how tests provoke an id collision.
#[derive(Debug, Default)]
pub struct SequenceTokens {
    state: Mutex<(Vec<String>, usize)>,
}

impl SequenceTokens {
    /// Create a generator yielding `values` in order.
    #[must_use]
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            state: Mutex::new((values.into_iter().map(Into::into).collect(), 0)),
        }
    }
}

impl TokenGenerator for SequenceTokens {
    fn generate(&self) -> String {
        let mut state = self.state.lock().unwrap();
        let (values, index) = &mut *state;
        let token = values
            .get(*index)
            .cloned()
            .unwrap_or_else(|| format!("token-{}", *index + 1));
        *index += 1;
        token
    }
}

/// A generator that panics whenever it is asked for a token. A store that
/// draws ids while holding its lock is left poisoned by it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanickingTokens;

impl TokenGenerator for PanickingTokens {
    fn generate(&self) -> String {
        panic!("token source failed")
    }
}
