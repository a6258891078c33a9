//! Engine configuration.
//!
//! Switches that affect how operations run live in a [`Config`] held by an
//! [`Engine`]; there is no process-wide state.

use crate::automaton::Automaton;
use crate::minimize::Minimization;
use crate::state::Payload;
use serde::{Deserialize, Serialize};

/// Switches consulted by [`Engine`] operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimization algorithm used by [`Engine::minimize`].
    pub minimization: Minimization,
    /// Let working copies share storage with their inputs until first write.
    ///
    /// When false every input an operation consumes is deep-copied up front.
    /// Inputs are never observably modified either way.
    pub allow_mutation: bool,
    /// Minimize the result of every language operation.
    pub minimize_always: bool,
}

impl Config {
    /// Default configuration: Hopcroft, eager copies, no automatic minimization.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_minimization(mut self, minimization: Minimization) -> Self {
        self.minimization = minimization;
        self
    }

    pub fn with_allow_mutation(mut self, allow_mutation: bool) -> Self {
        self.allow_mutation = allow_mutation;
        self
    }

    pub fn with_minimize_always(mut self, minimize_always: bool) -> Self {
        self.minimize_always = minimize_always;
        self
    }
}

/// Context object carrying a [`Config`]; every language operation is a method on it.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: Config,
}

impl Engine {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A copy of `a` that the caller may modify.
    pub(crate) fn working_copy<P: Payload>(&self, a: &Automaton<P>) -> Automaton<P> {
        if self.config.allow_mutation {
            a.clone()
        } else {
            a.deep_clone()
        }
    }

    /// An owned operand the caller may modify. With `allow_mutation` this is
    /// `a` itself, so its storage is reused when nothing else shares it.
    pub(crate) fn take_input<P: Payload>(&self, a: Automaton<P>) -> Automaton<P> {
        if self.config.allow_mutation {
            a
        } else {
            a.deep_clone()
        }
    }

    /// Post-process an operation result: clear the cached hash and minimize
    /// if configured to.
    pub(crate) fn finish<P: Payload>(&self, mut a: Automaton<P>) -> Automaton<P> {
        a.clear_hash();
        if self.config.minimize_always {
            self.minimize(&mut a);
        }
        a
    }
}
