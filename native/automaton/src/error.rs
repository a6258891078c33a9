//! Errors reported by manual graph assembly, the string-union builder and
//! the numeric constructors.

use crate::state::StateId;
use crate::symbol::Symbol;
use thiserror::Error;

/// Precondition violations detected at the call that receives bad input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
    #[error("input must be sorted: {previous:?} > {current:?}")]
    UnsortedInput { previous: String, current: String },

    #[error("automaton already built")]
    BuilderFinished,

    #[error("empty interval {min:#06x}..={max:#06x}")]
    InvalidInterval { min: Symbol, max: Symbol },

    #[error("no {digits}-digit numbers in {min}..={max}")]
    InvalidDigitRange { min: u32, max: u32, digits: usize },

    #[error("not a decimal numeral: {0:?}")]
    InvalidNumeral(String),

    #[error("state {0} does not exist")]
    UnknownState(StateId),
}

pub type Result<T> = std::result::Result<T, AutomatonError>;
