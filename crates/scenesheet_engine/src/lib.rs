//! Reactive cascade engine: rules, the rule store, styled objects, and the
//! owning context.
//!
//! Rule additions batch until [`StyleContext::process`]; rule style updates
//! and class changes propagate synchronously on the caller's stack. The
//! engine is single threaded and reentrancy safe: every notification pass
//! iterates a snapshot, so listeners may register, unregister, or declare
//! rules mid-flight.

#![forbid(unsafe_code)]

mod context;
mod error;
mod listener;
mod object;
mod rule;
mod store;

pub use context::StyleContext;
pub use error::StyleError;
pub use listener::ListenerId;
pub use object::{DeriveHook, MaterialChangeListener, StyleComputation, StyledObject};
pub use rule::{RuleUpdateListener, StyleRule};
pub use store::{RuleStore, RulesAddedListener};
