//! Run-scoped selection layer for the Elemental UI end-to-end suite.
//!
//! Two pure components live here:
//!
//! - the tag filter ([`should_run`], [`filter_tests`]) deciding whether a test
//!   group is registered at all for the active tags of the run,
//! - the predicate matcher ([`matches`], [`Predicates`]) evaluating one
//!   environment axis (Kubernetes distribution, operator channel, Rancher
//!   version, ...) against a caller-supplied regular expression.
//!
//! Both read an explicit [`RunConfig`] resolved once from the environment.

pub mod config;
pub mod error;
pub mod predicate;
pub mod tags;

pub use config::*;
pub use error::*;
pub use predicate::*;
pub use tags::*;
