//! # Group Aggregation
//!
//! Everything a group item needs beyond plain storage: the aggregation
//! functions that fold member states into a group state, the name-based
//! registry resolving persisted function specs, command routing towards
//! members, and membership traversal over backward edges.
//!
//! ## Architecture
//!
//! 1. **Functions ([`functions`]):** the [`GroupFunction`] trait, the
//!    built-in combinators (equality, and/or, arithmetic, count), and the
//!    [`FunctionRegistry`] mapping persisted names to constructors.
//! 2. **Membership ([`membership`]):** pure derivation of direct and
//!    transitive members from the items' backward edges.
//! 3. **Aggregation ([`aggregate`]):** recursive computed state and
//!    per-member command routing.

pub mod aggregate;
mod error;
pub mod functions;
pub mod membership;

pub use crate::aggregate::{compute_state, route_command};
pub use crate::error::{GroupError, GroupErrorExt};
pub use crate::functions::{FunctionRegistry, GroupFunction};
pub use crate::membership::{members_of, transitive_members_of};
