// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene queries and item operations.
//!
//! Queries select items ([`RootQuery`] → [`QueryExpression`]); operations say
//! what to do with them ([`ItemOperationBuilder`] → [`ItemOperation`]). Both
//! are immutable values. [`compile_alteration`] turns query/operation pairs
//! into a `vantage_proto::SceneAlteration`.

use thiserror::Error;

mod compile;
mod expression;
mod operation;
mod query;

pub use compile::{
    compile_alteration, compile_operation, compile_operations, compile_query, SceneOperation,
};
pub use expression::{normalize, QueryExpression};
pub use operation::{Color, ColorMaterial, ItemOperation, ItemOperationBuilder, RepresentationId};
pub use query::{Combinator, ListQuery, QueryTerms, RootQuery, SingleQuery};

/// Errors raised while building or compiling queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Malformed operation or query input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
