// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Immutable query builders.
//!
//! ```
//! use vantage_query::{QueryExpression, QueryTerms, RootQuery};
//!
//! let hidden_or_bolts = RootQuery::new()
//!     .with_hidden()
//!     .or()
//!     .with_metadata("bolt", ["PART_TYPE"], false)
//!     .build();
//! assert!(matches!(hidden_or_bolts, QueryExpression::Or(ref terms) if terms.len() == 2));
//! ```

use vantage_geom::{DVec2, Rectangle};

use crate::expression::{normalize, QueryExpression};

/// Terminal constructors shared by every query builder.
///
/// Each method leaves the receiver untouched and returns a new builder.
pub trait QueryTerms {
    /// Builder produced by adding a term.
    type Output;

    /// Adds an arbitrary term.
    fn with_term(&self, term: QueryExpression) -> Self::Output;

    /// Every item.
    fn all(&self) -> Self::Output {
        self.with_term(QueryExpression::All)
    }

    /// Item by server id.
    fn with_item_id(&self, id: impl Into<String>) -> Self::Output {
        self.with_term(QueryExpression::ItemId(id.into()))
    }

    /// Item by supplied id.
    fn with_supplied_id(&self, id: impl Into<String>) -> Self::Output {
        self.with_term(QueryExpression::SuppliedId(id.into()))
    }

    /// Any of several server ids.
    fn with_item_ids<I, S>(&self, ids: I) -> Self::Output
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_term(QueryExpression::Or(
            ids.into_iter()
                .map(|id| QueryExpression::ItemId(id.into()))
                .collect(),
        ))
    }

    /// Any of several supplied ids.
    fn with_supplied_ids<I, S>(&self, ids: I) -> Self::Output
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_term(QueryExpression::Or(
            ids.into_iter()
                .map(|id| QueryExpression::SuppliedId(id.into()))
                .collect(),
        ))
    }

    /// Scene tree rows `start..=end`.
    fn with_scene_tree_range(&self, start: u32, end: u32) -> Self::Output {
        self.with_term(QueryExpression::SceneTreeRange { start, end })
    }

    /// Metadata filter.
    fn with_metadata<K, S>(&self, filter: impl Into<String>, keys: K, exact_match: bool) -> Self::Output
    where
        K: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_term(QueryExpression::Metadata {
            filter: filter.into(),
            keys: keys.into_iter().map(Into::into).collect(),
            exact_match,
        })
    }

    /// Selected items.
    fn with_selected(&self) -> Self::Output {
        self.with_term(QueryExpression::AllSelected)
    }

    /// Visible items.
    fn with_visible(&self) -> Self::Output {
        self.with_term(QueryExpression::AllVisible)
    }

    /// Hidden items.
    fn with_hidden(&self) -> Self::Output {
        self.with_term(QueryExpression::AllHidden)
    }

    /// Item under a frame point.
    fn with_point(&self, point: DVec2) -> Self::Output {
        self.with_term(QueryExpression::Point(point))
    }

    /// Items inside the frustum through `rectangle`.
    fn with_volume_intersection(&self, rectangle: Rectangle, exclusive: bool) -> Self::Output {
        self.with_term(QueryExpression::VolumeIntersection {
            rectangle,
            exclusive,
        })
    }
}

fn resolve(expression: QueryExpression, inverted: bool) -> QueryExpression {
    match (inverted, normalize(expression)) {
        (true, QueryExpression::Not(inner)) => *inner,
        (true, expression) => expression.negate(),
        (false, expression) => expression,
    }
}

/// Entry point for building a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RootQuery {
    inverted: bool,
}

impl RootQuery {
    /// Un-inverted root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inverts the query built from this root.
    ///
    /// Each call toggles the inversion flag, which [`SingleQuery::build`]
    /// and [`ListQuery::build`] apply.
    pub fn not(&self) -> Self {
        Self {
            inverted: !self.inverted,
        }
    }
}

impl QueryTerms for RootQuery {
    type Output = SingleQuery;

    fn with_term(&self, term: QueryExpression) -> SingleQuery {
        SingleQuery {
            term,
            inverted: self.inverted,
        }
    }
}

/// A query with exactly one term.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleQuery {
    term: QueryExpression,
    inverted: bool,
}

impl SingleQuery {
    /// Continues as an intersection.
    pub fn and(&self) -> ListQuery {
        ListQuery::start(Combinator::And, self.term.clone(), self.inverted)
    }

    /// Continues as a union.
    pub fn or(&self) -> ListQuery {
        ListQuery::start(Combinator::Or, self.term.clone(), self.inverted)
    }

    /// Final, normalized expression.
    pub fn build(&self) -> QueryExpression {
        resolve(self.term.clone(), self.inverted)
    }
}

/// Boolean combinator of a [`ListQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Intersection.
    And,
    /// Union.
    Or,
}

/// A query accumulating terms under one combinator.
///
/// Switching combinators (`a.and().b().or().c()`) groups left to right:
/// `(a ∧ b) ∨ c`.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    combinator: Combinator,
    terms: Vec<QueryExpression>,
    inverted: bool,
}

impl ListQuery {
    fn start(combinator: Combinator, first: QueryExpression, inverted: bool) -> Self {
        Self {
            combinator,
            terms: vec![first],
            inverted,
        }
    }

    fn combined(&self) -> QueryExpression {
        match self.combinator {
            Combinator::And => QueryExpression::And(self.terms.clone()),
            Combinator::Or => QueryExpression::Or(self.terms.clone()),
        }
    }

    fn switch(&self, combinator: Combinator) -> Self {
        if self.combinator == combinator {
            self.clone()
        } else {
            Self::start(combinator, self.combined(), self.inverted)
        }
    }

    /// Continues as an intersection.
    pub fn and(&self) -> Self {
        self.switch(Combinator::And)
    }

    /// Continues as a union.
    pub fn or(&self) -> Self {
        self.switch(Combinator::Or)
    }

    /// Current combinator.
    pub fn combinator(&self) -> Combinator {
        self.combinator
    }

    /// Terms so far.
    pub fn terms(&self) -> &[QueryExpression] {
        &self.terms
    }

    /// Final, normalized expression.
    pub fn build(&self) -> QueryExpression {
        resolve(self.combined(), self.inverted)
    }
}

impl QueryTerms for ListQuery {
    type Output = Self;

    fn with_term(&self, term: QueryExpression) -> Self {
        let mut terms = self.terms.clone();
        terms.push(term);
        Self {
            combinator: self.combinator,
            terms,
            inverted: self.inverted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combinator_does_not_mutate_receiver() {
        let base = RootQuery::new().with_item_id("a").and();
        let with_b = base.with_item_id("b");
        let with_c = base.with_item_id("c");
        assert_eq!(base.terms().len(), 1);
        assert_eq!(with_b.terms()[1], QueryExpression::ItemId("b".into()));
        assert_eq!(with_c.terms()[1], QueryExpression::ItemId("c".into()));
    }

    #[test]
    fn switching_combinator_groups_left_to_right() {
        let q = RootQuery::new()
            .with_item_id("a")
            .and()
            .with_item_id("b")
            .or()
            .with_visible()
            .build();
        assert_eq!(
            q,
            QueryExpression::Or(vec![
                QueryExpression::And(vec![
                    QueryExpression::ItemId("a".into()),
                    QueryExpression::ItemId("b".into()),
                ]),
                QueryExpression::AllVisible,
            ])
        );
    }

    #[test]
    fn inversion_applies_to_whole_list() {
        let q = RootQuery::new().not().with_selected().or().with_hidden().build();
        assert_eq!(
            q,
            QueryExpression::Or(vec![QueryExpression::AllSelected, QueryExpression::AllHidden]).negate()
        );
    }
}
