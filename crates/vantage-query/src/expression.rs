// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Query expression tree and its normal form.

use vantage_geom::{DVec2, Rectangle};

/// Selects scene items.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryExpression {
    /// Every item.
    All,
    /// Item by server id.
    ItemId(String),
    /// Item by caller-supplied id.
    SuppliedId(String),
    /// Items matched by every child.
    And(Vec<QueryExpression>),
    /// Items matched by any child.
    Or(Vec<QueryExpression>),
    /// Items not matched by the child.
    Not(Box<QueryExpression>),
    /// Scene tree rows `start..=end`.
    SceneTreeRange {
        /// First row.
        start: u32,
        /// Last row.
        end: u32,
    },
    /// Items whose metadata under `keys` matches `filter`.
    Metadata {
        /// Value to match.
        filter: String,
        /// Keys to search.
        keys: Vec<String>,
        /// Whole-value match instead of substring.
        exact_match: bool,
    },
    /// Selected items.
    AllSelected,
    /// Visible items.
    AllVisible,
    /// Hidden items.
    AllHidden,
    /// Item under a frame point.
    Point(DVec2),
    /// Items inside the frustum through a frame rectangle.
    VolumeIntersection {
        /// Frame-space rectangle.
        rectangle: Rectangle,
        /// Only items wholly inside.
        exclusive: bool,
    },
}

impl QueryExpression {
    /// Complement of `self`.
    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// `true` if the root is a `Not`.
    pub fn is_negated(&self) -> bool {
        matches!(self, Self::Not(_))
    }
}

/// Rewrites `expression` so no `Not` directly wraps another `Not`.
///
/// Runs of consecutive negations collapse by parity: an even run vanishes,
/// an odd run leaves exactly one `Not`. Children of `And`/`Or` are normalized
/// recursively; order is preserved.
#[must_use]
pub fn normalize(expression: QueryExpression) -> QueryExpression {
    match expression {
        QueryExpression::Not(inner) => match *inner {
            QueryExpression::Not(twice) => normalize(*twice),
            other => normalize(other).negate(),
        },
        QueryExpression::And(terms) => {
            QueryExpression::And(terms.into_iter().map(normalize).collect())
        }
        QueryExpression::Or(terms) => QueryExpression::Or(terms.into_iter().map(normalize).collect()),
        leaf => leaf,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> QueryExpression {
        QueryExpression::SuppliedId(s.into())
    }

    fn wrap(expr: QueryExpression, times: usize) -> QueryExpression {
        (0..times).fold(expr, |e, _| e.negate())
    }

    #[test]
    fn negation_runs_collapse_by_parity() {
        for n in 0..7 {
            let normalized = normalize(wrap(id("a"), n));
            if n % 2 == 0 {
                assert_eq!(normalized, id("a"));
            } else {
                assert_eq!(normalized, id("a").negate());
            }
        }
    }

    #[test]
    fn normalizes_inside_combinators() {
        let expr = QueryExpression::Or(vec![wrap(id("a"), 2), wrap(QueryExpression::And(vec![wrap(id("b"), 3)]), 4)]);
        assert_eq!(
            normalize(expr),
            QueryExpression::Or(vec![id("a"), QueryExpression::And(vec![id("b").negate()])])
        );
    }

    #[test]
    fn normalizing_twice_changes_nothing() {
        let expr = wrap(QueryExpression::And(vec![wrap(id("x"), 5), QueryExpression::AllHidden]), 3);
        let once = normalize(expr);
        assert_eq!(normalize(once.clone()), once);
    }
}
