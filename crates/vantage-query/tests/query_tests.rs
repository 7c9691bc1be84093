// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(clippy::unwrap_used)]
//! Query builders, normalization and alteration compilation.

use proptest::prelude::*;
use vantage_geom::{DVec2, Rectangle};
use vantage_proto as proto;
use vantage_query::{
    compile_alteration, compile_operation, ColorMaterial, ItemOperation, ItemOperationBuilder,
    QueryError, QueryExpression, QueryTerms, RepresentationId, RootQuery, SceneOperation,
};

#[test]
fn double_negation_collapses_at_build() {
    let plain = RootQuery::new().with_supplied_id("x").build();
    let twice = RootQuery::new().not().not().with_supplied_id("x").build();
    let thrice = RootQuery::new().not().not().not().with_supplied_id("x").build();
    assert_eq!(twice, plain);
    assert_eq!(thrice, QueryExpression::Not(Box::new(plain)));
}

#[test]
fn long_not_chains_leave_a_single_wrapper() {
    let root = (0..100_001).fold(RootQuery::new(), |q, _| q.not());
    let built = root.with_item_id("a").build();
    assert_eq!(
        built,
        QueryExpression::Not(Box::new(QueryExpression::ItemId("a".into())))
    );
    let even = root.not().with_item_id("a").or().with_visible().build();
    assert!(!even.is_negated());
}

#[test]
fn hide_twice_yields_independent_builders() {
    let base = ItemOperationBuilder::new();
    let first = base.hide();
    let second = base.hide();
    assert!(base.operations().is_empty());
    assert_eq!(first.operations(), &[ItemOperation::Hide]);
    assert_eq!(second.operations(), &[ItemOperation::Hide]);
    let extended = first.show();
    assert_eq!(first.operations().len(), 1);
    assert_eq!(extended.operations().len(), 2);
}

#[test]
fn with_item_ids_is_a_union() {
    assert_eq!(
        RootQuery::new().with_item_ids(["a", "b"]).build(),
        QueryExpression::Or(vec![
            QueryExpression::ItemId("a".into()),
            QueryExpression::ItemId("b".into()),
        ])
    );
}

#[test]
fn alteration_preserves_operation_order() {
    let ops = ItemOperationBuilder::new()
        .material(ColorMaterial::from_hex("#112233").unwrap())
        .set_phantom(true)
        .view_representation(RepresentationId::EntirePart)
        .clear_transforms(true)
        .build();
    let query = RootQuery::new()
        .with_point(DVec2::new(4.0, 5.0))
        .or()
        .with_volume_intersection(Rectangle::new(0.0, 0.0, 10.0, 10.0), false)
        .build();
    let alteration =
        compile_alteration("view", &[SceneOperation::new(query, ops)], Some("alter-1".into()))
            .unwrap();
    assert_eq!(alteration.scene_view_id, "view");
    let types = &alteration.operations[0].operation_types;
    assert!(matches!(types[0], proto::OperationType::ChangeMaterial { .. }));
    assert_eq!(types[1], proto::OperationType::ChangePhantom { phantom: true });
    assert_eq!(
        types[2],
        proto::OperationType::ViewRepresentation {
            representation: proto::RepresentationSelector::EntirePart
        }
    );
    assert_eq!(types[3], proto::OperationType::ClearTransform { cascade: true });
    let proto::QueryExpression::Or(terms) = &alteration.operations[0].query else {
        panic!("expected a union");
    };
    assert_eq!(
        terms[0],
        proto::QueryExpression::Operand(proto::Operand::Point {
            point: proto::Vector2 { x: 4.0, y: 5.0 }
        })
    );
}

#[test]
fn transform_must_have_sixteen_components() {
    let short = ItemOperationBuilder::new().transform(vec![1.0; 15]).build();
    assert!(matches!(
        compile_operation(&short[0]),
        Err(QueryError::InvalidArgument(_))
    ));
    let identity: Vec<f64> = (0..16).map(|i| if i % 5 == 0 { 1.0 } else { 0.0 }).collect();
    let ok = ItemOperationBuilder::new().transform(identity).build();
    assert!(compile_operation(&ok[0]).is_ok());
}

#[test]
fn reversed_tree_range_rejected() {
    let query = RootQuery::new().with_scene_tree_range(9, 2).build();
    let err = compile_alteration("v", &[SceneOperation::new(query, vec![])], None).unwrap_err();
    assert!(matches!(err, QueryError::InvalidArgument(_)));
}

proptest! {
    #[test]
    fn inversion_count_parity_decides_wrapper(n in 0u32..12) {
        let root = (0..n).fold(RootQuery::new(), |q, _| q.not());
        let built = root.with_visible().and().with_selected().build();
        prop_assert_eq!(built.is_negated(), n % 2 == 1);
    }
}
