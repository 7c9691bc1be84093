// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Query/operation pairs → wire schema.

use vantage_proto as proto;

use crate::{ColorMaterial, ItemOperation, QueryError, QueryExpression, RepresentationId};

/// Operations applied, in order, to the items a query selects.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneOperation {
    /// Target items.
    pub query: QueryExpression,
    /// Applied in list order.
    pub operations: Vec<ItemOperation>,
}

impl SceneOperation {
    /// Pairs a query with its operations.
    pub fn new(query: QueryExpression, operations: Vec<ItemOperation>) -> Self {
        Self { query, operations }
    }
}

/// Compiles every pair, preserving order.
pub fn compile_operations(
    operations: &[SceneOperation],
) -> Result<Vec<proto::ItemOperations>, QueryError> {
    operations
        .iter()
        .map(|op| {
            Ok(proto::ItemOperations {
                query: compile_query(&op.query)?,
                operation_types: op
                    .operations
                    .iter()
                    .map(compile_operation)
                    .collect::<Result<_, _>>()?,
            })
        })
        .collect()
}

/// Builds a complete scene alteration request.
pub fn compile_alteration(
    scene_view_id: impl Into<String>,
    operations: &[SceneOperation],
    supplied_correlation_id: Option<String>,
) -> Result<proto::SceneAlteration, QueryError> {
    Ok(proto::SceneAlteration {
        scene_view_id: scene_view_id.into(),
        operations: compile_operations(operations)?,
        supplied_correlation_id,
    })
}

/// Compiles one expression.
pub fn compile_query(expression: &QueryExpression) -> Result<proto::QueryExpression, QueryError> {
    use proto::{ItemSelector, Operand, QueryExpression as Wire};

    let operand = |o: Operand| -> Result<Wire, QueryError> { Ok(Wire::Operand(o)) };
    match expression {
        QueryExpression::All => operand(Operand::Root),
        QueryExpression::ItemId(id) => operand(Operand::Item {
            selector: ItemSelector::Id(id.clone()),
        }),
        QueryExpression::SuppliedId(id) => operand(Operand::Item {
            selector: ItemSelector::SuppliedId(id.clone()),
        }),
        QueryExpression::And(terms) => Ok(Wire::And(compile_terms(terms)?)),
        QueryExpression::Or(terms) => Ok(Wire::Or(compile_terms(terms)?)),
        QueryExpression::Not(inner) => Ok(Wire::Not(Box::new(compile_query(inner)?))),
        QueryExpression::SceneTreeRange { start, end } => {
            if start > end {
                return Err(QueryError::InvalidArgument(format!(
                    "scene tree range {start}..={end} is reversed"
                )));
            }
            operand(Operand::SceneTreeRange {
                start: *start,
                end: *end,
            })
        }
        QueryExpression::Metadata {
            filter,
            keys,
            exact_match,
        } => operand(Operand::Metadata {
            filter: filter.clone(),
            keys: keys.clone(),
            exact_match: *exact_match,
        }),
        QueryExpression::AllSelected => operand(Operand::Selected),
        QueryExpression::AllVisible => operand(Operand::Visibility { visible: true }),
        QueryExpression::AllHidden => operand(Operand::Visibility { visible: false }),
        QueryExpression::Point(p) => operand(Operand::Point {
            point: proto::Vector2 { x: p.x, y: p.y },
        }),
        QueryExpression::VolumeIntersection {
            rectangle,
            exclusive,
        } => operand(Operand::Volume {
            rectangle: proto::Rect {
                x: rectangle.x,
                y: rectangle.y,
                width: rectangle.width,
                height: rectangle.height,
            },
            exclusive: *exclusive,
        }),
    }
}

fn compile_terms(terms: &[QueryExpression]) -> Result<Vec<proto::QueryExpression>, QueryError> {
    terms.iter().map(compile_query).collect()
}

fn compile_color(c: crate::Color) -> proto::Rgba {
    proto::Rgba {
        r: c.r,
        g: c.g,
        b: c.b,
        a: c.a,
    }
}

fn compile_material(m: &ColorMaterial) -> proto::Material {
    proto::Material {
        opacity: m.opacity,
        glossiness: m.glossiness,
        diffuse: compile_color(m.diffuse),
        ambient: compile_color(m.ambient),
        specular: compile_color(m.specular),
        emissive: compile_color(m.emissive),
    }
}

/// Compiles one operation.
///
/// # Errors
/// [`QueryError::InvalidArgument`] when a transform does not have exactly 16
/// components.
pub fn compile_operation(operation: &ItemOperation) -> Result<proto::OperationType, QueryError> {
    use proto::OperationType as Op;

    Ok(match operation {
        ItemOperation::Show => Op::ChangeVisibility { visible: true },
        ItemOperation::Hide => Op::ChangeVisibility { visible: false },
        ItemOperation::Select => Op::ChangeSelection { selected: true },
        ItemOperation::Deselect => Op::ChangeSelection { selected: false },
        ItemOperation::ChangeMaterial(m) => Op::ChangeMaterial {
            material: compile_material(m),
        },
        ItemOperation::ClearMaterialOverride => Op::ClearMaterial,
        ItemOperation::ChangeTransform(components) => {
            let components: [f64; 16] = components.as_slice().try_into().map_err(|_| {
                QueryError::InvalidArgument(format!(
                    "transform needs 16 components, got {}",
                    components.len()
                ))
            })?;
            Op::ChangeTransform {
                transform: proto::Matrix4 { components },
            }
        }
        ItemOperation::ClearTransform { cascade } => Op::ClearTransform { cascade: *cascade },
        ItemOperation::ChangePhantom(phantom) => Op::ChangePhantom { phantom: *phantom },
        ItemOperation::ClearPhantom => Op::ClearPhantom,
        ItemOperation::ChangeEndItem(end_item) => Op::ChangeEndItem {
            end_item: *end_item,
        },
        ItemOperation::ClearEndItem => Op::ClearEndItem,
        ItemOperation::ViewRenditionById(id) => Op::ViewRendition {
            selector: proto::ItemSelector::Id(id.clone()),
        },
        ItemOperation::ViewRenditionBySuppliedId(id) => Op::ViewRendition {
            selector: proto::ItemSelector::SuppliedId(id.clone()),
        },
        ItemOperation::ViewDefaultRendition => Op::ViewDefaultRendition,
        ItemOperation::ClearRendition => Op::ClearRendition,
        ItemOperation::ViewRepresentation(r) => Op::ViewRepresentation {
            representation: match r {
                RepresentationId::Id(id) => proto::RepresentationSelector::Id(id.clone()),
                RepresentationId::Empty => proto::RepresentationSelector::Empty,
                RepresentationId::EntirePart => proto::RepresentationSelector::EntirePart,
            },
        },
        ItemOperation::ClearRepresentation => Op::ClearRepresentation,
    })
}
