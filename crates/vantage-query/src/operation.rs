// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Item operations and their immutable builder.

use std::fmt;

use vantage_geom::DMat4;

use crate::QueryError;

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Color {
    /// Color from components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Material override applied by [`ItemOperation::ChangeMaterial`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorMaterial {
    /// 0 (transparent) to 255 (opaque).
    pub opacity: u8,
    /// Specular exponent, 0 to 128.
    pub glossiness: u8,
    /// Base color.
    pub diffuse: Color,
    /// Ambient color.
    pub ambient: Color,
    /// Highlight color.
    pub specular: Color,
    /// Self-illumination.
    pub emissive: Color,
}

impl Default for ColorMaterial {
    fn default() -> Self {
        Self {
            opacity: 255,
            glossiness: 10,
            diffuse: Color::new(0, 0, 0, 0),
            ambient: Color::new(0, 0, 0, 0),
            specular: Color::new(255, 255, 255, 0),
            emissive: Color::new(0, 0, 0, 0),
        }
    }
}

impl ColorMaterial {
    /// Default material with the given diffuse color.
    pub fn from_color(diffuse: Color) -> Self {
        Self {
            diffuse,
            ..Self::default()
        }
    }

    /// Parses `#rrggbb` (the `#` is optional) into a diffuse color.
    pub fn from_hex(hex: &str) -> Result<Self, QueryError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(QueryError::InvalidArgument(format!(
                "expected a #rrggbb color, got {hex:?}"
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|e| QueryError::InvalidArgument(e.to_string()))
        };
        Ok(Self::from_color(Color::new(channel(0)?, channel(2)?, channel(4)?, 0)))
    }

    /// Same material with a different opacity.
    pub fn with_opacity(self, opacity: u8) -> Self {
        Self { opacity, ..self }
    }
}

/// Representation shown by [`ItemOperation::ViewRepresentation`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RepresentationId {
    /// A specific representation.
    Id(String),
    /// Show nothing.
    Empty,
    /// The whole part.
    EntirePart,
}

/// One change applied to the items matched by a query.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOperation {
    /// Make visible.
    Show,
    /// Make invisible.
    Hide,
    /// Add to the selection.
    Select,
    /// Remove from the selection.
    Deselect,
    /// Override the material.
    ChangeMaterial(ColorMaterial),
    /// Drop material overrides.
    ClearMaterialOverride,
    /// Override the local transform with 16 row-major components.
    ///
    /// The length is checked when the operation is compiled.
    ChangeTransform(Vec<f64>),
    /// Drop transform overrides, optionally for descendants too.
    ClearTransform {
        /// Also clear descendants.
        cascade: bool,
    },
    /// Render as phantom (ghosted).
    ChangePhantom(bool),
    /// Drop phantom overrides.
    ClearPhantom,
    /// Treat as an end item.
    ChangeEndItem(bool),
    /// Drop end-item overrides.
    ClearEndItem,
    /// Show the rendition with this id.
    ViewRenditionById(String),
    /// Show the rendition with this supplied id.
    ViewRenditionBySuppliedId(String),
    /// Show the default rendition.
    ViewDefaultRendition,
    /// Drop rendition overrides.
    ClearRendition,
    /// Show a representation.
    ViewRepresentation(RepresentationId),
    /// Drop representation overrides.
    ClearRepresentation,
}

impl fmt::Display for ItemOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Show => "show",
            Self::Hide => "hide",
            Self::Select => "select",
            Self::Deselect => "deselect",
            Self::ChangeMaterial(_) => "change-material",
            Self::ClearMaterialOverride => "clear-override",
            Self::ChangeTransform(_) => "change-transform",
            Self::ClearTransform { .. } => "clear-transform",
            Self::ChangePhantom(_) => "change-phantom",
            Self::ClearPhantom => "clear-phantom",
            Self::ChangeEndItem(_) => "change-end-item",
            Self::ClearEndItem => "clear-end-item",
            Self::ViewRenditionById(_) => "view-rendition-by-id",
            Self::ViewRenditionBySuppliedId(_) => "view-rendition-by-supplied-id",
            Self::ViewDefaultRendition => "view-default-rendition",
            Self::ClearRendition => "clear-rendition",
            Self::ViewRepresentation(_) => "view-representation",
            Self::ClearRepresentation => "clear-representation",
        };
        f.write_str(name)
    }
}

/// Accumulates [`ItemOperation`]s.
///
/// Every method returns a new builder holding the previous operations plus
/// one more; the receiver is never modified, so a partially built chain can
/// be shared and extended in different directions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemOperationBuilder {
    operations: Vec<ItemOperation>,
}

impl ItemOperationBuilder {
    /// Empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// New builder with `operation` appended.
    pub fn push(&self, operation: ItemOperation) -> Self {
        let mut operations = Vec::with_capacity(self.operations.len() + 1);
        operations.extend_from_slice(&self.operations);
        operations.push(operation);
        Self { operations }
    }

    /// Makes matched items visible.
    pub fn show(&self) -> Self {
        self.push(ItemOperation::Show)
    }

    /// Hides matched items.
    pub fn hide(&self) -> Self {
        self.push(ItemOperation::Hide)
    }

    /// Adds matched items to the selection.
    pub fn select(&self) -> Self {
        self.push(ItemOperation::Select)
    }

    /// Removes matched items from the selection.
    pub fn deselect(&self) -> Self {
        self.push(ItemOperation::Deselect)
    }

    /// Overrides the material of matched items.
    pub fn material(&self, material: ColorMaterial) -> Self {
        self.push(ItemOperation::ChangeMaterial(material))
    }

    /// Restores the authored materials.
    pub fn clear_material_overrides(&self) -> Self {
        self.push(ItemOperation::ClearMaterialOverride)
    }

    /// Raw row-major components; must be 16 long to compile.
    pub fn transform(&self, components: impl Into<Vec<f64>>) -> Self {
        self.push(ItemOperation::ChangeTransform(components.into()))
    }

    /// Transform from a matrix (stored row-major).
    pub fn transform_matrix(&self, matrix: DMat4) -> Self {
        self.transform(matrix.transpose().to_cols_array().to_vec())
    }

    /// Drops transform overrides; `cascade` also clears descendants.
    pub fn clear_transforms(&self, cascade: bool) -> Self {
        self.push(ItemOperation::ClearTransform { cascade })
    }

    /// Marks matched items as phantom (ghosted) or solid.
    pub fn set_phantom(&self, phantom: bool) -> Self {
        self.push(ItemOperation::ChangePhantom(phantom))
    }

    /// Drops the phantom override.
    pub fn clear_phantom(&self) -> Self {
        self.push(ItemOperation::ClearPhantom)
    }

    /// Marks matched items as end items for picking and selection.
    pub fn set_end_item(&self, end_item: bool) -> Self {
        self.push(ItemOperation::ChangeEndItem(end_item))
    }

    /// Drops the end item override.
    pub fn clear_end_item(&self) -> Self {
        self.push(ItemOperation::ClearEndItem)
    }

    /// Shows the rendition with server id `id`.
    pub fn view_rendition_by_id(&self, id: impl Into<String>) -> Self {
        self.push(ItemOperation::ViewRenditionById(id.into()))
    }

    /// Shows the rendition with supplied id `id`.
    pub fn view_rendition_by_supplied_id(&self, id: impl Into<String>) -> Self {
        self.push(ItemOperation::ViewRenditionBySuppliedId(id.into()))
    }

    /// Shows the default rendition.
    pub fn view_default_rendition(&self) -> Self {
        self.push(ItemOperation::ViewDefaultRendition)
    }

    /// Drops the rendition override.
    pub fn clear_rendition(&self) -> Self {
        self.push(ItemOperation::ClearRendition)
    }

    /// Switches matched items to `representation`.
    pub fn view_representation(&self, representation: RepresentationId) -> Self {
        self.push(ItemOperation::ViewRepresentation(representation))
    }

    /// Drops the representation override.
    pub fn clear_representation(&self) -> Self {
        self.push(ItemOperation::ClearRepresentation)
    }

    /// Operations in insertion order.
    pub fn operations(&self) -> &[ItemOperation] {
        &self.operations
    }

    /// Consumes the builder.
    pub fn build(self) -> Vec<ItemOperation> {
        self.operations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parses_diffuse() {
        let m = ColorMaterial::from_hex("#ff8000").unwrap();
        assert_eq!(m.diffuse, Color::new(255, 128, 0, 0));
        assert_eq!(m.opacity, 255);
        assert_eq!(ColorMaterial::from_hex("00ff00").unwrap().diffuse.g, 255);
    }

    #[test]
    fn bad_hex_is_invalid_argument() {
        for bad in ["", "#fff", "#gg0000", "#ff00000", "#ff00é"] {
            assert!(
                matches!(ColorMaterial::from_hex(bad), Err(QueryError::InvalidArgument(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn builder_is_persistent() {
        let base = ItemOperationBuilder::new().select();
        let a = base.hide();
        let b = base.hide();
        assert_eq!(base.operations(), &[ItemOperation::Select]);
        assert_eq!(a, b);
        assert_eq!(a.operations(), &[ItemOperation::Select, ItemOperation::Hide]);
    }

    #[test]
    fn matrix_is_stored_row_major() {
        let m = DMat4::from_translation(vantage_geom::DVec3::new(1.0, 2.0, 3.0));
        let ops = ItemOperationBuilder::new().transform_matrix(m).build();
        let ItemOperation::ChangeTransform(components) = &ops[0] else {
            panic!("expected a transform");
        };
        assert_eq!(components[3], 1.0);
        assert_eq!(components[7], 2.0);
        assert_eq!(components[11], 3.0);
    }
}
