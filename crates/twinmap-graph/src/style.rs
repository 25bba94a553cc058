//! Presentation policy for the graph view.
//!
//! Pure data tables mapping kinds to colors and stroke styles. These are
//! injected into the engine rather than baked into it, so a page can restyle
//! without touching layout or interaction logic.

use twinmap_core::{RelationKind, Strength, ThingKind};

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_tuple(&self) -> (u8, u8, u8, u8) {
        (self.r, self.g, self.b, self.a)
    }

    /// CSS hex form, `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Stroke style for a rendered edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeStyle {
    pub color: Color,
    pub width: f32,
    pub dashed: bool,
}

// Strong associations render red and solid, weak ones blue and dashed.
const COLOR_STRONG: Color = Color::rgb(0xe7, 0x4c, 0x3c);
const COLOR_WEAK: Color = Color::rgb(0x34, 0x98, 0xdb);
const COLOR_EDGE_FALLBACK: Color = Color::rgb(0x99, 0x99, 0x99);

const COLOR_PERSON: Color = Color::rgb(0xe7, 0x4c, 0x3c);
const COLOR_MACHINE: Color = Color::rgb(0xf3, 0x9c, 0x12);
const COLOR_OBJECT: Color = Color::rgb(0x9b, 0x59, 0xb6);
const COLOR_NODE_FALLBACK: Color = Color::rgb(0x95, 0xa5, 0xa6);

/// Injected style tables; `Default` carries the stock palette.
#[derive(Debug, Clone)]
pub struct StyleSheet {
    pub node_fallback: Color,
    pub edge_fallback: EdgeStyle,
    node_colors: Vec<(ThingKind, Color)>,
    edge_styles: Vec<(RelationKind, EdgeStyle)>,
}

impl Default for StyleSheet {
    fn default() -> Self {
        let node_colors = vec![
            (ThingKind::Person, COLOR_PERSON),
            (ThingKind::Machine, COLOR_MACHINE),
            (ThingKind::Object, COLOR_OBJECT),
        ];
        let edge_styles = RelationKind::ALL
            .iter()
            .map(|&kind| {
                let style = match kind.strength() {
                    Strength::Strong => EdgeStyle {
                        color: COLOR_STRONG,
                        width: 3.0,
                        dashed: false,
                    },
                    Strength::Weak => EdgeStyle {
                        color: COLOR_WEAK,
                        width: 1.0,
                        dashed: true,
                    },
                };
                (kind, style)
            })
            .collect();

        Self {
            node_fallback: COLOR_NODE_FALLBACK,
            edge_fallback: EdgeStyle {
                color: COLOR_EDGE_FALLBACK,
                width: 1.0,
                dashed: true,
            },
            node_colors,
            edge_styles,
        }
    }
}

impl StyleSheet {
    pub fn node_color(&self, kind: ThingKind) -> Color {
        self.node_colors
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, c)| *c)
            .unwrap_or(self.node_fallback)
    }

    pub fn edge_style(&self, kind: RelationKind) -> EdgeStyle {
        self.edge_styles
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, s)| *s)
            .unwrap_or(self.edge_fallback)
    }

    pub fn set_node_color(&mut self, kind: ThingKind, color: Color) {
        match self.node_colors.iter_mut().find(|(k, _)| *k == kind) {
            Some(entry) => entry.1 = color,
            None => self.node_colors.push((kind, color)),
        }
    }

    pub fn set_edge_style(&mut self, kind: RelationKind, style: EdgeStyle) {
        match self.edge_styles.iter_mut().find(|(k, _)| *k == kind) {
            Some(entry) => entry.1 = style,
            None => self.edge_styles.push((kind, style)),
        }
    }
}

/// Human-readable label for a relation kind, used by tooltips and details.
pub fn relation_label(kind: RelationKind) -> &'static str {
    match kind {
        RelationKind::Contains => "Contains",
        RelationKind::Composes => "Composes",
        RelationKind::Owns => "Owns",
        RelationKind::RelatesTo => "Relates to",
        RelationKind::DependsOn => "Depends on",
        RelationKind::Influences => "Influences",
        RelationKind::Collaborates => "Collaborates with",
        RelationKind::Unknown => "Related",
    }
}
