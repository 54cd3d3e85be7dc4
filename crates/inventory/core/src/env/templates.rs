use crate::types::{RepresentationKind, TemplateHandle};

/// Read-only access to item templates stored outside the core.
pub trait TemplateOracle: Send + Sync {
    fn template(&self, handle: TemplateHandle) -> Option<ItemTemplate>;
}

/// Immutable description of one item type.
///
/// # Design: Base + Kind Pattern
///
/// - Base struct holds the fields every template carries (display data,
///   trade value, representation kind)
/// - `kind` enum holds type-specific data (sword combat stats, etc.)
///
/// Templates are configuration: the core never mutates one and only reads
/// `representation` at spawn time. Everything else is carried for the
/// layers above.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemTemplate {
    pub handle: TemplateHandle,
    pub name: String,
    pub description: String,
    pub value: u32,
    pub kind: TemplateKind,
    /// World-representation class this template spawns, or `None` for
    /// purely logical items.
    pub representation: Option<RepresentationKind>,
}

impl ItemTemplate {
    pub fn new(
        handle: TemplateHandle,
        name: impl Into<String>,
        description: impl Into<String>,
        value: u32,
        kind: TemplateKind,
        representation: Option<RepresentationKind>,
    ) -> Self {
        Self {
            handle,
            name: name.into(),
            description: description.into(),
            value,
            kind,
            representation,
        }
    }
}

/// Template type with type-specific data.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TemplateKind {
    /// Melee weapon with combat stats.
    Sword(SwordData),

    /// Plain valuable with no behavior beyond its trade value.
    Valuable,

    /// Custom template type.
    Custom(u16),
}

/// Sword-specific data.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwordData {
    pub base_damage: u16,
    pub crit_chance: f32,
    pub crit_multiplier: f32,
    pub attack_speed: f32,
}
