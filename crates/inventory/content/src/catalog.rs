//! Built-in template catalog.

use inventory_core::{
    ItemTemplate, RepresentationKind, SwordData, TemplateHandle, TemplateKind,
};

/// Template handles used by the built-in catalog.
pub const STEEL_SWORD: TemplateHandle = TemplateHandle(1);
pub const FIRE_SWORD: TemplateHandle = TemplateHandle(2);
pub const GOLD_COIN: TemplateHandle = TemplateHandle(3);

/// A small catalog covering both template shapes the core cares about:
/// templates with a world representation (swords) and purely logical ones
/// (coins).
pub fn default_catalog() -> Vec<ItemTemplate> {
    vec![
        ItemTemplate::new(
            STEEL_SWORD,
            "Steel Sword",
            "A dependable blade with no surprises.",
            120,
            TemplateKind::Sword(SwordData {
                base_damage: 12,
                crit_chance: 0.05,
                crit_multiplier: 1.5,
                attack_speed: 1.1,
            }),
            Some(RepresentationKind(1)),
        ),
        ItemTemplate::new(
            FIRE_SWORD,
            "Fire Sword",
            "Same steel, angrier edge.",
            480,
            TemplateKind::Sword(SwordData {
                base_damage: 18,
                crit_chance: 0.1,
                crit_multiplier: 2.0,
                attack_speed: 0.9,
            }),
            Some(RepresentationKind(1)),
        ),
        ItemTemplate::new(
            GOLD_COIN,
            "Gold Coin",
            "Has no business existing in the world on its own.",
            1,
            TemplateKind::Valuable,
            None,
        ),
    ]
}
