//! Equipment catalog for matchup variations. Items stack onto a spawned
//! combatant: weapons take over as the preferred attack, armor trades speed
//! for mitigation, trinkets tweak a single derived stat.

use serde::Serialize;

use crate::combat::{AttackDefinition, AttackKind, Combatant, DamageType, DiceExpr};
use crate::data::{normalize_lookup, LookupError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Weapon,
    Armor,
    Trinket,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDefinition {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack: Option<AttackDefinition>,
    pub armor_bonus: i32,
    pub evasion_bonus: i32,
    /// Negative for heavy gear.
    pub speed_bonus: i32,
}

impl ItemDefinition {
    /// Apply this item to a combatant. Weapons go to the front of the attack
    /// list so [Combatant::attack_in_range] prefers them; natural attacks
    /// remain as fallbacks.
    pub fn equip(&self, combatant: &mut Combatant) {
        if let Some(attack) = &self.attack {
            combatant.attacks.insert(0, attack.clone());
        }
        combatant.armor += self.armor_bonus;
        combatant.evasion += self.evasion_bonus;
        combatant.speed += self.speed_bonus;
    }
}

struct ItemSpec {
    id: &'static str,
    name: &'static str,
    kind: ItemKind,
    attack: Option<(&'static str, (u32, u32, i32), DamageType, AttackKind, i32)>,
    armor_bonus: i32,
    evasion_bonus: i32,
    speed_bonus: i32,
}

const ITEMS: &[ItemSpec] = &[
    ItemSpec {
        id: "sword",
        name: "sword",
        kind: ItemKind::Weapon,
        attack: Some(("sword", (1, 8, 0), DamageType::Physical, AttackKind::Melee, 1)),
        armor_bonus: 0,
        evasion_bonus: 0,
        speed_bonus: 0,
    },
    ItemSpec {
        id: "flame_brand",
        name: "flame brand",
        kind: ItemKind::Weapon,
        attack: Some(("flame brand", (1, 8, 1), DamageType::Fire, AttackKind::Melee, 1)),
        armor_bonus: 0,
        evasion_bonus: 0,
        speed_bonus: 0,
    },
    ItemSpec {
        id: "shortbow",
        name: "shortbow",
        kind: ItemKind::Weapon,
        attack: Some(("shortbow", (1, 6, 0), DamageType::Physical, AttackKind::Ranged, 6)),
        armor_bonus: 0,
        evasion_bonus: 0,
        speed_bonus: 0,
    },
    ItemSpec {
        id: "longbow",
        name: "longbow",
        kind: ItemKind::Weapon,
        attack: Some(("longbow", (1, 8, 0), DamageType::Physical, AttackKind::Ranged, 8)),
        armor_bonus: 0,
        evasion_bonus: 0,
        speed_bonus: 0,
    },
    ItemSpec {
        id: "leather_armor",
        name: "leather armor",
        kind: ItemKind::Armor,
        attack: None,
        armor_bonus: 1,
        evasion_bonus: 0,
        speed_bonus: 0,
    },
    ItemSpec {
        id: "chain_mail",
        name: "chain mail",
        kind: ItemKind::Armor,
        attack: None,
        armor_bonus: 3,
        evasion_bonus: 0,
        speed_bonus: -1,
    },
    ItemSpec {
        id: "plate_armor",
        name: "plate armor",
        kind: ItemKind::Armor,
        attack: None,
        armor_bonus: 5,
        evasion_bonus: 0,
        speed_bonus: -3,
    },
    ItemSpec {
        id: "cloak_of_shadows",
        name: "cloak of shadows",
        kind: ItemKind::Trinket,
        attack: None,
        armor_bonus: 0,
        evasion_bonus: 2,
        speed_bonus: 0,
    },
    ItemSpec {
        id: "swift_boots",
        name: "swift boots",
        kind: ItemKind::Trinket,
        attack: None,
        armor_bonus: 0,
        evasion_bonus: 0,
        speed_bonus: 2,
    },
];

fn build(spec: &ItemSpec) -> ItemDefinition {
    ItemDefinition {
        id: spec.id.to_string(),
        name: spec.name.to_string(),
        kind: spec.kind,
        attack: spec.attack.map(
            |(name, (count, sides, modifier), damage_type, kind, range)| AttackDefinition {
                name: name.to_string(),
                damage: DiceExpr::new(count, sides, modifier),
                damage_type,
                kind,
                range,
            },
        ),
        armor_bonus: spec.armor_bonus,
        evasion_bonus: spec.evasion_bonus,
        speed_bonus: spec.speed_bonus,
    }
}

/// Every built-in item, in catalog order (weapons, armor, trinkets).
pub fn armory() -> Vec<ItemDefinition> {
    ITEMS.iter().map(build).collect()
}

pub fn resolve_item(name_or_id: &str) -> Result<ItemDefinition, LookupError> {
    let normalized = normalize_lookup(name_or_id);
    ITEMS
        .iter()
        .find(|spec| {
            normalize_lookup(spec.id) == normalized || normalize_lookup(spec.name) == normalized
        })
        .map(build)
        .ok_or_else(|| LookupError::ItemNotFound(name_or_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Team;
    use crate::data::resolve_creature;

    #[test]
    fn weapons_become_the_preferred_attack() {
        let mut orc = resolve_creature("orc").unwrap().spawn(Team::A);
        let natural_attacks = orc.attacks.len();
        resolve_item("flame_brand").unwrap().equip(&mut orc);
        assert_eq!(orc.attacks.len(), natural_attacks + 1);
        assert_eq!(orc.attacks[0].name, "flame brand");
        assert_eq!(orc.attack_in_range(1).map(|a| a.name.as_str()), Some("flame brand"));
    }

    #[test]
    fn heavy_armor_trades_speed_for_mitigation() {
        let mut goblin = resolve_creature("goblin").unwrap().spawn(Team::A);
        let (armor, speed) = (goblin.armor, goblin.speed);
        resolve_item("plate_armor").unwrap().equip(&mut goblin);
        assert_eq!(goblin.armor, armor + 5);
        assert_eq!(goblin.speed, speed - 3);
    }

    #[test]
    fn unknown_item_is_a_typed_error() {
        assert_eq!(
            resolve_item("vorpal blade"),
            Err(LookupError::ItemNotFound("vorpal blade".to_string()))
        );
    }

    #[test]
    fn every_item_resolves_by_id_and_name() {
        for item in armory() {
            assert!(resolve_item(&item.id).is_ok());
            assert!(resolve_item(&item.name).is_ok());
        }
    }
}
