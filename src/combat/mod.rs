pub mod combatant;
pub mod dice;
pub mod events;
pub mod resolver;
pub mod rng;

pub use combatant::{
    attribute_modifier, AttackDefinition, AttackKind, Attributes, Combatant, DamageAffinity,
    DamageType, SkillDefinition, Team,
};
pub use dice::{DiceExpr, DiceParseError};
pub use events::{narrate, serialize_events_json, CombatEvent, TraceCollector, TraceMode};
pub use resolver::{resolve, resolve_rolled, AttackOutcome};
pub use rng::Rng;
