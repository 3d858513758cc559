//! Status effect durations and periodic burn damage.

use hecs::{Entity, World};

use crate::components::{EffectKind, Health, StatusEffects};
use crate::constants::{BURN_DAMAGE, BURN_DAMAGE_INTERVAL_TICKS};
use crate::events::{EventQueue, GameEvent};

/// Tick every status effect: apply periodic burn damage, count durations
/// down, drop expired effects.
pub fn tick_status_effects(world: &mut World, events: &mut EventQueue) {
    puffin::profile_function!();

    let mut burns: Vec<Entity> = Vec::new();
    for (entity, effects) in world.query::<&mut StatusEffects>().iter() {
        for effect in &mut effects.active {
            if effect.kind == EffectKind::Burning
                && effect.ticks_left % BURN_DAMAGE_INTERVAL_TICKS == 0
            {
                burns.push(entity);
            }
            effect.ticks_left = effect.ticks_left.saturating_sub(1);
        }
        effects.active.retain(|effect| effect.ticks_left > 0);
    }

    for entity in burns {
        let Ok(mut health) = world.get::<&mut Health>(entity) else {
            continue;
        };
        health.damage(BURN_DAMAGE);
        let (current, max) = (health.current, health.max);
        drop(health);
        events.push(GameEvent::EntityHurt { entity, attacker: None, damage: BURN_DAMAGE });
        events.push(GameEvent::HealthChanged { entity, current, max });
    }
}
