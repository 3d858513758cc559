//! Game event system for decoupled communication with the embedding layers.
//!
//! Simulation systems emit events during a tick; the inventory/audio/UI
//! layers drain them afterwards. Listeners must not re-enter the simulation
//! from within event handling.

use glam::Vec2;
use hecs::Entity;

use crate::behavior::BehaviorId;
use crate::components::EntityKind;

/// Events the simulation core emits during a tick.
#[derive(Debug, Clone)]
pub enum GameEvent {
    /// An entity's health dropped to zero and it was removed.
    EntityDied {
        entity: Entity,
        kind: EntityKind,
        position: Vec2,
    },
    /// An entity took damage.
    EntityHurt {
        entity: Entity,
        attacker: Option<Entity>,
        damage: i32,
    },
    /// An entity's health changed (damage or healing).
    HealthChanged {
        entity: Entity,
        current: i32,
        max: i32,
    },
    /// Kill signal to the attacker: its attack reduced the victim to zero.
    EntityKilled {
        attacker: Entity,
        victim: Entity,
    },
    /// Boundary event to the item layer: the entity's stacks should change
    /// (fired on death so owned items can be dropped).
    InventoryChanged {
        entity: Entity,
        kind: EntityKind,
        position: Vec2,
    },
    /// Two entities started overlapping this tick.
    CollisionStarted {
        entity: Entity,
        other: Entity,
    },
    /// Two entities overlapped last tick and still do.
    CollisionOngoing {
        entity: Entity,
        other: Entity,
    },
    /// Two entities stopped overlapping this tick.
    CollisionEnded {
        entity: Entity,
        other: Entity,
    },
    /// An AI entity switched behavior state.
    BehaviorChanged {
        entity: Entity,
        from: BehaviorId,
        to: BehaviorId,
    },
}

/// Simple event queue - events are pushed during the tick, drained after.
#[derive(Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
