//! AI behavior state machine data.
//!
//! A `Brain` holds a registry of named behavior states plus the switch rules
//! that move between them. Behaviors are plain structs dispatched through
//! the `Behavior` enum; switch conditions are data, evaluated by the AI
//! system with explicit world context. The registry is immutable after
//! entity construction - only the active state changes at runtime.

use std::collections::HashMap;

use glam::Vec2;
use hecs::Entity;

use crate::components::EntityKind;
use crate::tile::Biome;

/// Names of the registered behavior states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BehaviorId {
    Wander,
    Follow,
    Scripted,
}

/// A transition out of (or into) a behavior state.
#[derive(Debug, Clone)]
pub struct SwitchRule {
    pub condition: SwitchCondition,
    pub to: BehaviorId,
}

/// Switch predicates, evaluated against explicit world context.
#[derive(Debug, Clone)]
pub enum SwitchCondition {
    /// Any living entity of one of these kinds is within the radius.
    HostileWithin { radius: f32, kinds: Vec<EntityKind> },
    /// No living entity of these kinds remains within the radius.
    NoHostileWithin { radius: f32, kinds: Vec<EntityKind> },
    /// The entity's own health fraction dropped below the threshold.
    HealthBelow { fraction: f32 },
    /// The scripted behavior ran its script to completion.
    ScriptFinished,
}

/// How follow candidates are ranked after kind filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetPriority {
    Nearest,
    Weakest,
}

/// Periodically picks a destination biased toward preferred biomes and
/// walks there.
#[derive(Debug, Clone)]
pub struct WanderBehavior {
    /// Bernoulli trials per second for picking a new destination while idle.
    pub rate_per_sec: f32,
    /// Half-side of the candidate tile square, in tiles.
    pub search_radius: i32,
    pub preferred_biomes: Vec<Biome>,
    pub acceleration: f32,
    /// Current destination, if walking.
    pub target: Option<Vec2>,
    pub switches: Vec<SwitchRule>,
}

impl WanderBehavior {
    pub fn new(rate_per_sec: f32, search_radius: i32, preferred_biomes: Vec<Biome>, acceleration: f32) -> Self {
        Self {
            rate_per_sec,
            search_radius,
            preferred_biomes,
            acceleration,
            target: None,
            switches: Vec::new(),
        }
    }

    pub fn with_switch(mut self, rule: SwitchRule) -> Self {
        self.switches.push(rule);
        self
    }
}

/// Melee strike configuration for a pursuing entity.
#[derive(Debug, Clone)]
pub struct MeleeStrike {
    /// Distance to the target at which the strike triggers.
    pub range: f32,
    /// Query radius of the strike around the target position.
    pub radius: f32,
    pub damage: i32,
    pub knockback: f32,
    pub cooldown_ticks: u32,
    pub pierce: usize,
    /// Ticks until the next strike is allowed.
    pub cooldown_left: u32,
}

/// Maintains an acquired target and issues continuous move-to-entity
/// commands while one exists.
#[derive(Debug, Clone)]
pub struct FollowBehavior {
    pub search_radius: f32,
    /// Allow-list of target kinds.
    pub allowed: Vec<EntityKind>,
    pub priority: TargetPriority,
    pub acceleration: f32,
    pub target: Option<Entity>,
    pub strike: Option<MeleeStrike>,
    pub switches: Vec<SwitchRule>,
}

impl FollowBehavior {
    pub fn new(search_radius: f32, allowed: Vec<EntityKind>, priority: TargetPriority, acceleration: f32) -> Self {
        Self {
            search_radius,
            allowed,
            priority,
            acceleration,
            target: None,
            strike: None,
            switches: Vec::new(),
        }
    }

    pub fn with_strike(mut self, strike: MeleeStrike) -> Self {
        self.strike = Some(strike);
        self
    }

    pub fn with_switch(mut self, rule: SwitchRule) -> Self {
        self.switches.push(rule);
        self
    }
}

/// What a scripted behavior is currently doing.
#[derive(Debug, Clone)]
pub enum Script {
    Idle,
    /// Walk a pathfinder result one waypoint at a time.
    TraversePath { waypoints: Vec<(i32, i32)>, next: usize },
    /// Steer directly away from the nearest entity of the given kinds.
    FleeFromKinds { kinds: Vec<EntityKind>, radius: f32 },
}

/// Escape hatch with no built-in switch logic: runs whatever script was
/// installed at construction or by an external command.
#[derive(Debug, Clone)]
pub struct ScriptedBehavior {
    pub script: Script,
    /// Set when the script ran to completion; read by `ScriptFinished`.
    pub finished: bool,
    pub acceleration: f32,
    pub switches: Vec<SwitchRule>,
}

impl ScriptedBehavior {
    pub fn new(script: Script, acceleration: f32) -> Self {
        Self {
            script,
            finished: false,
            acceleration,
            switches: Vec::new(),
        }
    }

    pub fn with_switch(mut self, rule: SwitchRule) -> Self {
        self.switches.push(rule);
        self
    }
}

/// A registered behavior state.
#[derive(Debug, Clone)]
pub enum Behavior {
    Wander(WanderBehavior),
    Follow(FollowBehavior),
    Scripted(ScriptedBehavior),
}

impl Behavior {
    pub fn id(&self) -> BehaviorId {
        match self {
            Behavior::Wander(_) => BehaviorId::Wander,
            Behavior::Follow(_) => BehaviorId::Follow,
            Behavior::Scripted(_) => BehaviorId::Scripted,
        }
    }

    pub fn switches(&self) -> &[SwitchRule] {
        match self {
            Behavior::Wander(b) => &b.switches,
            Behavior::Follow(b) => &b.switches,
            Behavior::Scripted(b) => &b.switches,
        }
    }

    /// Reset transient state when this behavior becomes active. Behaviors
    /// share nothing but the entity's Transform; the AI system additionally
    /// stops acceleration so motion does not bleed through a switch.
    fn on_switch_into(&mut self) {
        match self {
            Behavior::Wander(b) => b.target = None,
            Behavior::Follow(b) => {
                b.target = None;
                if let Some(strike) = &mut b.strike {
                    strike.cooldown_left = 0;
                }
            }
            Behavior::Scripted(b) => b.finished = false,
        }
    }
}

/// AI state machine component.
pub struct Brain {
    active: BehaviorId,
    behaviors: HashMap<BehaviorId, Behavior>,
    /// Evaluated before the active state's own switch rules.
    global_switches: Vec<SwitchRule>,
}

impl Brain {
    pub fn new(initial: BehaviorId) -> Self {
        Self {
            active: initial,
            behaviors: HashMap::new(),
            global_switches: Vec::new(),
        }
    }

    /// Register a behavior state. Registering the same state twice is a
    /// construction-time programmer error.
    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        let id = behavior.id();
        if self.behaviors.insert(id, behavior).is_some() {
            panic!("behavior {id:?} registered twice");
        }
        self
    }

    pub fn with_global_switch(mut self, rule: SwitchRule) -> Self {
        self.global_switches.push(rule);
        self
    }

    pub fn active(&self) -> BehaviorId {
        self.active
    }

    pub fn global_switches(&self) -> &[SwitchRule] {
        &self.global_switches
    }

    pub fn behavior(&self, id: BehaviorId) -> Option<&Behavior> {
        self.behaviors.get(&id)
    }

    pub fn behavior_mut(&mut self, id: BehaviorId) -> Option<&mut Behavior> {
        self.behaviors.get_mut(&id)
    }

    pub fn active_behavior(&self) -> &Behavior {
        self.behaviors
            .get(&self.active)
            .unwrap_or_else(|| panic!("active behavior {:?} is not registered", self.active))
    }

    pub fn active_behavior_mut(&mut self) -> &mut Behavior {
        let active = self.active;
        self.behaviors
            .get_mut(&active)
            .unwrap_or_else(|| panic!("active behavior {active:?} is not registered"))
    }

    /// Change the active state and reset the new state's transient data.
    pub fn switch_to(&mut self, to: BehaviorId) {
        debug_assert!(self.behaviors.contains_key(&to), "switch to unregistered behavior {to:?}");
        self.active = to;
        if let Some(behavior) = self.behaviors.get_mut(&to) {
            behavior.on_switch_into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "registered twice")]
    fn duplicate_behavior_registration_panics() {
        let _ = Brain::new(BehaviorId::Wander)
            .with_behavior(Behavior::Wander(WanderBehavior::new(0.2, 4, vec![], 10.0)))
            .with_behavior(Behavior::Wander(WanderBehavior::new(0.3, 4, vec![], 10.0)));
    }

    #[test]
    fn switching_resets_transient_state() {
        let mut brain = Brain::new(BehaviorId::Wander)
            .with_behavior(Behavior::Wander(WanderBehavior::new(0.2, 4, vec![], 10.0)))
            .with_behavior(Behavior::Scripted(ScriptedBehavior::new(Script::Idle, 10.0)));

        if let Behavior::Scripted(s) = brain.behavior_mut(BehaviorId::Scripted).unwrap() {
            s.finished = true;
        }
        brain.switch_to(BehaviorId::Scripted);
        assert_eq!(brain.active(), BehaviorId::Scripted);
        if let Behavior::Scripted(s) = brain.active_behavior() {
            assert!(!s.finished);
        } else {
            panic!("expected scripted behavior");
        }
    }
}
