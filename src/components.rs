use std::collections::HashSet;

use glam::Vec2;
use hecs::Entity;

/// Transform component - world-space motion state.
///
/// Velocity and acceleration are absent (not zero) when the entity is at
/// rest; the physics step treats a transform with no velocity, no
/// acceleration and no knockback as a strict no-op.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    pub position: Vec2,
    pub velocity: Option<Vec2>,
    pub acceleration: Option<Vec2>,
    pub rotation: f32,
    /// Maximum speed magnitude the physics integration will allow.
    pub terminal_velocity: f32,
    pub knockback: Option<Knockback>,
}

impl Transform {
    pub fn new(position: Vec2, terminal_velocity: f32) -> Self {
        Self {
            position,
            velocity: None,
            acceleration: None,
            rotation: 0.0,
            terminal_velocity,
            knockback: None,
        }
    }

    /// True when the physics step has nothing to integrate.
    pub fn at_rest(&self) -> bool {
        self.velocity.is_none() && self.acceleration.is_none() && self.knockback.is_none()
    }
}

/// A transient positional impulse applied on hit, decaying over a fixed
/// number of ticks.
#[derive(Debug, Clone, Copy)]
pub struct Knockback {
    pub velocity: Vec2,
    pub ticks_left: u32,
}

/// Collision shape, entity-relative. Rectangle rotation is ignored; all
/// rectangle tests run in the world-axis frame.
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { width: f32, height: f32 },
}

impl Shape {
    /// Radius of the smallest circle containing the shape.
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            Shape::Circle { radius } => radius,
            Shape::Rect { width, height } => 0.5 * (width * width + height * height).sqrt(),
        }
    }

    /// Half extents of the shape's axis-aligned bounding box.
    pub fn half_extents(&self) -> Vec2 {
        match *self {
            Shape::Circle { radius } => Vec2::splat(radius),
            Shape::Rect { width, height } => Vec2::new(width * 0.5, height * 0.5),
        }
    }

    /// Exact test used by range queries: is any part of this shape, centered
    /// at `center`, within `range` of `point`? Circles test center distance
    /// minus radius; rectangles test point-to-AABB distance.
    pub fn within_range(&self, center: Vec2, point: Vec2, range: f32) -> bool {
        match *self {
            Shape::Circle { radius } => center.distance(point) - radius <= range,
            Shape::Rect { .. } => {
                let half = self.half_extents();
                let delta = (point - center).abs() - half;
                let outside = delta.max(Vec2::ZERO);
                outside.length() <= range
            }
        }
    }
}

/// Overlap test between two shapes. Circle-circle is exact; anything
/// involving a rectangle is an AABB approximation rather than full SAT.
pub fn shapes_overlap(a_pos: Vec2, a: &Shape, b_pos: Vec2, b: &Shape) -> bool {
    match (a, b) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            a_pos.distance(b_pos) <= ra + rb
        }
        (Shape::Circle { radius }, Shape::Rect { .. }) => {
            b.within_range(b_pos, a_pos, *radius)
        }
        (Shape::Rect { .. }, Shape::Circle { radius }) => {
            a.within_range(a_pos, b_pos, *radius)
        }
        (Shape::Rect { .. }, Shape::Rect { .. }) => {
            let half_a = a.half_extents();
            let half_b = b.half_extents();
            let delta = (a_pos - b_pos).abs();
            delta.x <= half_a.x + half_b.x && delta.y <= half_a.y + half_b.y
        }
    }
}

/// Hitbox component - the entity's collision shape.
#[derive(Debug, Clone, Copy)]
pub struct Hitbox {
    pub shape: Shape,
}

impl Hitbox {
    pub fn circle(radius: f32) -> Self {
        Self { shape: Shape::Circle { radius } }
    }

    pub fn rect(width: f32, height: f32) -> Self {
        Self { shape: Shape::Rect { width, height } }
    }
}

/// Collision transition subscription and the entity's own view of its
/// current overlap set. Only entities carrying this component pay for the
/// per-tick overlap diff; each entity tracks and fires its own side
/// independently.
#[derive(Debug, Clone)]
pub struct CollisionWatcher {
    pub on_enter: bool,
    pub on_stay: bool,
    pub on_exit: bool,
    pub overlapping: HashSet<Entity>,
}

impl CollisionWatcher {
    pub fn new(on_enter: bool, on_stay: bool, on_exit: bool) -> Self {
        Self {
            on_enter,
            on_stay,
            on_exit,
            overlapping: HashSet::new(),
        }
    }
}

/// Health component.
#[derive(Debug, Clone, Copy)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    pub fn damage(&mut self, amount: i32) {
        self.current = (self.current - amount).max(0);
    }

    pub fn heal(&mut self, amount: i32) {
        self.current = (self.current + amount).min(self.max);
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }

    pub fn fraction(&self) -> f32 {
        (self.current as f32 / self.max as f32).clamp(0.0, 1.0)
    }
}

/// Faction grouping used for friendly-fire exclusion and follow targeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tribe(pub u32);

/// What an entity is. Replaces type-identity dispatch: AI allow-lists and
/// attack eligibility filter on this tag through the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Tribesman,
    Zombie,
    Deer,
    Tree,
}

impl EntityKind {
    /// Coarse bucket the spatial partition files this kind under.
    pub fn category(&self) -> Category {
        match self {
            EntityKind::Tribesman => Category::Unit,
            EntityKind::Zombie | EntityKind::Deer => Category::Mob,
            EntityKind::Tree => Category::Prop,
        }
    }
}

/// Coarse entity category - chunk lists are bucketed by this so iteration
/// order groups like with like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Unit,
    Mob,
    Prop,
}

impl Category {
    pub const COUNT: usize = 3;
    pub const ALL: [Category; Category::COUNT] = [Category::Unit, Category::Mob, Category::Prop];

    pub fn index(&self) -> usize {
        match self {
            Category::Unit => 0,
            Category::Mob => 1,
            Category::Prop => 2,
        }
    }
}

/// Membership record: which chunk the spatial partition currently files this
/// entity under. Kept in lockstep with Transform by the chunk reassignment
/// step.
#[derive(Debug, Clone, Copy)]
pub struct ChunkMember {
    pub chunk: usize,
}

/// Status effect kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Burning,
    Slowed,
}

#[derive(Debug, Clone, Copy)]
pub struct ActiveEffect {
    pub kind: EffectKind,
    pub ticks_left: u32,
}

/// Duration-tracked status effects. Tiles and attacks impose effects; the
/// effect system ticks durations and periodic burn damage.
#[derive(Debug, Clone, Default)]
pub struct StatusEffects {
    pub active: Vec<ActiveEffect>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an effect, refreshing the duration if it is already active.
    pub fn apply(&mut self, kind: EffectKind, ticks: u32) {
        if let Some(existing) = self.active.iter_mut().find(|e| e.kind == kind) {
            existing.ticks_left = existing.ticks_left.max(ticks);
        } else {
            self.active.push(ActiveEffect { kind, ticks_left: ticks });
        }
    }

    pub fn has(&self, kind: EffectKind) -> bool {
        self.active.iter().any(|e| e.kind == kind)
    }
}

/// Entities carrying this reveal fog around themselves each tick.
#[derive(Debug, Clone, Copy)]
pub struct RevealsFog {
    pub radius: f32,
}

/// Marker for static props: the physics step skips them entirely.
#[derive(Debug, Clone, Copy)]
pub struct Still;
