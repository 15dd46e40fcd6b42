//! Rope physics - hook selection and pendulum swing
//!
//! The rope is a hard positional constraint, not a spring: once the
//! actor drifts past the rope length, the outward radial velocity is
//! removed and the position snapped back onto the rope circle. This
//! avoids stiff-spring blow-up at variable frame time; the energy lost
//! on tight turns is compensated by the release boost the orchestrator
//! applies on detach.

use glam::Vec2;

use crate::config::Config;

/// A hook may be this far below the actor and still qualify for attach.
const HOOK_BELOW_TOLERANCE: f32 = 50.0;

/// An anchor point the rope may attach to.
///
/// Ids are allocated by the level generator. The registry stores plain
/// copies, so retiring a segment can never leave a dangling reference;
/// the id is re-validated against the registry on every update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hook {
    pub id: u32,
    pub pos: Vec2,
}

/// Explicit outputs of one rope update.
#[derive(Debug, Clone, Copy)]
pub struct RopeStep {
    /// Velocity after pendulum forces, constraint and damping
    pub velocity: Vec2,
    /// Positional correction the caller must apply to the actor
    pub correction: Vec2,
}

impl RopeStep {
    fn unchanged(velocity: Vec2) -> Self {
        Self {
            velocity,
            correction: Vec2::ZERO,
        }
    }
}

/// Hook registry and taut-rope state. At most one attachment at a time;
/// the rope length is fixed at attach time and invariant until detach.
#[derive(Debug, Default)]
pub struct RopePhysics {
    hooks: Vec<Hook>,
    attached: Option<u32>,
    rope_length: f32,
}

impl RopePhysics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_hook(&mut self, hook: Hook) {
        self.hooks.push(hook);
    }

    /// Remove a hook from the candidate set. Unregistering the attached
    /// hook forces an immediate detach, velocity preserved.
    pub fn unregister_hook(&mut self, id: u32) {
        self.hooks.retain(|h| h.id != id);
        if self.attached == Some(id) {
            self.detach();
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    /// The attached hook, if any and still registered.
    pub fn attached_hook(&self) -> Option<Hook> {
        let id = self.attached?;
        self.hooks.iter().find(|h| h.id == id).copied()
    }

    /// Fixed at attach time; 0 while detached.
    pub fn rope_length(&self) -> f32 {
        self.rope_length
    }

    /// Registered attach candidates, for rendering consumers.
    pub fn hooks(&self) -> &[Hook] {
        &self.hooks
    }

    /// Attach to the nearest qualifying hook. Qualifying: strictly ahead
    /// of the actor by more than `min_forward_distance`, within
    /// `max_grapple_distance`, and roughly level or above. Returns true
    /// if attached afterwards (no-op when already attached).
    pub fn try_attach(&mut self, actor: Vec2, cfg: &Config) -> bool {
        if self.attached.is_some() {
            return true;
        }

        let mut best: Option<(u32, f32)> = None;
        for hook in &self.hooks {
            if hook.pos.x <= actor.x + cfg.min_forward_distance {
                continue;
            }
            let dist = hook.pos.distance(actor);
            if dist > cfg.max_grapple_distance {
                continue;
            }
            // Hanging from a hook far below the actor is useless
            if hook.pos.y > actor.y + HOOK_BELOW_TOLERANCE {
                continue;
            }
            // Degenerate rope vector cannot be normalized
            if dist <= f32::EPSILON {
                continue;
            }
            // Ties keep the first-encountered hook
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((hook.id, dist));
            }
        }

        let Some((id, dist)) = best else {
            return false;
        };
        self.attached = Some(id);
        self.rope_length = dist.clamp(cfg.min_rope_length, cfg.max_rope_length);
        true
    }

    /// Clear the attachment. The caller's velocity is untouched; any
    /// release boost is the orchestrator's concern.
    pub fn detach(&mut self) {
        self.attached = None;
        self.rope_length = 0.0;
    }

    /// Advance the pendulum one step. Returns the velocity unchanged
    /// while detached. The positional side effect of the hard length
    /// constraint is returned explicitly as `correction`.
    pub fn update(&mut self, actor: Vec2, velocity: Vec2, dt: f32, cfg: &Config) -> RopeStep {
        let Some(id) = self.attached else {
            return RopeStep::unchanged(velocity);
        };
        // A retired segment may have taken the hook with it
        let Some(hook) = self.hooks.iter().find(|h| h.id == id).copied() else {
            self.detach();
            return RopeStep::unchanged(velocity);
        };

        let from_hook = actor - hook.pos;
        let distance = from_hook.length();
        let rope_dir = from_hook.normalize_or_zero();

        let mut velocity = velocity;

        // Gravity split along the rope: only the tangential part drives
        // the swing, so gravity never stretches or compresses the rope.
        let gravity = Vec2::new(0.0, cfg.gravity_y * dt);
        let radial_gravity = rope_dir * gravity.dot(rope_dir);
        velocity += gravity - radial_gravity;

        // Hard length constraint. Outward radial velocity is removed;
        // inward motion is never clamped.
        let mut correction = Vec2::ZERO;
        if distance > self.rope_length {
            let radial_speed = velocity.dot(rope_dir);
            if radial_speed > 0.0 {
                velocity -= rope_dir * radial_speed;
            }
            correction = -rope_dir * (distance - self.rope_length);
        }

        velocity *= cfg.rope_damping;

        // Keep the pendulum from stalling the run
        let forward_floor = cfg.base_speed * 0.5;
        if velocity.x < forward_floor {
            velocity.x = forward_floor;
        }

        RopeStep {
            velocity,
            correction,
        }
    }
}
