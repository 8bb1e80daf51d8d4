//! Simplified flocking: the only simulation-relevant effect of motion is to
//! bring obligation endpoints within fulfilment range.
//!
//! Steering is split in two so the scheduler can compute every agent's force
//! from a frozen view of the population (optionally in parallel) and only
//! then integrate:
//!
//! ```text
//! steer(&self, …)      -> Steering   read-only, uses the agent's own RNG
//! integrate(&mut self, Steering)     writes own kinematic state only
//! ```

use nm_core::{AgentId, AgentRng, Arena, SteeringParams, Vector2};

use crate::Agent;

/// Kinematic view of a nearby agent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Neighbor {
    pub id: AgentId,
    pub position: Vector2,
    pub velocity: Vector2,
}

/// Resolves a peer id to its current position.  `None` for dead or unknown
/// peers.
pub trait PeerPositions {
    fn position_of(&self, id: AgentId) -> Option<Vector2>;
}

/// Output of the read-only steering phase for one agent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Steering {
    /// Sum of this tick's steering forces.
    pub force: Vector2,
    /// Wander heading to carry into the next tick.
    pub wander: Vector2,
}

impl Agent {
    /// Add a force to this tick's acceleration.
    #[inline]
    pub fn apply_force(&mut self, force: Vector2) {
        self.acceleration += force;
    }

    /// Compute this tick's steering.
    ///
    /// `neighbors` may include the agent itself; it is skipped by id.  The
    /// wander force is applied only when no trusted peer was sought.
    pub fn steer<P: PeerPositions + ?Sized>(
        &self,
        neighbors: &[Neighbor],
        peers: &P,
        params: &SteeringParams,
        rng: &mut AgentRng,
    ) -> Steering {
        let mut force = Vector2::ZERO;

        // Trust seek.
        let mut sought = false;
        for (peer, score) in self.trust_scores() {
            if score > params.trust_seek_threshold {
                if let Some(target) = peers.position_of(peer) {
                    force += (target - self.position).with_mag(params.trust_seek_gain * score as f32);
                    sought = true;
                }
            }
        }

        // Separation, cohesion, alignment in a single pass.
        let mut push = Vector2::ZERO;
        let mut push_n = 0u32;
        let mut center = Vector2::ZERO;
        let mut heading = Vector2::ZERO;
        let mut flock_n = 0u32;
        for other in neighbors {
            if other.id == self.id {
                continue;
            }
            let d = self.position.dist(other.position);
            if d > 0.0 && d < params.separation_radius {
                push += (self.position - other.position).normalize() / d;
                push_n += 1;
            }
            if d < params.cohesion_radius {
                center += other.position;
                heading += other.velocity;
                flock_n += 1;
            }
        }
        if push_n > 0 {
            force += (push / push_n as f32).with_mag(params.separation_force);
        }
        if flock_n > 0 {
            let n = flock_n as f32;
            force += (center / n - self.position).with_mag(params.cohesion_force);
            force += (heading / n).with_mag(params.alignment_force);
        }

        let mut wander = self.wander;
        if !sought {
            let turn = params.wander_turn;
            if turn > 0.0 {
                wander = wander.rotate(rng.gen_range(-turn..=turn));
            }
            force += wander * params.wander_force;
        }

        Steering { force, wander }
    }

    /// Apply `steering`, integrate acceleration → velocity → position, wrap
    /// at the arena edge, and refresh the derived scalars.
    pub fn integrate(&mut self, steering: Steering, params: &SteeringParams, arena: &Arena) {
        self.wander = steering.wander;
        self.acceleration += steering.force;
        self.acceleration = self.acceleration.limit(params.max_acceleration);
        self.velocity += self.acceleration;
        self.velocity *= params.damping;
        self.velocity = self.velocity.limit(params.max_speed);
        self.position = arena.wrap(self.position + self.velocity);
        self.acceleration *= params.acceleration_carry;
        self.recompute_conflict_and_debt();
    }

    /// Steer and integrate in one call.
    pub fn tick<P: PeerPositions + ?Sized>(
        &mut self,
        neighbors: &[Neighbor],
        peers: &P,
        params: &SteeringParams,
        arena: &Arena,
        rng: &mut AgentRng,
    ) {
        let steering = self.steer(neighbors, peers, params, rng);
        self.integrate(steering, params, arena);
    }
}
