/*
 * Boid Module
 *
 * This module defines the Boid struct and its behavior.
 * Each boid follows three main rules:
 * 1. Separation: Avoid crowding neighbors
 * 2. Alignment: Steer towards the average heading of neighbors
 * 3. Cohesion: Steer towards the average position of neighbors
 *
 * During peak hours a boid additionally performs an axis-aligned random
 * walk before the flocking forces are applied for the tick.
 */

use crate::config::SimConfig;
use nannou::prelude::*;
use rand::Rng;

// Rescale a vector to `max` only when its magnitude exceeds it.
// A zero vector is simply "not exceeding" and passes through untouched.
pub fn limit(v: Vec2, max: f32) -> Vec2 {
    let magnitude = v.length();
    if magnitude > max {
        v / magnitude * max
    } else {
        v
    }
}

#[derive(Clone)]
pub struct Boid {
    pub position: Point2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub max_speed: f32,
    pub max_force: f32,
}

impl Boid {
    pub fn new<R: Rng>(x: f32, y: f32, max_speed: f32, max_force: f32, rng: &mut R) -> Self {
        // Random initial velocity, one unit-scale component per axis
        let vx = rng.gen_range(-1.0..1.0);
        let vy = rng.gen_range(-1.0..1.0);

        Self {
            position: pt2(x, y),
            velocity: vec2(vx, vy),
            acceleration: Vec2::ZERO,
            max_speed,
            max_force,
        }
    }

    // Apply a force to the boid
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    // Update the boid's position based on its velocity and acceleration.
    // Runs exactly once per tick, after all forces for the tick are applied.
    pub fn update(&mut self) {
        // Update velocity
        self.velocity += self.acceleration;

        // Limit speed
        self.velocity = limit(self.velocity, self.max_speed);

        // Update position
        self.position += self.velocity;

        // Reset acceleration
        self.acceleration = Vec2::ZERO;
    }

    // Wrap the boid around the area edges (toroidal boundary).
    // Holds 0 <= x < width and 0 <= y < height afterwards.
    pub fn wrap(&mut self, width: f32, height: f32) {
        self.position.x = wrap_axis(self.position.x, width);
        self.position.y = wrap_axis(self.position.y, height);
    }

    // Calculate alignment force (steer towards average heading of neighbors).
    // The averaging includes this boid itself; a lone boid therefore steers
    // towards its own velocity and the force cancels to zero.
    pub fn align(&self, boids: &[Boid], perception_radius: f32) -> Vec2 {
        let mut steering = Vec2::ZERO;
        let mut count = 0;

        for other in boids {
            if self.position.distance(other.position) < perception_radius {
                steering += other.velocity;
                count += 1;
            }
        }

        if count == 0 {
            return Vec2::ZERO;
        }
        steering /= count as f32;
        self.steer(steering)
    }

    // Calculate cohesion force (steer towards average position of neighbors)
    pub fn cohere(&self, boids: &[Boid], perception_radius: f32) -> Vec2 {
        let mut steering = Vec2::ZERO;
        let mut count = 0;

        for other in boids {
            if self.position.distance(other.position) < perception_radius {
                steering += Vec2::new(other.position.x, other.position.y);
                count += 1;
            }
        }

        if count == 0 {
            return Vec2::ZERO;
        }
        steering /= count as f32;

        // Desired velocity points at the neighborhood centroid
        let desired = steering - Vec2::new(self.position.x, self.position.y);
        if desired.length() > 0.0 {
            self.steer(desired)
        } else {
            Vec2::ZERO
        }
    }

    // Calculate separation force (avoid crowding neighbors)
    pub fn separate(&self, boids: &[Boid], perception_radius: f32) -> Vec2 {
        let mut steering = Vec2::ZERO;
        let mut count = 0;

        for other in boids {
            let d = self.position.distance(other.position);

            // Only other boids count; zero distance excludes self
            if d > 0.0 && d < perception_radius {
                // Vector pointing away from the neighbor
                let diff = (self.position - other.position) / d;
                steering += diff;
                count += 1;
            }
        }

        if count == 0 {
            return Vec2::ZERO;
        }
        steering /= count as f32;

        if steering.length() > 0.0 {
            self.steer(steering)
        } else {
            Vec2::ZERO
        }
    }

    // Combined flocking force over the given population. The three forces
    // are summed (weights default to 1.0), not blended: at high neighbor
    // counts cohesion and alignment can dominate numerically.
    pub fn flock_force(&self, boids: &[Boid], config: &SimConfig) -> Vec2 {
        let alignment = self.align(boids, config.alignment_radius) * config.alignment_weight;
        let cohesion = self.cohere(boids, config.cohesion_radius) * config.cohesion_weight;
        let separation = self.separate(boids, config.separation_radius) * config.separation_weight;

        alignment + cohesion + separation
    }

    // Displace the boid by exactly max_speed along one of the four axis
    // directions, chosen uniformly at random. The move is skipped when it
    // would leave the area on that axis; wrap is a separate step.
    pub fn random_walk<R: Rng>(&mut self, rng: &mut R, width: f32, height: f32) {
        let step = self.max_speed;
        match rng.gen_range(0..4u8) {
            0 => {
                let y = self.position.y - step;
                if y >= 0.0 {
                    self.position.y = y;
                }
            }
            1 => {
                let y = self.position.y + step;
                if y < height {
                    self.position.y = y;
                }
            }
            2 => {
                let x = self.position.x - step;
                if x >= 0.0 {
                    self.position.x = x;
                }
            }
            _ => {
                let x = self.position.x + step;
                if x < width {
                    self.position.x = x;
                }
            }
        }
    }

    // Implement Reynolds: Steering = Desired - Velocity, with the desired
    // velocity capped at max_speed and the result capped at max_force.
    fn steer(&self, desired: Vec2) -> Vec2 {
        let desired = limit(desired, self.max_speed);
        limit(desired - self.velocity, self.max_force)
    }
}

fn wrap_axis(value: f32, bound: f32) -> f32 {
    let wrapped = value.rem_euclid(bound);
    // rem_euclid can round up to the modulus for tiny negative inputs
    if wrapped >= bound {
        0.0
    } else {
        wrapped
    }
}
