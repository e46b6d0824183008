//! Collision detection and positional correction
//!
//! Everything here is circle based. Overlaps are corrected by moving the
//! lower-priority entity out along the center-to-center line by exactly the
//! overlap; velocities are never touched.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Movable;
use super::obstacle::Obstacle;
use crate::{angle_between, heading};

/// Iterations when pushing a mover out of clustered obstacles
const OBSTACLE_RESOLVE_PASSES: usize = 5;

/// Area swept by a weapon effect this tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HitShape {
    /// Point or round projectile
    Circle { center: Vec2, radius: f32 },
    /// Beam from `start` to `end`, `half_width` either side of the line
    Segment { start: Vec2, end: Vec2, half_width: f32 },
    /// Melee arc or orbiting blade around `origin`
    Sector {
        origin: Vec2,
        facing: f32,
        range: f32,
        half_arc: f32,
    },
    /// Expanding ring; targets whose center distance lies in `[inner, outer]`
    Ring { center: Vec2, inner: f32, outer: f32 },
}

impl HitShape {
    /// Whether a circular target is touched by this shape
    pub fn hits(&self, pos: Vec2, radius: f32) -> bool {
        match *self {
            HitShape::Circle { center, radius: r } => circles_overlap(center, r, pos, radius),
            HitShape::Segment {
                start,
                end,
                half_width,
            } => segment_circle_intersects(start, end, pos, radius + half_width),
            HitShape::Sector {
                origin,
                facing,
                range,
                half_arc,
            } => in_sector(origin, facing, range, half_arc, pos),
            HitShape::Ring {
                center,
                inner,
                outer,
            } => {
                let d = center.distance(pos);
                d >= inner && d <= outer
            }
        }
    }
}

/// Overlap test: distance between centers < sum of radii
#[inline]
pub fn circles_overlap(a: Vec2, ar: f32, b: Vec2, br: f32) -> bool {
    a.distance_squared(b) < (ar + br) * (ar + br)
}

/// Displacement that moves circle `a` just clear of circle `b`.
///
/// Zero when they do not overlap, and zero when the centers coincide
/// (no direction to push along).
pub fn separation(a: Vec2, ar: f32, b: Vec2, br: f32) -> Vec2 {
    let delta = a - b;
    let dist = delta.length();
    let overlap = ar + br - dist;
    if overlap <= 0.0 || dist <= f32::EPSILON {
        return Vec2::ZERO;
    }
    delta / dist * overlap
}

/// Push `mover` out of a fixed circle. Returns true if it moved.
pub fn push_out<M: Movable + ?Sized>(mover: &mut M, anchor: Vec2, anchor_radius: f32) -> bool {
    let body = mover.body_mut();
    let push = separation(body.pos, body.radius, anchor, anchor_radius);
    if push == Vec2::ZERO {
        return false;
    }
    body.pos += push;
    true
}

/// Push `mover` out of every blocking obstacle it overlaps
pub fn resolve_obstacles<M: Movable + ?Sized>(mover: &mut M, obstacles: &[Obstacle]) {
    for _ in 0..OBSTACLE_RESOLVE_PASSES {
        let mut pushed = false;
        for obstacle in obstacles.iter().filter(|o| o.blocks_movement()) {
            pushed |= push_out(mover, obstacle.pos, obstacle.radius);
        }
        if !pushed {
            break;
        }
    }
}

/// First blocking obstacle overlapping the circle, if any
pub fn blocking_obstacle_at(obstacles: &[Obstacle], pos: Vec2, radius: f32) -> Option<usize> {
    obstacles
        .iter()
        .position(|o| o.blocks_movement() && circles_overlap(pos, radius, o.pos, o.radius))
}

/// Closest point to `p` on segment `a`-`b`
pub fn closest_point_on_segment(a: Vec2, b: Vec2, p: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Line segment vs circle intersection
pub fn segment_circle_intersects(a: Vec2, b: Vec2, center: Vec2, radius: f32) -> bool {
    closest_point_on_segment(a, b, center).distance_squared(center) <= radius * radius
}

/// Angular-sector test: within `range` of `origin` and no more than
/// `half_arc` off the `facing` angle
pub fn in_sector(origin: Vec2, facing: f32, range: f32, half_arc: f32, target: Vec2) -> bool {
    let delta = target - origin;
    if delta.length_squared() > range * range {
        return false;
    }
    if delta.length_squared() <= f32::EPSILON {
        return true;
    }
    angle_between(heading(delta), facing) <= half_arc
}
