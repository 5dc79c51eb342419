//! Collision detection and response for boxes and the ball
//!
//! Both primitives are pure functions of two shapes. The shooter only needs
//! box overlap; the breaker tests its circular ball against boxes and picks
//! a bounce axis from the penetration depths.

use glam::Vec2;

use super::entity::Rect;

/// Strict rectangle overlap: touching edges do not collide
#[inline]
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

/// Closest point on a rectangle to `point`
#[inline]
pub fn closest_point(rect: &Rect, point: Vec2) -> Vec2 {
    Vec2::new(
        point.x.clamp(rect.left(), rect.right()),
        point.y.clamp(rect.top(), rect.bottom()),
    )
}

/// Circle/rectangle overlap: distance from the center to the rectangle's
/// closest point is strictly less than the radius
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    center.distance(closest_point(rect, center)) < radius
}

/// Axis whose velocity component should flip after a ball/box hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BounceAxis {
    /// Hit a left or right face
    Horizontal,
    /// Hit a top or bottom face
    Vertical,
}

/// Pick the bounce axis from per-axis penetration depth
///
/// The overlap on each axis is the combined half-extent minus the center
/// distance. The axis with the smaller overlap is the face that was crossed;
/// ties go to the vertical axis.
pub fn penetration_axis(center: Vec2, radius: f32, rect: &Rect) -> BounceAxis {
    let delta = center - rect.center();
    let half = rect.size * 0.5;
    let overlap_x = radius + half.x - delta.x.abs();
    let overlap_y = radius + half.y - delta.y.abs();

    if overlap_x < overlap_y {
        BounceAxis::Horizontal
    } else {
        BounceAxis::Vertical
    }
}

/// Flip the velocity component for the given axis
#[inline]
pub fn reflect_axis(vel: Vec2, axis: BounceAxis) -> Vec2 {
    match axis {
        BounceAxis::Horizontal => Vec2::new(-vel.x, vel.y),
        BounceAxis::Vertical => Vec2::new(vel.x, -vel.y),
    }
}

/// Which wall the ball touched this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    pub side: bool,
    pub top: bool,
}

/// Bounce a ball off the left, right and top walls
///
/// Velocity is pointed back into the field (only the sign changes) and the
/// center is clamped inside. The bottom is open.
pub fn ball_wall_collision(
    pos: &mut Vec2,
    vel: &mut Vec2,
    radius: f32,
    width: f32,
    top: f32,
) -> WallContact {
    let mut contact = WallContact::default();

    if pos.x - radius <= 0.0 {
        vel.x = vel.x.abs();
        contact.side = true;
    } else if pos.x + radius >= width {
        vel.x = -vel.x.abs();
        contact.side = true;
    }
    if contact.side {
        pos.x = pos.x.clamp(radius, width - radius);
    }

    if pos.y - radius <= top {
        vel.y = vel.y.abs();
        pos.y = top + radius;
        contact.top = true;
    }

    contact
}
