//! Zone records and polar containment
//!
//! Angles are radians with 0 on the positive x-axis, increasing
//! counter-clockwise (12 o'clock = π/2). Radii are fractions of the iris
//! radius. Zones are half-open on both axes so adjacent zones never share a
//! boundary point; the only closed edge is the iris rim at radius 1.0.

use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Body system a zone is traditionally associated with on iridology charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodySystem {
    Nervous,
    Sensory,
    Respiratory,
    Digestive,
    Urinary,
    Musculoskeletal,
    Lymphatic,
    Circulatory,
    Integumentary,
}

impl BodySystem {
    pub fn label(&self) -> &'static str {
        match self {
            BodySystem::Nervous => "Nervous System",
            BodySystem::Sensory => "Sensory System",
            BodySystem::Respiratory => "Respiratory System",
            BodySystem::Digestive => "Digestive System",
            BodySystem::Urinary => "Urinary System",
            BodySystem::Musculoskeletal => "Musculoskeletal System",
            BodySystem::Lymphatic => "Lymphatic System",
            BodySystem::Circulatory => "Circulatory System",
            BodySystem::Integumentary => "Integumentary System",
        }
    }
}

impl fmt::Display for BodySystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A named angular/radial sector of the iris.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub body_system: BodySystem,
    /// Counter-clockwise start of the arc, in [0, 2π]
    pub start_angle: f64,
    /// Counter-clockwise end of the arc; smaller than `start_angle` when the
    /// arc crosses the 0/2π boundary
    pub end_angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub description: String,
    /// Wellness reflection templates, mildest first
    pub reflections: Vec<String>,
}

/// Angle of a clock hour: 12 o'clock is π/2, hours advance clockwise.
///
/// The result is normalized into [0, 2π).
pub fn clock_angle(hour: f64) -> f64 {
    normalize_angle(FRAC_PI_2 - hour * PI / 6.0)
}

/// Wrap an angle into [0, 2π).
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly 2π
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

impl Zone {
    /// Build a zone spanning the clock face clockwise from `from_hour` to
    /// `to_hour`. Equal hours (or a 12-hour span) make a full ring.
    #[allow(clippy::too_many_arguments)]
    pub fn from_clock(
        id: &str,
        name: &str,
        body_system: BodySystem,
        from_hour: f64,
        to_hour: f64,
        inner_radius: f64,
        outer_radius: f64,
        description: &str,
        reflections: &[&str],
    ) -> Self {
        debug_assert!(inner_radius <= outer_radius);
        let span = (to_hour - from_hour).rem_euclid(12.0);
        let (start_angle, end_angle) = if span == 0.0 {
            (0.0, TAU)
        } else {
            // Clockwise on the dial is decreasing angle, so the arc starts at
            // the later hour.
            (clock_angle(to_hour), clock_angle(from_hour))
        };
        Self {
            id: id.to_string(),
            name: name.to_string(),
            body_system,
            start_angle,
            end_angle,
            inner_radius,
            outer_radius,
            description: description.to_string(),
            reflections: reflections.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Whether the arc crosses the 0/2π boundary
    pub fn wraps(&self) -> bool {
        self.start_angle > self.end_angle
    }

    /// Angular extent of the arc in radians
    pub fn angular_span(&self) -> f64 {
        if self.wraps() {
            TAU - self.start_angle + self.end_angle
        } else {
            self.end_angle - self.start_angle
        }
    }

    pub fn is_full_ring(&self) -> bool {
        self.angular_span() >= TAU
    }

    /// Test whether a polar point lies in this zone.
    ///
    /// The angle may be any finite value; it is normalized before testing.
    /// Arcs that cross the 0/2π boundary accept `angle >= start || angle < end`.
    pub fn contains(&self, angle: f64, normalized_radius: f64) -> bool {
        if !angle.is_finite() || !normalized_radius.is_finite() {
            return false;
        }
        self.contains_radius(normalized_radius) && self.contains_angle(angle)
    }

    fn contains_radius(&self, r: f64) -> bool {
        if r < self.inner_radius {
            return false;
        }
        if self.outer_radius >= 1.0 {
            r <= self.outer_radius
        } else {
            r < self.outer_radius
        }
    }

    fn contains_angle(&self, angle: f64) -> bool {
        if self.is_full_ring() {
            return true;
        }
        let a = normalize_angle(angle);
        if self.wraps() {
            a >= self.start_angle || a < self.end_angle
        } else {
            a >= self.start_angle && a < self.end_angle
        }
    }
}
