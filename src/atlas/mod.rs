//! Iridology zone atlas
//!
//! Static geometric model of the per-eye zones in polar iris coordinates,
//! plus the point-in-zone test. Zones are flat value records; the chart is
//! rebuilt on demand rather than cached.

pub mod chart;
pub mod zone;

pub use chart::zones_for_eye;
pub use zone::{clock_angle, normalize_angle, BodySystem, Zone};
