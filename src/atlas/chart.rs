//! Per-eye iridology chart
//!
//! Each eye is laid out as four concentric bands:
//!
//! | band           | radius      | layout                         |
//! |----------------|-------------|--------------------------------|
//! | stomach        | 0.00 - 0.20 | full ring                      |
//! | intestines     | 0.20 - 0.40 | full ring                      |
//! | organ sectors  | 0.40 - 0.85 | eight clock sectors, full turn |
//! | lymph, skin    | 0.85 - 1.00 | two full rings                 |
//!
//! The bands tile the iris disc without overlap, so every point with radius
//! in [0, 1] belongs to exactly one zone. The left eye mirrors the right eye
//! across the vertical axis, with organs that sit on one side of the body
//! swapped in.

use super::zone::{BodySystem, Zone};
use crate::EyeSide;

const STOMACH_OUTER: f64 = 0.20;
const INTESTINE_OUTER: f64 = 0.40;
const ORGAN_OUTER: f64 = 0.85;
const LYMPH_OUTER: f64 = 0.93;
const RIM: f64 = 1.0;

struct SectorTemplate {
    key: &'static str,
    name: &'static str,
    system: BodySystem,
    /// Clockwise clock span on the right eye
    from_hour: f64,
    to_hour: f64,
    description: &'static str,
    reflections: [&'static str; 3],
}

const RIGHT_SECTORS: &[SectorTemplate] = &[
    SectorTemplate {
        key: "brain",
        name: "Brain",
        system: BodySystem::Nervous,
        from_hour: 11.0,
        to_hour: 1.0,
        description: "Upper sector traditionally linked to mental activity and rest.",
        reflections: [
            "Regular sleep and quiet moments support a calm mind.",
            "This area shows some variation; notice how rested you have felt lately.",
            "Noticeable variation here is a traditional cue to ease mental load and make room for rest.",
        ],
    },
    SectorTemplate {
        key: "sinus_throat",
        name: "Sinus & Throat",
        system: BodySystem::Respiratory,
        from_hour: 1.0,
        to_hour: 2.0,
        description: "Upper outer sector associated with the upper airways.",
        reflections: [
            "Fresh air and good hydration are pleasant everyday habits.",
            "Some variation appears here; a humid, clean environment may feel comfortable.",
            "Marked variation here traditionally invites attention to breathing comfort.",
        ],
    },
    SectorTemplate {
        key: "lung",
        name: "Lungs & Bronchi",
        system: BodySystem::Respiratory,
        from_hour: 2.0,
        to_hour: 4.0,
        description: "Lateral sector associated with breathing.",
        reflections: [
            "Deep breathing exercises are a simple daily routine.",
            "Some variation appears here; time outdoors may feel refreshing.",
            "Noticeable variation here is a traditional cue to prioritize breathing practice.",
        ],
    },
    SectorTemplate {
        key: "shoulder",
        name: "Shoulder & Arm",
        system: BodySystem::Musculoskeletal,
        from_hour: 4.0,
        to_hour: 5.0,
        description: "Lower lateral sector associated with the shoulder girdle.",
        reflections: [
            "Gentle stretching keeps the upper body feeling loose.",
            "Some variation appears here; posture breaks may feel good.",
            "Marked variation here traditionally suggests paying attention to posture and tension.",
        ],
    },
    SectorTemplate {
        key: "kidney",
        name: "Kidney & Adrenal",
        system: BodySystem::Urinary,
        from_hour: 5.0,
        to_hour: 7.0,
        description: "Lower sector associated with fluid balance.",
        reflections: [
            "Steady hydration through the day is an easy habit.",
            "Some variation appears here; notice your daily water intake.",
            "Noticeable variation here is a traditional cue to reflect on hydration and rest.",
        ],
    },
    SectorTemplate {
        key: "liver",
        name: "Liver & Gallbladder",
        system: BodySystem::Digestive,
        from_hour: 7.0,
        to_hour: 8.0,
        description: "Lower medial sector associated with digestion of fats.",
        reflections: [
            "Balanced meals with plenty of vegetables support everyday energy.",
            "Some variation appears here; lighter evening meals may feel comfortable.",
            "Marked variation here traditionally invites reflection on diet and routine.",
        ],
    },
    SectorTemplate {
        key: "spine",
        name: "Back & Spine",
        system: BodySystem::Musculoskeletal,
        from_hour: 8.0,
        to_hour: 10.0,
        description: "Medial sector associated with the back.",
        reflections: [
            "Regular movement keeps the back feeling supple.",
            "Some variation appears here; consider how long you sit each day.",
            "Noticeable variation here is a traditional cue to balance sitting with movement.",
        ],
    },
    SectorTemplate {
        key: "ear_neck",
        name: "Ear & Neck",
        system: BodySystem::Sensory,
        from_hour: 10.0,
        to_hour: 11.0,
        description: "Upper medial sector associated with hearing and the neck.",
        reflections: [
            "Quiet environments give the senses a break.",
            "Some variation appears here; neck stretches may feel relieving.",
            "Marked variation here traditionally suggests noticing neck tension and noise exposure.",
        ],
    },
];

/// Substitutions for organs that sit on the left side of the body, keyed by
/// the right-eye sector they replace.
const LEFT_SUBSTITUTIONS: &[(&str, SectorTemplate)] = &[
    (
        "liver",
        SectorTemplate {
            key: "spleen",
            name: "Spleen & Pancreas",
            system: BodySystem::Lymphatic,
            from_hour: 7.0,
            to_hour: 8.0,
            description: "Sector associated with the spleen and blood sugar balance.",
            reflections: [
                "Regular meal times support steady energy.",
                "Some variation appears here; notice energy dips between meals.",
                "Noticeable variation here is a traditional cue to reflect on meal rhythm.",
            ],
        },
    ),
    (
        "spine",
        SectorTemplate {
            key: "heart",
            name: "Heart",
            system: BodySystem::Circulatory,
            from_hour: 8.0,
            to_hour: 10.0,
            description: "Sector associated with circulation and the heart.",
            reflections: [
                "Daily walks are a pleasant way to stay active.",
                "Some variation appears here; light cardio may feel energizing.",
                "Marked variation here traditionally invites attention to activity and relaxation.",
            ],
        },
    ),
];

fn sector_zone(side: EyeSide, sector: &SectorTemplate) -> Zone {
    let (from, to) = match side {
        EyeSide::Right => (sector.from_hour, sector.to_hour),
        // Mirroring reverses the sweep: clockwise h1 -> h2 becomes 12-h2 -> 12-h1.
        EyeSide::Left => (12.0 - sector.to_hour, 12.0 - sector.from_hour),
    };
    Zone::from_clock(
        &format!("{}.{}", side.key(), sector.key),
        sector.name,
        sector.system,
        from,
        to,
        INTESTINE_OUTER,
        ORGAN_OUTER,
        sector.description,
        &sector.reflections,
    )
}

#[allow(clippy::too_many_arguments)]
fn ring_zone(
    side: EyeSide,
    key: &str,
    name: &str,
    system: BodySystem,
    inner: f64,
    outer: f64,
    description: &str,
    reflections: &[&str],
) -> Zone {
    Zone::from_clock(
        &format!("{}.{}", side.key(), key),
        name,
        system,
        0.0,
        12.0,
        inner,
        outer,
        description,
        reflections,
    )
}

/// Ordered zone list for one eye.
///
/// The order is stable (inner rings, organ sectors clockwise from noon, outer
/// rings) and is the order zone analyses are reported in. A fresh list is
/// built on every call.
pub fn zones_for_eye(side: EyeSide) -> Vec<Zone> {
    let mut zones = Vec::with_capacity(RIGHT_SECTORS.len() + 4);

    zones.push(ring_zone(
        side,
        "stomach",
        "Stomach",
        BodySystem::Digestive,
        0.0,
        STOMACH_OUTER,
        "Innermost ring around the pupil, associated with digestion.",
        &[
            "Mindful, unhurried meals are a pleasant habit.",
            "Some variation appears here; notice how meals sit with you.",
            "Noticeable variation here is a traditional cue to reflect on eating pace and comfort.",
        ],
    ));
    zones.push(ring_zone(
        side,
        "intestines",
        "Intestines",
        BodySystem::Digestive,
        STOMACH_OUTER,
        INTESTINE_OUTER,
        "Ring inside the collarette, associated with absorption.",
        &[
            "Fiber-rich foods and water support regular routines.",
            "Some variation appears here; consider the variety in your diet.",
            "Marked variation here traditionally invites reflection on diet variety.",
        ],
    ));

    for sector in RIGHT_SECTORS {
        let sector = match side {
            EyeSide::Right => sector,
            EyeSide::Left => LEFT_SUBSTITUTIONS
                .iter()
                .find(|(replaced, _)| *replaced == sector.key)
                .map(|(_, sub)| sub)
                .unwrap_or(sector),
        };
        zones.push(sector_zone(side, sector));
    }

    zones.push(ring_zone(
        side,
        "lymph",
        "Lymphatic Rosary",
        BodySystem::Lymphatic,
        ORGAN_OUTER,
        LYMPH_OUTER,
        "Band near the rim associated with lymph flow.",
        &[
            "Gentle movement through the day keeps you feeling light.",
            "Some variation appears here; light exercise may feel refreshing.",
            "Noticeable variation here is a traditional cue to add regular movement.",
        ],
    ));
    zones.push(ring_zone(
        side,
        "skin",
        "Skin",
        BodySystem::Integumentary,
        LYMPH_OUTER,
        RIM,
        "Outermost band at the iris rim, associated with the skin.",
        &[
            "Sun protection and hydration are simple skin habits.",
            "Some variation appears here; notice how your skin feels in dry weather.",
            "Marked variation here traditionally invites attention to skin care routines.",
        ],
    ));

    zones
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::zone::clock_angle;
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    fn claim_count(zones: &[Zone], angle: f64, r: f64) -> usize {
        zones.iter().filter(|z| z.contains(angle, r)).count()
    }

    #[test]
    fn test_zone_count_and_order() {
        for side in [EyeSide::Left, EyeSide::Right] {
            let zones = zones_for_eye(side);
            assert_eq!(zones.len(), 12);
            assert!(zones[0].id.ends_with("stomach"));
            assert!(zones[2].id.ends_with("brain"));
            assert!(zones[11].id.ends_with("skin"));
            for zone in &zones {
                assert!(zone.inner_radius <= zone.outer_radius);
                assert_eq!(zone.reflections.len(), 3);
                assert!(zone.id.starts_with(side.key()));
            }
        }
    }

    #[test]
    fn test_containment_is_total_and_disjoint() {
        for side in [EyeSide::Left, EyeSide::Right] {
            let zones = zones_for_eye(side);
            for ai in 0..720 {
                let angle = ai as f64 * TAU / 720.0;
                for ri in 0..=100 {
                    let r = ri as f64 / 100.0;
                    assert_eq!(
                        claim_count(&zones, angle, r),
                        1,
                        "{side:?} angle {angle} radius {r}"
                    );
                }
                assert_eq!(claim_count(&zones, angle, 1.01), 0);
            }
        }
    }

    #[test]
    fn test_clock_hours_land_in_expected_sectors() {
        let right = zones_for_eye(EyeSide::Right);
        let find = |angle: f64| {
            right
                .iter()
                .find(|z| z.contains(angle, 0.6))
                .map(|z| z.id.clone())
                .unwrap()
        };
        assert_eq!(find(FRAC_PI_2), "right.brain");
        assert_eq!(find(0.0), "right.lung");
        assert_eq!(find(3.0 * FRAC_PI_2), "right.kidney");
        assert_eq!(find(clock_angle(9.0)), "right.spine");
        assert_eq!(find(clock_angle(7.5)), "right.liver");
    }

    #[test]
    fn test_left_eye_mirrors_and_substitutes() {
        let left = zones_for_eye(EyeSide::Left);
        let find = |angle: f64| {
            left.iter()
                .find(|z| z.contains(angle, 0.6))
                .map(|z| z.id.clone())
                .unwrap()
        };
        // Lungs move to the 9 o'clock side, heart takes the 3 o'clock side.
        assert_eq!(find(PI), "left.lung");
        assert_eq!(find(0.0), "left.heart");
        assert_eq!(find(clock_angle(4.5)), "left.spleen");
        assert_eq!(find(FRAC_PI_2), "left.brain");
        assert!(left.iter().all(|z| z.id != "left.liver"));
    }

    #[test]
    fn test_lateral_sector_wraps() {
        let right = zones_for_eye(EyeSide::Right);
        let lung = right.iter().find(|z| z.id == "right.lung").unwrap();
        assert!(lung.wraps());
        assert!(lung.contains(-0.2, 0.5));
        assert!(lung.contains(0.2, 0.5));
    }
}
