use rand::Rng;
use rand::seq::SliceRandom;

use crate::biometric::types::TemplateType;

const REAL_PATTERNS: [&str; 5] = [
    "MINUTIAE_RIDGE_ENDING",
    "MINUTIAE_BIFURCATION",
    "MINUTIAE_ISLAND",
    "MINUTIAE_SPUR",
    "MINUTIAE_CROSSOVER",
];

const DEMO_PATTERNS: [&str; 5] = [
    "DEMO_ARCH_LOOP",
    "DEMO_WHORL_SPIRAL",
    "DEMO_TENTED_ARCH",
    "DEMO_LEFT_LOOP",
    "DEMO_RIGHT_LOOP",
];

// Used by the scanner when no base template has been stored
const LEGACY_DEMO_PATTERNS: [&str; 5] = [
    "ARCH_LOOP_",
    "WHORL_SPIRAL_",
    "TENTED_ARCH_",
    "LEFT_LOOP_",
    "RIGHT_LOOP_",
];

const REAL_COORDINATES: usize = 20;
const REAL_COORDINATE_RANGE: u32 = 512;
const DEMO_MINUTIAE: usize = 25;
const LEGACY_MINUTIAE: usize = 15;

/// Build a synthetic template string.
///
/// `real`: `REAL_<pattern>_<20 x 3 hex digits>_<device_id>_<timestamp>`
/// `demo`: `<pattern>_<25 x 2 hex digits>_<device_id>_<timestamp>`
pub(crate) fn generate_template<R: Rng + ?Sized>(
    template_type: TemplateType,
    device_id: &str,
    timestamp: i64,
    rng: &mut R,
) -> String {
    match template_type {
        TemplateType::Real => {
            let pattern = pick(&REAL_PATTERNS, rng);
            let coordinates: String = (0..REAL_COORDINATES)
                .map(|_| format!("{:03x}", rng.gen_range(0..REAL_COORDINATE_RANGE)))
                .collect();
            format!("REAL_{pattern}_{coordinates}_{device_id}_{timestamp}")
        }
        TemplateType::Demo => {
            let pattern = pick(&DEMO_PATTERNS, rng);
            let minutiae = random_hex_bytes(DEMO_MINUTIAE, rng);
            format!("{pattern}_{minutiae}_{device_id}_{timestamp}")
        }
    }
}

/// Older demo template format: `<pattern><15 x 2 hex digits>_<timestamp>`.
pub(crate) fn generate_legacy_demo_template<R: Rng + ?Sized>(timestamp: i64, rng: &mut R) -> String {
    let pattern = pick(&LEGACY_DEMO_PATTERNS, rng);
    let minutiae = random_hex_bytes(LEGACY_MINUTIAE, rng);
    format!("{pattern}{minutiae}_{timestamp}")
}

fn pick<'a, R: Rng + ?Sized>(patterns: &[&'a str], rng: &mut R) -> &'a str {
    patterns.choose(rng).copied().unwrap_or_default()
}

fn random_hex_bytes<R: Rng + ?Sized>(count: usize, rng: &mut R) -> String {
    (0..count)
        .map(|_| format!("{:02x}", rng.r#gen::<u8>()))
        .collect()
}
