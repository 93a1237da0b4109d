//! Rule-based interval patterns.

use arpeggiator_spec::PatternStyle;
use rand::Rng;

/// Number of scale degrees a pattern moves over.
pub const DEGREES: u8 = 8;

/// `0, 1, ..., 7, 0, 1, ...`
pub fn ascending(total_notes: usize) -> Vec<u8> {
    (0..total_notes).map(degree).collect()
}

/// `7, 6, ..., 0, 7, 6, ...`
pub fn descending(total_notes: usize) -> Vec<u8> {
    (0..total_notes).map(|i| DEGREES - 1 - degree(i)).collect()
}

/// Ascending run of eight, then descending run of eight, repeating.
pub fn alternating(total_notes: usize) -> Vec<u8> {
    (0..total_notes)
        .map(|i| {
            if (i / DEGREES as usize) % 2 == 0 {
                degree(i)
            } else {
                DEGREES - 1 - degree(i)
            }
        })
        .collect()
}

/// Uniform degree in [0, 7] per note.
pub fn random<R: Rng + ?Sized>(total_notes: usize, rng: &mut R) -> Vec<u8> {
    (0..total_notes)
        .map(|_| rng.gen_range(0..DEGREES))
        .collect()
}

/// Dispatches to the rule-based pattern for `style`.
///
/// `AiGenerated` is handled by [`super::ai::AiPatternGenerator`]; passed here
/// it produces the ascending pattern.
pub fn pattern_for_style<R: Rng + ?Sized>(
    style: PatternStyle,
    total_notes: usize,
    rng: &mut R,
) -> Vec<u8> {
    match style {
        PatternStyle::Ascending | PatternStyle::AiGenerated => ascending(total_notes),
        PatternStyle::Descending => descending(total_notes),
        PatternStyle::Alternating => alternating(total_notes),
        PatternStyle::Random => random(total_notes, rng),
    }
}

fn degree(i: usize) -> u8 {
    (i % DEGREES as usize) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ascending() {
        assert_eq!(ascending(10), vec![0, 1, 2, 3, 4, 5, 6, 7, 0, 1]);
    }

    #[test]
    fn test_descending() {
        assert_eq!(descending(4), vec![7, 6, 5, 4]);
        assert_eq!(descending(9), vec![7, 6, 5, 4, 3, 2, 1, 0, 7]);
    }

    #[test]
    fn test_alternating_toggles_every_eight() {
        let pattern = alternating(20);
        assert_eq!(&pattern[..8], &[0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(&pattern[8..16], &[7, 6, 5, 4, 3, 2, 1, 0]);
        assert_eq!(&pattern[16..], &[0, 1, 2, 3]);
    }

    #[test]
    fn test_random_is_seeded_and_in_range() {
        let a = random(64, &mut create_rng(7));
        let b = random(64, &mut create_rng(7));
        assert_eq!(a, b);
        assert!(a.iter().all(|d| *d < DEGREES));
    }

    #[test]
    fn test_empty_length() {
        let mut rng = create_rng(1);
        for style in PatternStyle::ALL {
            assert!(pattern_for_style(style, 0, &mut rng).is_empty());
        }
    }
}
