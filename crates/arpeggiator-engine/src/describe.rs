//! Human-readable pattern summaries.

use crate::mood;

/// Overall direction of an interval pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Static,
    Ascending,
    Descending,
    Alternating,
}

impl Movement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Movement::Static => "static",
            Movement::Ascending => "ascending",
            Movement::Descending => "descending",
            Movement::Alternating => "alternating",
        }
    }
}

/// Classifies the direction of adjacent interval steps.
///
/// One direction wins when its step count exceeds the other's by more than
/// half; repeated degrees count for neither.
pub fn analyze_movement(intervals: &[u8]) -> Movement {
    if intervals.len() < 2 {
        return Movement::Static;
    }
    let (rising, falling) = intervals
        .windows(2)
        .fold((0usize, 0usize), |(up, down), pair| {
            if pair[1] > pair[0] {
                (up + 1, down)
            } else if pair[1] < pair[0] {
                (up, down + 1)
            } else {
                (up, down)
            }
        });

    // rising > falling * 1.5, in integers
    if rising * 2 > falling * 3 {
        Movement::Ascending
    } else if falling * 2 > rising * 3 {
        Movement::Descending
    } else {
        Movement::Alternating
    }
}

/// `"{Mood} {scale} arpeggio with {movement} movement"`.
///
/// # Examples
/// ```
/// use arpeggiator_engine::describe::describe_pattern;
///
/// assert_eq!(
///     describe_pattern("dark", &[7, 6, 5, 4]),
///     "Dark minor arpeggio with descending movement"
/// );
/// ```
pub fn describe_pattern(mood_name: &str, intervals: &[u8]) -> String {
    let config = mood::lookup(mood_name);
    format!(
        "{} {} arpeggio with {} movement",
        capitalize(config.name),
        config.scale_type.as_str(),
        analyze_movement(intervals).as_str()
    )
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{alternating, ascending};

    #[test]
    fn test_short_patterns_are_static() {
        assert_eq!(analyze_movement(&[]), Movement::Static);
        assert_eq!(analyze_movement(&[3]), Movement::Static);
    }

    #[test]
    fn test_ascending_pattern() {
        // 28 rises, 3 falls (7 -> 0 wraps)
        assert_eq!(analyze_movement(&ascending(32)), Movement::Ascending);
        assert_eq!(
            describe_pattern("happy", &ascending(32)),
            "Happy major arpeggio with ascending movement"
        );
    }

    #[test]
    fn test_alternating_pattern() {
        assert_eq!(analyze_movement(&alternating(32)), Movement::Alternating);
    }

    #[test]
    fn test_flat_pattern_is_alternating() {
        assert_eq!(analyze_movement(&[2, 2, 2, 2]), Movement::Alternating);
    }

    #[test]
    fn test_threshold_is_strict() {
        // 3 rises, 2 falls: exactly 1.5x, not enough
        assert_eq!(analyze_movement(&[0, 1, 0, 1, 0, 1]), Movement::Alternating);
        // 4 rises, 2 falls
        assert_eq!(analyze_movement(&[0, 1, 2, 1, 2, 1, 2]), Movement::Ascending);
    }

    #[test]
    fn test_unknown_mood_describes_as_happy() {
        assert_eq!(
            describe_pattern("jazzy", &[0]),
            "Happy major arpeggio with static movement"
        );
        assert_eq!(
            describe_pattern("chaotic", &[0, 5]),
            "Chaotic chromatic arpeggio with ascending movement"
        );
    }
}
