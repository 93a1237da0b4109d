//! Property tests over the whole parameter space.

use arpeggiator_engine::midi::decode;
use arpeggiator_engine::mood::{config_for, lookup};
use arpeggiator_engine::ArpeggioGenerator;
use arpeggiator_spec::{ArpeggioParams, Mood, PatternStyle};
use proptest::prelude::*;

fn any_key() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["A", "B", "C", "D", "E", "F", "G"]),
        prop::sample::select(vec!["", "#", "b"]),
    )
        .prop_map(|(letter, accidental)| format!("{letter}{accidental}"))
}

fn any_params() -> impl Strategy<Value = ArpeggioParams> {
    (
        any_key(),
        prop::sample::select(Mood::ALL.to_vec()),
        40u16..=240,
        1u8..=8,
        prop::sample::select(PatternStyle::ALL.to_vec()),
        any::<i64>(),
    )
        .prop_map(|(key, mood, bpm, num_bars, pattern_style, seed)| ArpeggioParams {
            key,
            mood,
            bpm,
            num_bars,
            pattern_style,
            seed: Some(seed),
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_generated_arpeggio_is_well_formed(params in any_params()) {
        let result = ArpeggioGenerator::offline().generate(&params).unwrap();
        let config = config_for(params.mood);

        prop_assert_eq!(result.notes.len(), config.total_notes(usize::from(params.num_bars)));
        prop_assert!(result.intervals.iter().all(|v| *v < 8));
        for pair in result.notes.windows(2) {
            prop_assert_eq!(pair[0].end, pair[1].start);
        }
        for note in &result.notes {
            prop_assert!((21..=108).contains(&note.pitch));
            prop_assert!((config.velocity_range.0..=config.velocity_range.1).contains(&note.velocity));
        }
    }

    #[test]
    fn prop_seeded_generation_is_reproducible(params in any_params()) {
        let generator = ArpeggioGenerator::offline();
        let a = generator.generate(&params).unwrap();
        let b = generator.generate(&params).unwrap();
        prop_assert_eq!(a.midi, b.midi);
    }

    #[test]
    fn prop_midi_decodes_to_same_note_count(params in any_params()) {
        let result = ArpeggioGenerator::offline().generate(&params).unwrap();
        let summary = decode(&result.midi).unwrap();
        prop_assert_eq!(summary.note_count, result.notes.len());
        prop_assert!((summary.duration - result.duration).abs() < 1e-2);
    }

    #[test]
    fn prop_unknown_mood_lookup_is_happy(name in "[a-z]{1,12}") {
        prop_assume!(Mood::from_name(&name).is_none());
        prop_assert_eq!(lookup(&name), lookup("happy"));
    }
}
