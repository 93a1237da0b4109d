//! Standard MIDI File encoding and decoding.
//!
//! Output is SMF Format 0: a single track holding the tempo, a track name,
//! a piano program change and the notes on channel 0. Decoding accepts any
//! format and honours tempo changes, so files from other tools can be
//! inspected too.
//!
//! Uses the `midly` crate for reading and writing.

use std::collections::{HashMap, VecDeque};

use arpeggiator_spec::BackendError;
use base64::Engine;
use midly::{
    num::{u15, u24, u28, u4, u7},
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
};
use serde::Serialize;
use thiserror::Error;

use crate::render::{total_duration, Note};

/// Ticks per quarter note in MIDI output.
pub const TICKS_PER_QUARTER: u16 = 480;

/// Tempo assumed by decoders when a file declares none.
const DEFAULT_TEMPO_MICROS: u32 = 500_000;

const TRACK_NAME: &[u8] = b"Arpeggio";

const MAX_DATA_BYTE: u8 = 127;

/// Largest delta-time a track event can carry.
const MAX_TICK: u32 = 0x0FFF_FFFF;

/// Acoustic grand piano.
const PIANO_PROGRAM: u8 = 0;

/// Error type for MIDI operations.
#[derive(Debug, Error)]
pub enum MidiError {
    /// The container could not be built or serialized.
    #[error("MIDI encode error: {0}")]
    Encode(String),

    /// The input is not a readable MIDI file.
    #[error("MIDI decode error: {0}")]
    Decode(String),
}

impl BackendError for MidiError {
    fn code(&self) -> &'static str {
        match self {
            MidiError::Encode(_) => "MIDI_001",
            MidiError::Decode(_) => "MIDI_002",
        }
    }

    fn category(&self) -> &'static str {
        "midi"
    }
}

/// Summary of an encoded container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MidiInfo {
    /// End time of the last note, in seconds.
    pub duration: f64,
    pub note_count: usize,
    /// Tempo declared by the file, in BPM.
    pub estimated_tempo: f64,
}

/// An in-memory single-track MIDI file.
#[derive(Debug, Clone)]
pub struct MidiContainer {
    smf: Smf<'static>,
    tempo_micros: u32,
    duration: f64,
    note_count: usize,
}

impl MidiContainer {
    /// Encodes notes at the given tempo.
    ///
    /// Note times in seconds are quantized to ticks at `bpm`. Events at the
    /// same tick keep note-offs ahead of note-ons, so back-to-back notes on
    /// one pitch retrigger cleanly.
    pub fn encode(notes: &[Note], bpm: u16) -> Result<Self, MidiError> {
        if bpm == 0 {
            return Err(MidiError::Encode("tempo must be positive".to_string()));
        }
        let tempo_micros = 60_000_000 / u32::from(bpm);

        let mut smf = Smf::new(Header::new(
            Format::SingleTrack,
            Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
        ));

        let mut track: Track<'static> = Vec::with_capacity(notes.len() * 2 + 4);
        track.push(meta(MetaMessage::TrackName(TRACK_NAME)));
        track.push(meta(MetaMessage::Tempo(u24::new(tempo_micros))));
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel: u4::new(0),
                message: MidiMessage::ProgramChange {
                    program: u7::new(PIANO_PROGRAM),
                },
            },
        });

        // (tick, is_note_on, message)
        let mut events: Vec<(u32, bool, MidiMessage)> = Vec::with_capacity(notes.len() * 2);
        for note in notes {
            if note.pitch > MAX_DATA_BYTE || note.velocity > MAX_DATA_BYTE {
                return Err(MidiError::Encode(format!(
                    "note {}/{} outside the 7-bit range",
                    note.pitch, note.velocity
                )));
            }
            let key = u7::new(note.pitch);
            let vel = u7::new(note.velocity);
            let start = seconds_to_ticks(note.start, bpm)?;
            let end = seconds_to_ticks(note.end, bpm)?.max(start + 1);
            events.push((start, true, MidiMessage::NoteOn { key, vel }));
            events.push((
                end,
                false,
                MidiMessage::NoteOff {
                    key,
                    vel: u7::new(0),
                },
            ));
        }
        events.sort_by_key(|(tick, is_on, _)| (*tick, *is_on));

        let mut last_tick = 0;
        for (tick, _, message) in events {
            track.push(TrackEvent {
                delta: u28::new(tick - last_tick),
                kind: TrackEventKind::Midi {
                    channel: u4::new(0),
                    message,
                },
            });
            last_tick = tick;
        }
        track.push(meta(MetaMessage::EndOfTrack));
        smf.tracks.push(track);

        Ok(Self {
            smf,
            tempo_micros,
            duration: total_duration(notes),
            note_count: notes.len(),
        })
    }

    /// Serializes to Standard MIDI File bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, MidiError> {
        let mut buf = Vec::new();
        self.smf
            .write_std(&mut buf)
            .map_err(|e| MidiError::Encode(e.to_string()))?;
        Ok(buf)
    }

    /// Standard base64 of [`Self::to_bytes`].
    pub fn to_base64(&self) -> Result<String, MidiError> {
        let bytes = self.to_bytes()?;
        Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn describe(&self) -> MidiInfo {
        MidiInfo {
            duration: self.duration,
            note_count: self.note_count,
            estimated_tempo: micros_to_bpm(self.tempo_micros),
        }
    }
}

/// A note recovered from a MIDI file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecodedNote {
    pub channel: u8,
    pub pitch: u8,
    pub velocity: u8,
    pub start: f64,
    pub end: f64,
}

/// Result of decoding a MIDI file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MidiSummary {
    /// 0, 1 or 2.
    pub format: u8,
    pub track_count: usize,
    /// Ticks per quarter note, or `None` for timecode timing.
    pub ticks_per_quarter: Option<u16>,
    /// First declared tempo in BPM (120 when none is declared).
    pub estimated_tempo: f64,
    /// Latest note end, in seconds.
    pub duration: f64,
    pub note_count: usize,
    /// Notes sorted by start time.
    pub notes: Vec<DecodedNote>,
}

/// Decodes Standard MIDI File bytes.
///
/// Note-ons with velocity zero count as note-offs. Overlapping notes on one
/// channel and pitch pair first-in first-out. Notes never released are
/// dropped.
pub fn decode(bytes: &[u8]) -> Result<MidiSummary, MidiError> {
    let smf = Smf::parse(bytes).map_err(|e| MidiError::Decode(e.to_string()))?;

    let format = match smf.header.format {
        Format::SingleTrack => 0,
        Format::Parallel => 1,
        Format::Sequential => 2,
    };

    // Every track's events on one absolute-tick timeline. The sort is stable,
    // so events sharing a tick keep their file order.
    let mut events: Vec<(u64, &TrackEventKind)> = smf
        .tracks
        .iter()
        .flat_map(|track| {
            let mut tick = 0u64;
            track.iter().map(move |event| {
                tick += u64::from(event.delta.as_int());
                (tick, &event.kind)
            })
        })
        .collect();
    events.sort_by_key(|(tick, _)| *tick);

    let tempo_changes: Vec<(u64, u32)> = events
        .iter()
        .filter_map(|(tick, kind)| match kind {
            TrackEventKind::Meta(MetaMessage::Tempo(t)) => Some((*tick, t.as_int())),
            _ => None,
        })
        .collect();
    let clock = Clock::new(smf.header.timing, tempo_changes);

    let mut notes = Vec::new();
    let mut open: HashMap<(u8, u8), VecDeque<(u64, u8)>> = HashMap::new();
    for (tick, kind) in &events {
        let TrackEventKind::Midi { channel, message } = kind else {
            continue;
        };
        let channel = channel.as_int();
        match *message {
            MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                open.entry((channel, key.as_int()))
                    .or_default()
                    .push_back((*tick, vel.as_int()));
            }
            MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                let started = open
                    .get_mut(&(channel, key.as_int()))
                    .and_then(|queue| queue.pop_front());
                if let Some((start_tick, velocity)) = started {
                    notes.push(DecodedNote {
                        channel,
                        pitch: key.as_int(),
                        velocity,
                        start: clock.seconds_at(start_tick),
                        end: clock.seconds_at(*tick),
                    });
                }
            }
            _ => {}
        }
    }
    notes.sort_by(|a, b| a.start.total_cmp(&b.start).then(a.pitch.cmp(&b.pitch)));

    let duration = notes.iter().map(|n| n.end).fold(0.0, f64::max);
    let ticks_per_quarter = match smf.header.timing {
        Timing::Metrical(tpq) => Some(tpq.as_int()),
        Timing::Timecode(..) => None,
    };

    Ok(MidiSummary {
        format,
        track_count: smf.tracks.len(),
        ticks_per_quarter,
        estimated_tempo: micros_to_bpm(clock.initial_tempo()),
        duration,
        note_count: notes.len(),
        notes,
    })
}

/// Converts absolute ticks to seconds along a tempo map.
struct Clock {
    timing: Timing,
    /// (tick, microseconds per quarter), sorted by tick.
    tempo_changes: Vec<(u64, u32)>,
}

impl Clock {
    fn new(timing: Timing, tempo_changes: Vec<(u64, u32)>) -> Self {
        Self {
            timing,
            tempo_changes,
        }
    }

    fn initial_tempo(&self) -> u32 {
        self.tempo_changes
            .first()
            .map(|(_, micros)| *micros)
            .unwrap_or(DEFAULT_TEMPO_MICROS)
    }

    fn seconds_at(&self, tick: u64) -> f64 {
        match self.timing {
            Timing::Timecode(fps, subframes) => {
                tick as f64 / (f64::from(fps.as_f32()) * f64::from(subframes))
            }
            Timing::Metrical(tpq) => {
                let tpq = f64::from(tpq.as_int());
                let mut seconds = 0.0;
                let mut segment_start = 0u64;
                let mut micros = DEFAULT_TEMPO_MICROS;
                for &(change_tick, change_micros) in &self.tempo_changes {
                    if change_tick >= tick {
                        break;
                    }
                    seconds += (change_tick - segment_start) as f64 * f64::from(micros) / tpq / 1e6;
                    segment_start = change_tick;
                    micros = change_micros;
                }
                seconds + (tick - segment_start) as f64 * f64::from(micros) / tpq / 1e6
            }
        }
    }
}

fn meta(message: MetaMessage<'static>) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(message),
    }
}

fn seconds_to_ticks(seconds: f64, bpm: u16) -> Result<u32, MidiError> {
    let ticks = (seconds * f64::from(bpm) / 60.0 * f64::from(TICKS_PER_QUARTER)).round();
    if !(0.0..=f64::from(MAX_TICK)).contains(&ticks) {
        return Err(MidiError::Encode(format!("note time {seconds}s out of range")));
    }
    Ok(ticks as u32)
}

fn micros_to_bpm(micros: u32) -> f64 {
    if micros == 0 {
        return 0.0;
    }
    60_000_000.0 / f64::from(micros)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn note(pitch: u8, start: f64, end: f64) -> Note {
        Note {
            pitch,
            start,
            end,
            velocity: 100,
        }
    }

    #[test]
    fn test_encode_layout() {
        let notes = [note(60, 0.0, 0.5), note(64, 0.5, 1.0)];
        let container = MidiContainer::encode(&notes, 120).unwrap();
        let smf = &container.smf;
        assert_eq!(smf.header.format, Format::SingleTrack);
        assert_eq!(smf.tracks.len(), 1);

        let track = &smf.tracks[0];
        // name, tempo, program, 2 notes x 2 events, end of track
        assert_eq!(track.len(), 8);
        assert_eq!(
            track[1].kind,
            TrackEventKind::Meta(MetaMessage::Tempo(u24::new(500_000)))
        );
        assert_eq!(track.last().unwrap().kind, TrackEventKind::Meta(MetaMessage::EndOfTrack));
    }

    #[test]
    fn test_seconds_to_ticks() {
        assert_eq!(seconds_to_ticks(0.5, 120).unwrap(), 480);
        assert_eq!(seconds_to_ticks(0.125, 120).unwrap(), 120);
        assert_eq!(seconds_to_ticks(1.0, 60).unwrap(), 480);
        assert!(seconds_to_ticks(-1.0, 120).is_err());
    }

    #[test]
    fn test_note_off_precedes_note_on_at_same_tick() {
        let notes = [note(60, 0.0, 0.5), note(60, 0.5, 1.0)];
        let container = MidiContainer::encode(&notes, 120).unwrap();
        let kinds: Vec<&TrackEventKind> = container.smf.tracks[0][3..7]
            .iter()
            .map(|e| &e.kind)
            .collect();
        assert!(matches!(
            kinds[1],
            TrackEventKind::Midi {
                message: MidiMessage::NoteOff { .. },
                ..
            }
        ));
        assert!(matches!(
            kinds[2],
            TrackEventKind::Midi {
                message: MidiMessage::NoteOn { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_describe() {
        let notes = [note(60, 0.0, 0.25), note(62, 0.25, 0.75)];
        let info = MidiContainer::encode(&notes, 100).unwrap().describe();
        assert_eq!(info.note_count, 2);
        assert_eq!(info.duration, 0.75);
        assert!((info.estimated_tempo - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_decode_encoded_file() {
        let notes = [note(60, 0.0, 0.25), note(67, 0.25, 0.5), note(72, 0.5, 1.5)];
        let bytes = MidiContainer::encode(&notes, 120).unwrap().to_bytes().unwrap();
        assert_eq!(&bytes[..4], b"MThd");

        let summary = decode(&bytes).unwrap();
        assert_eq!(summary.format, 0);
        assert_eq!(summary.ticks_per_quarter, Some(TICKS_PER_QUARTER));
        assert_eq!(summary.note_count, 3);
        assert_eq!(summary.duration, 1.5);
        assert_eq!(summary.estimated_tempo, 120.0);
        let pitches: Vec<u8> = summary.notes.iter().map(|n| n.pitch).collect();
        assert_eq!(pitches, vec![60, 67, 72]);
    }

    #[test]
    fn test_decode_honours_tempo_changes_and_zero_velocity_off() {
        let mut smf = Smf::new(Header::new(
            Format::Parallel,
            Timing::Metrical(u15::new(480)),
        ));
        smf.tracks.push(vec![
            meta(MetaMessage::Tempo(u24::new(500_000))),
            TrackEvent {
                delta: u28::new(480),
                kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(1_000_000))),
            },
            meta(MetaMessage::EndOfTrack),
        ]);
        let on = |delta: u32, vel: u8| TrackEvent {
            delta: u28::new(delta),
            kind: TrackEventKind::Midi {
                channel: u4::new(1),
                message: MidiMessage::NoteOn {
                    key: u7::new(64),
                    vel: u7::new(vel),
                },
            },
        };
        // one note spanning the tempo change: 480 ticks at 0.5s + 480 at 1.0s
        smf.tracks
            .push(vec![on(0, 90), on(960, 0), meta(MetaMessage::EndOfTrack)]);

        let mut bytes = Vec::new();
        smf.write_std(&mut bytes).unwrap();
        let summary = decode(&bytes).unwrap();

        assert_eq!(summary.format, 1);
        assert_eq!(summary.track_count, 2);
        assert_eq!(summary.note_count, 1);
        assert_eq!(summary.notes[0].channel, 1);
        assert_eq!(summary.notes[0].velocity, 90);
        assert!((summary.duration - 1.5).abs() < 1e-9);
        assert_eq!(summary.estimated_tempo, 120.0);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode(b"not a midi file").unwrap_err();
        assert_eq!(err.code(), "MIDI_002");
    }

    #[test]
    fn test_zero_tempo_is_rejected() {
        let err = MidiContainer::encode(&[], 0).unwrap_err();
        assert_eq!(err.code(), "MIDI_001");
    }

    #[test]
    fn test_base64_is_standard_alphabet() {
        let container = MidiContainer::encode(&[note(60, 0.0, 1.0)], 120).unwrap();
        let encoded = container.to_base64().unwrap();
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .unwrap();
        assert_eq!(decoded, container.to_bytes().unwrap());
    }
}
