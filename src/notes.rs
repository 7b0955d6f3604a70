//! Keyboard layout and note-to-frequency conversion.
//!
//! Two chromatic rows: `z s x d c f v g b h n j` covers C4..B4 and
//! `q 2 w 3 e 4 r 5 t 6 y 7 u 8 i 9 o` covers C5..E6.

/// Keys in layout order, paired with the note each one plays.
pub const KEY_NOTES: [(char, &str); 29] = [
    ('z', "C4"),
    ('s', "C#4"),
    ('x', "D4"),
    ('d', "D#4"),
    ('c', "E4"),
    ('f', "F4"),
    ('v', "F#4"),
    ('g', "G4"),
    ('b', "G#4"),
    ('h', "A4"),
    ('n', "A#4"),
    ('j', "B4"),
    ('q', "C5"),
    ('2', "C#5"),
    ('w', "D5"),
    ('3', "D#5"),
    ('e', "E5"),
    ('4', "F5"),
    ('r', "F#5"),
    ('5', "G5"),
    ('t', "G#5"),
    ('6', "A5"),
    ('y', "A#5"),
    ('7', "B5"),
    ('u', "C6"),
    ('8', "C#6"),
    ('i', "D6"),
    ('9', "D#6"),
    ('o', "E6"),
];

/// Standard concert pitch for A4.
pub const A4_HZ: f64 = 440.0;

/// Note name played by `key`, if the key is mapped.
pub fn key_note(key: char) -> Option<&'static str> {
    KEY_NOTES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, note)| *note)
}

/// Frequency played by `key`, if the key is mapped.
pub fn key_frequency(key: char) -> Option<f64> {
    key_note(key).and_then(note_to_frequency)
}

/// Parse a note name (e.g. "C4", "F#3", "Bb5") into a MIDI note number.
pub fn note_to_midi(note: &str) -> Option<i32> {
    let mut chars = note.chars();
    let base_semitone = match chars.next()? {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    let rest = chars.as_str();
    let (semitone, octave_str) = match rest.as_bytes().first() {
        Some(b'#') => (base_semitone + 1, &rest[1..]),
        Some(b'b') => (base_semitone - 1, &rest[1..]),
        _ => (base_semitone, rest),
    };

    let octave: i32 = octave_str.parse().ok()?;

    // C4 = 60
    Some((octave + 1) * 12 + semitone)
}

/// Equal-tempered frequency of a MIDI note, with A4 (69) at `tuning_pitch`.
pub fn midi_to_frequency(midi: i32, tuning_pitch: f64) -> f64 {
    tuning_pitch * (2.0_f64).powf((midi as f64 - 69.0) / 12.0)
}

/// Frequency of a note name at A4 = 440 Hz.
pub fn note_to_frequency(note: &str) -> Option<f64> {
    note_to_midi(note).map(|midi| midi_to_frequency(midi, A4_HZ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_note_names() {
        assert_eq!(note_to_midi("C4"), Some(60));
        assert_eq!(note_to_midi("A4"), Some(69));
        assert_eq!(note_to_midi("C#5"), Some(73));
        assert_eq!(note_to_midi("Bb3"), Some(58));
        assert_eq!(note_to_midi("H4"), None);
        assert_eq!(note_to_midi("C"), None);
        assert_eq!(note_to_midi(""), None);
    }

    #[test]
    fn a4_is_440() {
        assert_eq!(key_frequency('h'), Some(440.0));
    }

    #[test]
    fn layout_matches_rounded_table() {
        let table = [
            ('z', 261.63),
            ('f', 349.23),
            ('q', 523.25),
            ('6', 880.00),
            ('u', 1046.50),
            ('9', 1244.51),
            ('o', 1318.51),
        ];
        for (key, hz) in table {
            let got = key_frequency(key).unwrap();
            assert!((got - hz).abs() < 0.01, "key {key:?}: {got} vs {hz}");
        }
    }

    #[test]
    fn every_key_is_mapped_once_and_ascends() {
        let freqs: Vec<f64> = KEY_NOTES
            .iter()
            .map(|(key, _)| key_frequency(*key).unwrap())
            .collect();
        assert!(freqs.windows(2).all(|w| w[0] < w[1]));

        let mut keys: Vec<char> = KEY_NOTES.iter().map(|(k, _)| *k).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), KEY_NOTES.len());
    }

    #[test]
    fn unmapped_keys() {
        assert_eq!(key_frequency('a'), None);
        assert_eq!(key_frequency('\u{1b}'), None);
    }
}
