//! Parameters of the tone test.

/// A tone to be generated by the device: `frequency` in Hz, for `duration_ms` milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneSpec {
    pub frequency: i16,
    pub duration_ms: u16,
}

const fn tone(frequency: i16, duration_ms: u16) -> ToneSpec {
    ToneSpec { frequency, duration_ms }
}

/// The tone test's stimulus table.
pub const TEST_TONES: [ToneSpec; 9] = [
    tone(14000, 100),
    tone(2000, 100),
    tone(14000, 100),
    tone(2000, 100),
    tone(14000, 100),
    tone(2000, 100),
    tone(8000, 100),
    tone(2000, 100),
    tone(8000, 100),
];

/// The duration used for every tone the test issues,
/// overriding the per-entry durations of [`TEST_TONES`].
pub const TONE_TEST_DURATION_MS: u16 = 1000;
