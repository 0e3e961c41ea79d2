//! Parameters of the PCM playback test.

use simple_audio_out::{SampleFormat, SamplingRate};

pub const PCM_SAMPLING_RATE: SamplingRate = SamplingRate::HZ_22050;
pub const PCM_CHANNEL_COUNT: u8 = 2;
pub const PCM_SAMPLE_FORMAT: SampleFormat = SampleFormat::S16LE;

/// Ramp frequencies in Hz, played in order, one buffer each.
/// Three octaves each of 260, 480, and 170 Hz.
pub const PCM_TEST_FREQUENCIES: [u16; 9] = [
    260, 520, 1040,
    480, 960, 1920,
    170, 340, 680,
];
