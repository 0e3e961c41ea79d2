//! A periodic ramp (sawtooth) waveform.
//!
//! Each period rises linearly from `i16::MIN` to `0`, then restarts.
//! Every channel of a frame carries the same value.

use simple_audio_out::SamplingRate;
use uefi::{Result, Status};

fn div_round_up(a: usize, b: usize) -> usize {
    (a + b - 1) / b
}

/// Returns the ramp period in frames, `ceil(sampling_rate / frequency)`.
///
/// Returns `INVALID_PARAMETER` if `frequency` or `sampling_rate` is zero.
pub fn period(sampling_rate: SamplingRate, frequency: u16) -> Result<usize> {
    if frequency == 0 || sampling_rate.hz() == 0 {
        return Err(Status::INVALID_PARAMETER.into());
    }
    Ok(div_round_up(sampling_rate.hz() as usize, frequency as usize))
}

/// Returns the sample at `phase` within a ramp of `period` frames.
///
/// Phase 0 is `i16::MIN` and phase `period - 1` is `0`.
/// A single-frame period stays at `i16::MIN`.
pub fn sample(phase: usize, period: usize) -> i16 {
    debug_assert!(phase < period);
    if period <= 1 {
        return i16::MIN;
    }
    let low = i16::MIN as i64;
    let span = 0 - low;
    let value = low + span * phase as i64 / (period as i64 - 1);
    value as i16
}

/// Fills `samples` with interleaved frames of a ramp with the given `period`.
///
/// `period` comes from [`period()`] and is never zero.
/// `samples.len()` must be a multiple of `channel_count`; a trailing partial frame is left untouched.
pub(crate) fn fill(samples: &mut [i16], channel_count: u8, period: usize) {
    debug_assert!(period > 0);
    let channels = channel_count.max(1) as usize;
    for (index, frame) in samples.chunks_exact_mut(channels).enumerate() {
        frame.fill(sample(index % period, period));
    }
}
