//! PCM sample buffers for exercising audio output devices.
//!
//! A [`PcmBuffer`] holds one third of a second of interleaved signed 16-bit samples.
//! It is allocated zero-filled from a [`SamplePool`], filled by the synthesis
//! routines in [`ramp`], handed by reference to a single device write,
//! and returned to its pool when dropped, on every exit path.

#![cfg_attr(not(test), no_std)]

extern crate alloc;
#[macro_use] extern crate log;

pub mod ramp;

use alloc::vec::Vec;
use core::fmt;
use simple_audio_out::SamplingRate;
use uefi::{Error, Result, Status};

/// A source of zero-initialized sample memory.
pub trait SamplePool {
    /// Allocates `count` zeroed samples.
    ///
    /// Returns `OUT_OF_RESOURCES` if the memory cannot be obtained.
    fn allocate_zeroed(&self, count: usize) -> Result<Vec<i16>>;

    /// Returns memory previously obtained from [`SamplePool::allocate_zeroed`].
    fn free(&self, samples: Vec<i16>);
}

/// A [`SamplePool`] backed by the global allocator.
///
/// Inside a UEFI image the global allocator draws from boot services pool memory.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobalPool;

impl SamplePool for GlobalPool {
    fn allocate_zeroed(&self, count: usize) -> Result<Vec<i16>> {
        let mut samples = Vec::new();
        samples.try_reserve_exact(count).map_err(|_| {
            error!("GlobalPool: failed to allocate {} samples", count);
            Error::from(Status::OUT_OF_RESOURCES)
        })?;
        samples.resize(count, 0);
        Ok(samples)
    }

    fn free(&self, samples: Vec<i16>) {
        drop(samples);
    }
}

/// Returns the number of interleaved samples in one third of a second of audio.
///
/// The frame count is `sampling_rate / 3` (rounded down), so the result
/// is always a multiple of `channel_count`.
pub fn sample_count(sampling_rate: SamplingRate, channel_count: u8) -> usize {
    channel_count as usize * (sampling_rate.hz() as usize / 3)
}

/// An exclusively-owned buffer of interleaved samples that returns itself to its pool on drop.
pub struct PcmBuffer<'p, P: SamplePool + ?Sized> {
    samples: Vec<i16>,
    sampling_rate: SamplingRate,
    channel_count: u8,
    pool: &'p P,
}

impl<'p, P: SamplePool + ?Sized> PcmBuffer<'p, P> {
    /// Allocates a zero-filled buffer holding one third of a second of audio
    /// at the given `sampling_rate` and `channel_count`.
    pub fn allocate(pool: &'p P, sampling_rate: SamplingRate, channel_count: u8) -> Result<PcmBuffer<'p, P>> {
        if channel_count == 0 {
            return Err(Status::INVALID_PARAMETER.into());
        }
        let count = sample_count(sampling_rate, channel_count);
        let samples = pool.allocate_zeroed(count)?;
        trace!("PcmBuffer: allocated {} samples ({:?}, {} channels)", count, sampling_rate, channel_count);
        Ok(PcmBuffer { samples, sampling_rate, channel_count, pool })
    }

    /// Overwrites the buffer with a periodic ramp at `frequency` Hz.
    ///
    /// See [`ramp`] for the waveform.
    pub fn fill_ramp(&mut self, frequency: u16) -> Result {
        let period = ramp::period(self.sampling_rate, frequency)?;
        ramp::fill(&mut self.samples, self.channel_count, period);
        Ok(())
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// The number of interleaved samples, counting every channel.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The number of frames, i.e., samples per channel.
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channel_count as usize
    }

    pub fn sampling_rate(&self) -> SamplingRate {
        self.sampling_rate
    }

    pub fn channel_count(&self) -> u8 {
        self.channel_count
    }
}

impl<'p, P: SamplePool + ?Sized> Drop for PcmBuffer<'p, P> {
    fn drop(&mut self) {
        let samples = core::mem::take(&mut self.samples);
        self.pool.free(samples);
    }
}

impl<'p, P: SamplePool + ?Sized> fmt::Debug for PcmBuffer<'p, P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PcmBuffer")
            .field("sampling_rate", &self.sampling_rate)
            .field("channel_count", &self.channel_count)
            .field("len", &self.samples.len())
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    /// Counts outstanding allocations, and can be told to refuse them.
    #[derive(Default)]
    struct CountingPool {
        outstanding: Cell<usize>,
        allocations: Cell<usize>,
        exhausted: bool,
    }

    impl SamplePool for CountingPool {
        fn allocate_zeroed(&self, count: usize) -> Result<Vec<i16>> {
            if self.exhausted {
                return Err(Status::OUT_OF_RESOURCES.into());
            }
            self.outstanding.set(self.outstanding.get() + 1);
            self.allocations.set(self.allocations.get() + 1);
            GlobalPool.allocate_zeroed(count)
        }

        fn free(&self, _samples: Vec<i16>) {
            self.outstanding.set(self.outstanding.get() - 1);
        }
    }

    #[test]
    fn length_is_a_third_of_a_second_for_every_rate() {
        for rate in SamplingRate::ALL {
            for channels in 1..=8u8 {
                let count = sample_count(rate, channels);
                assert_eq!(count % channels as usize, 0, "{:?} x {}", rate, channels);
            }
        }
        assert_eq!(sample_count(SamplingRate::HZ_8000, 2), 5332);
        assert_eq!(sample_count(SamplingRate::HZ_11025, 1), 3675);
        assert_eq!(sample_count(SamplingRate::HZ_16000, 2), 10666);
        assert_eq!(sample_count(SamplingRate::HZ_22050, 2), 14700);
        assert_eq!(sample_count(SamplingRate::HZ_32000, 1), 10666);
        assert_eq!(sample_count(SamplingRate::HZ_44100, 1), 14700);
        assert_eq!(sample_count(SamplingRate::HZ_48000, 2), 32000);
    }

    #[test]
    fn allocated_buffer_is_zeroed() {
        let pool = CountingPool::default();
        let buffer = PcmBuffer::allocate(&pool, SamplingRate::HZ_22050, 2).unwrap();
        assert_eq!(buffer.len(), 14700);
        assert_eq!(buffer.frames(), 7350);
        assert!(buffer.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn drop_returns_buffer_to_pool() {
        let pool = CountingPool::default();
        {
            let mut buffer = PcmBuffer::allocate(&pool, SamplingRate::HZ_48000, 2).unwrap();
            buffer.fill_ramp(480).unwrap();
            assert_eq!(pool.outstanding.get(), 1);
        }
        assert_eq!(pool.outstanding.get(), 0);
        assert_eq!(pool.allocations.get(), 1);
    }

    #[test]
    fn drop_on_error_path_returns_buffer() {
        let pool = CountingPool::default();
        let result: Result = (|| {
            let mut buffer = PcmBuffer::allocate(&pool, SamplingRate::HZ_22050, 2)?;
            buffer.fill_ramp(0)?;
            Ok(())
        })();
        assert_eq!(result.unwrap_err().status(), Status::INVALID_PARAMETER);
        assert_eq!(pool.outstanding.get(), 0);
    }

    #[test]
    fn exhausted_pool_reports_out_of_resources() {
        let pool = CountingPool { exhausted: true, ..Default::default() };
        let err = PcmBuffer::allocate(&pool, SamplingRate::HZ_22050, 2).unwrap_err();
        assert_eq!(err.status(), Status::OUT_OF_RESOURCES);
    }

    #[test]
    fn zero_channels_rejected() {
        let err = PcmBuffer::allocate(&GlobalPool, SamplingRate::HZ_22050, 0).unwrap_err();
        assert_eq!(err.status(), Status::INVALID_PARAMETER);
    }

    #[test]
    fn global_pool_refuses_impossible_requests() {
        let err = GlobalPool.allocate_zeroed(usize::MAX).unwrap_err();
        assert_eq!(err.status(), Status::OUT_OF_RESOURCES);
    }
}
