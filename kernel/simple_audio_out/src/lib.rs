//! The Simple Audio Out protocol: a minimal, synchronous audio output interface
//! that UEFI audio drivers expose and boot-time clients consume.
//!
//! This crate contains no driver. It defines the shape of the interface:
//! * [`Capabilities`] that a device may advertise,
//! * the supported [`SamplingRate`]s and [`SampleFormat`]s,
//! * the [`AudioMode`] descriptor returned by mode queries,
//! * the [`AudioOut`] trait that every device representation implements, and
//! * the raw [`SimpleAudioOut`] protocol table, identified by its GUID.
//!
//! All operations are blocking: when `write` or `tone` returns,
//! the device has fully consumed the request.

#![cfg_attr(not(test), no_std)]

#[macro_use] extern crate bitflags;
#[macro_use] extern crate static_assertions;

mod proto;
pub use proto::SimpleAudioOut;

use core::fmt;
use uefi::{Result, Status};

bitflags! {
    /// The set of operations a device claims to support.
    ///
    /// Callers must check these before invoking the corresponding operation.
    pub struct Capabilities: u32 {
        const RESET = 0x1;
        const WRITE = 0x2;
        const TONE  = 0x4;
        const MODE  = 0x8;
    }
}

/// A sampling rate in Hz, as passed across the protocol boundary.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SamplingRate(pub u32);

impl SamplingRate {
    pub const HZ_8000:  SamplingRate = SamplingRate(8000);
    pub const HZ_11025: SamplingRate = SamplingRate(11025);
    pub const HZ_16000: SamplingRate = SamplingRate(16000);
    pub const HZ_22050: SamplingRate = SamplingRate(22050);
    pub const HZ_32000: SamplingRate = SamplingRate(32000);
    pub const HZ_44100: SamplingRate = SamplingRate(44100);
    pub const HZ_48000: SamplingRate = SamplingRate(48000);

    /// Every rate defined by the protocol, in ascending order.
    pub const ALL: [SamplingRate; 7] = [
        Self::HZ_8000,
        Self::HZ_11025,
        Self::HZ_16000,
        Self::HZ_22050,
        Self::HZ_32000,
        Self::HZ_44100,
        Self::HZ_48000,
    ];

    /// Returns the rate in Hz.
    pub const fn hz(self) -> u32 {
        self.0
    }

    /// Returns `true` if this rate is one of the rates defined by the protocol.
    pub fn is_standard(self) -> bool {
        Self::ALL.contains(&self)
    }
}

impl fmt::Debug for SamplingRate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} Hz", self.0)
    }
}

/// The encoding of individual samples.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleFormat(pub u32);

impl SampleFormat {
    /// Signed 16-bit little-endian samples, interleaved across channels.
    pub const S16LE: SampleFormat = SampleFormat(0x0);

    /// Returns `true` if this value names a format defined by the protocol.
    pub fn is_defined(self) -> bool {
        self == Self::S16LE
    }
}

impl fmt::Debug for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::S16LE => f.write_str("S16LE"),
            SampleFormat(other) => write!(f, "SampleFormat({:#x})", other),
        }
    }
}

/// One playback configuration supported by a device.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioMode {
    pub sampling_rate: SamplingRate,
    pub channel_count: u8,
    pub sample_format: SampleFormat,
}

const_assert_eq!(core::mem::size_of::<AudioMode>(), 12);

impl AudioMode {
    /// A zeroed descriptor, used as the out-parameter for mode queries.
    pub const fn empty() -> AudioMode {
        AudioMode {
            sampling_rate: SamplingRate(0),
            channel_count: 0,
            sample_format: SampleFormat::S16LE,
        }
    }

    /// Returns `true` if every field holds a value the protocol defines.
    pub fn is_consistent(&self) -> bool {
        self.sampling_rate.is_standard()
            && self.channel_count != 0
            && self.sample_format.is_defined()
    }
}

/// A synchronous audio output device.
///
/// The [`SimpleAudioOut`] protocol table is the firmware-backed implementation;
/// other implementations (e.g. software devices in tests) follow the same
/// contract. Nothing here is reentrant: implementations make no guarantee
/// about overlapping calls.
pub trait AudioOut {
    /// The operations this device supports.
    fn capabilities(&self) -> Capabilities;

    /// The number of modes that [`AudioOut::query_mode`] can return.
    fn max_mode(&self) -> usize;

    /// Resets the device to its default idle, silent state.
    fn reset(&mut self) -> Result;

    /// Plays all of the given interleaved `samples`, blocking until the device has consumed them.
    ///
    /// The number of samples must be a multiple of `channel_count`.
    fn write(
        &mut self,
        sampling_rate: SamplingRate,
        channel_count: u8,
        sample_format: SampleFormat,
        samples: &[i16],
    ) -> Result;

    /// Plays one tone of the given `frequency` (Hz) for `duration_ms` milliseconds.
    fn tone(&mut self, frequency: i16, duration_ms: u16) -> Result;

    /// Returns the mode at `index`, which must be less than [`AudioOut::max_mode`].
    fn query_mode(&mut self, index: usize) -> Result<AudioMode>;

    /// Returns `true` if all of the given capabilities are advertised.
    fn supports(&self, caps: Capabilities) -> bool {
        self.capabilities().contains(caps)
    }

    /// Returns an iterator over all of this device's modes.
    fn modes(&mut self) -> ModeIter<'_, Self> where Self: Sized {
        ModeIter::new(self)
    }
}

/// Checks the arguments of a write request against the protocol's rules.
///
/// Returns `INVALID_PARAMETER` if `channel_count` is zero
/// or doesn't evenly divide the number of samples.
pub fn validate_write(channel_count: u8, samples: &[i16]) -> Result {
    if channel_count == 0 || samples.len() % channel_count as usize != 0 {
        return Err(Status::INVALID_PARAMETER.into());
    }
    Ok(())
}

/// An iterator over the modes of an [`AudioOut`] device,
/// yielding the result of each query in index order.
pub struct ModeIter<'d, A: AudioOut + ?Sized> {
    device: &'d mut A,
    current: usize,
    max: usize,
}

impl<'d, A: AudioOut + ?Sized> ModeIter<'d, A> {
    pub fn new(device: &'d mut A) -> ModeIter<'d, A> {
        let max = device.max_mode();
        ModeIter { device, current: 0, max }
    }
}

impl<'d, A: AudioOut + ?Sized> Iterator for ModeIter<'d, A> {
    type Item = (usize, Result<AudioMode>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.max {
            return None;
        }
        let index = self.current;
        self.current += 1;
        Some((index, self.device.query_mode(index)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.max - self.current;
        (remaining, Some(remaining))
    }
}
