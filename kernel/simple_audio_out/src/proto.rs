//! The raw protocol table installed by Simple Audio Out drivers.

use crate::{validate_write, AudioMode, AudioOut, Capabilities, SampleFormat, SamplingRate};
use uefi::proto::unsafe_protocol;
use uefi::{Result, Status, StatusExt};

type ResetFn = extern "efiapi" fn(this: &mut SimpleAudioOut) -> Status;

type WriteFn = unsafe extern "efiapi" fn(
    this: &mut SimpleAudioOut,
    sampling_rate: u32,
    channel_count: u8,
    sample_format: u32,
    samples: *const i16,
    sample_count: usize,
) -> Status;

type ToneFn = extern "efiapi" fn(this: &mut SimpleAudioOut, frequency: i16, duration: u16) -> Status;

type QueryModeFn = extern "efiapi" fn(this: &mut SimpleAudioOut, index: usize, mode: &mut AudioMode) -> Status;

/// The Simple Audio Out protocol, as laid out in memory by the firmware.
///
/// Every call is checked against the advertised [`Capabilities`] before it
/// reaches the driver, so a missing capability yields `UNSUPPORTED`
/// without invoking the function pointer.
#[repr(C)]
#[unsafe_protocol("e4ed3d66-6402-4f8d-902d-5c67d5d49882")]
pub struct SimpleAudioOut {
    reset: ResetFn,
    write: WriteFn,
    tone: ToneFn,
    query_mode: QueryModeFn,
    max_mode: usize,
    capabilities: u32,
}

// Four function pointers, `MaxMode`, and `Capabilities` padded to the pointer width.
const_assert_eq!(core::mem::size_of::<SimpleAudioOut>(), 6 * core::mem::size_of::<usize>());

impl SimpleAudioOut {
    fn require(&self, caps: Capabilities) -> Result {
        if self.supports(caps) {
            Ok(())
        } else {
            Err(Status::UNSUPPORTED.into())
        }
    }
}

impl AudioOut for SimpleAudioOut {
    fn capabilities(&self) -> Capabilities {
        Capabilities::from_bits_truncate(self.capabilities)
    }

    fn max_mode(&self) -> usize {
        self.max_mode
    }

    fn reset(&mut self) -> Result {
        self.require(Capabilities::RESET)?;
        (self.reset)(self).to_result()
    }

    fn write(
        &mut self,
        sampling_rate: SamplingRate,
        channel_count: u8,
        sample_format: SampleFormat,
        samples: &[i16],
    ) -> Result {
        self.require(Capabilities::WRITE)?;
        validate_write(channel_count, samples)?;
        // SAFE: the pointer and length describe `samples`, which outlives this blocking call.
        unsafe {
            (self.write)(
                self,
                sampling_rate.hz(),
                channel_count,
                sample_format.0,
                samples.as_ptr(),
                samples.len(),
            )
        }
        .to_result()
    }

    fn tone(&mut self, frequency: i16, duration_ms: u16) -> Result {
        self.require(Capabilities::TONE)?;
        (self.tone)(self, frequency, duration_ms).to_result()
    }

    fn query_mode(&mut self, index: usize) -> Result<AudioMode> {
        self.require(Capabilities::MODE)?;
        if index >= self.max_mode {
            return Err(Status::INVALID_PARAMETER.into());
        }
        let mut mode = AudioMode::empty();
        (self.query_mode)(self, index, &mut mode).to_result()?;
        if !mode.is_consistent() {
            return Err(Status::DEVICE_ERROR.into());
        }
        Ok(mode)
    }
}
