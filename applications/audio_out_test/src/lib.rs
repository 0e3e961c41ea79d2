//! A smoke test for Simple Audio Out devices.
//!
//! [`run()`] finds every handle exposing the protocol and, for each one,
//! plays a series of synthesized PCM buffers followed by a single tone.
//! Failures are isolated: a device that cannot be opened is skipped,
//! and a failing sub-test doesn't stop the other sub-test or the next device.
//! Only a failure to search for devices at all aborts the run.
//!
//! The firmware is reached through an [`AudioTestEnvironment`];
//! [`BootEnvironment`] is the implementation backed by UEFI boot services.

#![cfg_attr(not(test), no_std)]

extern crate alloc;
#[macro_use] extern crate log;

mod boot;

pub use boot::BootEnvironment;

use alloc::vec::Vec;
use core::fmt::Debug;
use audio_test_config::pcm::{PCM_CHANNEL_COUNT, PCM_SAMPLE_FORMAT, PCM_SAMPLING_RATE, PCM_TEST_FREQUENCIES};
use audio_test_config::tone::{TEST_TONES, TONE_TEST_DURATION_MS};
use audio_test_config::CONNECT_CONTROLLERS;
use pcm_synth::{PcmBuffer, SamplePool};
use simple_audio_out::{AudioOut, Capabilities, ModeIter};
use uefi::{Result, Status};

/// The services a test run needs from the environment hosting it.
pub trait AudioTestEnvironment {
    /// An opaque reference to one device.
    type Handle: Copy + Debug;
    /// Where sample buffers are allocated from.
    type Pool: SamplePool + ?Sized;

    /// Gives audio drivers a chance to bind to their PCI controllers before discovery.
    fn connect_controllers(&self) -> Result {
        Ok(())
    }

    /// Returns every handle that exposes the Simple Audio Out protocol.
    ///
    /// An environment may report `NOT_FOUND` instead of an empty list.
    fn locate_audio_handles(&self) -> Result<Vec<Self::Handle>>;

    /// Resolves the protocol instance behind `handle` and lends it to `f`
    /// for the duration of the call.
    fn with_audio_out<R>(&self, handle: Self::Handle, f: impl FnOnce(&mut dyn AudioOut) -> R) -> Result<R>;

    fn pool(&self) -> &Self::Pool;
}

/// Totals over one test run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub handles_found: usize,
    pub devices_tested: usize,
    /// Handles whose protocol instance couldn't be resolved.
    pub devices_skipped: usize,
    pub pcm_failures: usize,
    pub tone_failures: usize,
}

/// The outcome of each sub-test on one device.
#[derive(Debug)]
pub struct DeviceReport {
    pub pcm: Result,
    pub tone: Result,
}

/// Runs the PCM and tone tests on every Simple Audio Out device in `env`.
///
/// Returns an error only if searching for devices failed.
pub fn run<E: AudioTestEnvironment>(env: &E) -> Result<RunSummary> {
    trace!("audio_out_test::run");

    if CONNECT_CONTROLLERS {
        if let Err(e) = env.connect_controllers() {
            warn!("connecting PCI controllers returned {:?}", e.status());
        }
    }

    let handles = match env.locate_audio_handles() {
        Ok(handles) => handles,
        Err(e) if e.status() == Status::NOT_FOUND => Vec::new(),
        Err(e) => {
            warn!("locating Simple Audio Out handles returned {:?}", e.status());
            return Err(e);
        }
    };
    debug!("Got {} handles", handles.len());

    let mut summary = RunSummary {
        handles_found: handles.len(),
        ..Default::default()
    };

    for &handle in handles.iter() {
        let report = match env.with_audio_out(handle, |device| test_device(device, env.pool())) {
            Ok(report) => report,
            Err(e) => {
                warn!("opening Simple Audio Out on handle {:?} returned {:?}", handle, e.status());
                summary.devices_skipped += 1;
                continue;
            }
        };
        summary.devices_tested += 1;
        if report.pcm.is_err() {
            summary.pcm_failures += 1;
        }
        if report.tone.is_err() {
            summary.tone_failures += 1;
        }
    }

    info!("audio_out_test done: {:?}", summary);
    Ok(summary)
}

/// Describes the device, then runs the PCM test followed by the tone test.
///
/// The tone test runs regardless of the PCM test's outcome.
pub fn test_device<P: SamplePool + ?Sized>(device: &mut dyn AudioOut, pool: &P) -> DeviceReport {
    describe_device(device);
    let pcm = pcm_test(device, pool);
    let tone = tone_test(device);
    DeviceReport { pcm, tone }
}

/// Logs the device's capabilities and, if it can report them, its modes.
pub fn describe_device(device: &mut dyn AudioOut) {
    let caps = device.capabilities();
    debug!("Simple Audio Out device: capabilities {:?}, {} modes", caps, device.max_mode());
    if !caps.contains(Capabilities::MODE) {
        return;
    }
    for (index, mode) in ModeIter::new(&mut *device) {
        match mode {
            Ok(mode) => debug!("    mode {}: {:?}", index, mode),
            Err(e) => warn!("QueryMode ({}) returned {:?}", index, e.status()),
        }
    }
}

/// Plays one third of a second of ramp waveform for each test frequency.
///
/// Each frequency gets a freshly allocated buffer, released before the next one is allocated.
/// The first failure ends the test.
pub fn pcm_test<P: SamplePool + ?Sized>(device: &mut dyn AudioOut, pool: &P) -> Result {
    trace!("PcmTest");

    for (index, &frequency) in PCM_TEST_FREQUENCIES.iter().enumerate() {
        let mut buffer = PcmBuffer::allocate(pool, PCM_SAMPLING_RATE, PCM_CHANNEL_COUNT).map_err(|e| {
            error!("allocating samples ({}) returned {:?}", index, e.status());
            e
        })?;
        buffer.fill_ramp(frequency)?;

        device
            .write(PCM_SAMPLING_RATE, PCM_CHANNEL_COUNT, PCM_SAMPLE_FORMAT, buffer.samples())
            .map_err(|e| {
                error!("Write ({}, {} Hz) returned {:?}", index, frequency, e.status());
                e
            })?;
    }

    trace!("PcmTest done");
    Ok(())
}

/// Plays a tone from the stimulus table.
///
/// Only the table's first entry is issued.
pub fn tone_test(device: &mut dyn AudioOut) -> Result {
    trace!("ToneTest");

    for (index, tone) in TEST_TONES.iter().enumerate().take(1) {
        device.tone(tone.frequency, TONE_TEST_DURATION_MS).map_err(|e| {
            error!("Tone ({}) returned {:?}", index, e.status());
            e
        })?;
    }

    trace!("ToneTest done");
    Ok(())
}
