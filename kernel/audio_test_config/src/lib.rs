//! Parameters of the Simple Audio Out test application.
//!
//! The application takes no external configuration: no command line,
//! no files, no environment variables. Everything it does is fixed here.

#![no_std]

pub mod pcm;
pub mod tone;

use log::LevelFilter;

/// The maximum level of log statements emitted once the logger is installed.
pub const LOG_LEVEL: LevelFilter = LevelFilter::Trace;

/// Whether to recursively connect drivers to every PCI controller before
/// looking for audio devices, so that audio drivers get a chance to bind.
pub const CONNECT_CONTROLLERS: bool = true;
