//! The Simple Audio Out test launcher, built as a UEFI application.
//!
//! Build with `--target x86_64-unknown-uefi` and run the resulting `.efi` image
//! from the UEFI shell or as a boot option.

#![cfg_attr(target_os = "uefi", no_std)]
#![cfg_attr(target_os = "uefi", no_main)]

#[macro_use] extern crate cfg_if;

cfg_if! {

if #[cfg(target_os = "uefi")] {

#[macro_use] extern crate log;

use uefi::prelude::*;
use audio_out_test::BootEnvironment;

#[entry]
fn main(_image: Handle, mut system_table: SystemTable<Boot>) -> Status {
    if let Err(e) = uefi_services::init(&mut system_table) {
        return e.status();
    }
    log::set_max_level(audio_test_config::LOG_LEVEL);

    trace!("audio_out_launcher: main");

    let env = BootEnvironment::new(system_table.boot_services());
    match audio_out_test::run(&env) {
        Ok(summary) => {
            info!(
                "tested {} of {} Simple Audio Out devices ({} PCM failures, {} tone failures)",
                summary.devices_tested, summary.handles_found,
                summary.pcm_failures, summary.tone_failures,
            );
            Status::SUCCESS
        }
        Err(e) => {
            error!("audio_out_launcher: {:?}", e.status());
            e.status()
        }
    }
}

} else {

fn main() {
    eprintln!("audio_out_launcher must be run as a UEFI application (build with --target x86_64-unknown-uefi)");
    std::process::exit(1);
}

}

}
