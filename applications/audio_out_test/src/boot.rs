use alloc::vec::Vec;
use pcm_synth::GlobalPool;
use simple_audio_out::{AudioOut, SimpleAudioOut};
use uefi::table::boot::{BootServices, OpenProtocolAttributes, OpenProtocolParams, SearchType};
use uefi::{guid, Guid, Handle, Identify, Result};

use crate::AudioTestEnvironment;

/// `EFI_PCI_IO_PROTOCOL`, installed on every PCI controller handle.
pub(crate) const PCI_IO_PROTOCOL_GUID: Guid = guid!("4cf5b200-68b8-4ca5-9eec-b23e3f50029a");

/// The test environment provided by UEFI boot services.
pub struct BootEnvironment<'boot> {
    boot_services: &'boot BootServices,
    pool: GlobalPool,
}

impl<'boot> BootEnvironment<'boot> {
    pub fn new(boot_services: &'boot BootServices) -> BootEnvironment<'boot> {
        BootEnvironment { boot_services, pool: GlobalPool }
    }
}

impl<'boot> AudioTestEnvironment for BootEnvironment<'boot> {
    type Handle = Handle;
    type Pool = GlobalPool;

    /// Recursively connects drivers to every PCI controller.
    ///
    /// Most PCI functions are not audio devices, so individual failures are expected.
    fn connect_controllers(&self) -> Result {
        let handles = self
            .boot_services
            .locate_handle_buffer(SearchType::ByProtocol(&PCI_IO_PROTOCOL_GUID))?;
        let mut connected = 0;
        for &handle in handles.iter() {
            match self.boot_services.connect_controller(handle, None, None, true) {
                Ok(()) => connected += 1,
                Err(e) => trace!("PCI controller {:?} failed to connect: {:?}", handle, e.status()),
            }
        }
        info!("{} of {} PCI controllers connected", connected, handles.len());
        Ok(())
    }

    fn locate_audio_handles(&self) -> Result<Vec<Handle>> {
        let handles = self
            .boot_services
            .locate_handle_buffer(SearchType::ByProtocol(&SimpleAudioOut::GUID))?;
        Ok(handles.to_vec())
    }

    fn with_audio_out<R>(&self, handle: Handle, f: impl FnOnce(&mut dyn AudioOut) -> R) -> Result<R> {
        let params = OpenProtocolParams {
            handle,
            agent: self.boot_services.image_handle(),
            controller: None,
        };
        // SAFE: the protocol is only used within this function, while the handle
        // is still valid, and this application never uninstalls protocols.
        let mut protocol = unsafe {
            self.boot_services
                .open_protocol::<SimpleAudioOut>(params, OpenProtocolAttributes::GetProtocol)
        }?;
        Ok(f(&mut *protocol))
    }

    fn pool(&self) -> &GlobalPool {
        &self.pool
    }
}
