use core::ffi::{c_int, c_void, CStr};

use crate::Result;
use crate::ioctl::{SlotPar, Status};
use crate::daq::{AsyncPar, DaqPar};
use crate::descr::PlataDescr;

/// Handle returned by `OpenLDevice`.
pub type RawHandle = c_int;

pub const INVALID_HANDLE: RawHandle = -1;

/// Event object handed to `SetLDeviceEvent`.
pub type EventHandle = RawHandle;

/// Interface identifier in the layout of a COM `GUID`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceId {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

/// Identifier of the device interface, `IID_ILDEV`.
// Not yet checked against the vendor `ifc_ldev.h`.
pub const IID_ILDEV: InterfaceId = InterfaceId {
    data1: 0x32bb8320,
    data2: 0xb41b,
    data3: 0x11cf,
    data4: [0xa6, 0xbb, 0x00, 0x80, 0xc7, 0xb2, 0xd6, 0x82],
};

/// Address space for port I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PortSpace {
    #[default]
    Io,
    Memory,
}

/// The device interface. Every method forwards exactly one driver call; the interface is
/// released when the value is dropped.
pub trait Driver {
    fn open_device(&mut self) -> RawHandle;
    fn close_device(&mut self) -> Status;

    fn load_bios(&mut self, file_name: &CStr) -> Status;
    fn plata_test(&mut self) -> Status;
    fn get_slot_param(&mut self, slot_par: &mut SlotPar) -> Status;

    fn read_plata_descr(&mut self, descr: &mut PlataDescr) -> Status;
    fn write_plata_descr(&mut self, descr: &mut PlataDescr, enable: u16) -> Status;
    fn read_flash_word(&mut self, address: u16, data: &mut u16) -> Status;
    fn write_flash_word(&mut self, address: u16, data: u16) -> Status;
    fn enable_flash_write(&mut self, flag: u16) -> Status;

    fn request_buffer_stream(&mut self, size: &mut u32, stream_id: u32) -> Status;
    fn fill_daq_parameters(&mut self, par: &mut DaqPar) -> Status;
    fn set_parameters_stream(&mut self, par: &mut DaqPar, used_size: &mut u32,
                             data: &mut *mut c_void, sync: &mut *mut c_void,
                             stream_id: u32) -> Status;
    fn init_start_device(&mut self) -> Status;
    fn start_device(&mut self) -> Status;
    fn stop_device(&mut self) -> Status;
    fn enable_correction(&mut self, enable: u16) -> Status;
    fn io_async(&mut self, par: &mut AsyncPar) -> Status;

    fn get_parameter(&mut self, name: u32, value: &mut u32) -> Status;
    fn set_parameter(&mut self, name: u32, value: &mut u32) -> Status;
    fn send_command(&mut self, command: u16) -> Status;
    fn set_device_event(&mut self, event: EventHandle, event_id: u32) -> Status;

    fn get_word_dm(&mut self, address: u16, data: &mut u16) -> Status;
    fn put_word_dm(&mut self, address: u16, data: u16) -> Status;
    fn get_word_pm(&mut self, address: u16, data: &mut u32) -> Status;
    fn put_word_pm(&mut self, address: u16, data: u32) -> Status;
    fn get_array_dm(&mut self, address: u16, data: &mut [u16]) -> Status;
    fn put_array_dm(&mut self, address: u16, data: &[u16]) -> Status;
    fn get_array_pm(&mut self, address: u16, data: &mut [u32]) -> Status;
    fn put_array_pm(&mut self, address: u16, data: &[u32]) -> Status;

    fn in_byte(&mut self, space: PortSpace, offset: u32, data: &mut [u8], key: u32) -> Status;
    fn in_word(&mut self, space: PortSpace, offset: u32, data: &mut [u16], key: u32) -> Status;
    fn in_dword(&mut self, space: PortSpace, offset: u32, data: &mut [u32], key: u32) -> Status;
    fn out_byte(&mut self, space: PortSpace, offset: u32, data: &[u8], key: u32) -> Status;
    fn out_word(&mut self, space: PortSpace, offset: u32, data: &[u16], key: u32) -> Status;
    fn out_dword(&mut self, space: PortSpace, offset: u32, data: &[u32], key: u32) -> Status;
}

/// A base object created by a driver module. Dropping it releases the reference.
pub trait Unknown {
    type Device: Driver;

    /// Asks the object for the interface `iid`. On success the returned interface holds its
    /// own reference; the base object still has to be dropped.
    fn query_interface(&self, iid: &InterfaceId) -> Option<Self::Device>;
}

/// A loaded driver module.
pub trait Module {
    type Object<'a>: Unknown where Self: 'a;

    /// Calls the module factory for `slot`. Fails if the factory cannot be resolved; yields
    /// `None` if the factory produced no object.
    fn create_instance(&self, slot: u32) -> Result<Option<Self::Object<'_>>>;
}

#[cfg(target_os = "linux")]
#[path = "linux.rs"]
pub mod imp;

#[cfg(not(target_os = "linux"))]
#[path = "stub.rs"]
pub mod imp;

#[cfg(test)]
pub mod mock;
