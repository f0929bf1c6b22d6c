use std::convert::Infallible;
use std::ffi::CStr;
use std::marker::PhantomData;
use core::ffi::c_void;

use crate::{Error, Result};
use crate::ioctl::{SlotPar, Status};
use crate::daq::{AsyncPar, DaqPar};
use crate::descr::PlataDescr;
use super::{EventHandle, InterfaceId, PortSpace, RawHandle};

/// Driver modules can only be loaded on Linux; this type cannot be constructed.
#[derive(Debug)]
pub struct Library {
    never: Infallible,
}

impl Library {
    pub fn open(path: &str) -> Result<Library> {
        Err(Error::LoadFailure(format!("cannot load {}: unsupported platform", path)))
    }
}

impl super::Module for Library {
    type Object<'a> = Object<'a>;

    fn create_instance(&self, _slot: u32) -> Result<Option<Object<'_>>> {
        match self.never {}
    }
}

#[derive(Debug)]
pub struct Object<'lib> {
    never: Infallible,
    _library: PhantomData<&'lib Library>,
}

impl<'lib> super::Unknown for Object<'lib> {
    type Device = Interface<'lib>;

    fn query_interface(&self, _iid: &InterfaceId) -> Option<Interface<'lib>> {
        match self.never {}
    }
}

#[derive(Debug)]
pub struct Interface<'lib> {
    never: Infallible,
    _library: PhantomData<&'lib Library>,
}

impl<'lib> super::Driver for Interface<'lib> {
    fn open_device(&mut self) -> RawHandle { match self.never {} }
    fn close_device(&mut self) -> Status { match self.never {} }

    fn load_bios(&mut self, _file_name: &CStr) -> Status { match self.never {} }
    fn plata_test(&mut self) -> Status { match self.never {} }
    fn get_slot_param(&mut self, _slot_par: &mut SlotPar) -> Status { match self.never {} }

    fn read_plata_descr(&mut self, _descr: &mut PlataDescr) -> Status { match self.never {} }
    fn write_plata_descr(&mut self, _descr: &mut PlataDescr, _enable: u16) -> Status { match self.never {} }
    fn read_flash_word(&mut self, _address: u16, _data: &mut u16) -> Status { match self.never {} }
    fn write_flash_word(&mut self, _address: u16, _data: u16) -> Status { match self.never {} }
    fn enable_flash_write(&mut self, _flag: u16) -> Status { match self.never {} }

    fn request_buffer_stream(&mut self, _size: &mut u32, _stream_id: u32) -> Status { match self.never {} }
    fn fill_daq_parameters(&mut self, _par: &mut DaqPar) -> Status { match self.never {} }
    fn set_parameters_stream(&mut self, _par: &mut DaqPar, _used_size: &mut u32,
                             _data: &mut *mut c_void, _sync: &mut *mut c_void,
                             _stream_id: u32) -> Status { match self.never {} }
    fn init_start_device(&mut self) -> Status { match self.never {} }
    fn start_device(&mut self) -> Status { match self.never {} }
    fn stop_device(&mut self) -> Status { match self.never {} }
    fn enable_correction(&mut self, _enable: u16) -> Status { match self.never {} }
    fn io_async(&mut self, _par: &mut AsyncPar) -> Status { match self.never {} }

    fn get_parameter(&mut self, _name: u32, _value: &mut u32) -> Status { match self.never {} }
    fn set_parameter(&mut self, _name: u32, _value: &mut u32) -> Status { match self.never {} }
    fn send_command(&mut self, _command: u16) -> Status { match self.never {} }
    fn set_device_event(&mut self, _event: EventHandle, _event_id: u32) -> Status { match self.never {} }

    fn get_word_dm(&mut self, _address: u16, _data: &mut u16) -> Status { match self.never {} }
    fn put_word_dm(&mut self, _address: u16, _data: u16) -> Status { match self.never {} }
    fn get_word_pm(&mut self, _address: u16, _data: &mut u32) -> Status { match self.never {} }
    fn put_word_pm(&mut self, _address: u16, _data: u32) -> Status { match self.never {} }
    fn get_array_dm(&mut self, _address: u16, _data: &mut [u16]) -> Status { match self.never {} }
    fn put_array_dm(&mut self, _address: u16, _data: &[u16]) -> Status { match self.never {} }
    fn get_array_pm(&mut self, _address: u16, _data: &mut [u32]) -> Status { match self.never {} }
    fn put_array_pm(&mut self, _address: u16, _data: &[u32]) -> Status { match self.never {} }

    fn in_byte(&mut self, _space: PortSpace, _offset: u32, _data: &mut [u8], _key: u32) -> Status { match self.never {} }
    fn in_word(&mut self, _space: PortSpace, _offset: u32, _data: &mut [u16], _key: u32) -> Status { match self.never {} }
    fn in_dword(&mut self, _space: PortSpace, _offset: u32, _data: &mut [u32], _key: u32) -> Status { match self.never {} }
    fn out_byte(&mut self, _space: PortSpace, _offset: u32, _data: &[u8], _key: u32) -> Status { match self.never {} }
    fn out_word(&mut self, _space: PortSpace, _offset: u32, _data: &[u16], _key: u32) -> Status { match self.never {} }
    fn out_dword(&mut self, _space: PortSpace, _offset: u32, _data: &[u32], _key: u32) -> Status { match self.never {} }
}
