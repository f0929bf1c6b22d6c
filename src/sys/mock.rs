//! In-memory driver used by the unit tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::{CStr, CString};
use std::rc::Rc;
use core::ffi::c_void;

use crate::{Error, Result};
use crate::ioctl::{SlotPar, Status};
use crate::daq::{AsyncPar, DaqPar};
use crate::descr::PlataDescr;
use super::{Driver, EventHandle, InterfaceId, Module, PortSpace, RawHandle, Unknown, IID_ILDEV};

pub struct MockState {
    /// Outstanding references to objects and interfaces.
    pub references: i32,
    pub calls: Vec<&'static str>,
    pub status: Status,
    pub close_status: Status,
    pub handle: RawHandle,
    pub received: Option<DaqPar>,
    pub adjust: Option<Box<dyn FnMut(&mut DaqPar)>>,
    pub received_async: Option<AsyncPar>,
    pub async_reply: Option<AsyncPar>,
    pub data: Vec<u8>,
    pub sync: Box<u32>,
    pub buffer_size: u32,
    pub slot_par: SlotPar,
    pub descr: PlataDescr,
    pub bios: Option<CString>,
    pub flash: HashMap<u16, u16>,
    pub flash_write_enabled: bool,
    pub params: HashMap<u32, u32>,
    pub dm: HashMap<u16, u16>,
    pub pm: HashMap<u16, u32>,
    pub ports: HashMap<(PortSpace, u32), Vec<u8>>,
    pub last_key: u32,
    pub command: Option<u16>,
    pub event: Option<(EventHandle, u32)>,
    pub correction: Option<u16>,
}

impl Default for MockState {
    fn default() -> Self {
        MockState {
            references: 0,
            calls: Vec::new(),
            status: Status::Success,
            close_status: Status::Success,
            handle: 3,
            received: None,
            adjust: None,
            received_async: None,
            async_reply: None,
            data: vec![0; 64],
            sync: Box::new(0),
            buffer_size: 0,
            slot_par: SlotPar::default(),
            descr: PlataDescr::default(),
            bios: None,
            flash: HashMap::new(),
            flash_write_enabled: false,
            params: HashMap::new(),
            dm: HashMap::new(),
            pm: HashMap::new(),
            ports: HashMap::new(),
            last_key: 0,
            command: None,
            event: None,
            correction: None,
        }
    }
}

pub type SharedState = Rc<RefCell<MockState>>;

/// A module whose factory and capability query can be made to fail.
pub struct MockModule {
    pub has_factory: bool,
    pub yields_object: bool,
    pub supports_device: bool,
    pub state: SharedState,
}

impl MockModule {
    pub fn new() -> MockModule {
        MockModule {
            has_factory: true,
            yields_object: true,
            supports_device: true,
            state: SharedState::default(),
        }
    }
}

impl Module for MockModule {
    type Object<'a> = MockObject;

    fn create_instance(&self, _slot: u32) -> Result<Option<MockObject>> {
        if !self.has_factory {
            return Err(Error::LoadFailure("undefined symbol: CreateInstance".to_owned()))
        }
        if !self.yields_object {
            return Ok(None)
        }
        self.state.borrow_mut().references += 1;
        Ok(Some(MockObject { supports_device: self.supports_device, state: self.state.clone() }))
    }
}

pub struct MockObject {
    supports_device: bool,
    state: SharedState,
}

impl Unknown for MockObject {
    type Device = MockDriver;

    fn query_interface(&self, iid: &InterfaceId) -> Option<MockDriver> {
        if self.supports_device && *iid == IID_ILDEV {
            self.state.borrow_mut().references += 1;
            Some(MockDriver { state: self.state.clone() })
        } else {
            None
        }
    }
}

impl Drop for MockObject {
    fn drop(&mut self) {
        self.state.borrow_mut().references -= 1;
    }
}

pub struct MockDriver {
    state: SharedState,
}

impl std::fmt::Debug for MockDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("MockDriver")
    }
}

impl MockDriver {
    /// A driver holding the only reference to its interface.
    pub fn new() -> (MockDriver, SharedState) {
        let state = SharedState::default();
        state.borrow_mut().references = 1;
        (MockDriver { state: state.clone() }, state)
    }

    fn enter(&self, call: &'static str) -> std::cell::RefMut<'_, MockState> {
        let mut state = self.state.borrow_mut();
        state.calls.push(call);
        state
    }
}

impl Drop for MockDriver {
    fn drop(&mut self) {
        self.state.borrow_mut().references -= 1;
    }
}

fn port_read(state: &mut MockState, space: PortSpace, offset: u32, out: &mut [u8], key: u32) -> Status {
    state.last_key = key;
    let stored = state.ports.get(&(space, offset)).cloned().unwrap_or_default();
    for (index, byte) in out.iter_mut().enumerate() {
        *byte = stored.get(index).copied().unwrap_or(0);
    }
    state.status
}

fn port_write(state: &mut MockState, space: PortSpace, offset: u32, data: &[u8], key: u32) -> Status {
    state.last_key = key;
    state.ports.insert((space, offset), data.to_vec());
    state.status
}

impl Driver for MockDriver {
    fn open_device(&mut self) -> RawHandle {
        self.enter("open_device").handle
    }

    fn close_device(&mut self) -> Status {
        self.enter("close_device").close_status
    }

    fn load_bios(&mut self, file_name: &CStr) -> Status {
        let mut state = self.enter("load_bios");
        state.bios = Some(file_name.to_owned());
        state.status
    }

    fn plata_test(&mut self) -> Status {
        self.enter("plata_test").status
    }

    fn get_slot_param(&mut self, slot_par: &mut SlotPar) -> Status {
        let state = self.enter("get_slot_param");
        *slot_par = state.slot_par;
        state.status
    }

    fn read_plata_descr(&mut self, descr: &mut PlataDescr) -> Status {
        let state = self.enter("read_plata_descr");
        *descr = state.descr;
        state.status
    }

    fn write_plata_descr(&mut self, descr: &mut PlataDescr, enable: u16) -> Status {
        let mut state = self.enter("write_plata_descr");
        if enable != 0 {
            state.descr = *descr;
        }
        state.status
    }

    fn read_flash_word(&mut self, address: u16, data: &mut u16) -> Status {
        let state = self.enter("read_flash_word");
        *data = state.flash.get(&address).copied().unwrap_or(0xffff);
        state.status
    }

    fn write_flash_word(&mut self, address: u16, data: u16) -> Status {
        let mut state = self.enter("write_flash_word");
        if !state.flash_write_enabled {
            return Status::Error
        }
        state.flash.insert(address, data);
        state.status
    }

    fn enable_flash_write(&mut self, flag: u16) -> Status {
        let mut state = self.enter("enable_flash_write");
        state.flash_write_enabled = flag != 0;
        state.status
    }

    fn request_buffer_stream(&mut self, size: &mut u32, _stream_id: u32) -> Status {
        let mut state = self.enter("request_buffer_stream");
        // rounds the request up to whole 1024-word pages
        *size = size.next_multiple_of(1024);
        state.buffer_size = *size;
        state.status
    }

    fn fill_daq_parameters(&mut self, par: &mut DaqPar) -> Status {
        let mut state = self.enter("fill_daq_parameters");
        state.received = Some(*par);
        if let Some(adjust) = state.adjust.as_mut() {
            adjust(par);
        }
        state.status
    }

    fn set_parameters_stream(&mut self, par: &mut DaqPar, used_size: &mut u32,
                             data: &mut *mut c_void, sync: &mut *mut c_void,
                             _stream_id: u32) -> Status {
        let mut state = self.enter("set_parameters_stream");
        state.received = Some(*par);
        if let Some(adjust) = state.adjust.as_mut() {
            adjust(par);
        }
        *used_size = (*used_size).min(state.data.len() as u32 / 2);
        *data = state.data.as_mut_ptr().cast();
        *sync = (&mut *state.sync as *mut u32).cast();
        state.status
    }

    fn init_start_device(&mut self) -> Status {
        self.enter("init_start_device").status
    }

    fn start_device(&mut self) -> Status {
        self.enter("start_device").status
    }

    fn stop_device(&mut self) -> Status {
        self.enter("stop_device").status
    }

    fn enable_correction(&mut self, enable: u16) -> Status {
        let mut state = self.enter("enable_correction");
        state.correction = Some(enable);
        state.status
    }

    fn io_async(&mut self, par: &mut AsyncPar) -> Status {
        let mut state = self.enter("io_async");
        state.received_async = Some(*par);
        if let Some(reply) = state.async_reply {
            *par = reply;
        }
        state.status
    }

    fn get_parameter(&mut self, name: u32, value: &mut u32) -> Status {
        let state = self.enter("get_parameter");
        match state.params.get(&name) {
            Some(&stored) => { *value = stored; state.status }
            None => Status::NotSupported,
        }
    }

    fn set_parameter(&mut self, name: u32, value: &mut u32) -> Status {
        let mut state = self.enter("set_parameter");
        state.params.insert(name, *value);
        state.status
    }

    fn send_command(&mut self, command: u16) -> Status {
        let mut state = self.enter("send_command");
        state.command = Some(command);
        state.status
    }

    fn set_device_event(&mut self, event: EventHandle, event_id: u32) -> Status {
        let mut state = self.enter("set_device_event");
        state.event = Some((event, event_id));
        state.status
    }

    fn get_word_dm(&mut self, address: u16, data: &mut u16) -> Status {
        let state = self.enter("get_word_dm");
        *data = state.dm.get(&address).copied().unwrap_or(0);
        state.status
    }

    fn put_word_dm(&mut self, address: u16, data: u16) -> Status {
        let mut state = self.enter("put_word_dm");
        state.dm.insert(address, data);
        state.status
    }

    fn get_word_pm(&mut self, address: u16, data: &mut u32) -> Status {
        let state = self.enter("get_word_pm");
        *data = state.pm.get(&address).copied().unwrap_or(0);
        state.status
    }

    fn put_word_pm(&mut self, address: u16, data: u32) -> Status {
        let mut state = self.enter("put_word_pm");
        state.pm.insert(address, data);
        state.status
    }

    fn get_array_dm(&mut self, address: u16, data: &mut [u16]) -> Status {
        let state = self.enter("get_array_dm");
        for (index, word) in data.iter_mut().enumerate() {
            *word = state.dm.get(&(address + index as u16)).copied().unwrap_or(0);
        }
        state.status
    }

    fn put_array_dm(&mut self, address: u16, data: &[u16]) -> Status {
        let mut state = self.enter("put_array_dm");
        for (index, &word) in data.iter().enumerate() {
            state.dm.insert(address + index as u16, word);
        }
        state.status
    }

    fn get_array_pm(&mut self, address: u16, data: &mut [u32]) -> Status {
        let state = self.enter("get_array_pm");
        for (index, word) in data.iter_mut().enumerate() {
            *word = state.pm.get(&(address + index as u16)).copied().unwrap_or(0);
        }
        state.status
    }

    fn put_array_pm(&mut self, address: u16, data: &[u32]) -> Status {
        let mut state = self.enter("put_array_pm");
        for (index, &word) in data.iter().enumerate() {
            state.pm.insert(address + index as u16, word);
        }
        state.status
    }

    fn in_byte(&mut self, space: PortSpace, offset: u32, data: &mut [u8], key: u32) -> Status {
        port_read(&mut self.enter("in_byte"), space, offset, data, key)
    }

    fn in_word(&mut self, space: PortSpace, offset: u32, data: &mut [u16], key: u32) -> Status {
        port_read(&mut self.enter("in_word"), space, offset, bytemuck::cast_slice_mut(data), key)
    }

    fn in_dword(&mut self, space: PortSpace, offset: u32, data: &mut [u32], key: u32) -> Status {
        port_read(&mut self.enter("in_dword"), space, offset, bytemuck::cast_slice_mut(data), key)
    }

    fn out_byte(&mut self, space: PortSpace, offset: u32, data: &[u8], key: u32) -> Status {
        port_write(&mut self.enter("out_byte"), space, offset, data, key)
    }

    fn out_word(&mut self, space: PortSpace, offset: u32, data: &[u16], key: u32) -> Status {
        port_write(&mut self.enter("out_word"), space, offset, bytemuck::cast_slice(data), key)
    }

    fn out_dword(&mut self, space: PortSpace, offset: u32, data: &[u32], key: u32) -> Status {
        port_write(&mut self.enter("out_dword"), space, offset, bytemuck::cast_slice(data), key)
    }
}
