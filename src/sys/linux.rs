use std::ffi::{CStr, CString};
use std::marker::PhantomData;
use std::mem::size_of;
use std::ptr::{self, NonNull};
use libc::{c_char, c_int, c_void};

use crate::{Error, Result};
use crate::ioctl::{SlotPar, Status};
use crate::daq::{AsyncPar, DaqPar};
use crate::descr::PlataDescr;
use super::{EventHandle, InterfaceId, PortSpace, RawHandle};

type HResult = i32;
const S_OK: HResult = 0;

type This = *mut c_void;
type CreateInstanceFn = unsafe extern "C" fn(slot: u32) -> This;

#[repr(C)]
struct UnknownVtbl {
    query_interface: unsafe extern "C" fn(This, *const InterfaceId, *mut *mut c_void) -> HResult,
    #[allow(dead_code)]
    add_ref: unsafe extern "C" fn(This) -> u32,
    release: unsafe extern "C" fn(This) -> u32,
}

// Slot order of `IDaqLDevice`, following the `LUnknown` slots. `ULONG` is 32 bits and
// `HANDLE` is an `int` in the Linux driver.
#[repr(C)]
struct DeviceVtbl {
    unknown: UnknownVtbl,
    inbyte: unsafe extern "C" fn(This, u32, *mut u8, u32, u32) -> u32,
    inword: unsafe extern "C" fn(This, u32, *mut u16, u32, u32) -> u32,
    indword: unsafe extern "C" fn(This, u32, *mut u32, u32, u32) -> u32,
    outbyte: unsafe extern "C" fn(This, u32, *mut u8, u32, u32) -> u32,
    outword: unsafe extern "C" fn(This, u32, *mut u16, u32, u32) -> u32,
    outdword: unsafe extern "C" fn(This, u32, *mut u32, u32, u32) -> u32,
    inmbyte: unsafe extern "C" fn(This, u32, *mut u8, u32, u32) -> u32,
    inmword: unsafe extern "C" fn(This, u32, *mut u16, u32, u32) -> u32,
    inmdword: unsafe extern "C" fn(This, u32, *mut u32, u32, u32) -> u32,
    outmbyte: unsafe extern "C" fn(This, u32, *mut u8, u32, u32) -> u32,
    outmword: unsafe extern "C" fn(This, u32, *mut u16, u32, u32) -> u32,
    outmdword: unsafe extern "C" fn(This, u32, *mut u32, u32, u32) -> u32,
    get_word_dm: unsafe extern "C" fn(This, u16, *mut u16) -> u32,
    put_word_dm: unsafe extern "C" fn(This, u16, u16) -> u32,
    put_word_pm: unsafe extern "C" fn(This, u16, u32) -> u32,
    get_word_pm: unsafe extern "C" fn(This, u16, *mut u32) -> u32,
    get_array_dm: unsafe extern "C" fn(This, u16, u32, *mut u16) -> u32,
    put_array_dm: unsafe extern "C" fn(This, u16, u32, *mut u16) -> u32,
    get_array_pm: unsafe extern "C" fn(This, u16, u32, *mut u32) -> u32,
    put_array_pm: unsafe extern "C" fn(This, u16, u32, *mut u32) -> u32,
    send_command: unsafe extern "C" fn(This, u16) -> u32,
    plata_test: unsafe extern "C" fn(This) -> u32,
    get_slot_param: unsafe extern "C" fn(This, *mut SlotPar) -> u32,
    open_ldevice: unsafe extern "C" fn(This) -> c_int,
    close_ldevice: unsafe extern "C" fn(This) -> u32,
    set_parameters_stream: unsafe extern "C" fn(This, *mut c_void, *mut u32,
                                                *mut *mut c_void, *mut *mut c_void, u32) -> u32,
    request_buffer_stream: unsafe extern "C" fn(This, *mut u32, u32) -> u32,
    fill_daq_parameters: unsafe extern "C" fn(This, *mut c_void) -> u32,
    init_start_ldevice: unsafe extern "C" fn(This) -> u32,
    start_ldevice: unsafe extern "C" fn(This) -> u32,
    stop_ldevice: unsafe extern "C" fn(This) -> u32,
    load_bios: unsafe extern "C" fn(This, *mut c_char) -> u32,
    io_async: unsafe extern "C" fn(This, *mut AsyncPar) -> u32,
    read_plata_descr: unsafe extern "C" fn(This, *mut c_void) -> u32,
    write_plata_descr: unsafe extern "C" fn(This, *mut c_void, u16) -> u32,
    read_flash_word: unsafe extern "C" fn(This, u16, *mut u16) -> u32,
    write_flash_word: unsafe extern "C" fn(This, u16, u16) -> u32,
    enable_flash_write: unsafe extern "C" fn(This, u16) -> u32,
    enable_correction: unsafe extern "C" fn(This, u16) -> u32,
    get_parameter: unsafe extern "C" fn(This, u32, *mut u32) -> u32,
    set_parameter: unsafe extern "C" fn(This, u32, *mut u32) -> u32,
    set_ldevice_event: unsafe extern "C" fn(This, EventHandle, u32) -> u32,
}

// Every object starts with a pointer to its dispatch table.
#[repr(C)]
struct RawObject<V> {
    vtbl: *const V,
}

fn last_dl_error() -> Option<String> {
    unsafe {
        let message = libc::dlerror();
        if message.is_null() {
            None
        } else {
            Some(CStr::from_ptr(message).to_string_lossy().into_owned())
        }
    }
}

fn byte_len<T>(data: &[T]) -> u32 {
    (data.len() * size_of::<T>()) as u32
}

/// A driver module mapped with `dlopen`.
#[derive(Debug)]
pub struct Library {
    handle: NonNull<c_void>,
}

impl Library {
    pub fn open(path: &str) -> Result<Library> {
        let c_path = CString::new(path)
            .map_err(|error| Error::LoadFailure(error.to_string()))?;
        log::trace!("dlopen({:?})", path);
        let handle = unsafe { libc::dlopen(c_path.as_ptr(), libc::RTLD_LAZY) };
        match NonNull::new(handle) {
            Some(handle) => Ok(Library { handle }),
            None => Err(Error::LoadFailure(
                last_dl_error().unwrap_or_else(|| format!("cannot open {}", path)))),
        }
    }

    fn symbol(&self, name: &CStr) -> Result<*mut c_void> {
        unsafe {
            // a null symbol is legal, so errors are told apart through `dlerror` alone
            last_dl_error();
            let symbol = libc::dlsym(self.handle.as_ptr(), name.as_ptr());
            log::trace!("dlsym({:?}) = {:?}", name, symbol);
            match last_dl_error() {
                Some(message) => Err(Error::LoadFailure(message)),
                None => Ok(symbol),
            }
        }
    }
}

impl Drop for Library {
    fn drop(&mut self) {
        unsafe {
            if libc::dlclose(self.handle.as_ptr()) != 0 {
                log::error!("error closing driver module: {}",
                            last_dl_error().unwrap_or_default())
            }
        }
    }
}

impl super::Module for Library {
    type Object<'a> = Object<'a>;

    fn create_instance(&self, slot: u32) -> Result<Option<Object<'_>>> {
        let symbol = self.symbol(c"CreateInstance")?;
        if symbol.is_null() {
            return Err(Error::LoadFailure("CreateInstance resolved to null".to_owned()))
        }
        let factory = unsafe { std::mem::transmute::<*mut c_void, CreateInstanceFn>(symbol) };
        let raw = unsafe { factory(slot) };
        log::trace!("CreateInstance({}) = {:?}", slot, raw);
        Ok(NonNull::new(raw.cast()).map(|raw| Object { raw, _library: PhantomData }))
    }
}

/// A reference to a base object. Released on drop.
#[derive(Debug)]
pub struct Object<'lib> {
    raw: NonNull<RawObject<UnknownVtbl>>,
    _library: PhantomData<&'lib Library>,
}

impl<'lib> Object<'lib> {
    fn vtbl(&self) -> &UnknownVtbl {
        unsafe { &*(*self.raw.as_ptr()).vtbl }
    }
}

impl<'lib> Drop for Object<'lib> {
    fn drop(&mut self) {
        let count = unsafe { (self.vtbl().release)(self.raw.as_ptr().cast()) };
        log::trace!("Release(object) = {}", count);
    }
}

impl<'lib> super::Unknown for Object<'lib> {
    type Device = Interface<'lib>;

    fn query_interface(&self, iid: &InterfaceId) -> Option<Interface<'lib>> {
        let mut raw: *mut c_void = ptr::null_mut();
        let result = unsafe { (self.vtbl().query_interface)(self.raw.as_ptr().cast(), iid, &mut raw) };
        log::trace!("QueryInterface({:x?}) = {:#x}, {:?}", iid, result, raw);
        if result != S_OK {
            return None
        }
        NonNull::new(raw.cast()).map(|raw| Interface { raw, _library: PhantomData })
    }
}

/// A reference to the device interface of an object. Released on drop.
#[derive(Debug)]
pub struct Interface<'lib> {
    raw: NonNull<RawObject<DeviceVtbl>>,
    _library: PhantomData<&'lib Library>,
}

impl<'lib> Interface<'lib> {
    fn vtbl(&self) -> &DeviceVtbl {
        unsafe { &*(*self.raw.as_ptr()).vtbl }
    }

    fn this(&self) -> This {
        self.raw.as_ptr().cast()
    }
}

impl<'lib> Drop for Interface<'lib> {
    fn drop(&mut self) {
        let count = unsafe { (self.vtbl().unknown.release)(self.this()) };
        log::trace!("Release(interface) = {}", count);
    }
}

macro_rules! call {
    ($self:ident . $method:ident ( $( $arg:expr ),* )) => {{
        let status = Status::from_code(unsafe {
            ($self.vtbl().$method)($self.this() $( , $arg )*)
        });
        log::trace!(concat!(stringify!($method), " = {:?}"), status);
        status
    }};
}

impl<'lib> super::Driver for Interface<'lib> {
    fn open_device(&mut self) -> RawHandle {
        let handle = unsafe { (self.vtbl().open_ldevice)(self.this()) };
        log::trace!("open_ldevice = {}", handle);
        handle
    }

    fn close_device(&mut self) -> Status {
        call!(self.close_ldevice())
    }

    fn load_bios(&mut self, file_name: &CStr) -> Status {
        call!(self.load_bios(file_name.as_ptr() as *mut c_char))
    }

    fn plata_test(&mut self) -> Status {
        call!(self.plata_test())
    }

    fn get_slot_param(&mut self, slot_par: &mut SlotPar) -> Status {
        call!(self.get_slot_param(slot_par))
    }

    fn read_plata_descr(&mut self, descr: &mut PlataDescr) -> Status {
        call!(self.read_plata_descr((descr as *mut PlataDescr).cast()))
    }

    fn write_plata_descr(&mut self, descr: &mut PlataDescr, enable: u16) -> Status {
        call!(self.write_plata_descr((descr as *mut PlataDescr).cast(), enable))
    }

    fn read_flash_word(&mut self, address: u16, data: &mut u16) -> Status {
        call!(self.read_flash_word(address, data))
    }

    fn write_flash_word(&mut self, address: u16, data: u16) -> Status {
        call!(self.write_flash_word(address, data))
    }

    fn enable_flash_write(&mut self, flag: u16) -> Status {
        call!(self.enable_flash_write(flag))
    }

    fn request_buffer_stream(&mut self, size: &mut u32, stream_id: u32) -> Status {
        call!(self.request_buffer_stream(size, stream_id))
    }

    fn fill_daq_parameters(&mut self, par: &mut DaqPar) -> Status {
        call!(self.fill_daq_parameters(par.as_mut_ptr()))
    }

    fn set_parameters_stream(&mut self, par: &mut DaqPar, used_size: &mut u32,
                             data: &mut *mut c_void, sync: &mut *mut c_void,
                             stream_id: u32) -> Status {
        call!(self.set_parameters_stream(par.as_mut_ptr(), used_size, data, sync, stream_id))
    }

    fn init_start_device(&mut self) -> Status {
        call!(self.init_start_ldevice())
    }

    fn start_device(&mut self) -> Status {
        call!(self.start_ldevice())
    }

    fn stop_device(&mut self) -> Status {
        call!(self.stop_ldevice())
    }

    fn enable_correction(&mut self, enable: u16) -> Status {
        call!(self.enable_correction(enable))
    }

    fn io_async(&mut self, par: &mut AsyncPar) -> Status {
        call!(self.io_async(par))
    }

    fn get_parameter(&mut self, name: u32, value: &mut u32) -> Status {
        call!(self.get_parameter(name, value))
    }

    fn set_parameter(&mut self, name: u32, value: &mut u32) -> Status {
        call!(self.set_parameter(name, value))
    }

    fn send_command(&mut self, command: u16) -> Status {
        call!(self.send_command(command))
    }

    fn set_device_event(&mut self, event: EventHandle, event_id: u32) -> Status {
        call!(self.set_ldevice_event(event, event_id))
    }

    fn get_word_dm(&mut self, address: u16, data: &mut u16) -> Status {
        call!(self.get_word_dm(address, data))
    }

    fn put_word_dm(&mut self, address: u16, data: u16) -> Status {
        call!(self.put_word_dm(address, data))
    }

    fn get_word_pm(&mut self, address: u16, data: &mut u32) -> Status {
        call!(self.get_word_pm(address, data))
    }

    fn put_word_pm(&mut self, address: u16, data: u32) -> Status {
        call!(self.put_word_pm(address, data))
    }

    fn get_array_dm(&mut self, address: u16, data: &mut [u16]) -> Status {
        call!(self.get_array_dm(address, data.len() as u32, data.as_mut_ptr()))
    }

    fn put_array_dm(&mut self, address: u16, data: &[u16]) -> Status {
        call!(self.put_array_dm(address, data.len() as u32, data.as_ptr() as *mut u16))
    }

    fn get_array_pm(&mut self, address: u16, data: &mut [u32]) -> Status {
        call!(self.get_array_pm(address, data.len() as u32, data.as_mut_ptr()))
    }

    fn put_array_pm(&mut self, address: u16, data: &[u32]) -> Status {
        call!(self.put_array_pm(address, data.len() as u32, data.as_ptr() as *mut u32))
    }

    fn in_byte(&mut self, space: PortSpace, offset: u32, data: &mut [u8], key: u32) -> Status {
        match space {
            PortSpace::Io => call!(self.inbyte(offset, data.as_mut_ptr(), byte_len(data), key)),
            PortSpace::Memory => call!(self.inmbyte(offset, data.as_mut_ptr(), byte_len(data), key)),
        }
    }

    fn in_word(&mut self, space: PortSpace, offset: u32, data: &mut [u16], key: u32) -> Status {
        match space {
            PortSpace::Io => call!(self.inword(offset, data.as_mut_ptr(), byte_len(data), key)),
            PortSpace::Memory => call!(self.inmword(offset, data.as_mut_ptr(), byte_len(data), key)),
        }
    }

    fn in_dword(&mut self, space: PortSpace, offset: u32, data: &mut [u32], key: u32) -> Status {
        match space {
            PortSpace::Io => call!(self.indword(offset, data.as_mut_ptr(), byte_len(data), key)),
            PortSpace::Memory => call!(self.inmdword(offset, data.as_mut_ptr(), byte_len(data), key)),
        }
    }

    fn out_byte(&mut self, space: PortSpace, offset: u32, data: &[u8], key: u32) -> Status {
        let ptr = data.as_ptr() as *mut u8;
        match space {
            PortSpace::Io => call!(self.outbyte(offset, ptr, byte_len(data), key)),
            PortSpace::Memory => call!(self.outmbyte(offset, ptr, byte_len(data), key)),
        }
    }

    fn out_word(&mut self, space: PortSpace, offset: u32, data: &[u16], key: u32) -> Status {
        let ptr = data.as_ptr() as *mut u16;
        match space {
            PortSpace::Io => call!(self.outword(offset, ptr, byte_len(data), key)),
            PortSpace::Memory => call!(self.outmword(offset, ptr, byte_len(data), key)),
        }
    }

    fn out_dword(&mut self, space: PortSpace, offset: u32, data: &[u32], key: u32) -> Status {
        let ptr = data.as_ptr() as *mut u32;
        match space {
            PortSpace::Io => call!(self.outdword(offset, ptr, byte_len(data), key)),
            PortSpace::Memory => call!(self.outmdword(offset, ptr, byte_len(data), key)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sys::Module;

    #[test]
    fn test_open_missing_library() {
        let result = Library::open("liblcomp-does-not-exist.so");
        assert!(matches!(result, Err(Error::LoadFailure(_))));
    }

    #[test]
    fn test_library_without_factory() {
        // any shared object without `CreateInstance` will do
        let library = Library::open("libc.so.6").unwrap();
        assert!(matches!(library.create_instance(0), Err(Error::LoadFailure(_))));
        drop(library);
    }
}
