use std::ffi::CString;
use std::path::Path;
use std::ptr;

use crate::{Error, Result};
use crate::sys::{Driver, EventHandle, Module, PortSpace, RawHandle, Unknown, IID_ILDEV, INVALID_HANDLE};
use crate::ioctl::{Event, SlotPar, Status, Stream};
use crate::params::{DaqShape, Mode, WAsyncPar, WDaqPar};
use crate::daq::{AsyncPar, DaqPar};
use crate::descr::PlataDescr;
use crate::capture::StreamBuffers;

/// A board, reached through the device interface of its driver.
///
/// Owns exactly one reference to the interface. `close` closes the board and releases it;
/// dropping an unclosed device only releases it.
#[derive(Debug)]
pub struct Device<D: Driver> {
    driver: D,
}

impl<D: Driver> Device<D> {
    pub fn from_driver(driver: D) -> Device<D> {
        Device { driver }
    }

    /// Instantiates the driver object for `slot` and obtains its device interface. The base
    /// object is released before returning, whether or not the interface was available.
    pub fn create_instance<'m, M>(module: &'m M, slot: u32) -> Result<Device<D>>
            where M: Module + 'm, M::Object<'m>: Unknown<Device = D> {
        let object = module.create_instance(slot)?
            .ok_or(Error::InstantiationFailure { slot })?;
        let driver = object.query_interface(&IID_ILDEV);
        drop(object);
        log::trace!("create_instance({}) = {}", slot, if driver.is_some() { "ok" } else { "no interface" });
        driver.map(Device::from_driver).ok_or(Error::InterfaceNotSupported)
    }

    /// Instantiates and opens the device, runs `f`, and closes it again.
    pub fn with<'m, M, F, T>(module: &'m M, slot: u32, f: F) -> Result<T>
            where M: Module + 'm, M::Object<'m>: Unknown<Device = D>,
                  F: FnOnce(&mut Device<D>) -> Result<T> {
        let mut device = Self::create_instance(module, slot)?;
        device.open()?;
        let result = f(&mut device);
        let closed = device.close();
        let value = result?;
        closed?;
        Ok(value)
    }

    fn forward<F: FnOnce(&mut D) -> Status>(&mut self, name: &str, f: F) -> Result<()> {
        let status = f(&mut self.driver);
        log::trace!("{} = {:?}", name, status);
        status.into_result()
    }

    pub fn open(&mut self) -> Result<RawHandle> {
        let handle = self.driver.open_device();
        log::trace!("open = {}", handle);
        if handle == INVALID_HANDLE {
            Err(Error::Device(Status::Error))
        } else {
            Ok(handle)
        }
    }

    /// Closes the board and releases the interface. The interface is released even if the
    /// board could not be closed.
    pub fn close(self) -> Result<()> {
        let Device { mut driver } = self;
        let status = driver.close_device();
        drop(driver);
        log::trace!("close = {:?}", status);
        status.into_result()
    }

    /// Configures the board from a generic parameter block holding the layout `mode`.
    ///
    /// After the driver returns, the achieved rates (and for ADC layouts, the channel count) are
    /// written back into `block`, whatever the status.
    pub fn fill_daq_parameters(&mut self, block: &mut WDaqPar, mode: u32) -> Result<()> {
        let mode = Mode::try_from(mode)?;
        let mut par = DaqPar::decode(mode, block);
        let status = self.driver.fill_daq_parameters(&mut par);
        par.store_achieved(block);
        log::debug!("fill_daq_parameters({:?}) = {:?}", mode, status);
        status.into_result()
    }

    pub fn fill_parameters<T: DaqShape>(&mut self, shape: &mut T) -> Result<()> {
        let mut block = WDaqPar::new(shape);
        let result = self.fill_daq_parameters(&mut block, T::MODE.tag());
        *shape = *block.view::<T>();
        result
    }

    /// Sets up buffers for `stream`. The driver starts from a zeroed structure of the layout
    /// `mode`; only the buffer shape it settles on is written back into `block`.
    pub fn set_parameters_stream(&mut self, block: &mut WDaqPar, mode: u32, used_size: &mut u32,
                                 stream: Stream) -> Result<StreamBuffers> {
        let mode = Mode::try_from(mode)?;
        let mut par = DaqPar::zeroed(mode);
        let (mut data, mut sync) = (ptr::null_mut(), ptr::null_mut());
        let status = self.driver.set_parameters_stream(&mut par, used_size, &mut data, &mut sync,
                                                       stream.id());
        par.store_buffer_shape(block);
        log::debug!("set_parameters_stream({:?}, {:?}) = {:?}, used_size={}, data={:?}, sync={:?}",
                    mode, stream, status, used_size, data, sync);
        status.into_result()?;
        Ok(StreamBuffers::new(data, sync, *used_size))
    }

    pub fn set_stream_parameters<T: DaqShape>(&mut self, shape: &mut T, used_size: &mut u32,
                                              stream: Stream) -> Result<StreamBuffers> {
        let mut block = WDaqPar::new(shape);
        let result = self.set_parameters_stream(&mut block, T::MODE.tag(), used_size, stream);
        *shape = *block.view::<T>();
        result
    }

    /// Performs a single asynchronous transfer. `block` is updated only if it succeeds.
    pub fn io_async(&mut self, block: &mut WAsyncPar) -> Result<()> {
        let mut par = AsyncPar::from(&*block);
        let status = self.driver.io_async(&mut par);
        log::debug!("io_async(s_type={}) = {:?}", { block.s_type }, status);
        status.into_result()?;
        *block = WAsyncPar::from(&par);
        Ok(())
    }

    pub fn load_bios(&mut self, file_name: &Path) -> Result<()> {
        let file_name = CString::new(file_name.to_string_lossy().into_owned())
            .map_err(|error| Error::Other(error.into()))?;
        self.forward("load_bios", |driver| driver.load_bios(&file_name))
    }

    pub fn plata_test(&mut self) -> Result<()> {
        self.forward("plata_test", |driver| driver.plata_test())
    }

    pub fn slot_param(&mut self) -> Result<SlotPar> {
        let mut slot_par = SlotPar::default();
        self.forward("get_slot_param", |driver| driver.get_slot_param(&mut slot_par))?;
        Ok(slot_par)
    }

    pub fn read_descriptor(&mut self) -> Result<PlataDescr> {
        let mut descr = PlataDescr::default();
        self.forward("read_plata_descr", |driver| driver.read_plata_descr(&mut descr))?;
        Ok(descr)
    }

    pub fn write_descriptor(&mut self, descr: &PlataDescr, enable: bool) -> Result<()> {
        let mut descr = *descr;
        self.forward("write_plata_descr", |driver| driver.write_plata_descr(&mut descr, enable as u16))
    }

    pub fn read_flash_word(&mut self, address: u16) -> Result<u16> {
        let mut data = 0;
        self.forward("read_flash_word", |driver| driver.read_flash_word(address, &mut data))?;
        Ok(data)
    }

    pub fn write_flash_word(&mut self, address: u16, data: u16) -> Result<()> {
        self.forward("write_flash_word", |driver| driver.write_flash_word(address, data))
    }

    pub fn enable_flash_write(&mut self, enable: bool) -> Result<()> {
        self.forward("enable_flash_write", |driver| driver.enable_flash_write(enable as u16))
    }

    /// Asks the driver for a stream buffer of `size` samples; returns the size it allocated.
    pub fn request_buffer_stream(&mut self, size: u32, stream: Stream) -> Result<u32> {
        let mut size = size;
        self.forward("request_buffer_stream", |driver| driver.request_buffer_stream(&mut size, stream.id()))?;
        Ok(size)
    }

    pub fn init_start(&mut self) -> Result<()> {
        self.forward("init_start_device", |driver| driver.init_start_device())
    }

    pub fn start(&mut self) -> Result<()> {
        self.forward("start_device", |driver| driver.start_device())
    }

    pub fn stop(&mut self) -> Result<()> {
        self.forward("stop_device", |driver| driver.stop_device())
    }

    pub fn enable_correction(&mut self, enable: bool) -> Result<()> {
        self.forward("enable_correction", |driver| driver.enable_correction(enable as u16))
    }

    pub fn get_parameter(&mut self, name: u32) -> Result<u32> {
        let mut value = 0;
        self.forward("get_parameter", |driver| driver.get_parameter(name, &mut value))?;
        Ok(value)
    }

    /// Sets parameter `name`; returns the value as the driver left it.
    pub fn set_parameter(&mut self, name: u32, value: u32) -> Result<u32> {
        let mut value = value;
        self.forward("set_parameter", |driver| driver.set_parameter(name, &mut value))?;
        Ok(value)
    }

    pub fn send_command(&mut self, command: u16) -> Result<()> {
        self.forward("send_command", |driver| driver.send_command(command))
    }

    pub fn set_event(&mut self, event: EventHandle, id: Event) -> Result<()> {
        self.forward("set_device_event", |driver| driver.set_device_event(event, id.id()))
    }

    pub fn get_word_dm(&mut self, address: u16) -> Result<u16> {
        let mut data = 0;
        self.forward("get_word_dm", |driver| driver.get_word_dm(address, &mut data))?;
        Ok(data)
    }

    pub fn put_word_dm(&mut self, address: u16, data: u16) -> Result<()> {
        self.forward("put_word_dm", |driver| driver.put_word_dm(address, data))
    }

    pub fn get_word_pm(&mut self, address: u16) -> Result<u32> {
        let mut data = 0;
        self.forward("get_word_pm", |driver| driver.get_word_pm(address, &mut data))?;
        Ok(data)
    }

    pub fn put_word_pm(&mut self, address: u16, data: u32) -> Result<()> {
        self.forward("put_word_pm", |driver| driver.put_word_pm(address, data))
    }

    pub fn get_array_dm(&mut self, address: u16, data: &mut [u16]) -> Result<()> {
        self.forward("get_array_dm", |driver| driver.get_array_dm(address, data))
    }

    pub fn put_array_dm(&mut self, address: u16, data: &[u16]) -> Result<()> {
        self.forward("put_array_dm", |driver| driver.put_array_dm(address, data))
    }

    pub fn get_array_pm(&mut self, address: u16, data: &mut [u32]) -> Result<()> {
        self.forward("get_array_pm", |driver| driver.get_array_pm(address, data))
    }

    pub fn put_array_pm(&mut self, address: u16, data: &[u32]) -> Result<()> {
        self.forward("put_array_pm", |driver| driver.put_array_pm(address, data))
    }

    pub fn in_byte(&mut self, space: PortSpace, offset: u32, data: &mut [u8], key: u32) -> Result<()> {
        self.forward("in_byte", |driver| driver.in_byte(space, offset, data, key))
    }

    pub fn in_word(&mut self, space: PortSpace, offset: u32, data: &mut [u16], key: u32) -> Result<()> {
        self.forward("in_word", |driver| driver.in_word(space, offset, data, key))
    }

    pub fn in_dword(&mut self, space: PortSpace, offset: u32, data: &mut [u32], key: u32) -> Result<()> {
        self.forward("in_dword", |driver| driver.in_dword(space, offset, data, key))
    }

    pub fn out_byte(&mut self, space: PortSpace, offset: u32, data: &[u8], key: u32) -> Result<()> {
        self.forward("out_byte", |driver| driver.out_byte(space, offset, data, key))
    }

    pub fn out_word(&mut self, space: PortSpace, offset: u32, data: &[u16], key: u32) -> Result<()> {
        self.forward("out_word", |driver| driver.out_word(space, offset, data, key))
    }

    pub fn out_dword(&mut self, space: PortSpace, offset: u32, data: &[u32], key: u32) -> Result<()> {
        self.forward("out_dword", |driver| driver.out_dword(space, offset, data, key))
    }

    // The extended (LDEV2) interface is not provided by any supported driver.

    pub fn ldev2_interface(&mut self) -> Result<()> {
        Err(Error::NotSupported)
    }

    pub fn release_ldev2_interface(&mut self) -> Result<()> {
        Err(Error::NotSupported)
    }

    pub fn init_start_ex(&mut self, _stream: Stream) -> Result<()> {
        Err(Error::NotSupported)
    }

    pub fn start_ex(&mut self, _stream: Stream) -> Result<()> {
        Err(Error::NotSupported)
    }

    pub fn stop_ex(&mut self, _stream: Stream) -> Result<()> {
        Err(Error::NotSupported)
    }
}
