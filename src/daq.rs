//! Typed structures as the driver consumes them.
//!
//! These use the driver's natural alignment and live only for the duration of a single call.

use core::ffi::c_void;

use bytemuck::Zeroable;

use crate::params::{Mode, MAX_CHANNELS};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Zeroable)]
pub struct DacPar0 {
    pub s_type: u32,
    pub fifo: u32,
    pub irq_step: u32,
    pub pages: u32,
    pub auto_init: u32,
    pub d_rate: f64,
    pub rate: u32,
    pub irq_ena: u32,
    pub dac_ena: u32,
    pub dac_number: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Zeroable)]
pub struct DacPar1 {
    pub s_type: u32,
    pub fifo: u32,
    pub irq_step: u32,
    pub pages: u32,
    pub auto_init: u32,
    pub d_rate: f64,
    pub rate: u32,
    pub irq_ena: u32,
    pub dac_ena: u32,
    pub reserved1: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Zeroable)]
pub struct AdcPar0 {
    pub s_type: u32,
    pub fifo: u32,
    pub irq_step: u32,
    pub pages: u32,
    pub auto_init: u32,
    pub d_rate: f64,
    pub d_kadr: f64,
    pub d_scale: f64,
    pub rate: u32,
    pub kadr: u32,
    pub scale: u32,
    pub fp_delay: u32,
    pub synchro_type: u32,
    pub synchro_sensitivity: u32,
    pub synchro_mode: u32,
    pub ad_channel: u32,
    pub ad_porog: u32,
    pub nch: u32,
    pub chn: [u32; MAX_CHANNELS],
    pub irq_ena: u32,
    pub adc_ena: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Zeroable)]
pub struct AdcPar1 {
    pub s_type: u32,
    pub fifo: u32,
    pub irq_step: u32,
    pub pages: u32,
    pub auto_init: u32,
    pub d_rate: f64,
    pub d_kadr: f64,
    pub reserved1: u16,
    pub dig_rate: u16,
    pub dm_ena: u32,
    pub rate: u32,
    pub kadr: u32,
    pub start_cnt: u32,
    pub stop_cnt: u32,
    pub synchro_type: u32,
    pub synchro_mode: u32,
    pub ad_porog: u32,
    pub synchro_src: u32,
    pub adc_imask: u32,
    pub nch: u32,
    pub chn: [u32; MAX_CHANNELS],
    pub irq_ena: u32,
    pub adc_ena: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Zeroable)]
pub struct AsyncPar {
    pub s_type: u32,
    pub fifo: u32,
    pub irq_step: u32,
    pub pages: u32,
    pub d_rate: f64,
    pub rate: u32,
    pub nch: u32,
    pub chn: [u32; MAX_CHANNELS],
    pub data: [u32; MAX_CHANNELS],
    pub mode: u32,
}

impl Default for AdcPar0 {
    fn default() -> Self {
        Zeroable::zeroed()
    }
}

impl Default for AdcPar1 {
    fn default() -> Self {
        Zeroable::zeroed()
    }
}

impl Default for AsyncPar {
    fn default() -> Self {
        Zeroable::zeroed()
    }
}

/// One driver structure per parameter block mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DaqPar {
    Dac0(DacPar0),
    Dac1(DacPar1),
    Adc0(AdcPar0),
    Adc1(AdcPar1),
}

impl DaqPar {
    /// An all-zero structure of the layout selected by `mode`.
    pub fn zeroed(mode: Mode) -> DaqPar {
        match mode {
            Mode::Dac0 => DaqPar::Dac0(Zeroable::zeroed()),
            Mode::Dac1 => DaqPar::Dac1(Zeroable::zeroed()),
            Mode::Adc0 => DaqPar::Adc0(Zeroable::zeroed()),
            Mode::Adc1 => DaqPar::Adc1(Zeroable::zeroed()),
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            DaqPar::Dac0(_) => Mode::Dac0,
            DaqPar::Dac1(_) => Mode::Dac1,
            DaqPar::Adc0(_) => Mode::Adc0,
            DaqPar::Adc1(_) => Mode::Adc1,
        }
    }

    /// Buffer shape as `(pages, fifo, irq_step)`.
    pub fn buffer_shape(&self) -> (u32, u32, u32) {
        match self {
            DaqPar::Dac0(par) => (par.pages, par.fifo, par.irq_step),
            DaqPar::Dac1(par) => (par.pages, par.fifo, par.irq_step),
            DaqPar::Adc0(par) => (par.pages, par.fifo, par.irq_step),
            DaqPar::Adc1(par) => (par.pages, par.fifo, par.irq_step),
        }
    }

    /// Pointer to the structure itself, as the driver expects it.
    pub(crate) fn as_mut_ptr(&mut self) -> *mut c_void {
        match self {
            DaqPar::Dac0(par) => par as *mut DacPar0 as *mut c_void,
            DaqPar::Dac1(par) => par as *mut DacPar1 as *mut c_void,
            DaqPar::Adc0(par) => par as *mut AdcPar0 as *mut c_void,
            DaqPar::Adc1(par) => par as *mut AdcPar1 as *mut c_void,
        }
    }
}
