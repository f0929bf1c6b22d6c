//! Status codes, request identifiers and plain structures shared with the driver.

use bytemuck::{Pod, Zeroable};

use crate::{Error, Result};

/// Completion code returned by every driver operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Status {
    Success      = 0,
    NotSupported = 1,
    Error        = 2,
    NoBoard      = 3,
    InUse        = 4,
    Timeout      = 5,
}

impl Status {
    /// Codes outside of the known set read as `Status::Error`.
    pub fn from_code(code: u32) -> Status {
        match code {
            0 => Status::Success,
            1 => Status::NotSupported,
            2 => Status::Error,
            3 => Status::NoBoard,
            4 => Status::InUse,
            5 => Status::Timeout,
            _ => {
                log::trace!("unknown status code {}", code);
                Status::Error
            }
        }
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn is_success(self) -> bool {
        self == Status::Success
    }

    pub fn into_result(self) -> Result<()> {
        match self {
            Status::Success => Ok(()),
            Status::NotSupported => Err(Error::NotSupported),
            status => Err(Error::Device(status)),
        }
    }
}

/// Stream selector for buffer requests and streaming configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum Stream {
    Null   = 0,
    #[default]
    Adc    = 1,
    Dac    = 2,
    TtlIn  = 3,
    TtlOut = 4,
    FMeter = 5,
    Dds    = 6,
}

impl Stream {
    pub fn id(self) -> u32 {
        self as u32
    }
}

/// Event identifiers accepted by `SetLDeviceEvent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Event {
    AdcBuffer  = 1,
    DacBuffer  = 2,
    AdcOverflow = 3,
    AdcFifo    = 4,
    DacUser    = 5,
    DacUnderflow = 6,
    PowerOverload = 7,
}

impl Event {
    pub fn id(self) -> u32 {
        self as u32
    }
}

// `s_type` values of a parameter block.
pub const PARAM_ADC: u32 = 1;
pub const PARAM_DAC: u32 = 2;

// `s_type` values of an asynchronous transfer block.
pub const ASYNC_ADC_CFG: u32 = 3;
pub const ASYNC_TTL_CFG: u32 = 4;
pub const ASYNC_DAC_CFG: u32 = 5;
pub const ASYNC_ADC_INP: u32 = 6;
pub const ASYNC_TTL_INP: u32 = 7;
pub const ASYNC_TTL_OUT: u32 = 8;
pub const ASYNC_DAC_OUT: u32 = 9;
pub const ASYNC_FREQ_IN: u32 = 10;
pub const DDS_FM_PARAM: u32 = 11;

// Names for `GetParameter`/`SetParameter`.
pub const PARAM_BOARD_TYPE: u32 = 10000;
pub const PARAM_POINT_SIZE: u32 = 10001;
pub const PARAM_SYNC_ADDR_LO: u32 = 10002;
pub const PARAM_SYNC_ADDR_HI: u32 = 10003;
pub const PARAM_DATA_ADDR_LO: u32 = 10004;
pub const PARAM_DATA_ADDR_HI: u32 = 10005;
pub const PARAM_SYNC1_ADDR_LO: u32 = 10006;
pub const PARAM_SYNC1_ADDR_HI: u32 = 10007;
pub const PARAM_DATA1_ADDR_LO: u32 = 10008;
pub const PARAM_DATA1_ADDR_HI: u32 = 10009;
/// First of 128 user words kept by the driver between calls.
pub const PARAM_USER_BASE: u32 = 10100;

/// Resources of a virtual slot as reported by `GetSlotParam`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct SlotPar {
    pub base: u32,
    pub base_len: u32,
    pub base1: u32,
    pub base1_len: u32,
    pub mem: u32,
    pub mem_len: u32,
    pub mem1: u32,
    pub mem1_len: u32,
    pub irq: u32,
    pub board_type: u32,
    pub dsp_type: u32,
    pub dma: u32,
    pub dma_dac: u32,
    pub dta_reg: u32,
    pub idma_reg: u32,
    pub cmd_reg: u32,
    pub irq_rst: u32,
    pub dta_array: u32,
    pub rdy_reg: u32,
    pub cfg_reg: u32,
}
