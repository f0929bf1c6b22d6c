mod sys;
mod ioctl;
mod boards;
mod params;
mod daq;
mod marshal;
mod descr;
mod capture;
mod convert;
mod config;
mod device;

#[derive(Debug)]
pub enum Error {
    LoadFailure(String),
    InstantiationFailure { slot: u32 },
    InterfaceNotSupported,
    Dispatch(u32),
    Device(Status),
    NotSupported,
    TooManyChannels(usize),
    Other(Box<dyn std::error::Error + Sync + Send + 'static>),
}

impl Error {
    /// Projects the error onto the driver status code enumeration.
    pub fn status(&self) -> Status {
        match self {
            Self::Device(status) => *status,
            Self::NotSupported => Status::NotSupported,
            _ => Status::Error,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::LoadFailure(message) =>
                write!(f, "cannot load driver module: {}", message),
            Self::InstantiationFailure { slot } =>
                write!(f, "driver module created no object for slot {}", slot),
            Self::InterfaceNotSupported =>
                write!(f, "driver object does not implement the device interface"),
            Self::Dispatch(tag) =>
                write!(f, "unrecognized parameter block mode {}", tag),
            Self::Device(status) =>
                write!(f, "device reported {:?} (code {})", status, status.code()),
            Self::NotSupported =>
                write!(f, "operation not supported"),
            Self::TooManyChannels(count) =>
                write!(f, "{} channels requested, at most {} fit", count, MAX_CHANNELS),
            Self::Other(error) =>
                write!(f, "{}", error),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            &Self::Other(ref error) => Some(error.as_ref()),
            _ => None
        }
    }
}

pub type Result<T> =
    core::result::Result<T, Error>;

pub use sys::{
    Driver,
    Module,
    Unknown,
    InterfaceId,
    IID_ILDEV,
    PortSpace,
    EventHandle,
    RawHandle,
    INVALID_HANDLE,
};

pub use sys::imp::{
    Library,
    Object,
    Interface,
};

pub use ioctl::{
    Status,
    Stream,
    Event,
    SlotPar,
    PARAM_ADC,
    PARAM_DAC,
    ASYNC_ADC_CFG,
    ASYNC_TTL_CFG,
    ASYNC_DAC_CFG,
    ASYNC_ADC_INP,
    ASYNC_TTL_INP,
    ASYNC_TTL_OUT,
    ASYNC_DAC_OUT,
    ASYNC_FREQ_IN,
    DDS_FM_PARAM,
    PARAM_BOARD_TYPE,
    PARAM_POINT_SIZE,
    PARAM_SYNC_ADDR_LO,
    PARAM_SYNC_ADDR_HI,
    PARAM_DATA_ADDR_LO,
    PARAM_DATA_ADDR_HI,
    PARAM_SYNC1_ADDR_LO,
    PARAM_SYNC1_ADDR_HI,
    PARAM_DATA1_ADDR_LO,
    PARAM_DATA1_ADDR_HI,
    PARAM_USER_BASE,
};

pub use boards::{
    e440,
    e140,
    e154,
    e2010,
    l791,
    BoardType,
    InputRange,
    AdcInputMask,
};

pub use params::{
    MAX_CHANNELS,
    WDAQ_PAR_SIZE,
    Mode,
    ChannelList,
    DaqShape,
    WDacPar0,
    WDacPar1,
    WAdcPar0,
    WAdcPar1,
    WAsyncPar,
    WDaqPar,
};

pub use daq::{
    DacPar0,
    DacPar1,
    AdcPar0,
    AdcPar1,
    AsyncPar,
    DaqPar,
};

pub use descr::{
    PLATA_DESCR_SIZE,
    PlataDescr,
    PlataDescrLegacy,
    PlataDescr1450,
    PlataDescrE440,
    PlataDescrE140,
    PlataDescrE154,
    PackedPlataDescrE140,
    PackedPlataDescrE154,
    PlataDescrE2010,
    PlataDescrL791,
    PlataDescrE310,
    DescriptorShape,
    DescriptorInfo,
};

pub use capture::StreamBuffers;

pub use convert::{Converter, ChannelScale, Volts};

pub use config::{Configuration, DEFAULT_LIBRARY};

pub type Device<'lib> =
    device::Device<crate::sys::imp::Interface<'lib>>;

pub use device::Device as GenericDevice;
