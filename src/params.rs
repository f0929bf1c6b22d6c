//! Client-side parameter blocks, laid out byte for byte as clients pass them in.
//!
//! All shapes are packed; fields must be copied out before they are borrowed.

use core::fmt;
use core::mem::size_of;

use bytemuck::{Pod, Zeroable};

use crate::{Error, Result};

/// Hardware ceiling on the length of a channel list or an asynchronous data payload.
pub const MAX_CHANNELS: usize = 128;

/// Size of the generic parameter block; large enough for the widest shape.
pub const WDAQ_PAR_SIZE: usize = 1024;

/// Selects which shape a generic parameter block holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Mode {
    Dac0 = 0,
    Dac1 = 1,
    Adc0 = 2,
    Adc1 = 3,
}

impl Mode {
    pub fn tag(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for Mode {
    type Error = Error;

    fn try_from(tag: u32) -> Result<Mode> {
        match tag {
            0 => Ok(Mode::Dac0),
            1 => Ok(Mode::Dac1),
            2 => Ok(Mode::Adc0),
            3 => Ok(Mode::Adc1),
            tag => Err(Error::Dispatch(tag)),
        }
    }
}

/// Channel scan list with a fixed capacity of `MAX_CHANNELS` words.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ChannelList {
    len: usize,
    slots: [u32; MAX_CHANNELS],
}

impl fmt::Debug for ChannelList {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl Default for ChannelList {
    fn default() -> Self {
        ChannelList { len: 0, slots: [0; MAX_CHANNELS] }
    }
}

impl ChannelList {
    pub fn new() -> ChannelList {
        Self::default()
    }

    pub fn from_slice(words: &[u32]) -> Result<ChannelList> {
        if words.len() > MAX_CHANNELS {
            return Err(Error::TooManyChannels(words.len()))
        }
        let mut list = Self::new();
        list.slots[..words.len()].copy_from_slice(words);
        list.len = words.len();
        Ok(list)
    }

    /// Builds a list from a raw `nch`/`chn` pair. A count past capacity is clamped.
    pub fn from_raw(count: u32, slots: [u32; MAX_CHANNELS]) -> ChannelList {
        ChannelList { len: (count as usize).min(MAX_CHANNELS), slots }
    }

    pub fn push(&mut self, word: u32) -> Result<()> {
        if self.len == MAX_CHANNELS {
            return Err(Error::TooManyChannels(self.len + 1))
        }
        self.slots[self.len] = word;
        self.len += 1;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.slots[..self.len]
    }

    /// All slots, including those past the end of the list.
    pub fn slots(&self) -> [u32; MAX_CHANNELS] {
        self.slots
    }
}

/// DAC configuration, first layout.
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct WDacPar0 {
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

/// DAC configuration, second layout.
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct WDacPar1 {
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

/// ADC configuration for E14-140, E14-440 and E-154 style boards.
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct WAdcPar0 {
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

/// ADC configuration for E20-10 and L-791 style boards.
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct WAdcPar1 {
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

/// Request and result of an asynchronous (single shot) transfer.
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct WAsyncPar {
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

macro_rules! channel_accessors {
    ( $( $shape:ty ),* ) => {
        $(
            impl $shape {
                pub fn channels(&self) -> ChannelList {
                    ChannelList::from_raw(self.nch, self.chn)
                }

                pub fn set_channels(&mut self, channels: &ChannelList) {
                    self.nch = channels.len() as u32;
                    self.chn = channels.slots();
                }
            }

            impl Default for $shape {
                fn default() -> Self {
                    Zeroable::zeroed()
                }
            }
        )*
    };
}

channel_accessors!(WAdcPar0, WAdcPar1, WAsyncPar);

/// A client shape that can be carried in a `WDaqPar`.
pub trait DaqShape: Pod {
    const MODE: Mode;
}

impl DaqShape for WDacPar0 { const MODE: Mode = Mode::Dac0; }
impl DaqShape for WDacPar1 { const MODE: Mode = Mode::Dac1; }
impl DaqShape for WAdcPar0 { const MODE: Mode = Mode::Adc0; }
impl DaqShape for WAdcPar1 { const MODE: Mode = Mode::Adc1; }

const _: () = {
    assert!(size_of::<WDacPar0>() <= WDAQ_PAR_SIZE);
    assert!(size_of::<WDacPar1>() <= WDAQ_PAR_SIZE);
    assert!(size_of::<WAdcPar0>() <= WDAQ_PAR_SIZE);
    assert!(size_of::<WAdcPar1>() <= WDAQ_PAR_SIZE);
};

/// Generic parameter block. Which shape it holds is told by a `Mode` passed alongside it.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct WDaqPar {
    image: [u8; WDAQ_PAR_SIZE],
}

impl fmt::Debug for WDaqPar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "WDaqPar {{ .. {} bytes }}", self.image.len())
    }
}

impl Default for WDaqPar {
    fn default() -> Self {
        Zeroable::zeroed()
    }
}

impl WDaqPar {
    pub fn new<T: DaqShape>(shape: &T) -> WDaqPar {
        let mut block = Self::default();
        *block.view_mut::<T>() = *shape;
        block
    }

    pub fn from_bytes(bytes: &[u8; WDAQ_PAR_SIZE]) -> WDaqPar {
        WDaqPar { image: *bytes }
    }

    pub fn as_bytes(&self) -> &[u8; WDAQ_PAR_SIZE] {
        &self.image
    }

    pub fn view<T: DaqShape>(&self) -> &T {
        bytemuck::from_bytes(&self.image[..size_of::<T>()])
    }

    pub fn view_mut<T: DaqShape>(&mut self) -> &mut T {
        bytemuck::from_bytes_mut(&mut self.image[..size_of::<T>()])
    }
}
