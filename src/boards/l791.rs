//! L-791 register map and channel control bits.

use bitflags::bitflags;

// Register offsets in the memory window, in bytes.
pub const R_ADC_BUFFER: u32             = 0x000;
pub const R_DAC_BUFFER: u32             = 0x400;
pub const R_CONTROL_TABLE: u32          = 0x600;
pub const R_CONTROL_TABLE_LENGTH: u32   = 0x7f4;
pub const R_CHANNEL_TIME: u32           = 0x7f8;
pub const R_INT_FRAME_TIME: u32         = 0x7fc;
pub const R_ADC_PAGE_DESC: u32          = 0x800;
pub const R_DAC_PAGE_DESC: u32          = 0xa00;
pub const R_ADC_PCI_COUNT: u32          = 0xf80;
pub const R_DAC_PCI_COUNT: u32          = 0xf84;
pub const R_DAC_TIME: u32               = 0xf88;
pub const R_FLASH_DATA: u32             = 0xf8c;
pub const R_ADC_BUFFER_PTR: u32         = 0xf90;
pub const R_DAC_BUFFER_PTR: u32         = 0xf94;
pub const R_DIGITAL_IO: u32             = 0xf98;
pub const R_ADC_SAMPLE_QNT: u32         = 0xf9c;
pub const R_ADC_MASTER_QNT: u32         = 0xfa0;
pub const R_FLASH_ADDRESS: u32          = 0xfa4;
pub const R_INTERRUPT_ENABLE: u32       = 0xff0;
pub const R_STATUS: u32                 = 0xff8;
pub const R_CONTROL: u32                = 0xffc;

/// Index of the register at byte offset `register`, for dword array access.
pub const fn dword_index(register: u32) -> u32 {
    register >> 2
}

bitflags! {
    /// Contents of `R_CONTROL`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Control: u32 {
        const AdcEnable         = 1<<0;
        const AdcMasterEnable   = 1<<1;
        const ClearAdcCount     = 1<<2;
        const AutoStopAdcMaster = 1<<3;
        const AutoStopAdc       = 1<<4;

        const SyncMode0         = 1<<8;
        const SyncMode1         = 1<<9;
        const SyncSource        = 1<<10;

        const AdcBufDepth0      = 1<<12;
        const AdcBufDepth1      = 1<<13;
        const AdcBufDepth2      = 1<<14;

        const DacEnable         = 1<<16;
        const DacMasterEnable   = 1<<17;
        const ClearDacCount     = 1<<18;

        const EepromCmd0        = 1<<24;
        const EepromCmd1        = 1<<25;
        const EepromStart       = 1<<26;
        const EepromWriteEnable = 1<<27;
        const OutputEnable      = 1<<28;
    }
}

bitflags! {
    /// Contents of `R_STATUS`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u32 {
        const AdcMasterEvent    = 1<<0;
        const AdcOverflowEvent  = 1<<1;
        const AdcBufferEvent    = 1<<3;
        const DacUserEvent      = 1<<16;
        const DacUnderflowEvent = 1<<18;
        const PowerOverEvent    = 1<<24;
        const EepromBusy        = 1<<25;
        const Interrupt         = 1<<31;
    }
}

pub const CHANNELS: u32 = 16;

/// Gain step, in bits 6..=8 of a channel control word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputRange {
    #[default]
    V10_0,
    V5_0,
    V2_5,
    V1_25,
    V0_625,
    V0_312,
    V0_156,
    V0_078,
}

impl InputRange {
    pub fn from_channel(word: u32) -> InputRange {
        match (word >> 6) & 0x7 {
            0 => Self::V10_0,
            1 => Self::V5_0,
            2 => Self::V2_5,
            3 => Self::V1_25,
            4 => Self::V0_625,
            5 => Self::V0_312,
            6 => Self::V0_156,
            _ => Self::V0_078,
        }
    }

    pub fn bits(self) -> u32 {
        (self as u32) << 6
    }

    pub fn volts(self) -> f32 {
        match self {
            Self::V10_0  => 10.0,
            Self::V5_0   => 5.0,
            Self::V2_5   => 2.5,
            Self::V1_25  => 1.25,
            Self::V0_625 => 0.625,
            Self::V0_312 => 0.312,
            Self::V0_156 => 0.156,
            Self::V0_078 => 0.078,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

pub fn channel(number: u32, range: InputRange) -> u32 {
    (number & 0x3f) | range.bits()
}
