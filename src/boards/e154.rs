//! E-154 USB requests, memory map and channel control bits.

pub const V_RESET_DSP: u16              = 0;
pub const V_PUT_ARRAY: u16              = 1;
pub const V_GET_ARRAY: u16              = 2;
pub const V_START_ADC: u16              = 3;
pub const V_STOP_ADC: u16               = 4;
pub const V_START_ADC_ONCE: u16         = 5;
pub const V_GET_MODULE_NAME: u16        = 11;

pub const L_ADC_PARS_BASE: u16          = 0x0060;
pub const L_ADC_ONCE_FLAG: u16          = L_ADC_PARS_BASE + 136;
pub const L_FLASH_ENABLED: u16          = L_ADC_PARS_BASE + 137;
pub const L_TTL_OUT: u16                = 0x0400;
pub const L_TTL_IN: u16                 = 0x0400;
pub const L_ENABLE_TTL_OUT: u16         = 0x0402;
pub const L_ADC_SAMPLE: u16             = 0x0410;
pub const L_ADC_CHANNEL_SELECT: u16     = 0x0412;
pub const L_ADC_START: u16              = 0x0413;
pub const L_DAC_SAMPLE: u16             = 0x0420;
pub const L_SUSPEND_MODE: u16           = 0x0430;
pub const L_DATA_FLASH_BASE: u16        = 0x0800;
pub const L_CODE_FLASH_BASE: u16        = 0x1000;
pub const L_BIOS_VERSION: u16           = 0x1080;
pub const L_DESCRIPTOR_BASE: u16        = 0x2780;
pub const L_RAM: u16                    = 0x8000;

// Synchronization, for `WAdcPar0::synchro_type`. Code 2 is reserved.
pub const NO_SYNC: u32                  = 0;
pub const TTL_START_SYNC: u32           = 1;
pub const RESERVED_SYNC: u32            = 2;
pub const ANALOG_SYNC: u32              = 3;

pub const A_SYNC_LEVEL: u32             = 0;
pub const A_SYNC_EDGE: u32              = 1;

pub const A_SYNC_UP_EDGE: u32           = 0;
pub const A_SYNC_DOWN_EDGE: u32         = 1;

pub const CHANNELS: u32 = 8;

/// Gain step, in bits 6..=7 of a channel control word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputRange {
    #[default]
    V5_0,
    V1_6,
    V0_5,
    V0_16,
}

impl InputRange {
    pub fn from_channel(word: u32) -> InputRange {
        match (word >> 6) & 0x3 {
            0 => Self::V5_0,
            1 => Self::V1_6,
            2 => Self::V0_5,
            _ => Self::V0_16,
        }
    }

    pub fn bits(self) -> u32 {
        (self as u32) << 6
    }

    pub fn volts(self) -> f32 {
        match self {
            Self::V5_0  => 5.0,
            Self::V1_6  => 1.6,
            Self::V0_5  => 0.5,
            Self::V0_16 => 0.16,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

pub fn channel(number: u32, range: InputRange) -> u32 {
    (number & 0x7) | range.bits()
}
