//! E14-440 DSP commands, DSP memory layout and channel control bits.

// Commands, for `send_command`.
pub const CM_TEST: u16                  = 0;
pub const CM_ENABLE_FLASH_WRITE: u16    = 1;
pub const CM_READ_FLASH_WORD: u16       = 2;
pub const CM_WRITE_FLASH_WORD: u16      = 3;
pub const CM_START_ADC: u16             = 4;
pub const CM_STOP_ADC: u16              = 5;
pub const CM_ADC_KADR: u16              = 6;
pub const CM_ADC_SAMPLE: u16            = 7;
pub const CM_START_DAC: u16             = 8;
pub const CM_STOP_DAC: u16              = 9;
pub const CM_DAC_SAMPLE: u16            = 10;
pub const CM_ENABLE_TTL_OUT: u16        = 11;
pub const CM_TTL_IN: u16                = 12;
pub const CM_TTL_OUT: u16               = 13;
pub const CM_LAST_COMMAND: u16          = 14;

// USB vendor requests.
pub const V_RESET_DSP: u16              = 0;
pub const V_PUT_ARRAY: u16              = 1;
pub const V_GET_ARRAY: u16              = 2;
pub const V_START_ADC: u16              = 3;
pub const V_START_DAC: u16              = 4;
pub const V_COMMAND_IRQ: u16            = 5;
pub const V_GO_SLEEP: u16               = 6;
pub const V_WAKEUP: u16                 = 7;
pub const V_GET_MODULE_NAME: u16        = 11;

/// Base of the data memory in the DSP address space.
pub const DM: u16 = 0x4000;
/// Base of the program memory in the DSP address space.
pub const PM: u16 = 0x0000;

/// Base of the LBIOS variable block in data memory.
pub const DATA_BASE_ADDRESS: u16 = 0x30;

pub const L_PROGRAM_BASE_ADDRESS: u16   = DATA_BASE_ADDRESS + 0x0;
pub const L_READY: u16                  = DATA_BASE_ADDRESS + 0x1;
pub const L_TMODE1: u16                 = DATA_BASE_ADDRESS + 0x2;
pub const L_TMODE2: u16                 = DATA_BASE_ADDRESS + 0x3;
pub const L_TEST_LOAD: u16              = DATA_BASE_ADDRESS + 0x4;
pub const L_COMMAND: u16                = DATA_BASE_ADDRESS + 0x5;

pub const L_DAC_SCLK_DIV: u16           = DATA_BASE_ADDRESS + 0x7;
pub const L_DAC_RATE: u16               = DATA_BASE_ADDRESS + 0x8;
pub const L_ADC_RATE: u16               = DATA_BASE_ADDRESS + 0x9;
pub const L_ADC_ENABLED: u16            = DATA_BASE_ADDRESS + 0xa;
pub const L_ADC_FIFO_BASE_ADDRESS: u16  = DATA_BASE_ADDRESS + 0xb;
pub const L_CUR_ADC_FIFO_LENGTH: u16    = DATA_BASE_ADDRESS + 0xc;
pub const L_ADC_FIFO_LENGTH: u16        = DATA_BASE_ADDRESS + 0xe;
pub const L_CORRECTION_ENABLED: u16     = DATA_BASE_ADDRESS + 0xf;
pub const L_LBIOS_VERSION: u16          = DATA_BASE_ADDRESS + 0x10;
pub const L_ADC_SAMPLE: u16             = DATA_BASE_ADDRESS + 0x11;
pub const L_ADC_CHANNEL: u16            = DATA_BASE_ADDRESS + 0x12;
pub const L_INPUT_MODE: u16             = DATA_BASE_ADDRESS + 0x13;
pub const L_SYNCHRO_AD_CHANNEL: u16     = DATA_BASE_ADDRESS + 0x16;
pub const L_SYNCHRO_AD_POROG: u16       = DATA_BASE_ADDRESS + 0x17;
pub const L_SYNCHRO_AD_MODE: u16        = DATA_BASE_ADDRESS + 0x18;
pub const L_SYNCHRO_AD_TYPE: u16        = DATA_BASE_ADDRESS + 0x19;

pub const L_CONTROL_TABLE_LENGTH: u16   = DATA_BASE_ADDRESS + 0x1b;
pub const L_FIRST_SAMPLE_DELAY: u16     = DATA_BASE_ADDRESS + 0x1c;
pub const L_INTER_KADR_DELAY: u16       = DATA_BASE_ADDRESS + 0x1d;

pub const L_DAC_SAMPLE: u16             = DATA_BASE_ADDRESS + 0x20;
pub const L_DAC_ENABLED: u16            = DATA_BASE_ADDRESS + 0x21;
pub const L_DAC_FIFO_BASE_ADDRESS: u16  = DATA_BASE_ADDRESS + 0x22;
pub const L_CUR_DAC_FIFO_LENGTH: u16    = DATA_BASE_ADDRESS + 0x24;
pub const L_DAC_FIFO_LENGTH: u16        = DATA_BASE_ADDRESS + 0x25;

pub const L_FLASH_ENABLED: u16          = DATA_BASE_ADDRESS + 0x26;
pub const L_FLASH_ADDRESS: u16          = DATA_BASE_ADDRESS + 0x27;
pub const L_FLASH_DATA: u16             = DATA_BASE_ADDRESS + 0x28;

pub const L_ENABLE_TTL_OUT: u16         = DATA_BASE_ADDRESS + 0x29;
pub const L_TTL_OUT: u16                = DATA_BASE_ADDRESS + 0x2a;
pub const L_TTL_IN: u16                 = DATA_BASE_ADDRESS + 0x2b;

pub const L_SCALE: u16                  = DATA_BASE_ADDRESS + 0x30;
pub const L_ZERO: u16                   = DATA_BASE_ADDRESS + 0x34;

pub const L_CONTROL_TABLE: u16          = 0x80;

// Channel kind, or'ed into a channel control word.
pub const CH_DIFF: u32                  = 0;
pub const CH_NULL: u32                  = 16;
pub const CH_GRND: u32                  = 32;

// Synchronization, for `WAdcPar0::synchro_type`.
pub const NO_SYNC: u32                  = 0;
pub const TTL_START_SYNC: u32           = 1;
pub const TTL_KADR_SYNC: u32            = 2;
pub const ANALOG_SYNC: u32              = 3;

// For `WAdcPar0::synchro_sensitivity`.
pub const A_SYNC_LEVEL: u32             = 0;
pub const A_SYNC_EDGE: u32              = 1;

// For `WAdcPar0::synchro_mode`.
pub const A_SYNC_UP_EDGE: u32           = 0;
pub const A_SYNC_DOWN_EDGE: u32         = 1;

/// Number of single-ended inputs; differential channels use the first half.
pub const CHANNELS: u32 = 16;

/// Gain step, in bits 6..=7 of a channel control word. The E14-140 uses the same steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputRange {
    #[default]
    V10_0,
    V2_5,
    V0_625,
    V0_156,
}

impl InputRange {
    pub fn from_channel(word: u32) -> InputRange {
        match (word >> 6) & 0x3 {
            0 => Self::V10_0,
            1 => Self::V2_5,
            2 => Self::V0_625,
            _ => Self::V0_156,
        }
    }

    pub fn bits(self) -> u32 {
        (self as u32) << 6
    }

    pub fn volts(self) -> f32 {
        match self {
            Self::V10_0  => 10.0,
            Self::V2_5   => 2.5,
            Self::V0_625 => 0.625,
            Self::V0_156 => 0.15625,
        }
    }

    /// Position of the range among the calibration coefficients.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Builds a channel control word.
pub fn channel(number: u32, kind: u32, range: InputRange) -> u32 {
    (number & 0xf) | kind | range.bits()
}
