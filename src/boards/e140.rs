//! E14-140 USB requests and memory map.

pub use super::e440::{channel, InputRange, CH_DIFF, CH_GRND, CH_NULL};

pub const V_RESET_DSP: u16              = 0;
pub const V_PUT_ARRAY: u16              = 1;
pub const V_GET_ARRAY: u16              = 2;
pub const V_START_ADC: u16              = 3;
pub const V_STOP_ADC: u16               = 4;
pub const V_START_ADC_ONCE: u16         = 5;
pub const V_START_DAC: u16              = 6;
pub const V_STOP_DAC: u16               = 7;
pub const V_GET_MODULE_NAME: u16        = 11;

pub const L_ADC_PARS_BASE: u16          = 0x0060;
pub const L_ADC_ONCE_FLAG: u16          = L_ADC_PARS_BASE + 136;
pub const L_FLASH_ENABLED: u16          = L_ADC_PARS_BASE + 137;
pub const L_DAC_PARS_BASE: u16          = 0x0160;

pub const L_TTL_OUT: u16                = 0x0400;
pub const L_TTL_IN: u16                 = 0x0400;
pub const L_ENABLE_TTL_OUT: u16         = 0x0402;
pub const L_ADC_SAMPLE: u16             = 0x0410;
pub const L_ADC_CHANNEL_SELECT: u16     = 0x0412;
pub const L_ADC_START: u16              = 0x0413;
pub const L_DAC_SAMPLE: u16             = 0x0420;
pub const L_DAC_SAMPLES: u16            = 0x0428;
pub const L_SUSPEND_MODE: u16           = 0x0430;
pub const L_DATA_FLASH_BASE: u16        = 0x0800;
pub const L_CODE_FLASH_BASE: u16        = 0x1000;
pub const L_BIOS_VERSION: u16           = 0x1080;
pub const L_DESCRIPTOR_BASE: u16        = 0x2780;
pub const L_RAM: u16                    = 0x8000;
