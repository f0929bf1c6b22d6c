//! E20-10 input configuration and synchronization codes.

use bitflags::bitflags;

/// Number of analog inputs.
pub const CHANNELS: usize = 4;

/// Input range of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputRange {
    #[default]
    V3_0,
    V1_0,
    V0_3,
}

impl InputRange {
    /// Full scale voltage.
    pub fn volts(self) -> f32 {
        match self {
            Self::V3_0 => 3.0,
            Self::V1_0 => 1.0,
            Self::V0_3 => 0.3,
        }
    }

    /// Position of the range among the calibration coefficients.
    pub fn index(self) -> usize {
        self as usize
    }
}

bitflags! {
    /// Input configuration, written to `WAdcPar1::adc_imask`.
    ///
    /// A channel with neither range bit set uses the 3 V range; a channel without its signal bit
    /// has its input grounded.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AdcInputMask: u32 {
        const Ch1Range1V0   = 0x0002;
        const Ch1Range0V3   = 0x0004;
        const Ch0Range1V0   = 0x0008;
        const Ch0Range0V3   = 0x0010;
        const Ch2Range0V3   = 0x0100;
        const Ch1Signal     = 0x0200;
        const Ch0Signal     = 0x0400;
        const Ch3Signal     = 0x0800;
        const Ch2Signal     = 0x1000;
        const Ch3Range1V0   = 0x2000;
        const Ch3Range0V3   = 0x4000;
        const Ch2Range1V0   = 0x8000;
    }
}

impl AdcInputMask {
    /// Signal bit of channel `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below `CHANNELS`.
    pub fn ch_signal(index: usize) -> Self {
        match index {
            0 => AdcInputMask::Ch0Signal,
            1 => AdcInputMask::Ch1Signal,
            2 => AdcInputMask::Ch2Signal,
            3 => AdcInputMask::Ch3Signal,
            _ => panic!("E20-10 has no input {}", index)
        }
    }

    /// Range bits of channel `index`; empty for the 3 V range.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below `CHANNELS`.
    pub fn ch_range(index: usize, range: InputRange) -> Self {
        match (index, range) {
            (0..=3, InputRange::V3_0) => AdcInputMask::empty(),
            (0, InputRange::V1_0) => AdcInputMask::Ch0Range1V0,
            (0, InputRange::V0_3) => AdcInputMask::Ch0Range0V3,
            (1, InputRange::V1_0) => AdcInputMask::Ch1Range1V0,
            (1, InputRange::V0_3) => AdcInputMask::Ch1Range0V3,
            (2, InputRange::V1_0) => AdcInputMask::Ch2Range1V0,
            (2, InputRange::V0_3) => AdcInputMask::Ch2Range0V3,
            (3, InputRange::V1_0) => AdcInputMask::Ch3Range1V0,
            (3, InputRange::V0_3) => AdcInputMask::Ch3Range0V3,
            _ => panic!("E20-10 has no input {}", index)
        }
    }

    /// Connects channel `index` to its input with the given range.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below `CHANNELS`.
    pub fn input(index: usize, range: InputRange) -> Self {
        Self::ch_signal(index) | Self::ch_range(index, range)
    }

    /// Range of channel `index`; `None` if the input is grounded or does not exist.
    pub fn range(self, index: usize) -> Option<InputRange> {
        if index >= CHANNELS || !self.contains(Self::ch_signal(index)) {
            None
        } else if self.contains(Self::ch_range(index, InputRange::V0_3)) {
            Some(InputRange::V0_3)
        } else if self.contains(Self::ch_range(index, InputRange::V1_0)) {
            Some(InputRange::V1_0)
        } else {
            Some(InputRange::V3_0)
        }
    }
}

// Start source, for `WAdcPar1::synchro_type`.
pub const INT_START_TRANS: u32      = 0x01;
pub const INT_START: u32            = 0x81;
pub const EXT_START_UP: u32         = 0x84;
pub const EXT_START_DOWN: u32       = 0x94;
/// Falling edge external start on revision B modules.
pub const EXT_START_DOWN_REVB: u32  = 0x8c;

// Conversion clock source, for `WAdcPar1::synchro_src`.
pub const INT_CLK_TRANS: u32        = 0x00;
pub const INT_CLK: u32              = 0x40;
pub const EXT_CLK_UP: u32           = 0x42;
pub const EXT_CLK_DOWN: u32         = 0x62;

// Analog synchronization, for `WAdcPar1::synchro_mode`. The channel number is or'ed in.
pub const A_SYNC_OFF: u32           = 0x0000;
pub const A_SYNC_UP_EDGE: u32       = 0x0080;
pub const A_SYNC_DOWN_EDGE: u32     = 0x0084;
pub const A_SYNC_HL_LEVEL: u32      = 0x0088;
pub const A_SYNC_LH_LEVEL: u32      = 0x008c;

/// Input number of a channel control word.
pub fn channel_input(word: u32) -> usize {
    (word & 0x3) as usize
}
