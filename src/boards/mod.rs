//! Board types, and the constants each board family is programmed with.

pub mod e440;
pub mod e140;
pub mod e154;
pub mod e2010;
pub mod l791;

pub use e2010::{AdcInputMask, InputRange};

/// Board type code, as found in `SlotPar::board_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardType {
    None,
    L1250,
    N1250,
    L1251,
    L1221,
    PciA,
    PciB,
    L264,
    L305,
    L1450C,
    L1450,
    L032,
    Hi8,
    PciC,
    Lynx2,
    Tiger2,
    Tiger3,
    Lion,
    L791,
    Lcpi,
    E440,
    E140,
    E2010,
    E270,
    CanUsb,
    Ak9,
    Ltr010,
    Ltr021,
    E154,
    E2010B,
    Ltr031,
    Ltr030,
    E310,
    Ca01,
    Unknown(u32),
}

impl BoardType {
    pub fn from_code(code: u32) -> BoardType {
        match code {
            0  => Self::None,
            1  => Self::L1250,
            2  => Self::N1250,
            3  => Self::L1251,
            4  => Self::L1221,
            5  => Self::PciA,
            6  => Self::PciB,
            8  => Self::L264,
            9  => Self::L305,
            10 => Self::L1450C,
            11 => Self::L1450,
            12 => Self::L032,
            13 => Self::Hi8,
            14 => Self::PciC,
            15 => Self::Lynx2,
            16 => Self::Tiger2,
            17 => Self::Tiger3,
            18 => Self::Lion,
            19 => Self::L791,
            20 => Self::Lcpi,
            30 => Self::E440,
            31 => Self::E140,
            32 => Self::E2010,
            33 => Self::E270,
            34 => Self::CanUsb,
            35 => Self::Ak9,
            36 => Self::Ltr010,
            37 => Self::Ltr021,
            38 => Self::E154,
            39 => Self::E2010B,
            40 => Self::Ltr031,
            41 => Self::Ltr030,
            77 => Self::E310,
            90 => Self::Ca01,
            code => Self::Unknown(code),
        }
    }

    /// Whether the board is configured with the `WAdcPar1` layout rather than `WAdcPar0`.
    pub fn uses_adc_mode_b(self) -> bool {
        matches!(self, Self::E2010 | Self::E2010B | Self::L791)
    }
}
