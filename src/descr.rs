//! Board descriptors, as kept in the flash of each module.

use core::fmt;
use core::mem::size_of;

use bytemuck::{Pod, Zeroable};

use crate::boards::BoardType;

/// Size of the descriptor image exchanged with `ReadPlataDescr`/`WritePlataDescr`.
pub const PLATA_DESCR_SIZE: usize = 256;

/// Descriptor of the L-761, L-780 and L-783 PCI boards.
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PlataDescrLegacy {
    pub ser_num: [u8; 9],
    pub brd_name: [u8; 5],
    pub rev: u8,
    pub dsp_type: [u8; 5],
    pub quartz: u32,
    pub is_dac_present: u16,
    pub reserv1: [u16; 7],
    pub koef_adc: [u16; 8],
    pub koef_dac: [u16; 4],
    pub custom: [u16; 32],
}

#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PlataDescr1450 {
    pub ser_num: [u8; 9],
    pub brd_name: [u8; 7],
    pub rev: u8,
    pub dsp_type: [u8; 5],
    pub is_dac_present: u8,
    pub is_ext_mem_present: u8,
    pub quartz: u32,
    pub reserv1: [u16; 6],
    pub koef_adc: [u16; 8],
    pub koef_dac: [u16; 4],
    pub custom: [u16; 32],
}

#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PlataDescrE440 {
    pub ser_num: [u8; 9],
    pub brd_name: [u8; 7],
    pub rev: u8,
    pub dsp_type: [u8; 5],
    pub is_dac_present: u8,
    pub quartz: u32,
    pub reserv2: [u8; 13],
    pub koef_adc: [u16; 8],
    pub koef_dac: [u16; 4],
    pub custom: [u16; 32],
}

/// Descriptor of E14-140 modules. E-154 modules use the same layout.
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PlataDescrE140 {
    pub ser_num: [u8; 9],
    pub brd_name: [u8; 11],
    pub rev: u8,
    pub dsp_type: [u8; 11],
    pub is_dac_present: u8,
    pub quartz: u32,
    pub reserv2: [u8; 3],
    pub koef_adc: [f32; 8],
    pub koef_dac: [f32; 4],
    pub custom: [u16; 20],
}

pub type PlataDescrE154 = PlataDescrE140;

/// E14-140 descriptor in the form stored in module flash.
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PackedPlataDescrE140 {
    pub ser_num1: u8,
    pub ser_num2: u8,
    pub ser_num3: u32,
    pub name: [u8; 10],
    pub rev: u8,
    pub dsp_type: [u8; 10],
    pub quartz: u32,
    pub crc1: u8,
    pub is_dac_present: u8,
    pub adc_offs: [f32; 4],
    pub adc_scale: [f32; 4],
    pub dac_offs: [f32; 2],
    pub dac_scale: [f32; 2],
    pub reserv: [u8; 46],
    pub crc2: u8,
}

pub type PackedPlataDescrE154 = PackedPlataDescrE140;

#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PlataDescrE2010 {
    pub brd_name: [u8; 16],
    pub ser_num: [u8; 16],
    pub dsp_type: [u8; 16],
    pub quartz: u32,
    pub rev: u8,
    pub is_dac_present: u8,
    pub koef_adc: [f32; 24],
    pub koef_dac: [f32; 4],
    pub custom: [u16; 44],
    pub crc: u16,
}

#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PlataDescrL791 {
    pub crc16: u16,
    pub ser_num: [u8; 16],
    pub brd_name: [u8; 16],
    pub rev: u8,
    pub dsp_type: [u8; 5],
    pub quartz: u32,
    pub is_dac_present: u16,
    pub koef_adc: [f32; 16],
    pub koef_dac: [f32; 4],
    pub custom: u16,
}

#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PlataDescrE310 {
    pub brd_name: [u8; 16],
    pub ser_num: [u8; 16],
    pub dsp_type: [u8; 25],
    pub rev: u8,
    pub quartz: u32,
    pub reserved: [u8; 192],
    pub crc: u16,
}

/// A descriptor layout that can be viewed inside a `PlataDescr`.
pub trait DescriptorShape: Pod {}

impl DescriptorShape for PlataDescrLegacy {}
impl DescriptorShape for PlataDescr1450 {}
impl DescriptorShape for PlataDescrE440 {}
impl DescriptorShape for PlataDescrE140 {}
impl DescriptorShape for PackedPlataDescrE140 {}
impl DescriptorShape for PlataDescrE2010 {}
impl DescriptorShape for PlataDescrL791 {}
impl DescriptorShape for PlataDescrE310 {}

const _: () = {
    assert!(size_of::<PlataDescrLegacy>() <= PLATA_DESCR_SIZE);
    assert!(size_of::<PlataDescr1450>() <= PLATA_DESCR_SIZE);
    assert!(size_of::<PackedPlataDescrE140>() <= PLATA_DESCR_SIZE);
    assert!(size_of::<PlataDescrE310>() <= PLATA_DESCR_SIZE);
    assert!(size_of::<PlataDescrE440>() <= PLATA_DESCR_SIZE);
    assert!(size_of::<PlataDescrE140>() <= PLATA_DESCR_SIZE);
    assert!(size_of::<PlataDescrE2010>() <= PLATA_DESCR_SIZE);
    assert!(size_of::<PlataDescrL791>() <= PLATA_DESCR_SIZE);
};

/// Raw descriptor image. Which layout it holds depends on the board type.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct PlataDescr {
    image: [u8; PLATA_DESCR_SIZE],
}

impl fmt::Debug for PlataDescr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PlataDescr({:02x?})", &self.image[..])
    }
}

impl Default for PlataDescr {
    fn default() -> Self {
        Zeroable::zeroed()
    }
}

/// Identification fields common to all descriptor layouts.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptorInfo {
    pub serial: String,
    pub name: String,
    pub revision: char,
    pub dsp_type: String,
    /// Quartz frequency, in Hz.
    pub quartz: u32,
    pub dac_present: bool,
}

fn c_string(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

impl PlataDescr {
    pub fn new<T: DescriptorShape>(shape: &T) -> PlataDescr {
        let mut descr = Self::default();
        *descr.view_mut::<T>() = *shape;
        descr
    }

    pub fn as_bytes(&self) -> &[u8; PLATA_DESCR_SIZE] {
        &self.image
    }

    pub fn view<T: DescriptorShape>(&self) -> &T {
        bytemuck::from_bytes(&self.image[..size_of::<T>()])
    }

    pub fn view_mut<T: DescriptorShape>(&mut self) -> &mut T {
        bytemuck::from_bytes_mut(&mut self.image[..size_of::<T>()])
    }

    /// Decodes the identification fields using the layout of `board`. Returns `None` for
    /// boards without a known layout.
    pub fn info(&self, board: BoardType) -> Option<DescriptorInfo> {
        macro_rules! info {
            ($shape:ty, |$d:ident| $dac_present:expr) => {{
                let $d = self.view::<$shape>();
                Some(DescriptorInfo {
                    serial: c_string(&{ $d.ser_num }),
                    name: c_string(&{ $d.brd_name }),
                    revision: $d.rev as char,
                    dsp_type: c_string(&{ $d.dsp_type }),
                    quartz: $d.quartz,
                    dac_present: $dac_present,
                })
            }};
        }

        match board {
            BoardType::PciA | BoardType::PciB | BoardType::PciC =>
                info!(PlataDescrLegacy, |d| d.is_dac_present != 0),
            BoardType::L1450 | BoardType::L1450C =>
                info!(PlataDescr1450, |d| d.is_dac_present != 0),
            BoardType::E440 =>
                info!(PlataDescrE440, |d| d.is_dac_present != 0),
            BoardType::E140 | BoardType::E154 =>
                info!(PlataDescrE140, |d| d.is_dac_present != 0),
            BoardType::E2010 | BoardType::E2010B =>
                info!(PlataDescrE2010, |d| d.is_dac_present != 0),
            BoardType::L791 =>
                info!(PlataDescrL791, |d| d.is_dac_present != 0),
            BoardType::E310 =>
                info!(PlataDescrE310, |_d| false),
            _ => None,
        }
    }
}
