//! Conversion of raw ADC codes, as read from a stream buffer, into calibrated volts.
//!
//! Samples arrive interleaved in the order of the channel list. A read rarely ends on a frame
//! boundary, so the samples of an incomplete frame are kept and prepended to the next read.

use std::mem;

use crate::{Error, Result};
use crate::boards::{e154, e2010, e440, l791, AdcInputMask, BoardType};
use crate::descr::{PlataDescr, PlataDescrE140, PlataDescrE154, PlataDescrE2010, PlataDescrE440,
                   PlataDescrL791};
use crate::params::{WAdcPar0, WAdcPar1};

/// Code format of a converter family.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Format {
    mask: u16,
    // codes above `half` are negative
    half: i32,
    // magnitudes past `limit` are overloads
    limit: i32,
    full_scale: f32,
}

impl Format {
    const E14: Format = Format { mask: 0x3fff, half: 8192, limit: 8000, full_scale: 8000.0 };
    const E154: Format = Format { mask: 0x0fff, half: 2048, limit: 2000, full_scale: 2000.0 };
    const L791: Format = Format { mask: 0x3fff, half: 8192, limit: 8192, full_scale: 8192.0 };

    fn decode(&self, raw: u16) -> i32 {
        let code = (raw & self.mask) as i32;
        if code > self.half { code - 2 * self.half } else { code }
    }

    fn is_overload(&self, code: i32) -> bool {
        code > self.limit || code < -self.limit
    }
}

/// Calibration and range applied to one position of the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelScale {
    pub offset: f32,
    pub scale: f32,
    /// Full scale voltage of the selected range.
    pub range: f32,
}

impl ChannelScale {
    const UNCALIBRATED: ChannelScale = ChannelScale { offset: 0.0, scale: 1.0, range: 0.0 };

    fn calibrated(coefficients: &[f32], index: usize, scale_base: usize, range: f32) -> ChannelScale {
        ChannelScale {
            offset: coefficients[index],
            scale: coefficients[index + scale_base],
            range,
        }
    }
}

/// Result of one conversion, one row per position of the frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Volts {
    pub channels: Vec<Vec<f32>>,
    /// Frame positions that carried at least one code past the overload threshold.
    pub overloaded: Vec<usize>,
}

impl Volts {
    /// Number of complete frames converted.
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }
}

/// Converts the sample stream of one ADC configuration.
#[derive(Debug, Clone)]
pub struct Converter {
    format: Format,
    channels: Vec<ChannelScale>,
    tail: Vec<u16>,
}

impl Converter {
    /// Builds a converter for `board` scanning the channel control words in `channels`.
    ///
    /// Calibration coefficients come from `descr`. E20-10 ranges are taken from `input_mask`,
    /// and only revision A modules are corrected in software; other boards select the range
    /// with bits of each channel word.
    pub fn new(board: BoardType, descr: &PlataDescr, channels: &[u32],
               input_mask: AdcInputMask) -> Result<Converter> {
        if channels.is_empty() {
            return Err(Error::Other("cannot convert samples of an empty channel list".into()))
        }
        let (format, channels) = match board {
            BoardType::E440 => {
                let koef = { descr.view::<PlataDescrE440>().koef_adc }.map(f32::from);
                (Format::E14, channels.iter().map(|&word| {
                    let range = e440::InputRange::from_channel(word);
                    ChannelScale::calibrated(&koef, range.index(), 4, range.volts())
                }).collect())
            }
            BoardType::E140 => {
                let koef = { descr.view::<PlataDescrE140>().koef_adc };
                (Format::E14, channels.iter().map(|&word| {
                    let range = e440::InputRange::from_channel(word);
                    ChannelScale::calibrated(&koef, range.index(), 4, range.volts())
                }).collect())
            }
            BoardType::E154 => {
                let koef = { descr.view::<PlataDescrE154>().koef_adc };
                (Format::E154, channels.iter().map(|&word| {
                    let range = e154::InputRange::from_channel(word);
                    ChannelScale::calibrated(&koef, range.index(), 4, range.volts())
                }).collect())
            }
            BoardType::E2010 | BoardType::E2010B => {
                let shape = descr.view::<PlataDescrE2010>();
                let calibrated = shape.rev == b'A';
                let koef = { shape.koef_adc };
                (Format::E14, channels.iter().map(|&word| {
                    let range = input_mask.range(e2010::channel_input(word)).unwrap_or_default();
                    if calibrated {
                        ChannelScale::calibrated(&koef, range.index(), 12, range.volts())
                    } else {
                        ChannelScale { range: range.volts(), ..ChannelScale::UNCALIBRATED }
                    }
                }).collect())
            }
            BoardType::L791 => {
                let koef = { descr.view::<PlataDescrL791>().koef_adc };
                (Format::L791, channels.iter().map(|&word| {
                    let range = l791::InputRange::from_channel(word);
                    ChannelScale::calibrated(&koef, range.index(), 8, range.volts())
                }).collect())
            }
            _ => return Err(Error::NotSupported),
        };
        log::debug!("converter for {:?}: {:?}", board, channels);
        Ok(Converter { format, channels, tail: Vec::new() })
    }

    pub fn for_adc_par0(board: BoardType, descr: &PlataDescr, par: &WAdcPar0) -> Result<Converter> {
        Self::new(board, descr, par.channels().as_slice(), AdcInputMask::empty())
    }

    pub fn for_adc_par1(board: BoardType, descr: &PlataDescr, par: &WAdcPar1) -> Result<Converter> {
        Self::new(board, descr, par.channels().as_slice(),
                  AdcInputMask::from_bits_truncate(par.adc_imask))
    }

    pub fn channel_scales(&self) -> &[ChannelScale] {
        &self.channels
    }

    /// Number of samples held back from the last call, waiting for the rest of their frame.
    pub fn pending(&self) -> usize {
        self.tail.len()
    }

    /// Drops held back samples, e.g. after the stream was restarted.
    pub fn reset(&mut self) {
        self.tail.clear()
    }

    /// Converts every complete frame of the held back samples followed by `samples`.
    pub fn convert(&mut self, samples: &[u16]) -> Volts {
        let mut codes = mem::take(&mut self.tail);
        codes.extend_from_slice(samples);
        let width = self.channels.len();
        self.tail = codes.split_off(codes.len() - codes.len() % width);

        let frames = codes.len() / width;
        let mut channels = vec![Vec::with_capacity(frames); width];
        let mut overloaded = vec![false; width];
        for frame in codes.chunks_exact(width) {
            for (index, (&raw, scale)) in frame.iter().zip(&self.channels).enumerate() {
                let code = self.format.decode(raw);
                overloaded[index] |= self.format.is_overload(code);
                channels[index].push(
                    (scale.offset + code as f32) * scale.scale * scale.range / self.format.full_scale);
            }
        }

        let overloaded: Vec<usize> = overloaded.iter().enumerate()
            .filter_map(|(index, &overload)| overload.then_some(index))
            .collect();
        if !overloaded.is_empty() {
            log::warn!("overload detected on channels {:?}", overloaded);
        }
        log::trace!("convert({}) = {} frames, {} pending", samples.len(), frames, self.tail.len());
        Volts { channels, overloaded }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::boards::InputRange;
    use crate::params::ChannelList;

    fn e440_descr() -> PlataDescr {
        let mut descr = PlataDescr::default();
        // offsets, then scales, by gain step
        descr.view_mut::<PlataDescrE440>().koef_adc = [2, 0, 0, 0, 1, 1, 1, 3];
        descr
    }

    fn raw(code: i32) -> u16 {
        (code as i16 as u16) & 0x3fff
    }

    #[test]
    fn test_e440_gain_from_channel_word() {
        let descr = e440_descr();
        let channels = [e440::channel(0, e440::CH_DIFF, e440::InputRange::V10_0),
                        e440::channel(1, e440::CH_DIFF, e440::InputRange::V0_156)];
        let mut converter = Converter::new(BoardType::E440, &descr, &channels,
                                           AdcInputMask::empty()).unwrap();
        let volts = converter.convert(&[raw(3998), raw(-800), raw(-2), raw(8000)]);
        assert_eq!(volts.frames(), 2);
        // (offset + code) * scale * range / 8000
        assert_eq!(volts.channels[0], [5.0, 0.0]);
        assert_eq!(volts.channels[1], [-800.0 * 3.0 * 0.15625 / 8000.0, 8000.0 * 3.0 * 0.15625 / 8000.0]);
        assert!(volts.overloaded.is_empty());
    }

    #[test]
    fn test_sign_extension_and_overload() {
        let descr = e440_descr();
        let mut converter = Converter::new(BoardType::E440, &descr, &[0, 0x40],
                                           AdcInputMask::empty()).unwrap();
        // high bits above the code are ignored
        let volts = converter.convert(&[0xc000 | 8192, raw(-8001), 8193, 0]);
        assert_eq!(volts.channels[0], [(8192.0 + 2.0) * 10.0 / 8000.0, (-8191.0 + 2.0) * 10.0 / 8000.0]);
        assert_eq!(volts.overloaded, [0, 1]);
    }

    #[test]
    fn test_tail_carried_over() {
        let descr = e440_descr();
        let mut converter = Converter::new(BoardType::E440, &descr, &[0, 1, 2],
                                           AdcInputMask::empty()).unwrap();
        let volts = converter.convert(&[10, 20, 30, 40, 50]);
        assert_eq!(volts.frames(), 1);
        assert_eq!(converter.pending(), 2);

        let volts = converter.convert(&[60, 70]);
        assert_eq!(volts.frames(), 1);
        assert_eq!(converter.pending(), 1);
        // the held back samples start the next frame in their original positions
        assert_eq!(volts.channels[0], [(40.0 + 2.0) * 10.0 / 8000.0]);
        assert_eq!(volts.channels[1], [(50.0 + 2.0) * 10.0 / 8000.0]);
        assert_eq!(volts.channels[2], [(60.0 + 2.0) * 10.0 / 8000.0]);

        converter.reset();
        assert_eq!(converter.pending(), 0);
        assert_eq!(converter.convert(&[1, 2]).frames(), 0);
    }

    #[test]
    fn test_e140_float_coefficients() {
        let mut descr = PlataDescr::default();
        descr.view_mut::<PlataDescrE140>().koef_adc = [0.5, -1.0, 0.0, 0.0, 1.0, 2.0, 1.0, 1.0];
        let mut converter = Converter::new(BoardType::E140, &descr,
                                           &[e440::channel(3, e440::CH_GRND, e440::InputRange::V2_5)],
                                           AdcInputMask::empty()).unwrap();
        assert_eq!(converter.channel_scales(), [ChannelScale { offset: -1.0, scale: 2.0, range: 2.5 }]);
        assert_eq!(converter.convert(&[801]).channels[0], [800.0 * 2.0 * 2.5 / 8000.0]);
    }

    #[test]
    fn test_e154_twelve_bit_codes() {
        let mut descr = PlataDescr::default();
        descr.view_mut::<PlataDescrE154>().koef_adc = [0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];
        let mut converter = Converter::new(BoardType::E154, &descr,
                                           &[e154::channel(0, e154::InputRange::V1_6)],
                                           AdcInputMask::empty()).unwrap();
        let volts = converter.convert(&[1000, 0xf000 | 4095, 2049]);
        assert_eq!(volts.channels[0], [1000.0 * 1.6 / 2000.0, -1.0 * 1.6 / 2000.0, -2047.0 * 1.6 / 2000.0]);
        assert_eq!(volts.overloaded, [0]);
    }

    #[test]
    fn test_e2010_calibrated_only_on_revision_a() {
        let mut descr = PlataDescr::default();
        {
            let mut koef = [0.0; 24];
            koef[1] = 10.0;
            koef[13] = 0.5;
            let shape = descr.view_mut::<PlataDescrE2010>();
            shape.koef_adc = koef;
            shape.rev = b'A';
        }
        let mask = AdcInputMask::input(0, InputRange::V3_0) | AdcInputMask::input(2, InputRange::V1_0);
        let mut par = WAdcPar1 { adc_imask: mask.bits(), ..Default::default() };
        par.set_channels(&ChannelList::from_slice(&[0x00, 0x02, 0x03]).unwrap());

        let mut converter = Converter::for_adc_par1(BoardType::E2010B, &descr, &par).unwrap();
        let volts = converter.convert(&[0, 790, 800]);
        assert_eq!(volts.channels[1], [(10.0 + 790.0) * 0.5 * 1.0 / 8000.0]);
        // grounded inputs read on the widest range
        assert_eq!(converter.channel_scales()[2].range, 3.0);

        descr.view_mut::<PlataDescrE2010>().rev = b'B';
        let mut converter = Converter::for_adc_par1(BoardType::E2010B, &descr, &par).unwrap();
        let volts = converter.convert(&[0, 800, 0]);
        assert_eq!(volts.channels[1], [800.0 * 1.0 / 8000.0]);
        assert_eq!(converter.channel_scales()[1], ChannelScale { offset: 0.0, scale: 1.0, range: 1.0 });
    }

    #[test]
    fn test_l791_eight_gain_steps() {
        let mut descr = PlataDescr::default();
        let mut koef = [0.0; 16];
        koef[7] = 4.0;
        koef[15] = 0.25;
        descr.view_mut::<PlataDescrL791>().koef_adc = koef;
        let mut converter = Converter::new(BoardType::L791, &descr,
                                           &[l791::channel(9, l791::InputRange::V0_078)],
                                           AdcInputMask::empty()).unwrap();
        let volts = converter.convert(&[raw(-8191), 8192]);
        assert_eq!(volts.channels[0], [(4.0 - 8191.0) * 0.25 * 0.078 / 8192.0,
                                       (4.0 + 8192.0) * 0.25 * 0.078 / 8192.0]);
        // the full 14-bit span is in range
        assert!(volts.overloaded.is_empty());
    }

    #[test]
    fn test_adc_par0_channels() {
        let descr = e440_descr();
        let mut par = WAdcPar0::default();
        par.set_channels(&ChannelList::from_slice(&[0x00, 0x41]).unwrap());
        let converter = Converter::for_adc_par0(BoardType::E440, &descr, &par).unwrap();
        assert_eq!(converter.channel_scales().len(), 2);
        assert_eq!(converter.channel_scales()[1].range, 2.5);
    }

    #[test]
    fn test_unsupported() {
        let descr = PlataDescr::default();
        assert!(matches!(Converter::new(BoardType::Ltr021, &descr, &[0], AdcInputMask::empty()),
                         Err(Error::NotSupported)));
        assert!(matches!(Converter::new(BoardType::E440, &descr, &[], AdcInputMask::empty()),
                         Err(Error::Other(_))));
    }
}
