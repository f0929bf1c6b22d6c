//! Field maps between client shapes and driver structures.
//!
//! Each map is total over the fields it lists; fields it does not list are left zero on the
//! driver side and untouched on the client side.

use crate::daq::{AdcPar0, AdcPar1, AsyncPar, DacPar0, DacPar1, DaqPar};
use crate::params::{Mode, WAdcPar0, WAdcPar1, WAsyncPar, WDacPar0, WDacPar1, WDaqPar};

impl From<&WDacPar0> for DacPar0 {
    fn from(par: &WDacPar0) -> Self {
        DacPar0 {
            s_type: par.s_type,
            fifo: par.fifo,
            irq_step: par.irq_step,
            pages: par.pages,
            auto_init: par.auto_init,
            d_rate: par.d_rate,
            rate: par.rate,
            dac_number: par.dac_number,
            dac_ena: par.dac_ena,
            irq_ena: par.irq_ena,
        }
    }
}

impl From<&DacPar0> for WDacPar0 {
    fn from(par: &DacPar0) -> Self {
        WDacPar0 {
            s_type: par.s_type,
            fifo: par.fifo,
            irq_step: par.irq_step,
            pages: par.pages,
            auto_init: par.auto_init,
            d_rate: par.d_rate,
            rate: par.rate,
            dac_number: par.dac_number,
            dac_ena: par.dac_ena,
            irq_ena: par.irq_ena,
        }
    }
}

impl From<&WDacPar1> for DacPar1 {
    fn from(par: &WDacPar1) -> Self {
        DacPar1 {
            s_type: par.s_type,
            fifo: par.fifo,
            irq_step: par.irq_step,
            pages: par.pages,
            auto_init: par.auto_init,
            d_rate: par.d_rate,
            rate: par.rate,
            dac_ena: par.dac_ena,
            irq_ena: par.irq_ena,
            reserved1: 0,
        }
    }
}

impl From<&DacPar1> for WDacPar1 {
    fn from(par: &DacPar1) -> Self {
        WDacPar1 {
            s_type: par.s_type,
            fifo: par.fifo,
            irq_step: par.irq_step,
            pages: par.pages,
            auto_init: par.auto_init,
            d_rate: par.d_rate,
            rate: par.rate,
            dac_ena: par.dac_ena,
            irq_ena: par.irq_ena,
            reserved1: 0,
        }
    }
}

impl From<&WAdcPar0> for AdcPar0 {
    fn from(par: &WAdcPar0) -> Self {
        AdcPar0 {
            s_type: par.s_type,
            fifo: par.fifo,
            irq_step: par.irq_step,
            pages: par.pages,
            auto_init: par.auto_init,
            d_rate: par.d_rate,
            d_kadr: par.d_kadr,
            d_scale: par.d_scale,
            rate: par.rate,
            kadr: par.kadr,
            scale: par.scale,
            fp_delay: par.fp_delay,
            synchro_type: par.synchro_type,
            synchro_sensitivity: par.synchro_sensitivity,
            synchro_mode: par.synchro_mode,
            ad_channel: par.ad_channel,
            ad_porog: par.ad_porog,
            nch: par.nch,
            chn: par.chn,
            adc_ena: par.adc_ena,
            irq_ena: par.irq_ena,
        }
    }
}

impl From<&AdcPar0> for WAdcPar0 {
    fn from(par: &AdcPar0) -> Self {
        WAdcPar0 {
            s_type: par.s_type,
            fifo: par.fifo,
            irq_step: par.irq_step,
            pages: par.pages,
            auto_init: par.auto_init,
            d_rate: par.d_rate,
            d_kadr: par.d_kadr,
            d_scale: par.d_scale,
            rate: par.rate,
            kadr: par.kadr,
            scale: par.scale,
            fp_delay: par.fp_delay,
            synchro_type: par.synchro_type,
            synchro_sensitivity: par.synchro_sensitivity,
            synchro_mode: par.synchro_mode,
            ad_channel: par.ad_channel,
            ad_porog: par.ad_porog,
            nch: par.nch,
            chn: par.chn,
            adc_ena: par.adc_ena,
            irq_ena: par.irq_ena,
        }
    }
}

impl From<&WAdcPar1> for AdcPar1 {
    fn from(par: &WAdcPar1) -> Self {
        AdcPar1 {
            s_type: par.s_type,
            fifo: par.fifo,
            irq_step: par.irq_step,
            pages: par.pages,
            auto_init: par.auto_init,
            d_rate: par.d_rate,
            d_kadr: par.d_kadr,
            reserved1: par.reserved1,
            dig_rate: par.dig_rate,
            dm_ena: par.dm_ena,
            rate: par.rate,
            kadr: par.kadr,
            start_cnt: par.start_cnt,
            stop_cnt: par.stop_cnt,
            synchro_type: par.synchro_type,
            synchro_mode: par.synchro_mode,
            ad_porog: par.ad_porog,
            synchro_src: par.synchro_src,
            adc_imask: par.adc_imask,
            nch: par.nch,
            chn: par.chn,
            adc_ena: par.adc_ena,
            irq_ena: par.irq_ena,
        }
    }
}

impl From<&AdcPar1> for WAdcPar1 {
    fn from(par: &AdcPar1) -> Self {
        WAdcPar1 {
            s_type: par.s_type,
            fifo: par.fifo,
            irq_step: par.irq_step,
            pages: par.pages,
            auto_init: par.auto_init,
            d_rate: par.d_rate,
            d_kadr: par.d_kadr,
            reserved1: par.reserved1,
            dig_rate: par.dig_rate,
            dm_ena: par.dm_ena,
            rate: par.rate,
            kadr: par.kadr,
            start_cnt: par.start_cnt,
            stop_cnt: par.stop_cnt,
            synchro_type: par.synchro_type,
            synchro_mode: par.synchro_mode,
            ad_porog: par.ad_porog,
            synchro_src: par.synchro_src,
            adc_imask: par.adc_imask,
            nch: par.nch,
            chn: par.chn,
            adc_ena: par.adc_ena,
            irq_ena: par.irq_ena,
        }
    }
}

impl From<&WAsyncPar> for AsyncPar {
    fn from(par: &WAsyncPar) -> Self {
        AsyncPar {
            s_type: par.s_type,
            fifo: par.fifo,
            irq_step: par.irq_step,
            pages: par.pages,
            d_rate: par.d_rate,
            rate: par.rate,
            nch: par.nch,
            chn: par.chn,
            data: par.data,
            mode: par.mode,
        }
    }
}

impl From<&AsyncPar> for WAsyncPar {
    fn from(par: &AsyncPar) -> Self {
        WAsyncPar {
            s_type: par.s_type,
            fifo: par.fifo,
            irq_step: par.irq_step,
            pages: par.pages,
            d_rate: par.d_rate,
            rate: par.rate,
            nch: par.nch,
            chn: par.chn,
            data: par.data,
            mode: par.mode,
        }
    }
}

impl DaqPar {
    /// Copies the shape selected by `mode` out of `block` into a fresh driver structure.
    pub fn decode(mode: Mode, block: &WDaqPar) -> DaqPar {
        match mode {
            Mode::Dac0 => DaqPar::Dac0(block.view::<WDacPar0>().into()),
            Mode::Dac1 => DaqPar::Dac1(block.view::<WDacPar1>().into()),
            Mode::Adc0 => DaqPar::Adc0(block.view::<WAdcPar0>().into()),
            Mode::Adc1 => DaqPar::Adc1(block.view::<WAdcPar1>().into()),
        }
    }

    /// Writes back what the driver may have adjusted while accepting a configuration: the
    /// achieved rate and, for ADC layouts, the achieved frame interval and channel count.
    pub fn store_achieved(&self, block: &mut WDaqPar) {
        match self {
            DaqPar::Dac0(par) => {
                block.view_mut::<WDacPar0>().d_rate = par.d_rate;
            }
            DaqPar::Dac1(par) => {
                block.view_mut::<WDacPar1>().d_rate = par.d_rate;
            }
            DaqPar::Adc0(par) => {
                let shape = block.view_mut::<WAdcPar0>();
                shape.d_rate = par.d_rate;
                shape.d_kadr = par.d_kadr;
                shape.nch = par.nch;
            }
            DaqPar::Adc1(par) => {
                let shape = block.view_mut::<WAdcPar1>();
                shape.d_rate = par.d_rate;
                shape.d_kadr = par.d_kadr;
                shape.nch = par.nch;
            }
        }
    }

    /// Writes back the buffer layout the driver allocated for a stream. Rates are not written:
    /// at stream setup the driver has not computed them yet.
    pub fn store_buffer_shape(&self, block: &mut WDaqPar) {
        let (pages, fifo, irq_step) = self.buffer_shape();
        macro_rules! store {
            ($shape:ty) => {{
                let shape = block.view_mut::<$shape>();
                shape.pages = pages;
                shape.fifo = fifo;
                shape.irq_step = irq_step;
            }};
        }
        match self.mode() {
            Mode::Dac0 => store!(WDacPar0),
            Mode::Dac1 => store!(WDacPar1),
            Mode::Adc0 => store!(WAdcPar0),
            Mode::Adc1 => store!(WAdcPar1),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::params::{DaqShape, MAX_CHANNELS};

    fn sentinel_chn(base: u32) -> [u32; MAX_CHANNELS] {
        core::array::from_fn(|i| base + i as u32)
    }

    fn sentinel_adc0() -> WAdcPar0 {
        WAdcPar0 {
            s_type: 1, fifo: 2, irq_step: 3, pages: 4, auto_init: 5,
            d_rate: 6.5, d_kadr: 7.5, d_scale: 8.5,
            rate: 9, kadr: 10, scale: 11, fp_delay: 12,
            synchro_type: 13, synchro_sensitivity: 14, synchro_mode: 15,
            ad_channel: 16, ad_porog: 17, nch: 18, chn: sentinel_chn(1000),
            irq_ena: 19, adc_ena: 20,
        }
    }

    fn sentinel_adc1() -> WAdcPar1 {
        WAdcPar1 {
            s_type: 21, fifo: 22, irq_step: 23, pages: 24, auto_init: 25,
            d_rate: 26.5, d_kadr: 27.5, reserved1: 28, dig_rate: 29, dm_ena: 30,
            rate: 31, kadr: 32, start_cnt: 33, stop_cnt: 34,
            synchro_type: 35, synchro_mode: 36, ad_porog: 37, synchro_src: 38,
            adc_imask: 39, nch: 40, chn: sentinel_chn(2000),
            irq_ena: 41, adc_ena: 42,
        }
    }

    /// A block holding `shape`, with every byte past the shape set so stray reads show up.
    fn poisoned_block<T: DaqShape>(shape: &T) -> WDaqPar {
        let mut bytes = [0xa5; crate::params::WDAQ_PAR_SIZE];
        bytes[..core::mem::size_of::<T>()].copy_from_slice(bytemuck::bytes_of(shape));
        WDaqPar::from_bytes(&bytes)
    }

    #[test]
    fn test_decode_dac0() {
        let shape = WDacPar0 {
            s_type: 2, fifo: 3, irq_step: 4, pages: 5, auto_init: 6,
            d_rate: 7.25, rate: 8, irq_ena: 9, dac_ena: 10, dac_number: 11,
        };
        let par = DaqPar::decode(Mode::Dac0, &poisoned_block(&shape));
        assert_eq!(par, DaqPar::Dac0(DacPar0 {
            s_type: 2, fifo: 3, irq_step: 4, pages: 5, auto_init: 6,
            d_rate: 7.25, rate: 8, irq_ena: 9, dac_ena: 10, dac_number: 11,
        }));
    }

    #[test]
    fn test_decode_dac1_skips_reserved() {
        let shape = WDacPar1 {
            s_type: 2, fifo: 3, irq_step: 4, pages: 5, auto_init: 6,
            d_rate: 7.25, rate: 8, irq_ena: 9, dac_ena: 10, reserved1: 0xdead,
        };
        let par = DaqPar::decode(Mode::Dac1, &poisoned_block(&shape));
        assert_eq!(par, DaqPar::Dac1(DacPar1 {
            s_type: 2, fifo: 3, irq_step: 4, pages: 5, auto_init: 6,
            d_rate: 7.25, rate: 8, irq_ena: 9, dac_ena: 10, reserved1: 0,
        }));
    }

    #[test]
    fn test_decode_adc0() {
        let DaqPar::Adc0(par) = DaqPar::decode(Mode::Adc0, &poisoned_block(&sentinel_adc0())) else {
            panic!("wrong layout")
        };
        assert_eq!((par.s_type, par.fifo, par.irq_step, par.pages, par.auto_init), (1, 2, 3, 4, 5));
        assert_eq!((par.d_rate, par.d_kadr, par.d_scale), (6.5, 7.5, 8.5));
        assert_eq!((par.rate, par.kadr, par.scale, par.fp_delay), (9, 10, 11, 12));
        assert_eq!((par.synchro_type, par.synchro_sensitivity, par.synchro_mode), (13, 14, 15));
        assert_eq!((par.ad_channel, par.ad_porog, par.nch), (16, 17, 18));
        assert_eq!(par.chn, sentinel_chn(1000));
        assert_eq!((par.irq_ena, par.adc_ena), (19, 20));
    }

    #[test]
    fn test_decode_adc1() {
        let DaqPar::Adc1(par) = DaqPar::decode(Mode::Adc1, &poisoned_block(&sentinel_adc1())) else {
            panic!("wrong layout")
        };
        assert_eq!((par.s_type, par.fifo, par.irq_step, par.pages, par.auto_init), (21, 22, 23, 24, 25));
        assert_eq!((par.d_rate, par.d_kadr), (26.5, 27.5));
        assert_eq!((par.reserved1, par.dig_rate, par.dm_ena), (28, 29, 30));
        assert_eq!((par.rate, par.kadr, par.start_cnt, par.stop_cnt), (31, 32, 33, 34));
        assert_eq!((par.synchro_type, par.synchro_mode, par.ad_porog, par.synchro_src), (35, 36, 37, 38));
        assert_eq!((par.adc_imask, par.nch), (39, 40));
        assert_eq!(par.chn, sentinel_chn(2000));
        assert_eq!((par.irq_ena, par.adc_ena), (41, 42));
    }

    #[test]
    fn test_adc0_round_trip() {
        let shape = sentinel_adc0();
        let block = WDaqPar::new(&shape);
        let DaqPar::Adc0(par) = DaqPar::decode(Mode::Adc0, &block) else { unreachable!() };
        assert_eq!(WAdcPar0::from(&par), shape);
        assert_eq!(WDaqPar::new(&WAdcPar0::from(&par)), block);
    }

    #[test]
    fn test_store_achieved_adc() {
        let mut block = WDaqPar::new(&sentinel_adc1());
        let mut par = DaqPar::decode(Mode::Adc1, &block);
        if let DaqPar::Adc1(ref mut par) = par {
            par.d_rate = 100.0;
            par.d_kadr = 0.01;
            par.nch = 4;
            par.rate = 777;
            par.pages = 64;
        }
        par.store_achieved(&mut block);
        let expected = WAdcPar1 { d_rate: 100.0, d_kadr: 0.01, nch: 4, ..sentinel_adc1() };
        assert_eq!(*block.view::<WAdcPar1>(), expected);
    }

    #[test]
    fn test_store_achieved_dac() {
        let shape = WDacPar0 { d_rate: 1.0, rate: 5, ..Default::default() };
        let mut block = WDaqPar::new(&shape);
        let par = DaqPar::Dac0(DacPar0 { d_rate: 2.0, rate: 6, pages: 3, ..Default::default() });
        par.store_achieved(&mut block);
        assert_eq!(*block.view::<WDacPar0>(), WDacPar0 { d_rate: 2.0, ..shape });
    }

    #[test]
    fn test_store_buffer_shape() {
        let mut block = WDaqPar::new(&sentinel_adc0());
        let par = DaqPar::Adc0(AdcPar0 { pages: 32, fifo: 4096, irq_step: 2048, d_rate: 1.0, ..Default::default() });
        par.store_buffer_shape(&mut block);
        let expected = WAdcPar0 { pages: 32, fifo: 4096, irq_step: 2048, ..sentinel_adc0() };
        assert_eq!(*block.view::<WAdcPar0>(), expected);
    }

    #[test]
    fn test_async_field_map() {
        let shape = WAsyncPar {
            s_type: 6, fifo: 1, irq_step: 2, pages: 3, d_rate: 4.5, rate: 5, nch: 1,
            chn: sentinel_chn(10), data: sentinel_chn(500), mode: 7,
        };
        let par = AsyncPar::from(&shape);
        assert_eq!(par.chn, sentinel_chn(10));
        assert_eq!(par.data, sentinel_chn(500));
        assert_eq!(WAsyncPar::from(&par), shape);
    }
}
