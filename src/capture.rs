use core::ffi::c_void;
use core::ptr;

/// Buffers the driver allocated for a stream, as returned by `SetParametersStream`.
///
/// The buffers are owned by the driver and stay mapped until the device is closed. Nothing here
/// can check that, so every access is `unsafe`.
#[derive(Debug, Clone, Copy)]
pub struct StreamBuffers {
    data: *mut c_void,
    sync: *mut c_void,
    used_size: u32,
}

impl StreamBuffers {
    pub(crate) fn new(data: *mut c_void, sync: *mut c_void, used_size: u32) -> StreamBuffers {
        StreamBuffers { data, sync, used_size }
    }

    /// Size of the data buffer actually in use, in samples.
    pub fn used_size(&self) -> u32 {
        self.used_size
    }

    pub fn data_ptr(&self) -> *mut c_void {
        self.data
    }

    pub fn sync_ptr(&self) -> *mut c_void {
        self.sync
    }

    /// Reads the position counter the driver advances as samples arrive.
    ///
    /// # Safety
    /// The device that produced these buffers must still be open.
    pub unsafe fn sync(&self) -> u32 {
        assert!(!self.sync.is_null(), "stream has no sync buffer");
        ptr::read_volatile(self.sync as *const u32)
    }

    /// Copies `out.len()` bytes starting at byte `offset` of the data buffer. If `mask` is
    /// non-zero, every complete 32-bit word of the copy is ANDed with it.
    ///
    /// # Safety
    /// The device must still be open and `offset + out.len()` must not exceed the buffer.
    pub unsafe fn read_data(&self, offset: usize, out: &mut [u8], mask: u32) {
        assert!(!self.data.is_null(), "stream has no data buffer");
        ptr::copy_nonoverlapping((self.data as *const u8).add(offset), out.as_mut_ptr(), out.len());
        if mask != 0 {
            for word in out.chunks_exact_mut(4) {
                let value = u32::from_ne_bytes([word[0], word[1], word[2], word[3]]) & mask;
                word.copy_from_slice(&value.to_ne_bytes());
            }
        }
    }

    /// Copies 16-bit samples starting at sample `offset`.
    ///
    /// # Safety
    /// As for `read_data`.
    pub unsafe fn read_samples(&self, offset: usize, out: &mut [u16]) {
        self.read_data(offset * 2, bytemuck::cast_slice_mut(out), 0)
    }

    /// Copies `data` into the data buffer at byte `offset`, e.g. to feed a DAC stream.
    ///
    /// # Safety
    /// As for `read_data`.
    pub unsafe fn write_data(&self, offset: usize, data: &[u8]) {
        assert!(!self.data.is_null(), "stream has no data buffer");
        ptr::copy_nonoverlapping(data.as_ptr(), (self.data as *mut u8).add(offset), data.len());
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn buffers(data: &mut [u8], sync: &mut u32) -> StreamBuffers {
        StreamBuffers::new(data.as_mut_ptr().cast(), (sync as *mut u32).cast(), data.len() as u32 / 2)
    }

    #[test]
    fn test_read_data() {
        let mut data = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa];
        let mut sync = 5;
        let buffers = buffers(&mut data, &mut sync);
        let mut out = [0; 4];
        unsafe {
            assert_eq!(buffers.sync(), 5);
            buffers.read_data(2, &mut out, 0);
        }
        assert_eq!(out, [0x33, 0x44, 0x55, 0x66]);
        assert_eq!(buffers.used_size(), 5);
    }

    #[test]
    fn test_read_data_masked() {
        let mut data = [0xff; 10];
        let mut sync = 0;
        let buffers = buffers(&mut data, &mut sync);
        let mut out = [0; 10];
        unsafe { buffers.read_data(0, &mut out, 0x0000_3fff) }
        let masked = 0x0000_3fffu32.to_ne_bytes();
        assert_eq!(&out[0..4], &masked);
        assert_eq!(&out[4..8], &masked);
        // trailing partial word is left as copied
        assert_eq!(&out[8..10], &[0xff, 0xff]);
    }

    #[test]
    fn test_samples_and_write_back() {
        let mut data = [0u8; 8];
        let mut sync = 0;
        let buffers = buffers(&mut data, &mut sync);
        let mut samples = [0u16; 2];
        unsafe {
            buffers.write_data(2, &0x1234u16.to_ne_bytes());
            buffers.write_data(4, &0xbeefu16.to_ne_bytes());
            buffers.read_samples(1, &mut samples);
        }
        assert_eq!(samples, [0x1234, 0xbeef]);
    }
}
