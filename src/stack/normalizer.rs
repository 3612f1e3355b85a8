//! Native sample decoding and float32 normalization
//!
//! Each supported bit width maps to one `NativeSample` type. Strips are
//! decoded from file bytes into a scratch buffer of that type, and the
//! scratch buffer is then widened or narrowed into the float32 volume.

use crate::io::byte_order::ByteOrder;

/// A native sample element that strips decode into
pub trait NativeSample: Copy + Default {
    /// Encoded size in bytes
    const WIDTH: usize;

    /// Decodes `dst.len()` elements from `src` in the given byte order
    ///
    /// `src` must hold exactly `dst.len() * WIDTH` bytes.
    fn decode(order: ByteOrder, src: &[u8], dst: &mut [Self]);

    /// Converts the element to float32
    fn to_f32(self) -> f32;
}

impl NativeSample for u8 {
    const WIDTH: usize = 1;

    fn decode(_order: ByteOrder, src: &[u8], dst: &mut [Self]) {
        dst.copy_from_slice(src);
    }

    fn to_f32(self) -> f32 {
        self as f32
    }
}

impl NativeSample for u16 {
    const WIDTH: usize = 2;

    fn decode(order: ByteOrder, src: &[u8], dst: &mut [Self]) {
        order.read_u16_into(src, dst);
    }

    fn to_f32(self) -> f32 {
        self as f32
    }
}

impl NativeSample for f32 {
    const WIDTH: usize = 4;

    fn decode(order: ByteOrder, src: &[u8], dst: &mut [Self]) {
        order.read_f32_into(src, dst);
    }

    fn to_f32(self) -> f32 {
        self
    }
}

impl NativeSample for f64 {
    const WIDTH: usize = 8;

    fn decode(order: ByteOrder, src: &[u8], dst: &mut [Self]) {
        order.read_f64_into(src, dst);
    }

    fn to_f32(self) -> f32 {
        self as f32
    }
}

/// Converts the leading `out.len()` scratch elements into float32
pub fn normalize<T: NativeSample>(scratch: &[T], out: &mut [f32]) {
    for (dst, &src) in out.iter_mut().zip(scratch) {
        *dst = src.to_f32();
    }
}
