//! GF(2^8) helpers: the MDS multipliers and the Reed-Solomon remainder.

/// Primitive polynomial `x^8 + x^6 + x^5 + x^3 + 1` used by the MDS matrix.
const MDS_POLY: u32 = 0x169;
/// Field generator of the (12, 8) Reed-Solomon code.
const RS_POLY: u32 = 0x14d;

/// One step of the MDS feedback shift (multiplication by `1/x`).
#[inline]
pub const fn lfsr1(x: u8) -> u8 {
    let x = x as u32;
    let fb = if x & 0x01 != 0 { MDS_POLY >> 1 } else { 0 };
    ((x >> 1) ^ fb) as u8
}

/// Two steps of the MDS feedback shift (multiplication by `1/x^2`).
#[inline]
pub const fn lfsr2(x: u8) -> u8 {
    let x = x as u32;
    let fb2 = if x & 0x02 != 0 { MDS_POLY >> 1 } else { 0 };
    let fb4 = if x & 0x01 != 0 { MDS_POLY >> 2 } else { 0 };
    ((x >> 2) ^ fb2 ^ fb4) as u8
}

/// Multiplies by the MDS element `0x5B`.
#[inline]
pub const fn mul_x(x: u8) -> u8 {
    x ^ lfsr2(x)
}

/// Multiplies by the MDS element `0xEF`.
#[inline]
pub const fn mul_y(x: u8) -> u8 {
    x ^ lfsr1(x) ^ lfsr2(x)
}

/// Multiplies the byte vector `y` (lane 0 first) by the MDS matrix.
///
/// Output byte `i` lands at bit position `8 * i`.
pub fn mds_multiply(y: [u8; 4]) -> u32 {
    let [y0, y1, y2, y3] = y;
    let out0 = y0 ^ mul_y(y1) ^ mul_x(y2) ^ mul_x(y3);
    let out1 = mul_x(y0) ^ mul_y(y1) ^ mul_y(y2) ^ y3;
    let out2 = mul_y(y0) ^ mul_x(y1) ^ y2 ^ mul_y(y3);
    let out3 = mul_y(y0) ^ y1 ^ mul_y(y2) ^ mul_x(y3);
    u32::from_le_bytes([out0, out1, out2, out3])
}

/// One division step of the Reed-Solomon code: shifts a byte out of `x`.
#[inline]
pub const fn rs_remainder(x: u32) -> u32 {
    let b = x >> 24;
    let fb2 = if b & 0x80 != 0 { RS_POLY } else { 0 };
    let fb1 = if b & 0x01 != 0 { RS_POLY >> 1 } else { 0 };
    let g2 = ((b << 1) ^ fb2) & 0xff;
    let g3 = (b >> 1) ^ fb1 ^ g2;
    (x << 8) ^ (g3 << 24) ^ (g2 << 16) ^ (g3 << 8) ^ b
}

/// Encodes the key words `k0`, `k1` into one S-box key word.
pub const fn rs_encode(k0: u32, k1: u32) -> u32 {
    let mut r = k1;
    let mut i = 0;
    while i < 4 {
        r = rs_remainder(r);
        i += 1;
    }
    r ^= k0;
    while i < 8 {
        r = rs_remainder(r);
        i += 1;
    }
    r
}
