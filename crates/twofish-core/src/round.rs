//! Rotation and byte-lane helpers plus the keyed round function `h`.

use crate::gf::mds_multiply;
use crate::tables::{q, Q_ORDER};

/// Rotates `x` left by `n` bits, with `n` taken modulo 32.
#[inline]
pub const fn rotate_left(x: u32, n: u32) -> u32 {
    x.rotate_left(n & 0x1f)
}

/// Rotates `x` right by `n` bits, with `n` taken modulo 32.
#[inline]
pub const fn rotate_right(x: u32, n: u32) -> u32 {
    x.rotate_right(n & 0x1f)
}

/// Extracts byte `lane` (0 = least significant) of `x`, with `lane` taken modulo 4.
#[inline]
pub const fn byte(x: u32, lane: usize) -> u8 {
    (x >> (8 * (lane & 3))) as u8
}

/// Runs one byte through the keyed `q` chain of its lane, stopping just
/// before the final permutation.
///
/// `k64_count` selects the chain depth: 1 stage for 64-bit keys, 2 for
/// 128-bit, 3 for 192-bit and 4 for 256-bit. `key` supplies one byte per
/// stage, from `key[k64_count - 1]` down to `key[0]`.
pub fn keyed_byte(k64_count: usize, lane: usize, x: u8, key: &[u32; 4]) -> u8 {
    let order = &Q_ORDER[lane];
    let mut b = x;
    let mut stage = match k64_count & 3 {
        0 => 4,
        n => n,
    };
    while stage > 1 {
        b = q(order[stage], b) ^ byte(key[stage - 1], lane);
        stage -= 1;
    }
    q(order[1], b) ^ byte(key[0], lane)
}

/// The keyed round function `h` (`F32`).
///
/// Each byte of `x` goes through its lane's chain, the final permutation and
/// the MDS matrix. The key schedule calls it directly; block encryption uses
/// the equivalent lookups in [`crate::Schedule::g`].
pub fn h(k64_count: usize, x: u32, key: &[u32; 4]) -> u32 {
    let mut y = [0u8; 4];
    for (lane, out) in y.iter_mut().enumerate() {
        let b = keyed_byte(k64_count, lane, byte(x, lane), key);
        *out = q(Q_ORDER[lane][0], b);
    }
    mds_multiply(y)
}
