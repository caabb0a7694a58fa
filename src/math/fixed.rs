//! 16.16 fixed-point arithmetic.
//!
//! The polygon filler keeps most of its interpolation state in signed 32-bit
//! fixed point: 16 integer bits, 16 fractional bits. Conversions saturate
//! instead of wrapping so that a degenerate edge (a huge slope, a division by
//! a near-zero width) produces a clamped gradient rather than garbage.
//!
//! ```text
//!   0x0003_8000  =  3.5
//!   |----||----|
//!   int   frac
//! ```

/// A 16.16 fixed-point number.
pub type Fixed = i32;

/// Number of fractional bits in a [`Fixed`].
pub const FIX_SHIFT: u32 = 16;

/// `1.0` in fixed point.
pub const FIX_ONE: Fixed = 1 << FIX_SHIFT;

/// Largest finite value conversions clamp to.
const FIX_MAX: Fixed = 0x7FFF_FFFF;

/// Converts an integer to fixed point.
#[inline]
pub const fn itofix(x: i32) -> Fixed {
    x.wrapping_shl(FIX_SHIFT)
}

/// Converts fixed point to a float.
#[inline]
pub fn fixtof(x: Fixed) -> f64 {
    x as f64 / 65536.0
}

/// Converts a float to fixed point, rounding half away from zero.
///
/// Values outside `±32767.0` saturate to `±0x7FFFFFFF`.
#[inline]
pub fn ftofix(x: f64) -> Fixed {
    if x > 32767.0 {
        FIX_MAX
    } else if x < -32767.0 {
        -FIX_MAX
    } else {
        let bias = if x < 0.0 { -0.5 } else { 0.5 };
        (x * 65536.0 + bias) as Fixed
    }
}

/// Multiplies two fixed-point numbers.
///
/// The full 64-bit product is kept; results that do not fit saturate.
#[inline]
pub fn fixmul(x: Fixed, y: Fixed) -> Fixed {
    let product = x as i64 * y as i64;

    if product > 0x7FFF_FFFF_0000 {
        FIX_MAX
    } else if product < -0x7FFF_FFFF_0000 {
        i32::MIN
    } else {
        (product >> FIX_SHIFT) as Fixed
    }
}

/// Divides two fixed-point numbers.
///
/// Division by zero saturates to `±0x7FFFFFFF` following the sign of `x`.
#[inline]
pub fn fixdiv(x: Fixed, y: Fixed) -> Fixed {
    if y == 0 {
        if x < 0 {
            -FIX_MAX
        } else {
            FIX_MAX
        }
    } else {
        ftofix(fixtof(x) / fixtof(y))
    }
}

/// Smallest integer not less than `x`.
#[inline]
pub fn fixceil(x: Fixed) -> i32 {
    if x > 0x7FFF_0000 {
        0x7FFF
    } else {
        (x + 0xFFFF) >> FIX_SHIFT
    }
}

/// Largest integer not greater than `x`.
#[inline]
pub fn fixfloor(x: Fixed) -> i32 {
    x >> FIX_SHIFT
}
