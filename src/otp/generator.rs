//! 6-digit passcode generation.

use rand::{rngs::OsRng, Rng};

/// Produce a zero-padded 6-digit code, uniform over `000000..=999999`.
///
/// `OsRng` pulls from the operating system CSPRNG, so codes are not
/// guessable faster than uniform random.
#[must_use]
pub fn six_digit_code() -> String {
    let code: u32 = OsRng.gen_range(0..1_000_000);
    format!("{code:06}")
}
