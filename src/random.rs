//! Random field values shared by the log formats.
//!
//! Every helper draws from a caller-supplied random source. Generators seed their
//! source once at construction; nothing in here reseeds.

use std::net::Ipv4Addr;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// Width of the window `recent_time` draws from, ending at `now`.
pub const RECENT_WINDOW_MILLIS: i64 = 20 * 60 * 1000;

/// Random address from the whole IPv4 space.
///
/// Reserved, private and otherwise non-routable ranges are not excluded.
pub fn ipv4<R: Rng + ?Sized>(rng: &mut R) -> Ipv4Addr {
    Ipv4Addr::from(rng.gen::<u32>())
}

/// Random TCP/UDP port in 0..=65535.
pub fn port<R: Rng + ?Sized>(rng: &mut R) -> u16 {
    rng.gen()
}

/// Clock time (`HH:MM:SS`) of a random instant in the twenty minutes before `now`.
pub fn recent_time<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> String {
    let offset = rng.gen_range(0..RECENT_WINDOW_MILLIS);
    let lower_bound = now - Duration::milliseconds(RECENT_WINDOW_MILLIS);
    let instant = lower_bound + Duration::milliseconds(offset);
    instant.format("%H:%M:%S").to_string()
}

/// Uniform selection from a lookup table.
pub fn pick<R: Rng + ?Sized, T: Copy, const N: usize>(rng: &mut R, table: &[T; N]) -> T {
    const { assert!(N > 0, "lookup tables must not be empty") };
    table[rng.gen_range(0..N)]
}

/// Lowercase hex string of `bytes` random bytes.
pub fn hex_id<R: Rng + ?Sized>(rng: &mut R, bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rng.fill_bytes(&mut buf);
    hex::encode(buf)
}
