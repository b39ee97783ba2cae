//! Deterministic hashing and PRNG steps.
//!
//! Nothing here reads a clock or OS entropy. Given the same inputs, server and
//! client compute the same values, and replaying a sequence of ticks reproduces
//! the same outcomes.

/// splitmix64 finalizer; good avalanche for small integer inputs.
#[inline]
pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Top 24 bits of `bits` as a float in `[0, 1)`.
#[inline]
pub fn unit_from_bits(bits: u64) -> f32 {
    ((bits >> 40) as u32) as f32 / (1u32 << 24) as f32
}

/// Seeded positional hash of a chunk coordinate, a sequence number and a salt.
/// Returns a value in `[0, 1)`.
pub fn positional_hash(x: i32, z: i32, sequence: u32, salt: u32) -> f32 {
    let mut h = splitmix64((x as u32 as u64) | ((z as u32 as u64) << 32));
    h = splitmix64(h ^ (sequence as u64) ^ ((salt as u64) << 32));
    unit_from_bits(h)
}

/// Like [`positional_hash`] but drawing the `lane`-th independent value,
/// so one `(chunk, sequence)` can yield several uncorrelated numbers.
pub fn positional_hash_lane(x: i32, z: i32, sequence: u32, salt: u32, lane: u32) -> f32 {
    positional_hash(x, z, sequence, salt.wrapping_add(lane.wrapping_mul(0x9E37_79B9)))
}

/// Numerical Recipes LCG step.
#[inline]
pub fn lcg_next(cursor: u32) -> u32 {
    cursor.wrapping_mul(1_664_525).wrapping_add(1_013_904_223)
}

/// Maps a cursor to `[0, 1)` using its high bits (the low bits of an LCG are weak).
#[inline]
pub fn lcg_unit(cursor: u32) -> f32 {
    (cursor >> 8) as f32 / (1u32 << 24) as f32
}

/// Initial PRNG cursor for an entity spawned in `(x, z)` at `sequence`.
pub fn seed_cursor(x: i32, z: i32, sequence: u32, salt: u32) -> u32 {
    let h = splitmix64((x as u32 as u64) ^ ((z as u32 as u64) << 21) ^ ((sequence as u64) << 42));
    (splitmix64(h ^ salt as u64) >> 32) as u32
}

/// Roll in `[0, 1)` for a player at an instant (used for scatter angles).
pub fn roll_for(seed: u64, now_ms: i64) -> f32 {
    unit_from_bits(splitmix64(seed ^ (now_ms as u64).rotate_left(17)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_hash_is_stable_and_in_range() {
        for x in -5..5 {
            for z in -5..5 {
                let a = positional_hash(x, z, 3, 77);
                let b = positional_hash(x, z, 3, 77);
                assert_eq!(a, b);
                assert!((0.0..1.0).contains(&a));
            }
        }
    }

    #[test]
    fn positional_hash_depends_on_every_input() {
        let base = positional_hash(1, 2, 3, 4);
        assert_ne!(base, positional_hash(2, 2, 3, 4));
        assert_ne!(base, positional_hash(1, 3, 3, 4));
        assert_ne!(base, positional_hash(1, 2, 4, 4));
        assert_ne!(base, positional_hash(1, 2, 3, 5));
    }

    #[test]
    fn positional_hash_is_roughly_uniform() {
        // Fraction of chunks above 0.75 should be near 25%.
        let mut above = 0;
        let mut total = 0;
        for x in -40..40 {
            for z in -40..40 {
                total += 1;
                if positional_hash(x, z, 0, 0xABCD) >= 0.75 {
                    above += 1;
                }
            }
        }
        let frac = above as f32 / total as f32;
        assert!((0.20..0.30).contains(&frac), "fraction {frac}");
    }

    #[test]
    fn lcg_sequence_is_reproducible() {
        let mut a = 42u32;
        let mut b = 42u32;
        for _ in 0..100 {
            a = lcg_next(a);
            b = lcg_next(b);
            assert_eq!(a, b);
            assert!((0.0..1.0).contains(&lcg_unit(a)));
        }
        assert_ne!(lcg_next(42), 42);
    }

    #[test]
    fn lanes_are_independent() {
        let a = positional_hash_lane(7, -7, 1, 99, 0);
        let b = positional_hash_lane(7, -7, 1, 99, 1);
        assert_ne!(a, b);
        assert_eq!(a, positional_hash(7, -7, 1, 99));
    }
}
