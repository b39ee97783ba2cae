//! Server-side terrain height field.
//!
//! The visual terrain is generated by the client; the server only needs a
//! cheap, deterministic height so spawned entities sit on the ground and NPCs
//! follow it while moving. Both sides evaluate this same function.

use crate::constants::TERRAIN_MAX_AMPLITUDE;

/// Octaves as `(frequency, amplitude)`. Amplitudes sum to 1.
const OCTAVES: [(f32, f32); 3] = [(0.011, 0.6), (0.029, 0.3), (0.071, 0.1)];

/// Height of the ground at `(x, z)`, bounded by `TERRAIN_MAX_AMPLITUDE`.
pub fn terrain_height(x: f32, z: f32) -> f32 {
    let mut h = 0.0;
    for (i, (freq, amp)) in OCTAVES.iter().enumerate() {
        // Per-octave phase shift keeps the octaves from lining up at the origin.
        let phase = i as f32 * 1.7;
        h += amp * (x * freq + phase).sin() * (z * freq * 1.13 - phase).cos();
    }
    h * TERRAIN_MAX_AMPLITUDE
}
