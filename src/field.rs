use noise::{NoiseFn, Simplex};

/// Beyond this the lattice index no longer fits the noise crate's integer cast.
pub const COORD_LIMIT: f64 = 1e15;

/// Seeded 2-D simplex noise, a pure function of its coordinates.
///
/// Output is clamped to `[-1, 1]`; simplex implementations overshoot the unit
/// range by a hair at some lattice points. Coordinates that are non-finite or
/// at least [`COORD_LIMIT`] in magnitude read as 0.
pub struct NoiseField {
    noise: Simplex,
    seed: u32,
}

impl NoiseField {
    pub fn new(seed: u32) -> Self {
        Self {
            noise: Simplex::new(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    #[inline]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        // NaN fails both comparisons
        if !(x.abs() < COORD_LIMIT && y.abs() < COORD_LIMIT) {
            return 0.0;
        }
        self.noise.get([x, y]).clamp(-1.0, 1.0)
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField").field("seed", &self.seed).finish()
    }
}
