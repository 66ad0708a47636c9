use nalgebra::{Unit, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 난수 스트림. 렌더러는 이 트레이트만 보고 난수를 뽑음.
pub trait Sampler {
    /// Uniform float in `[0, 1]`.
    fn next_f32(&mut self) -> f32;

    /// Three uniform floats in `[-1, 1]`, normalized.
    ///
    /// An all-zero draw normalizes to NaN. That case is not guarded.
    fn next_unit_vector(&mut self) -> Unit<Vector3<f32>> {
        let v = Vector3::new(
            self.next_f32() * 2.0 - 1.0,
            self.next_f32() * 2.0 - 1.0,
            self.next_f32() * 2.0 - 1.0,
        );
        Unit::new_normalize(v)
    }
}

/// A sampler that can be rebuilt from a per-pixel seed and nudged between bounces.
pub trait SeededSampler: Sampler + Send {
    fn from_seed(seed: u32) -> Self;

    /// Shift the seed by `delta`. Called once per bounce with the bounce index.
    fn offset(&mut self, delta: u32);
}

/// PCG 해시 기반 샘플러. 상태가 u32 하나라서 픽셀마다 만들어도 싸다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcgSampler {
    state: u32,
}

impl PcgSampler {
    pub fn state(&self) -> u32 {
        self.state
    }
}

pub fn pcg_hash(input: u32) -> u32 {
    let state = input.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
    let word = ((state >> ((state >> 28) + 4)) ^ state).wrapping_mul(277_803_737);
    (word >> 22) ^ word
}

impl Sampler for PcgSampler {
    fn next_f32(&mut self) -> f32 {
        self.state = pcg_hash(self.state);
        self.state as f32 / u32::MAX as f32
    }
}

impl SeededSampler for PcgSampler {
    fn from_seed(seed: u32) -> Self {
        Self { state: seed }
    }

    fn offset(&mut self, delta: u32) {
        self.state = self.state.wrapping_add(delta);
    }
}

/// Wraps any seedable `rand` generator. Offsetting reseeds from `seed + delta`.
#[derive(Debug, Clone)]
pub struct RandSampler<R = StdRng> {
    seed: u64,
    rng: R,
}

impl<R: SeedableRng> RandSampler<R> {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: R::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> Sampler for RandSampler<R> {
    fn next_f32(&mut self) -> f32 {
        self.rng.gen_range(0.0..=1.0)
    }
}

impl<R: Rng + SeedableRng + Send> SeededSampler for RandSampler<R> {
    fn from_seed(seed: u32) -> Self {
        Self::new(seed as u64)
    }

    fn offset(&mut self, delta: u32) {
        self.seed = self.seed.wrapping_add(delta as u64);
        self.rng = R::seed_from_u64(self.seed);
    }
}
