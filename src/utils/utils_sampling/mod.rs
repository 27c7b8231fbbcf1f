use std::f64::consts::PI;
use nalgebra::{DVector, Isometry3, Vector3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Random number generator used by every sampler in the crate.  Seeded runs are reproducible.
pub struct BenchRng {
    rng: ChaCha8Rng
}
impl BenchRng {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            None => { ChaCha8Rng::from_entropy() }
            Some(seed) => { ChaCha8Rng::seed_from_u64(seed) }
        };
        Self { rng }
    }
    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }
}

pub struct SimpleSamplers;
impl SimpleSamplers {
    pub fn uniform_samples(bounds: &Vec<(f64, f64)>, rng: &mut BenchRng) -> Vec<f64> {
        let mut out_vec = vec![];
        for b in bounds {
            if b.0 == b.1 {
                out_vec.push(b.0);
            } else {
                out_vec.push(rng.rng_mut().gen_range(b.0..b.1));
            }
        }
        out_vec
    }
    /// Uniform sample inside per-DOF lower and upper limits.
    pub fn uniform_dof_sample(lower: &DVector<f64>, upper: &DVector<f64>, rng: &mut BenchRng) -> DVector<f64> {
        let bounds: Vec<(f64, f64)> = lower.iter().zip(upper.iter()).map(|(l, u)| (*l, *u)).collect();
        DVector::from_vec(Self::uniform_samples(&bounds, rng))
    }
    /// Random rigid transform whose translation lies in the cube [0, extent]^3 and whose
    /// rotation is an axis-angle vector with each component in [0, 2pi).
    pub fn random_transform_in_cube(extent: f64, rng: &mut BenchRng) -> Isometry3<f64> {
        let t = Self::uniform_samples(&vec![(0.0, extent); 3], rng);
        let r = Self::uniform_samples(&vec![(0.0, 2.0 * PI); 3], rng);
        Isometry3::new(Vector3::new(t[0], t[1], t[2]), Vector3::new(r[0], r[1], r[2]))
    }
}
