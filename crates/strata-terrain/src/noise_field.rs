//! Per-column terrain parameters: height, temperature and humidity.
//!
//! The field is a square grid of side `S` covering the whole toroidal world.
//! Columns are sampled as one data-parallel batch (each index writes exactly
//! one output slot), then an edge-blend pass pulls the two borders of each
//! axis toward each other so the tile wraps without a visible seam.

use std::f64::consts::TAU;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::TerrainError;
use crate::fbm::{FbmSampler, NoiseChannel};

/// Default width of the edge-blend band, in columns.
pub const DEFAULT_BLEND_WIDTH: usize = 8;

/// One column of terrain parameters, every channel in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NoiseSample {
    pub height: f32,
    pub temperature: f32,
    pub humidity: f32,
}

impl NoiseSample {
    fn mix(a: Self, b: Self, weight: f32) -> Self {
        let keep = 1.0 - weight;
        Self {
            height: a.height * keep + b.height * weight,
            temperature: a.temperature * keep + b.temperature * weight,
            humidity: a.humidity * keep + b.humidity * weight,
        }
    }
}

/// Parameters for generating a [`NoiseField`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseSettings {
    /// Base seed. Channels use `seed`, `seed + 1`, `seed + 2`.
    pub seed: u32,
    pub height: NoiseChannel,
    pub temperature: NoiseChannel,
    pub humidity: NoiseChannel,
    /// Edge-blend band width in columns, clamped to half the field side.
    pub blend_width: usize,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            height: NoiseChannel {
                scale: 0.01,
                octaves: 5,
                lacunarity: 2.0,
                persistence: 0.5,
            },
            temperature: NoiseChannel {
                scale: 0.004,
                octaves: 3,
                lacunarity: 2.0,
                persistence: 0.5,
            },
            humidity: NoiseChannel {
                scale: 0.005,
                octaves: 3,
                lacunarity: 2.0,
                persistence: 0.5,
            },
            blend_width: DEFAULT_BLEND_WIDTH,
        }
    }
}

/// The three channel samplers for one seed.
pub struct ColumnSampler {
    height: FbmSampler,
    temperature: FbmSampler,
    humidity: FbmSampler,
}

impl ColumnSampler {
    pub fn new(settings: &NoiseSettings) -> Self {
        Self {
            height: FbmSampler::new(settings.seed, settings.height),
            temperature: FbmSampler::new(settings.seed.wrapping_add(1), settings.temperature),
            humidity: FbmSampler::new(settings.seed.wrapping_add(2), settings.humidity),
        }
    }

    /// Sample column `(x, z)` of a field with side `size`.
    ///
    /// Each axis is wrapped onto a circle whose circumference equals the
    /// field side, so the raw samples are periodic in both axes.
    pub fn sample(&self, x: usize, z: usize, size: usize) -> NoiseSample {
        let (px, py) = torus_point(x, z, size);

        let height = self.height.sample(px, py);
        let temperature = self.temperature.sample(px, py) * (1.0 - height * 0.5);
        let humidity = self.humidity.sample(px, py);

        NoiseSample {
            height,
            temperature,
            humidity,
        }
    }
}

fn torus_point(x: usize, z: usize, size: usize) -> (f64, f64) {
    let side = size as f64;
    let radius = side / TAU;
    let u = TAU * x as f64 / side;
    let v = TAU * z as f64 / side;
    (
        (libm::cos(u) + libm::cos(v)) * radius,
        (libm::sin(u) + libm::sin(v)) * radius,
    )
}

/// A square grid of [`NoiseSample`]s, row-major with `x` fastest.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseField {
    size: usize,
    samples: Vec<NoiseSample>,
}

impl NoiseField {
    /// Sample and blend a field on the current rayon pool, blocking until done.
    pub fn generate(size: usize, settings: &NoiseSettings) -> Result<Self, TerrainError> {
        let start = Instant::now();
        let mut field = Self::sample_raw(size, settings)?;
        field.blend_edges(settings.blend_width);
        tracing::info!(
            size,
            seed = settings.seed,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "noise field generated"
        );
        Ok(field)
    }

    /// Sample every column without the edge-blend pass.
    pub fn sample_raw(size: usize, settings: &NoiseSettings) -> Result<Self, TerrainError> {
        if size == 0 {
            return Err(TerrainError::EmptyField);
        }
        let sampler = ColumnSampler::new(settings);
        let samples = (0..size * size)
            .into_par_iter()
            .map(|index| sampler.sample(index % size, index / size, size))
            .collect();
        Ok(Self { size, samples })
    }

    /// Blend the border bands of both axes with their mirrored partner on
    /// the opposite edge.
    ///
    /// A cell `d` columns from an edge (`d < width`) is mixed with column
    /// `size - 1 - x` at weight `0.5 * (width - d) / width`. X is blended first
    /// and Z second, so corner cells pick up their diagonal partner at the
    /// product of the two axis weights. Cells outside every band are untouched.
    pub fn blend_edges(&mut self, width: usize) {
        let size = self.size;
        let width = width.min(size / 2);
        if width == 0 {
            return;
        }

        self.samples.par_chunks_mut(size).for_each(|row| {
            let source = row.to_vec();
            for d in 0..width {
                let mirror = size - 1 - d;
                let weight = edge_weight(d, width);
                row[d] = NoiseSample::mix(source[d], source[mirror], weight);
                row[mirror] = NoiseSample::mix(source[mirror], source[d], weight);
            }
        });

        let source = self.samples.clone();
        self.samples
            .par_chunks_mut(size)
            .enumerate()
            .for_each(|(z, row)| {
                let d = z.min(size - 1 - z);
                if d >= width {
                    return;
                }
                let partner = &source[(size - 1 - z) * size..(size - z) * size];
                let own = &source[z * size..(z + 1) * size];
                let weight = edge_weight(d, width);
                for x in 0..size {
                    row[x] = NoiseSample::mix(own[x], partner[x], weight);
                }
            });
    }

    /// Side length in columns.
    pub fn size(&self) -> usize {
        self.size
    }

    /// All samples, row-major.
    pub fn samples(&self) -> &[NoiseSample] {
        &self.samples
    }

    /// Sample at column `(x, z)`, wrapping both coordinates into the field.
    pub fn get(&self, x: i32, z: i32) -> NoiseSample {
        let size = self.size as i32;
        let x = x.rem_euclid(size) as usize;
        let z = z.rem_euclid(size) as usize;
        self.samples[z * self.size + x]
    }
}

fn edge_weight(distance: usize, width: usize) -> f32 {
    0.5 * (width - distance) as f32 / width as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(seed: u32) -> NoiseSettings {
        NoiseSettings {
            seed,
            ..Default::default()
        }
    }

    #[test]
    fn test_generation_is_bit_reproducible() {
        let a = NoiseField::generate(32, &settings(1234)).unwrap();
        let b = NoiseField::generate(32, &settings(1234)).unwrap();
        for (i, (sa, sb)) in a.samples().iter().zip(b.samples()).enumerate() {
            assert_eq!(sa.height.to_bits(), sb.height.to_bits(), "height differs at {i}");
            assert_eq!(sa.temperature.to_bits(), sb.temperature.to_bits(), "temperature differs at {i}");
            assert_eq!(sa.humidity.to_bits(), sb.humidity.to_bits(), "humidity differs at {i}");
        }
    }

    #[test]
    fn test_channels_stay_in_unit_range() {
        let field = NoiseField::generate(48, &settings(9)).unwrap();
        for s in field.samples() {
            for v in [s.height, s.temperature, s.humidity] {
                assert!((0.0..=1.0).contains(&v), "channel value {v} outside [0,1]");
            }
        }
    }

    #[test]
    fn test_temperature_attenuated_by_height() {
        let set = settings(77);
        let sampler = ColumnSampler::new(&set);
        let raw_temperature = FbmSampler::new(78, set.temperature);
        let (px, py) = torus_point(5, 11, 64);
        let sample = sampler.sample(5, 11, 64);
        let expected = raw_temperature.sample(px, py) * (1.0 - sample.height * 0.5);
        assert_eq!(sample.temperature, expected);
    }

    #[test]
    fn test_edge_blend_closes_the_seam() {
        let size = 64;
        let raw = NoiseField::sample_raw(size, &settings(5)).unwrap();
        let mut blended = raw.clone();
        blended.blend_edges(DEFAULT_BLEND_WIDTH);

        let last = size as i32 - 1;
        let mut strictly_reduced = false;
        for z in 0..size as i32 {
            let before = (raw.get(0, z).height - raw.get(last, z).height).abs();
            let after = (blended.get(0, z).height - blended.get(last, z).height).abs();
            assert!(after <= before, "blend widened the seam on row {z}");
            assert_eq!(after, 0.0, "seam columns should match on row {z}");
            if after < before {
                strictly_reduced = true;
            }
        }
        assert!(strictly_reduced, "expected at least one row with a raw discontinuity");
    }

    #[test]
    fn test_edge_blend_leaves_interior_untouched() {
        let size = 40;
        let width = 6;
        let raw = NoiseField::sample_raw(size, &settings(3)).unwrap();
        let mut blended = raw.clone();
        blended.blend_edges(width);

        for z in width..size - width {
            for x in width..size - width {
                assert_eq!(
                    raw.get(x as i32, z as i32),
                    blended.get(x as i32, z as i32),
                    "interior cell ({x}, {z}) changed"
                );
            }
        }
    }

    #[test]
    fn test_corner_uses_product_of_axis_weights() {
        let size = 32;
        let width = 4;
        let raw = NoiseField::sample_raw(size, &settings(11)).unwrap();
        let mut blended = raw.clone();
        blended.blend_edges(width);

        let w = edge_weight(0, width);
        let last = size as i32 - 1;
        let h = |x, z| raw.get(x, z).height;
        let expected = (1.0 - w) * (1.0 - w) * h(0, 0)
            + w * (1.0 - w) * h(last, 0)
            + (1.0 - w) * w * h(0, last)
            + w * w * h(last, last);
        let actual = blended.get(0, 0).height;
        assert!((actual - expected).abs() < 1e-5, "corner {actual} != {expected}");
    }

    #[test]
    fn test_get_wraps_coordinates() {
        let field = NoiseField::generate(16, &settings(2)).unwrap();
        assert_eq!(field.get(-1, 0), field.get(15, 0));
        assert_eq!(field.get(16, 33), field.get(0, 1));
    }

    #[test]
    fn test_empty_field_is_rejected() {
        assert!(matches!(
            NoiseField::generate(0, &settings(0)),
            Err(TerrainError::EmptyField)
        ));
    }

    #[test]
    fn test_tiny_field_skips_blend() {
        let raw = NoiseField::sample_raw(1, &settings(4)).unwrap();
        let mut blended = raw.clone();
        blended.blend_edges(DEFAULT_BLEND_WIDTH);
        assert_eq!(raw, blended);
    }
}
