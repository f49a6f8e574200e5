use std::thread;

use log::{debug, warn};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::color::*;
use super::error::*;
use super::palette::*;

pub const DEFAULT_MIN: f64 = -1000.;
pub const DEFAULT_MAX: f64 = 1000.;

/// Closed interval that input values are clamped to before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "self::_serde::RangeSource", into = "self::_serde::RangeSource")]
pub struct Range {
    min: f64,
    max: f64,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Result<Range, RangeError> {
        if !min.is_finite() || !max.is_finite() || !(max - min).is_finite() {
            return Err(RangeError::NonFinite);
        }
        if min >= max {
            return Err(RangeError::Inverted { min, max });
        }
        Ok(Range { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn clamp(&self, v: f64) -> f64 {
        v.clamp(self.min, self.max)
    }
}

impl Default for Range {
    fn default() -> Range {
        Range {
            min: DEFAULT_MIN,
            max: DEFAULT_MAX,
        }
    }
}

/// Maps batches of scalars to colors: clamp to `range`, rescale so the
/// smallest clamped value becomes 0 and the largest 1, then sample `palette`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorMapper {
    #[serde(default)]
    pub palette: Palette,
    #[serde(default)]
    pub range: Range,
    #[serde(default)]
    pub binning: Binning,
}

/// Affine map from clamped values onto `[0, 1]`, fixed by the batch's
/// clamped minimum and maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Normalizer {
    shift: f64,
    span: f64,
}

impl Normalizer {
    fn apply(&self, v: f64) -> f64 {
        if self.span > 0. {
            (v - self.shift) / self.span
        } else {
            0.
        }
    }
}

impl ColorMapper {
    pub fn new(palette: Palette, range: Range, binning: Binning) -> Result<ColorMapper, MapError> {
        binning.check(palette.len())?;
        Ok(ColorMapper { palette, range, binning })
    }

    pub fn map<T: ToPrimitive>(&self, values: &[T]) -> Result<Vec<Color>, MapError> {
        self.map_parallel(values, 1)
    }

    /// Same as [`ColorMapper::map`], with the per-value sampling split
    /// across up to `threads` scoped threads once the batch range is known.
    pub fn map_parallel<T: ToPrimitive>(
        &self,
        values: &[T],
        threads: usize,
    ) -> Result<Vec<Color>, MapError> {
        self.binning.check(self.palette.len())?;
        let clamped = self.clamp_all(values)?;
        let norm = self.normalizer(&clamped);

        let mut colors = vec![Color::default(); clamped.len()];
        let threads = threads.max(1).min(clamped.len().max(1));

        if threads == 1 {
            self.sample_into(&clamped, &mut colors, norm);
            return Ok(colors);
        }

        let chunk = clamped.len().div_ceil(threads);
        thread::scope(|s| {
            for (src, dst) in clamped.chunks(chunk).zip(colors.chunks_mut(chunk)) {
                s.spawn(move || self.sample_into(src, dst, norm));
            }
        });

        Ok(colors)
    }

    fn clamp_all<T: ToPrimitive>(&self, values: &[T]) -> Result<Vec<f64>, MapError> {
        let raw = values
            .iter()
            .enumerate()
            .map(|(i, v)| match v.to_f64() {
                Some(x) if !x.is_nan() => Ok(x),
                _ => Err(MapError::NotANumber(i)),
            })
            .collect::<Result<Vec<f64>, MapError>>()?;

        if let Some((lo, hi)) = extent(&raw) {
            debug!("Minimum value: {}; Maximum value: {}", lo, hi);
        }

        let clamped: Vec<f64> = raw.into_iter().map(|v| self.range.clamp(v)).collect();

        if let Some((lo, hi)) = extent(&clamped) {
            debug!("Post-clamp minimum value: {}; maximum value: {}", lo, hi);
        }

        Ok(clamped)
    }

    fn normalizer(&self, clamped: &[f64]) -> Normalizer {
        match extent(clamped) {
            Some((lo, hi)) => {
                if hi == lo && clamped.len() > 1 {
                    warn!(
                        "all {} values clamp to {}, mapping every value to the first color",
                        clamped.len(),
                        lo
                    );
                }
                Normalizer { shift: lo, span: hi - lo }
            }
            None => Normalizer { shift: 0., span: 0. },
        }
    }

    fn sample_into(&self, src: &[f64], dst: &mut [Color], norm: Normalizer) {
        for (v, c) in src.iter().zip(dst.iter_mut()) {
            *c = self.palette.sample(norm.apply(*v), self.binning);
        }
    }
}

fn extent(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Clamps `values` to `[min, max]`, normalizes them by the clamped extent
/// and interpolates `palette` with [`Binning::Uniform`].
pub fn map_to_color<T: ToPrimitive>(
    values: &[T],
    min: f64,
    max: f64,
    palette: &Palette,
) -> Result<Vec<Color>, MapError> {
    let mapper = ColorMapper::new(palette.clone(), Range::new(min, max)?, Binning::Uniform)?;
    mapper.map(values)
}

mod _serde {
    use super::*;

    #[derive(Serialize, Deserialize)]
    pub struct RangeSource {
        #[serde(default = "default_min")]
        min: f64,
        #[serde(default = "default_max")]
        max: f64,
    }

    const fn default_min() -> f64 {
        DEFAULT_MIN
    }

    const fn default_max() -> f64 {
        DEFAULT_MAX
    }

    impl TryFrom<RangeSource> for Range {
        type Error = RangeError;

        fn try_from(src: RangeSource) -> Result<Range, RangeError> {
            Range::new(src.min, src.max)
        }
    }

    impl From<Range> for RangeSource {
        fn from(r: Range) -> RangeSource {
            RangeSource { min: r.min, max: r.max }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn rgb() -> Palette {
        Palette::new([
            Color::rgb(1., 0., 0.),
            Color::rgb(0., 1., 0.),
            Color::rgb(0., 0., 1.),
        ])
        .unwrap()
    }

    fn random_values(rng: &mut StdRng, n: usize) -> Vec<f64> {
        (0..n).map(|_| rng.random_range(-5000.0..5000.0)).collect()
    }

    #[test]
    fn three_anchor_scenario() {
        let colors = map_to_color(&[-1000., 0., 1000.], -1000., 1000., &rgb()).unwrap();
        assert_eq!(
            colors,
            vec![Color::rgb(1., 0., 0.), Color::rgb(0., 1., 0.), Color::rgb(0., 0., 1.)]
        );
    }

    #[test]
    fn out_of_range_values_clamp() {
        let p = rgb();
        let a = map_to_color(&[-1000., 2000.], -1000., 1000., &p).unwrap();
        let b = map_to_color(&[-1000., 1000.], -1000., 1000., &p).unwrap();
        assert_eq!(a, b);
        assert_eq!(a[1], Color::rgb(0., 0., 1.));
    }

    #[test]
    fn extremes_map_to_first_and_last_colors() {
        let mut rng = StdRng::seed_from_u64(7);
        for palette in [Palette::viridis(), Palette::blue_red(), rgb()] {
            let mut values = random_values(&mut rng, 50);
            values.push(-1000.);
            values.push(1000.);
            let colors = map_to_color(&values, -1000., 1000., &palette).unwrap();
            let n = values.len();
            assert_eq!(colors[n - 2], palette.colors()[0]);
            assert_eq!(colors[n - 1], palette.colors()[palette.len() - 1]);
        }
    }

    #[test]
    fn equal_values_map_to_first_color() {
        let p = Palette::viridis();
        for v in [0., 12.5, -3000.] {
            let colors = map_to_color(&[v; 5], -1000., 1000., &p).unwrap();
            assert!(colors.iter().all(|c| *c == p.colors()[0]));
        }
    }

    #[test]
    fn preserves_length_and_order() {
        let mut rng = StdRng::seed_from_u64(11);
        let mapper = ColorMapper::default();
        for n in [1, 2, 17, 300] {
            let values = random_values(&mut rng, n);
            let colors = mapper.map(&values).unwrap();
            assert_eq!(colors.len(), n);

            let reversed: Vec<f64> = values.iter().rev().cloned().collect();
            let mut back = mapper.map(&reversed).unwrap();
            back.reverse();
            assert_eq!(back, colors);
        }
    }

    #[test]
    fn clamping_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(3);
        let range = Range::new(-250., 400.).unwrap();
        let mapper = ColorMapper::new(Palette::viridis(), range, Binning::Uniform).unwrap();
        let values = random_values(&mut rng, 200);
        let clamped: Vec<f64> = values.iter().map(|v| range.clamp(*v)).collect();
        assert_eq!(mapper.map(&values).unwrap(), mapper.map(&clamped).unwrap());
    }

    #[test]
    fn normalizes_by_clamped_extent() {
        // Extent is [100, 300], not the configured [-1000, 1000].
        let colors = map_to_color(&[100., 200., 300.], -1000., 1000., &rgb()).unwrap();
        assert_eq!(colors, map_to_color(&[-1000., 0., 1000.], -1000., 1000., &rgb()).unwrap());
    }

    #[test]
    fn accepts_any_numeric_type() {
        let from_ints = map_to_color(&[-5i32, 0, 5], -10., 10., &rgb()).unwrap();
        let from_f32 = map_to_color(&[-5f32, 0., 5.], -10., 10., &rgb()).unwrap();
        assert_eq!(from_ints, from_f32);
    }

    #[test]
    fn empty_input() {
        assert!(ColorMapper::default().map::<f64>(&[]).unwrap().is_empty());
    }

    #[test]
    fn infinities_clamp() {
        let colors = map_to_color(&[f64::NEG_INFINITY, f64::INFINITY], -1., 1., &rgb()).unwrap();
        assert_eq!(colors, vec![Color::rgb(1., 0., 0.), Color::rgb(0., 0., 1.)]);
    }

    #[test]
    fn rejects_nan() {
        let err = map_to_color(&[0., f64::NAN], -1., 1., &rgb()).unwrap_err();
        assert_eq!(err, MapError::NotANumber(1));
    }

    #[test]
    fn rejects_bad_ranges() {
        assert_eq!(
            map_to_color(&[0.], 5., 5., &rgb()),
            Err(MapError::Range(RangeError::Inverted { min: 5., max: 5. }))
        );
        assert!(map_to_color(&[0.], 5., -5., &rgb()).is_err());
        assert_eq!(Range::new(f64::NEG_INFINITY, 0.), Err(RangeError::NonFinite));
        assert_eq!(Range::new(-f64::MAX, f64::MAX), Err(RangeError::NonFinite));
    }

    #[test]
    fn legacy_binning_colors() {
        let mapper = ColorMapper::new(rgb(), Range::default(), Binning::Legacy).unwrap();
        let colors = mapper.map(&[-1000., 0., 1000.]).unwrap();
        assert_eq!(colors[0], Color::rgb(1., 0., 0.));
        assert!(colors[1].approx_eq(&Color::rgb(0.5, 0.5, 0.), 1e-6));
        assert_eq!(colors[2], Color::rgb(0., 1., 0.));

        let short = Palette::new([Color::rgb(0., 0., 0.), Color::rgb(1., 1., 1.)]).unwrap();
        assert!(ColorMapper::new(short, Range::default(), Binning::Legacy).is_err());
    }

    #[test]
    fn parallel_matches_serial() {
        let mut rng = StdRng::seed_from_u64(42);
        let values = random_values(&mut rng, 1001);
        let mapper = ColorMapper {
            palette: Palette::viridis(),
            ..Default::default()
        };
        let serial = mapper.map(&values).unwrap();
        for threads in [0, 1, 2, 3, 8, 64] {
            assert_eq!(mapper.map_parallel(&values, threads).unwrap(), serial);
        }
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let mapper: ColorMapper = serde_json::from_str("{}").unwrap();
        assert_eq!(mapper, ColorMapper::default());
        assert_eq!(mapper.range, Range::new(-1000., 1000.).unwrap());

        let mapper: ColorMapper = serde_json::from_str(
            r#"{ "palette": "viridis", "range": { "min": -2, "max": 2 }, "binning": "legacy" }"#,
        )
        .unwrap();
        assert_eq!(mapper.palette, Palette::viridis());
        assert_eq!(mapper.range.max(), 2.);
        assert_eq!(mapper.binning, Binning::Legacy);

        assert!(serde_json::from_str::<ColorMapper>(r#"{ "range": { "min": 3, "max": 1 } }"#).is_err());
    }
}
