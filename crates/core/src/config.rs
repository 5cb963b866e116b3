//! Composition configuration and copy-with-overrides.
//!
//! A [`FluidityConfig`] is immutable once built. Exploring variations goes
//! through [`FluidityConfig::derive`], which copies every field not named
//! in a [`ConfigOverrides`].

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::curve::CurveKind;
use crate::error::FluidityError;
use crate::field::{CircularNoise, LinearNoise, NoiseConfig};
use crate::params::{opt_f64, opt_u32, param_count, param_name};
use crate::sort::{HilbertSorter, SortPolicy, DEFAULT_RESOLUTION};

const DEFAULT_NPOINTS: usize = 10;
const DEFAULT_NLINES: usize = 100;

/// Everything needed to reproduce a Composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluidityConfig {
    pub noise: NoiseConfig,
    /// Points per line, and segments per curve.
    pub npoints: usize,
    pub nlines: usize,
    pub sort: SortPolicy,
    pub curve: CurveKind,
    /// Hilbert grid exponent used by the sorter.
    pub resolution: u32,
}

impl Default for FluidityConfig {
    fn default() -> Self {
        Self {
            noise: NoiseConfig::default(),
            npoints: DEFAULT_NPOINTS,
            nlines: DEFAULT_NLINES,
            sort: SortPolicy::default(),
            curve: CurveKind::default(),
            resolution: DEFAULT_RESOLUTION,
        }
    }
}

impl FluidityConfig {
    /// Checks counts, noise period and sorter resolution.
    pub fn validate(&self) -> Result<(), FluidityError> {
        if self.npoints == 0 {
            return Err(FluidityError::InvalidConfiguration(
                "npoints must be positive".into(),
            ));
        }
        if self.nlines == 0 {
            return Err(FluidityError::InvalidConfiguration(
                "nlines must be positive".into(),
            ));
        }
        self.noise.validate()?;
        HilbertSorter::new(self.resolution)?;
        Ok(())
    }

    /// Reads a flat params object on top of the defaults.
    ///
    /// Missing keys keep their defaults, as do mistyped non-count numbers.
    /// Mistyped or negative counts and unknown names for `noise`, `sort`
    /// or `curve` are errors.
    pub fn from_json(params: &Value) -> Result<Self, FluidityError> {
        Ok(Self::default().derive(&ConfigOverrides::from_json(params)?))
    }

    /// A copy with the given overrides applied and every other field kept.
    ///
    /// A noise kind override switches kind while carrying over the seed,
    /// `istep`, `jstart` and `jstep`. `istart` means a sampling offset for
    /// linear noise and a phase in steps for circular noise, so it resets to
    /// the new kind's default. Noise parameter overrides then apply to
    /// whichever kind results.
    pub fn derive(&self, overrides: &ConfigOverrides) -> Self {
        let mut noise = match overrides.noise {
            Some(kind) => switch_noise_kind(self.noise, kind),
            None => self.noise,
        };
        apply_noise_overrides(&mut noise, overrides);
        Self {
            noise,
            npoints: overrides.npoints.unwrap_or(self.npoints),
            nlines: overrides.nlines.unwrap_or(self.nlines),
            sort: overrides.sort.unwrap_or(self.sort),
            curve: overrides.curve.unwrap_or(self.curve),
            resolution: overrides.resolution.unwrap_or(self.resolution),
        }
    }

    /// Describes every params key: type, default and meaning.
    pub fn param_schema() -> Value {
        let linear = LinearNoise::default();
        let circular = CircularNoise::default();
        json!({
            "seed": {
                "type": "integer",
                "default": linear.seed,
                "description": "Noise seed"
            },
            "noise": {
                "type": "string",
                "default": NoiseConfig::default().name(),
                "options": NoiseConfig::list_names(),
                "description": "Noise field kind"
            },
            "istart": {
                "type": "number",
                "default": linear.istart,
                "description": "Sampling offset of line 0 (circular: phase in steps)"
            },
            "istep": {
                "type": "number",
                "default": linear.istep,
                "description": "Sampling distance between successive lines"
            },
            "isteps": {
                "type": "integer",
                "default": circular.isteps,
                "min": 1,
                "description": "Circular noise period in steps"
            },
            "jstart": {
                "type": "number",
                "default": linear.jstart,
                "description": "Sampling offset of point 0 within a line"
            },
            "jstep": {
                "type": "number",
                "default": linear.jstep,
                "description": "Sampling distance between points of a line"
            },
            "npoints": {
                "type": "integer",
                "default": DEFAULT_NPOINTS,
                "min": 1,
                "description": "Points per line"
            },
            "nlines": {
                "type": "integer",
                "default": DEFAULT_NLINES,
                "min": 1,
                "description": "Lines per composition"
            },
            "sort": {
                "type": "string",
                "default": SortPolicy::default().name(),
                "options": SortPolicy::list_names(),
                "description": "Line reordering policy"
            },
            "curve": {
                "type": "string",
                "default": CurveKind::default().name(),
                "options": CurveKind::list_names(),
                "description": "Curve fitting strategy"
            },
            "resolution": {
                "type": "integer",
                "default": DEFAULT_RESOLUTION,
                "min": 1,
                "max": 16,
                "description": "Hilbert grid exponent (2^resolution cells per axis)"
            }
        })
    }
}

/// Fields to replace when deriving a config. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub noise: Option<NoiseKindName>,
    pub seed: Option<u32>,
    pub istart: Option<f64>,
    pub istep: Option<f64>,
    pub isteps: Option<usize>,
    pub jstart: Option<f64>,
    pub jstep: Option<f64>,
    pub npoints: Option<usize>,
    pub nlines: Option<usize>,
    pub sort: Option<SortPolicy>,
    pub curve: Option<CurveKind>,
    pub resolution: Option<u32>,
}

/// Noise kind selector used by overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseKindName {
    Linear,
    Circular,
}

impl NoiseKindName {
    pub fn from_name(name: &str) -> Result<Self, FluidityError> {
        match NoiseConfig::from_name(name)? {
            NoiseConfig::Linear(_) => Ok(NoiseKindName::Linear),
            NoiseConfig::Circular(_) => Ok(NoiseKindName::Circular),
        }
    }
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads overrides from a flat params object. Only keys present with
    /// the right JSON type become overrides, except the counts `npoints`,
    /// `nlines` and `isteps`: those must be non-negative integers when
    /// present, or this fails with `FluidityError::InvalidConfiguration`.
    pub fn from_json(params: &Value) -> Result<Self, FluidityError> {
        Ok(Self {
            noise: param_name(params, "noise")
                .map(NoiseKindName::from_name)
                .transpose()?,
            seed: opt_u32(params, "seed"),
            istart: opt_f64(params, "istart"),
            istep: opt_f64(params, "istep"),
            isteps: param_count(params, "isteps")?,
            jstart: opt_f64(params, "jstart"),
            jstep: opt_f64(params, "jstep"),
            npoints: param_count(params, "npoints")?,
            nlines: param_count(params, "nlines")?,
            sort: param_name(params, "sort")
                .map(SortPolicy::from_name)
                .transpose()?,
            curve: param_name(params, "curve")
                .map(CurveKind::from_name)
                .transpose()?,
            resolution: opt_u32(params, "resolution"),
        })
    }

    pub fn noise(mut self, kind: NoiseKindName) -> Self {
        self.noise = Some(kind);
        self
    }

    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn istart(mut self, istart: f64) -> Self {
        self.istart = Some(istart);
        self
    }

    pub fn istep(mut self, istep: f64) -> Self {
        self.istep = Some(istep);
        self
    }

    pub fn isteps(mut self, isteps: usize) -> Self {
        self.isteps = Some(isteps);
        self
    }

    pub fn jstart(mut self, jstart: f64) -> Self {
        self.jstart = Some(jstart);
        self
    }

    pub fn jstep(mut self, jstep: f64) -> Self {
        self.jstep = Some(jstep);
        self
    }

    pub fn npoints(mut self, npoints: usize) -> Self {
        self.npoints = Some(npoints);
        self
    }

    pub fn nlines(mut self, nlines: usize) -> Self {
        self.nlines = Some(nlines);
        self
    }

    pub fn sort(mut self, sort: SortPolicy) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn curve(mut self, curve: CurveKind) -> Self {
        self.curve = Some(curve);
        self
    }

    pub fn resolution(mut self, resolution: u32) -> Self {
        self.resolution = Some(resolution);
        self
    }
}

fn switch_noise_kind(noise: NoiseConfig, kind: NoiseKindName) -> NoiseConfig {
    match (noise, kind) {
        (NoiseConfig::Linear(n), NoiseKindName::Circular) => NoiseConfig::Circular(CircularNoise {
            seed: n.seed,
            istep: n.istep,
            jstart: n.jstart,
            jstep: n.jstep,
            ..CircularNoise::default()
        }),
        (NoiseConfig::Circular(n), NoiseKindName::Linear) => NoiseConfig::Linear(LinearNoise {
            seed: n.seed,
            istep: n.istep,
            jstart: n.jstart,
            jstep: n.jstep,
            ..LinearNoise::default()
        }),
        (same, _) => same,
    }
}

fn apply_noise_overrides(noise: &mut NoiseConfig, o: &ConfigOverrides) {
    match noise {
        NoiseConfig::Linear(n) => {
            n.seed = o.seed.unwrap_or(n.seed);
            n.istart = o.istart.unwrap_or(n.istart);
            n.istep = o.istep.unwrap_or(n.istep);
            n.jstart = o.jstart.unwrap_or(n.jstart);
            n.jstep = o.jstep.unwrap_or(n.jstep);
        }
        NoiseConfig::Circular(n) => {
            n.seed = o.seed.unwrap_or(n.seed);
            n.istart = o.istart.unwrap_or(n.istart);
            n.istep = o.istep.unwrap_or(n.istep);
            n.isteps = o.isteps.unwrap_or(n.isteps);
            n.jstart = o.jstart.unwrap_or(n.jstart);
            n.jstep = o.jstep.unwrap_or(n.jstep);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_are_valid() {
        let config = FluidityConfig::default();
        config.validate().unwrap();
        assert_eq!(config.npoints, 10);
        assert_eq!(config.nlines, 100);
        assert_eq!(config.noise.seed(), 1);
        assert_eq!(config.sort, SortPolicy::PerLine);
        assert_eq!(config.curve, CurveKind::TangentContinuous);
    }

    #[test]
    fn validate_rejects_zero_counts() {
        let config = FluidityConfig {
            npoints: 0,
            ..FluidityConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(FluidityError::InvalidConfiguration(_))
        ));
        let config = FluidityConfig {
            nlines: 0,
            ..FluidityConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_resolution_and_period() {
        let config = FluidityConfig {
            resolution: 17,
            ..FluidityConfig::default()
        };
        assert!(config.validate().is_err());
        let config = FluidityConfig::default().derive(
            &ConfigOverrides::new()
                .noise(NoiseKindName::Circular)
                .isteps(0),
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn from_json_reads_every_key() {
        let params = json!({
            "seed": 42,
            "noise": "circular",
            "istart": 3.0,
            "istep": 0.01,
            "isteps": 60,
            "jstart": 2.0,
            "jstep": 9,
            "npoints": 7,
            "nlines": 12,
            "sort": "first_line_only",
            "curve": "cubic",
            "resolution": 8
        });
        let config = FluidityConfig::from_json(&params).unwrap();
        assert_eq!(
            config.noise,
            NoiseConfig::Circular(CircularNoise {
                seed: 42,
                istart: 3.0,
                istep: 0.01,
                isteps: 60,
                jstart: 2.0,
                jstep: 9.0,
            })
        );
        assert_eq!(config.npoints, 7);
        assert_eq!(config.nlines, 12);
        assert_eq!(config.sort, SortPolicy::FirstLineOnly);
        assert_eq!(config.curve, CurveKind::CubicSpline);
        assert_eq!(config.resolution, 8);
    }

    #[test]
    fn from_json_empty_is_default() {
        assert_eq!(
            FluidityConfig::from_json(&json!({})).unwrap(),
            FluidityConfig::default()
        );
    }

    #[test]
    fn from_json_ignores_mistyped_non_count_numbers() {
        let config = FluidityConfig::from_json(&json!({"seed": -4, "istep": "slow"})).unwrap();
        assert_eq!(config, FluidityConfig::default());
    }

    #[test]
    fn from_json_rejects_negative_or_mistyped_counts() {
        for key in ["npoints", "nlines", "isteps"] {
            for bad in [json!(-3), json!(2.5), json!("many")] {
                let mut params = json!({"noise": "circular"});
                params[key] = bad.clone();
                let err = FluidityConfig::from_json(&params).unwrap_err();
                assert!(
                    matches!(&err, FluidityError::InvalidConfiguration(msg) if msg.contains(key)),
                    "{key} = {bad}: {err}"
                );
            }
        }
    }

    #[test]
    fn from_json_zero_counts_fail_validation() {
        for key in ["npoints", "nlines", "isteps"] {
            let mut params = json!({"noise": "circular"});
            params[key] = json!(0);
            let config = FluidityConfig::from_json(&params).unwrap();
            assert!(
                matches!(config.validate(), Err(FluidityError::InvalidConfiguration(_))),
                "{key} = 0 passed validation"
            );
        }
    }

    #[test]
    fn from_json_rejects_unknown_names() {
        for params in [
            json!({"noise": "perlin"}),
            json!({"sort": "random"}),
            json!({"curve": "bezier"}),
        ] {
            assert!(matches!(
                FluidityConfig::from_json(&params),
                Err(FluidityError::UnknownVariant { .. })
            ));
        }
    }

    #[test]
    fn derive_keeps_unspecified_fields() {
        let base = FluidityConfig::from_json(&json!({
            "seed": 7, "npoints": 6, "nlines": 3, "sort": "shared", "curve": "cubic"
        }))
        .unwrap();
        let derived = base.derive(&ConfigOverrides::new().nlines(9));
        assert_eq!(derived.nlines, 9);
        assert_eq!(derived.npoints, 6);
        assert_eq!(derived.noise, base.noise);
        assert_eq!(derived.sort, SortPolicy::Shared);
        assert_eq!(derived.curve, CurveKind::CubicSpline);
        assert_eq!(base.nlines, 3);
    }

    #[test]
    fn derive_with_no_overrides_is_equal() {
        let base = FluidityConfig::default();
        assert_eq!(base.derive(&ConfigOverrides::new()), base);
    }

    #[test]
    fn noise_kind_switch_carries_shared_parameters() {
        let base = FluidityConfig::default().derive(&ConfigOverrides::new().seed(11).jstep(5.0));
        let circular = base.derive(&ConfigOverrides::new().noise(NoiseKindName::Circular));
        match circular.noise {
            NoiseConfig::Circular(n) => {
                assert_eq!(n.seed, 11);
                assert_eq!(n.jstep, 5.0);
                assert_eq!(n.isteps, CircularNoise::default().isteps);
                assert_eq!(n.istart, CircularNoise::default().istart);
            }
            other => panic!("expected circular, got {other:?}"),
        }
        let back = circular.derive(&ConfigOverrides::new().noise(NoiseKindName::Linear));
        assert_eq!(back.noise, base.noise);
    }

    #[test]
    fn explicit_istart_survives_kind_switch() {
        let circular = FluidityConfig::default().derive(
            &ConfigOverrides::new()
                .noise(NoiseKindName::Circular)
                .istart(7.0),
        );
        match circular.noise {
            NoiseConfig::Circular(n) => assert_eq!(n.istart, 7.0),
            other => panic!("expected circular, got {other:?}"),
        }
        let linear = circular.derive(&ConfigOverrides::new().noise(NoiseKindName::Linear));
        match linear.noise {
            NoiseConfig::Linear(n) => assert_eq!(n.istart, LinearNoise::default().istart),
            other => panic!("expected linear, got {other:?}"),
        }
    }

    #[test]
    fn isteps_override_is_ignored_for_linear_noise() {
        let base = FluidityConfig::default();
        let derived = base.derive(&ConfigOverrides::new().isteps(5));
        assert_eq!(derived, base);
    }

    #[test]
    fn config_json_round_trips() {
        let config = FluidityConfig::from_json(&json!({"noise": "circular", "sort": "none"})).unwrap();
        let v = serde_json::to_value(&config).unwrap();
        assert_eq!(v["noise"]["kind"], "circular");
        assert_eq!(v["sort"], "none");
        assert_eq!(v["curve"], "hobby");
        let back: FluidityConfig = serde_json::from_value(v).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn schema_lists_every_key_with_defaults() {
        let schema = FluidityConfig::param_schema();
        for key in [
            "seed", "noise", "istart", "istep", "isteps", "jstart", "jstep", "npoints", "nlines",
            "sort", "curve", "resolution",
        ] {
            assert!(schema[key]["type"].is_string(), "missing {key}");
            assert!(!schema[key]["default"].is_null(), "no default for {key}");
        }
        assert_eq!(schema["npoints"]["default"], 10);
        assert_eq!(schema["sort"]["options"].as_array().unwrap().len(), 4);
    }
}
