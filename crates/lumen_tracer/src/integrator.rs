//! Radiance estimation.
//!
//! One call to [`trace_path`] follows a single light path from a primary ray
//! and returns one unbiased, noisy estimate of the radiance along it:
//!
//! - emission is collected at every hit, including the first;
//! - past [`DEFAULT_ROULETTE_DEPTH`] hits, paths survive with probability
//!   equal to the surface's largest albedo channel and are reweighted;
//! - diffuse surfaces are importance-sampled with a cosine-weighted lobe,
//!   which cancels the BRDF's `cos/π` term exactly, so no weight is applied;
//! - glass picks reflection or transmission with probability
//!   `0.25 + 0.5·Fresnel` and reweights the chosen branch.
//!
//! The path is followed in a loop rather than recursively so stack usage does
//! not grow with path length.

use std::f64::consts::PI;

use lumen_core::{Color, Material, Scene, Sphere};
use lumen_math::{Onb, Ray, Vec3d};

use crate::sampler::Sampler;

/// Hits collected before Russian roulette starts.
pub const DEFAULT_ROULETTE_DEPTH: u32 = 5;

/// Index of refraction inside refractive spheres. The outside medium is 1.0.
pub const GLASS_IOR: f64 = 1.5;

/// Integrator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegratorConfig {
    /// Roulette applies to every hit whose depth exceeds this
    pub roulette_depth: u32,
    /// Optional hard cap on hits per path. Emission is collected from at
    /// most this many hits, so `Some(0)` renders black.
    ///
    /// `None` keeps the estimator unbiased. A cap truncates long paths in
    /// near-white enclosures and darkens them.
    pub max_depth: Option<u32>,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            roulette_depth: DEFAULT_ROULETTE_DEPTH,
            max_depth: None,
        }
    }
}

/// Why a path stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The ray left the scene
    Escaped,
    /// Russian roulette ended the path
    RussianRoulette,
    /// The configured depth cap was reached
    DepthLimit,
}

/// One radiance estimate and how the path that produced it ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    pub radiance: Color,
    /// Number of surface hits along the path
    pub depth: u32,
    pub termination: Termination,
}

/// Which scattering branch produced a continuation ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lobe {
    Diffuse,
    Mirror,
    /// Glass hit past the critical angle; no draw was consumed
    TotalInternalReflection,
    FresnelReflection,
    Transmission,
}

/// Continuation ray and the throughput factor it carries beyond the albedo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scatter {
    pub ray: Ray,
    pub weight: f64,
    pub lobe: Lobe,
}

/// Estimate the radiance arriving along `ray`.
pub fn radiance(
    scene: &Scene,
    ray: Ray,
    sampler: &mut dyn Sampler,
    config: &IntegratorConfig,
) -> Color {
    trace_path(scene, ray, sampler, config).radiance
}

/// Follow one path and report the estimate together with path statistics.
pub fn trace_path(
    scene: &Scene,
    primary: Ray,
    sampler: &mut dyn Sampler,
    config: &IntegratorConfig,
) -> PathSample {
    let mut ray = primary;
    let mut color = Color::ZERO;
    let mut throughput = Color::ONE;
    let mut depth = 0;

    loop {
        // Checked before tracing so a cap of 0 collects nothing
        if config.max_depth.is_some_and(|max| depth >= max) {
            return PathSample {
                radiance: color,
                depth,
                termination: Termination::DepthLimit,
            };
        }

        let Some(hit) = scene.intersect(&ray) else {
            return PathSample {
                radiance: color,
                depth,
                termination: Termination::Escaped,
            };
        };

        let sphere = scene.sphere(hit.index);
        let x = ray.at(hit.t);
        let n = sphere.normal_at(x);

        color += throughput * sphere.emission();

        depth += 1;
        let albedo = sphere.albedo();
        if depth > config.roulette_depth {
            let survival = albedo.max_element();
            if sampler.next_1d() >= survival {
                return PathSample {
                    radiance: color,
                    depth,
                    termination: Termination::RussianRoulette,
                };
            }
            throughput /= survival;
        }
        throughput *= albedo;

        let next = scatter(sphere, &ray, x, n, sampler);
        throughput *= next.weight;
        ray = next.ray;
    }
}

/// Pick the continuation ray at hit point `x` with outward normal `n`.
pub fn scatter(sphere: &Sphere, ray: &Ray, x: Vec3d, n: Vec3d, sampler: &mut dyn Sampler) -> Scatter {
    let d = ray.direction();
    // Normal facing the incoming ray
    let nl = if n.dot(d) < 0.0 { n } else { -n };

    match sphere.material() {
        Material::Diffuse => Scatter {
            ray: Ray::new(x, cosine_hemisphere(nl, sampler)),
            weight: 1.0,
            lobe: Lobe::Diffuse,
        },
        Material::Specular => Scatter {
            ray: Ray::new(x, reflect(d, n)),
            weight: 1.0,
            lobe: Lobe::Mirror,
        },
        Material::Refractive => dielectric(d, x, n, nl, sampler),
    }
}

/// Mirror `d` about the normal `n`.
#[inline]
pub(crate) fn reflect(d: Vec3d, n: Vec3d) -> Vec3d {
    d - n * 2.0 * n.dot(d)
}

/// Cosine-weighted direction in the hemisphere around `w`.
fn cosine_hemisphere(w: Vec3d, sampler: &mut dyn Sampler) -> Vec3d {
    let (xi1, xi2) = sampler.next_2d();
    let angle = 2.0 * PI * xi1;
    let r = xi2.sqrt();
    Onb::from_w(w)
        .local(angle.cos() * r, angle.sin() * r, (1.0 - xi2).sqrt())
        .normalize()
}

fn dielectric(d: Vec3d, x: Vec3d, n: Vec3d, nl: Vec3d, sampler: &mut dyn Sampler) -> Scatter {
    let reflected = Ray::new(x, reflect(d, n));
    let into = n.dot(nl) > 0.0;
    let (nc, nt) = (1.0, GLASS_IOR);
    let nnt = if into { nc / nt } else { nt / nc };
    let ddn = d.dot(nl);
    let cos2t = 1.0 - nnt * nnt * (1.0 - ddn * ddn);

    if cos2t < 0.0 {
        return Scatter {
            ray: reflected,
            weight: 1.0,
            lobe: Lobe::TotalInternalReflection,
        };
    }

    let sign = if into { 1.0 } else { -1.0 };
    let tdir = (d * nnt - n * (sign * (ddn * nnt + cos2t.sqrt()))).normalize();

    let r0 = ((nt - nc) / (nt + nc)).powi(2);
    let c = 1.0 - if into { -ddn } else { tdir.dot(n) };
    let re = r0 + (1.0 - r0) * c.powi(5);
    let tr = 1.0 - re;
    let p = 0.25 + 0.5 * re;

    if sampler.next_1d() < p {
        Scatter {
            ray: reflected,
            weight: re / p,
            lobe: Lobe::FresnelReflection,
        }
    } else {
        Scatter {
            ray: Ray::new(x, tdir),
            weight: tr / (1.0 - p),
            lobe: Lobe::Transmission,
        }
    }
}
