use crate::Vec3d;

/// Orthonormal basis `(u, v, w)` built around a unit vector `w`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Onb {
    pub u: Vec3d,
    pub v: Vec3d,
    pub w: Vec3d,
}

impl Onb {
    /// Build a basis whose `w` axis is the given unit normal.
    ///
    /// The helper axis is +Y unless `w` has almost no X component, in which
    /// case +X is used, so the cross product never degenerates.
    pub fn from_w(w: Vec3d) -> Self {
        let helper = if w.x.abs() > 0.1 { Vec3d::Y } else { Vec3d::X };
        let u = helper.cross(w).normalize();
        let v = w.cross(u);
        Self { u, v, w }
    }

    /// Map local coordinates `(a, b, c)` into world space.
    #[inline]
    pub fn local(&self, a: f64, b: f64, c: f64) -> Vec3d {
        self.u * a + self.v * b + self.w * c
    }
}
