use glam::{Quat, Vec3, Vec4};

/// Values a keyframe track can interpolate.
pub trait Interpolatable: Clone + Sized {
    fn interpolate_linear(start: &Self, end: &Self, t: f32) -> Self;

    /// Hermite interpolation as defined by glTF `CUBICSPLINE` samplers.
    /// Tangents are scaled by the keyframe interval `dt`.
    fn interpolate_cubic(
        v0: &Self,
        out_tangent0: &Self,
        in_tangent1: &Self,
        v1: &Self,
        t: f32,
        dt: f32,
    ) -> Self;
}

/// Hermite basis (s0, s1, s2, s3) at `t`.
#[inline]
fn hermite_basis(t: f32) -> (f32, f32, f32, f32) {
    let t2 = t * t;
    let t3 = t2 * t;
    let s2 = -2.0 * t3 + 3.0 * t2;
    let s3 = t3 - t2;
    let s0 = 1.0 - s2;
    let s1 = s3 - t2 + t;
    (s0, s1, s2, s3)
}

impl Interpolatable for f32 {
    fn interpolate_linear(start: &Self, end: &Self, t: f32) -> Self {
        start + (end - start) * t
    }

    fn interpolate_cubic(
        v0: &Self,
        out_tangent0: &Self,
        in_tangent1: &Self,
        v1: &Self,
        t: f32,
        dt: f32,
    ) -> Self {
        let (s0, s1, s2, s3) = hermite_basis(t);
        s0 * v0 + s1 * out_tangent0 * dt + s2 * v1 + s3 * in_tangent1 * dt
    }
}

impl Interpolatable for Vec3 {
    fn interpolate_linear(start: &Self, end: &Self, t: f32) -> Self {
        start.lerp(*end, t)
    }

    fn interpolate_cubic(
        v0: &Self,
        out_tangent0: &Self,
        in_tangent1: &Self,
        v1: &Self,
        t: f32,
        dt: f32,
    ) -> Self {
        let (s0, s1, s2, s3) = hermite_basis(t);
        *v0 * s0 + *out_tangent0 * dt * s1 + *v1 * s2 + *in_tangent1 * dt * s3
    }
}

impl Interpolatable for Quat {
    fn interpolate_linear(start: &Self, end: &Self, t: f32) -> Self {
        start.slerp(*end, t)
    }

    fn interpolate_cubic(
        v0: &Self,
        out_tangent0: &Self,
        in_tangent1: &Self,
        v1: &Self,
        t: f32,
        dt: f32,
    ) -> Self {
        let (s0, s1, s2, s3) = hermite_basis(t);

        let result = Vec4::from(*v0) * s0
            + Vec4::from(*out_tangent0) * dt * s1
            + Vec4::from(*v1) * s2
            + Vec4::from(*in_tangent1) * dt * s3;

        Quat::from_vec4(result).normalize()
    }
}
