use glam::{EulerRot, Quat};

/// Tolerance used when comparing preserved world poses after a bake.
pub(crate) const POSE_EPS: f32 = 1e-4;

pub(crate) fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

/// Per-axis rotation of `q` in degrees (XYZ euler decomposition).
pub(crate) fn axis_angles_deg(q: Quat) -> [f32; 3] {
    let (x, y, z) = q.normalize().to_euler(EulerRot::XYZ);
    [x.to_degrees(), y.to_degrees(), z.to_degrees()]
}

/// True when `q` rotates more than `limit_deg` around any single axis.
pub(crate) fn exceeds_per_axis_deg(q: Quat, limit_deg: f32) -> bool {
    axis_angles_deg(q).iter().any(|a| a.abs() > limit_deg)
}

/// True when `q` is a ±90° rotation around exactly one axis, with the other
/// two axes within `tol_deg` of zero.
///
/// This is the signature of a rig authored under a different up/forward
/// convention than the target format expects.
pub(crate) fn is_single_axis_quarter_turn(q: Quat, tol_deg: f32) -> bool {
    let angles = axis_angles_deg(q);
    let mut quarter = 0usize;
    let mut zero = 0usize;
    for a in angles {
        if (a.abs() - 90.0).abs() <= tol_deg {
            quarter += 1;
        } else if a.abs() <= tol_deg {
            zero += 1;
        }
    }
    quarter == 1 && zero == 2
}

/// True when `q` is the identity rotation within `tol_deg` on every axis.
pub(crate) fn is_identity_rotation(q: Quat, tol_deg: f32) -> bool {
    axis_angles_deg(q).iter().all(|a| a.abs() <= tol_deg)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
