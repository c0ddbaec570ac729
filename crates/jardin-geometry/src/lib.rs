pub use cgmath::{
    Deg, ElementWise, EuclideanSpace, InnerSpace, MetricSpace, One, Point2, Point3, Quaternion,
    Rad, Rotation, Rotation3, Vector2, Vector3, Zero,
};

mod bounds;
mod ray;

pub use bounds::Aabb;
pub use ray::{Ray, ray_intersect_triangle, triangle_normal};

/// World up axis. Surfaces are horizontal when their normal matches it.
pub const UP: Vector3<f32> = Vector3::new(0.0, 1.0, 0.0);

/// Signed angle from `from` to `to`, positive counter-clockwise.
///
/// Zero-length inputs give a zero angle.
pub fn signed_angle(from: Vector2<f32>, to: Vector2<f32>) -> Deg<f32> {
    if from.magnitude2() <= f32::EPSILON || to.magnitude2() <= f32::EPSILON {
        return Deg(0.0);
    }
    let cross = from.x * to.y - from.y * to.x;
    let dot = from.dot(to);
    Deg::from(Rad(cross.atan2(dot)))
}

/// Rotation that turns the up axis onto `normal`.
pub fn surface_rotation(normal: Vector3<f32>) -> Quaternion<f32> {
    if normal.magnitude2() <= f32::EPSILON {
        return Quaternion::one();
    }
    Quaternion::from_arc(UP, normal.normalize(), Some(Vector3::unit_x()))
}
