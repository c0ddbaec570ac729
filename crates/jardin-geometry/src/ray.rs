use cgmath::{InnerSpace, Point3, Vector3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    /// Unit direction.
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn point_at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }
}

/// Möller–Trumbore intersection, double sided. Returns the ray parameter.
pub fn ray_intersect_triangle(
    ray: &Ray,
    a: Point3<f32>,
    b: Point3<f32>,
    c: Point3<f32>,
) -> Option<f32> {
    let eps = 1.0e-7;
    let edge1 = b - a;
    let edge2 = c - a;
    let pvec = ray.direction.cross(edge2);
    let det = edge1.dot(pvec);
    if det.abs() < eps {
        return None;
    }
    let inv_det = 1.0 / det;
    let tvec = ray.origin - a;
    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let qvec = tvec.cross(edge1);
    let v = ray.direction.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(qvec) * inv_det;
    if t >= 0.0 { Some(t) } else { None }
}

/// Unit normal of a triangle, flipped to face against `toward`.
pub fn triangle_normal(
    a: Point3<f32>,
    b: Point3<f32>,
    c: Point3<f32>,
    toward: Vector3<f32>,
) -> Vector3<f32> {
    let normal = (b - a).cross(c - a).normalize();
    if normal.dot(toward) > 0.0 {
        -normal
    } else {
        normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> [Point3<f32>; 3] {
        [
            Point3::new(-1.0, 0.0, -1.0),
            Point3::new(1.0, 0.0, -1.0),
            Point3::new(0.0, 0.0, 1.0),
        ]
    }

    #[test]
    fn downward_ray_hits_floor_triangle() {
        let [a, b, c] = floor();
        let ray = Ray::new(Point3::new(0.0, 2.0, 0.0), Vector3::new(0.0, -3.0, 0.0));
        let t = ray_intersect_triangle(&ray, a, b, c);
        assert_eq!(t, Some(2.0));
        assert_eq!(ray.point_at(2.0), Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn ray_outside_triangle_misses() {
        let [a, b, c] = floor();
        let ray = Ray::new(Point3::new(3.0, 2.0, 0.0), Vector3::new(0.0, -1.0, 0.0));
        assert!(ray_intersect_triangle(&ray, a, b, c).is_none());
    }

    #[test]
    fn ray_pointing_away_misses() {
        let [a, b, c] = floor();
        let ray = Ray::new(Point3::new(0.0, 2.0, 0.0), Vector3::new(0.0, 1.0, 0.0));
        assert!(ray_intersect_triangle(&ray, a, b, c).is_none());
    }

    #[test]
    fn normal_faces_the_ray() {
        let [a, b, c] = floor();
        let normal = triangle_normal(a, b, c, Vector3::new(0.0, -1.0, 0.0));
        assert_eq!(normal, Vector3::new(0.0, 1.0, 0.0));
    }
}
