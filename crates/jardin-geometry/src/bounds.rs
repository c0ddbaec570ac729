use cgmath::{ElementWise, InnerSpace, Point3, Quaternion, Rotation, Vector3};

use crate::Ray;

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    pub fn from_center_half_extents(center: Point3<f32>, half: Vector3<f32>) -> Self {
        Self::new(center - half, center + half)
    }

    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3<f32>>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::new(first, first);
        for p in iter {
            bounds.encapsulate(p);
        }
        Some(bounds)
    }

    pub fn encapsulate(&mut self, p: Point3<f32>) {
        self.min = Point3::new(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z));
        self.max = Point3::new(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z));
    }

    pub fn union(self, other: Self) -> Self {
        let mut merged = self;
        merged.encapsulate(other.min);
        merged.encapsulate(other.max);
        merged
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    pub fn center(&self) -> Point3<f32> {
        self.min + self.size() * 0.5
    }

    /// True when the box encloses no measurable geometry.
    pub fn is_degenerate(&self) -> bool {
        self.size().magnitude2() <= f32::EPSILON
    }

    pub fn corners(&self) -> [Point3<f32>; 8] {
        let (min, max) = (self.min, self.max);
        [
            Point3::new(min.x, min.y, min.z),
            Point3::new(max.x, min.y, min.z),
            Point3::new(max.x, max.y, min.z),
            Point3::new(min.x, max.y, min.z),
            Point3::new(min.x, min.y, max.z),
            Point3::new(max.x, min.y, max.z),
            Point3::new(max.x, max.y, max.z),
            Point3::new(min.x, max.y, max.z),
        ]
    }

    /// World bounds of a local box placed with scale, then rotation, then translation.
    pub fn transformed(
        &self,
        position: Point3<f32>,
        rotation: Quaternion<f32>,
        scale: Vector3<f32>,
    ) -> Self {
        let corners = self.corners().map(|corner| {
            let local = Vector3::new(corner.x, corner.y, corner.z).mul_element_wise(scale);
            position + rotation.rotate_vector(local)
        });
        let mut bounds = Self::new(corners[0], corners[0]);
        for corner in &corners[1..] {
            bounds.encapsulate(*corner);
        }
        bounds
    }

    pub fn translated(&self, offset: Vector3<f32>) -> Self {
        Self::new(self.min + offset, self.max + offset)
    }

    /// Slab test. Returns the entry distance, or the exit distance when the
    /// origin is inside the box.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );
        let t_min = (self.min - ray.origin).mul_element_wise(inv);
        let t_max = (self.max - ray.origin).mul_element_wise(inv);

        let near = t_min.x.min(t_max.x).max(t_min.y.min(t_max.y)).max(t_min.z.min(t_max.z));
        let far = t_min.x.max(t_max.x).min(t_min.y.max(t_max.y)).min(t_min.z.max(t_max.z));

        if near <= far && far >= 0.0 {
            Some(if near >= 0.0 { near } else { far })
        } else {
            None
        }
    }

    /// Outward normal of the face nearest to `point`.
    pub fn face_normal(&self, point: Point3<f32>) -> Vector3<f32> {
        let half = self.size() * 0.5;
        let rel = point - self.center();
        let scaled = Vector3::new(
            axis_ratio(rel.x, half.x),
            axis_ratio(rel.y, half.y),
            axis_ratio(rel.z, half.z),
        );
        let (ax, ay, az) = (scaled.x.abs(), scaled.y.abs(), scaled.z.abs());
        if ay >= ax && ay >= az {
            Vector3::new(0.0, scaled.y.signum(), 0.0)
        } else if ax >= az {
            Vector3::new(scaled.x.signum(), 0.0, 0.0)
        } else {
            Vector3::new(0.0, 0.0, scaled.z.signum())
        }
    }
}

fn axis_ratio(offset: f32, half: f32) -> f32 {
    if half <= f32::EPSILON { 0.0 } else { offset / half }
}
