use jardin_base::{EntityId, InteractionSettings};
use jardin_geometry::{Deg, MetricSpace, Quaternion, Rotation3, Vector3, signed_angle};
use jardin_scene::ObjectStore;

use crate::gesture::{RotateGesture, ScaleGesture};

/// Turns two-finger gestures into scale and yaw changes.
#[derive(Clone, Copy, Debug)]
pub struct TransformApplicator {
    scale_sensitivity: f32,
    min_scale: f32,
    max_scale: f32,
    rotation_speed: f32,
}

impl TransformApplicator {
    pub fn new(settings: &InteractionSettings) -> Self {
        Self {
            scale_sensitivity: settings.scale_sensitivity,
            min_scale: settings.min_scale,
            max_scale: settings.max_scale,
            rotation_speed: settings.rotation_speed,
        }
    }

    /// Adds the pinch distance change to every axis, then clamps each axis.
    pub fn scaled(&self, scale: Vector3<f32>, gesture: &ScaleGesture) -> Vector3<f32> {
        let current = gesture.first.distance(gesture.second);
        let previous = gesture.first_previous.distance(gesture.second_previous);
        let factor = (current - previous) * self.scale_sensitivity;
        let clamp = |value: f32| (value + factor).clamp(self.min_scale, self.max_scale);
        Vector3::new(clamp(scale.x), clamp(scale.y), clamp(scale.z))
    }

    /// Yaw about the object's own up axis. Counter-clockwise finger motion on
    /// screen turns the object clockwise seen from above.
    pub fn yaw_delta(&self, gesture: &RotateGesture) -> Deg<f32> {
        let previous = gesture.orbit_previous - gesture.pivot;
        let current = gesture.orbit - gesture.pivot;
        let angle = signed_angle(previous, current);
        Deg(-angle.0 * self.rotation_speed)
    }

    pub fn apply_scale<S: ObjectStore + ?Sized>(
        &self,
        store: &mut S,
        root: EntityId,
        gesture: &ScaleGesture,
    ) -> Option<Vector3<f32>> {
        let mut transform = store.transform(root)?;
        transform.scale = self.scaled(transform.scale, gesture);
        store.set_transform(root, transform);
        Some(transform.scale)
    }

    pub fn apply_rotation<S: ObjectStore + ?Sized>(
        &self,
        store: &mut S,
        root: EntityId,
        gesture: &RotateGesture,
    ) -> Option<Deg<f32>> {
        let mut transform = store.transform(root)?;
        let yaw = self.yaw_delta(gesture);
        transform.rotation = transform.rotation * Quaternion::from_angle_y(yaw);
        store.set_transform(root, transform);
        Some(yaw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jardin_geometry::Point2;

    fn applicator() -> TransformApplicator {
        TransformApplicator::new(&InteractionSettings::default())
    }

    fn pinch(previous_gap: f32, gap: f32) -> ScaleGesture {
        ScaleGesture {
            first: Point2::new(0.0, 0.0),
            first_previous: Point2::new(0.0, 0.0),
            second: Point2::new(gap, 0.0),
            second_previous: Point2::new(previous_gap, 0.0),
        }
    }

    #[test]
    fn pinch_out_grows_every_axis_equally() {
        let scale = applicator().scaled(Vector3::new(1.0, 0.5, 1.5), &pinch(100.0, 300.0));
        assert!((scale.x - 1.2).abs() < 1.0e-5);
        assert!((scale.y - 0.7).abs() < 1.0e-5);
        assert!((scale.z - 1.7).abs() < 1.0e-5);
    }

    #[test]
    fn scale_clamps_per_axis() {
        let scale = applicator().scaled(Vector3::new(1.95, 0.15, 1.0), &pinch(100.0, 200.0));
        assert_eq!(scale.x, 2.0);
        assert!((scale.y - 0.25).abs() < 1.0e-5);

        let scale = applicator().scaled(Vector3::new(0.12, 1.0, 1.0), &pinch(400.0, 100.0));
        assert_eq!(scale.x, 0.1);
        assert!((scale.y - 0.7).abs() < 1.0e-5);
    }

    #[test]
    fn yaw_is_negated_orbit_angle() {
        let gesture = RotateGesture {
            pivot: Point2::new(0.0, 0.0),
            orbit: Point2::new(0.0, 100.0),
            orbit_previous: Point2::new(100.0, 0.0),
        };
        let yaw = applicator().yaw_delta(&gesture);
        assert!((yaw.0 + 90.0).abs() < 1.0e-3);
    }
}
