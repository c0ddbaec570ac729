use jardin_base::{EntityId, InteractionSettings};
use jardin_geometry::{Deg, MetricSpace, Point2, Point3, Vector2, Vector3, signed_angle};
use jardin_scene::{ModelHandle, ObjectRef, Raycaster};
use tracing::debug;

use crate::context::AppContext;
use crate::input::{Touch, TouchFrame, TouchPhase};
use crate::surface::SurfaceQuery;

/// One finger stays put while the other circles it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotateGesture {
    pub pivot: Point2<f32>,
    pub orbit: Point2<f32>,
    pub orbit_previous: Point2<f32>,
}

impl RotateGesture {
    pub fn orbit_angle(&self) -> Deg<f32> {
        signed_angle(self.orbit_previous - self.pivot, self.orbit - self.pivot)
    }
}

/// Both fingers move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleGesture {
    pub first: Point2<f32>,
    pub first_previous: Point2<f32>,
    pub second: Point2<f32>,
    pub second_previous: Point2<f32>,
}

impl ScaleGesture {
    pub fn distance_change(&self) -> f32 {
        self.first.distance(self.second) - self.first_previous.distance(self.second_previous)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GestureEvent {
    SelectAndBeginDrag { object: ObjectRef },
    DoubleTapDelete { object: ObjectRef },
    DragTo { point: Point3<f32>, normal: Vector3<f32> },
    EndDrag,
    Deselect,
    PlaceNew {
        point: Point3<f32>,
        normal: Vector3<f32>,
        model: ModelHandle,
    },
    Rotate(RotateGesture),
    Scale(ScaleGesture),
}

/// The last tap that selected something.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TapRecord {
    pub time: f64,
    pub root: EntityId,
}

/// Read-only slice of the selection state the classifier decides on.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SelectionView {
    pub selected: Option<ObjectRef>,
    pub dragging: bool,
    pub cooldown_active: bool,
    pub last_tap: Option<TapRecord>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FingerMotion {
    Resting,
    Moving,
    /// Exactly at the threshold. Counts as neither.
    Undecided,
}

pub fn finger_motion(delta: Vector2<f32>, threshold: f32) -> FingerMotion {
    let travel = delta.x.hypot(delta.y);
    if travel < threshold {
        FingerMotion::Resting
    } else if travel > threshold {
        FingerMotion::Moving
    } else {
        FingerMotion::Undecided
    }
}

/// Maps one frame of touches to at most one [`GestureEvent`].
#[derive(Clone, Copy, Debug)]
pub struct GestureClassifier {
    drag_threshold: f32,
    double_tap_threshold: f64,
    settle_delay: f64,
}

impl GestureClassifier {
    pub fn new(settings: &InteractionSettings) -> Self {
        Self {
            drag_threshold: settings.rotation_drag_threshold,
            double_tap_threshold: settings.double_tap_threshold,
            settle_delay: settings.settle_delay,
        }
    }

    pub fn classify<R: Raycaster + ?Sized>(
        &self,
        frame: &TouchFrame,
        context: &AppContext,
        view: &SelectionView,
        surfaces: &SurfaceQuery,
        raycaster: &R,
    ) -> Option<GestureEvent> {
        let ui_blocked = context.is_selection_ui_open();
        match frame.touches.as_slice() {
            [touch] => {
                self.single_touch(touch, frame.time, ui_blocked, context, view, surfaces, raycaster)
            }
            [first, second] => {
                if ui_blocked || view.selected.is_none() {
                    return None;
                }
                self.two_touch(first, second)
            }
            _ => None,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn single_touch<R: Raycaster + ?Sized>(
        &self,
        touch: &Touch,
        now: f64,
        ui_blocked: bool,
        context: &AppContext,
        view: &SelectionView,
        surfaces: &SurfaceQuery,
        raycaster: &R,
    ) -> Option<GestureEvent> {
        match touch.phase {
            TouchPhase::Began => {
                if ui_blocked || touch.over_ui {
                    return None;
                }
                let hit = surfaces.raycast_placeable(raycaster, touch.position)?;
                let object = hit.object;
                let repeated = view.last_tap.is_some_and(|tap| {
                    tap.root == object.root && now - tap.time <= self.double_tap_threshold
                });
                if repeated {
                    Some(GestureEvent::DoubleTapDelete { object })
                } else {
                    Some(GestureEvent::SelectAndBeginDrag { object })
                }
            }
            TouchPhase::Moved => {
                if ui_blocked || !view.dragging || view.selected.is_none() {
                    return None;
                }
                let hit = surfaces.raycast_environment(raycaster, touch.position)?;
                Some(GestureEvent::DragTo {
                    point: hit.point,
                    normal: hit.normal,
                })
            }
            TouchPhase::Stationary => None,
            TouchPhase::Ended => {
                if view.dragging {
                    return Some(GestureEvent::EndDrag);
                }
                if ui_blocked || touch.over_ui || view.cooldown_active {
                    return None;
                }
                if surfaces.raycast_placeable(raycaster, touch.position).is_some() {
                    return None;
                }
                if view.selected.is_some() {
                    return Some(GestureEvent::Deselect);
                }
                self.placement(touch, now, context, surfaces, raycaster)
            }
            TouchPhase::Canceled => view.dragging.then_some(GestureEvent::EndDrag),
        }
    }

    fn placement<R: Raycaster + ?Sized>(
        &self,
        touch: &Touch,
        now: f64,
        context: &AppContext,
        surfaces: &SurfaceQuery,
        raycaster: &R,
    ) -> Option<GestureEvent> {
        let model = context.catalog.current_selected_model()?;
        let age = context.catalog.time_since_selection(now)?;
        if age <= self.settle_delay {
            debug!(age, "catalog selection too fresh to place");
            return None;
        }
        let hit = surfaces.raycast_environment(raycaster, touch.position)?;
        Some(GestureEvent::PlaceNew {
            point: hit.point,
            normal: hit.normal,
            model: model.clone(),
        })
    }

    fn two_touch(&self, first: &Touch, second: &Touch) -> Option<GestureEvent> {
        let first_motion = finger_motion(first.delta, self.drag_threshold);
        let second_motion = finger_motion(second.delta, self.drag_threshold);
        match (first_motion, second_motion) {
            (FingerMotion::Resting, FingerMotion::Moving) => {
                Some(GestureEvent::Rotate(RotateGesture {
                    pivot: first.position,
                    orbit: second.position,
                    orbit_previous: second.previous_position(),
                }))
            }
            (FingerMotion::Moving, FingerMotion::Resting) => {
                Some(GestureEvent::Rotate(RotateGesture {
                    pivot: second.position,
                    orbit: first.position,
                    orbit_previous: first.previous_position(),
                }))
            }
            (FingerMotion::Moving, FingerMotion::Moving) => Some(GestureEvent::Scale(ScaleGesture {
                first: first.position,
                first_previous: first.previous_position(),
                second: second.position,
                second_previous: second.previous_position(),
            })),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_a_dead_zone() {
        assert_eq!(finger_motion(Vector2::new(1.0, 1.0), 2.0), FingerMotion::Resting);
        assert_eq!(finger_motion(Vector2::new(2.0, 0.0), 2.0), FingerMotion::Undecided);
        assert_eq!(finger_motion(Vector2::new(0.0, 2.5), 2.0), FingerMotion::Moving);
    }

    #[test]
    fn resting_and_moving_pair_picks_the_resting_pivot() {
        let classifier = GestureClassifier::new(&InteractionSettings::default());
        let pivot = Touch::new(0, Point2::new(10.0, 10.0), TouchPhase::Stationary);
        let orbit = Touch::new(1, Point2::new(110.0, 10.0), TouchPhase::Moved)
            .with_delta(Vector2::new(0.0, -5.0));

        let Some(GestureEvent::Rotate(gesture)) = classifier.two_touch(&orbit, &pivot) else {
            panic!("expected rotation");
        };
        assert_eq!(gesture.pivot, pivot.position);
        assert_eq!(gesture.orbit, orbit.position);
        assert_eq!(gesture.orbit_previous, Point2::new(110.0, 15.0));
    }

    #[test]
    fn both_fingers_moving_is_a_pinch() {
        let classifier = GestureClassifier::new(&InteractionSettings::default());
        let a = Touch::new(0, Point2::new(0.0, 0.0), TouchPhase::Moved)
            .with_delta(Vector2::new(5.0, 0.0));
        let b = Touch::new(1, Point2::new(100.0, 0.0), TouchPhase::Moved)
            .with_delta(Vector2::new(-5.0, 0.0));

        let Some(GestureEvent::Scale(gesture)) = classifier.two_touch(&a, &b) else {
            panic!("expected pinch");
        };
        assert!((gesture.distance_change() - 10.0).abs() < 1.0e-5);
    }

    #[test]
    fn resting_fingers_do_nothing() {
        let classifier = GestureClassifier::new(&InteractionSettings::default());
        let a = Touch::new(0, Point2::new(0.0, 0.0), TouchPhase::Stationary);
        let b = Touch::new(1, Point2::new(50.0, 0.0), TouchPhase::Stationary)
            .with_delta(Vector2::new(2.0, 0.0));
        assert!(classifier.two_touch(&a, &b).is_none());
    }
}
