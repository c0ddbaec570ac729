use jardin_base::{EntityId, InteractionSettings};
use jardin_geometry::UP;
use jardin_scene::SceneBackend;
use tracing::debug;

use crate::surface::SurfaceQuery;

/// Offsets below this are treated as already resting on the ground.
const SETTLED: f32 = 1.0e-5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GroundingOutcome {
    /// The object moved vertically by `offset` meters.
    Grounded { offset: f32 },
    NoGround,
    DegenerateBounds,
    MissingObject,
}

impl GroundingOutcome {
    pub fn is_grounded(&self) -> bool {
        matches!(self, Self::Grounded { .. })
    }
}

/// Shifts an object vertically so the bottom of its visual bounds rests on
/// the environment surface below it.
#[derive(Clone, Copy, Debug)]
pub struct GroundingCorrector {
    probe_lift: f32,
    probe_range: f32,
}

impl GroundingCorrector {
    pub fn new(settings: &InteractionSettings) -> Self {
        Self {
            probe_lift: settings.grounding_probe_lift,
            probe_range: settings.grounding_probe_range,
        }
    }

    pub fn apply<B: SceneBackend + ?Sized>(
        &self,
        backend: &mut B,
        surfaces: &SurfaceQuery,
        root: EntityId,
    ) -> GroundingOutcome {
        let Some(mut transform) = backend.transform(root) else {
            return GroundingOutcome::MissingObject;
        };
        let bounds = match backend.visual_bounds(root) {
            Some(bounds) if !bounds.is_degenerate() => bounds,
            _ => {
                debug!(%root, "no visual bounds to ground");
                return GroundingOutcome::DegenerateBounds;
            }
        };

        let origin = transform.position + UP * self.probe_lift;
        let Some(ground) = surfaces.probe_environment(&*backend, origin, -UP, self.probe_range)
        else {
            debug!(%root, "no ground below object");
            return GroundingOutcome::NoGround;
        };

        let offset = ground.point.y - bounds.min.y;
        if offset.abs() < SETTLED {
            return GroundingOutcome::Grounded { offset: 0.0 };
        }
        transform.position += UP * offset;
        backend.set_transform(root, transform);
        debug!(%root, offset, "grounded");
        GroundingOutcome::Grounded { offset }
    }
}
