//! Touch-driven placement of catalog models on detected surfaces.
//!
//! Each frame the [`PlacementController`] classifies the touches into at most
//! one [`GestureEvent`] and applies it to the selection state machine, which
//! spawns, selects, drags, rotates, scales and deletes objects through a
//! [`SceneBackend`](jardin_scene::SceneBackend).

use jardin_base::InteractionSettings;
use jardin_scene::{ObjectRef, SceneBackend};
use thiserror::Error;
use tracing::{debug, error, info};

mod context;
mod gesture;
mod grounding;
mod input;
mod selection;
mod surface;
mod transform;

pub use context::{AppContext, CatalogCategory, CatalogState};
pub use gesture::{
    FingerMotion, GestureClassifier, GestureEvent, RotateGesture, ScaleGesture, SelectionView,
    TapRecord, finger_motion,
};
pub use grounding::{GroundingCorrector, GroundingOutcome};
pub use input::{Touch, TouchFrame, TouchPhase};
pub use selection::{InteractionState, PendingPlacement, Selection, SelectionMachine};
pub use surface::{SurfaceLayers, SurfaceQuery};
pub use transform::TransformApplicator;

#[derive(Error, Debug)]
pub enum Error {
    #[error("missing configuration: {0}")]
    MissingConfiguration(String),
    #[error(transparent)]
    Settings(#[from] jardin_base::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Per-frame entry point of the placement core.
pub struct PlacementController {
    settings: InteractionSettings,
    classifier: GestureClassifier,
    machine: SelectionMachine,
    surfaces: Option<SurfaceQuery>,
    configuration_error: Option<Error>,
}

impl PlacementController {
    /// Resolves the surface layers. When that fails the error is logged once
    /// and every frame is ignored until [`Self::reconfigure`] succeeds.
    pub fn new<B: SceneBackend + ?Sized>(settings: InteractionSettings, backend: &mut B) -> Self {
        let highlight = backend.create_material(settings.highlight_color);
        let mut controller = Self {
            classifier: GestureClassifier::new(&settings),
            machine: SelectionMachine::new(&settings, highlight),
            settings,
            surfaces: None,
            configuration_error: None,
        };
        if let Err(err) = controller.reconfigure(&*backend) {
            error!(error = %err, "placement disabled");
            controller.configuration_error = Some(err);
        }
        controller
    }

    pub fn reconfigure<B: SceneBackend + ?Sized>(&mut self, backend: &B) -> Result<()> {
        self.settings.validate()?;
        let layers = SurfaceLayers::resolve(backend, &self.settings)?;
        self.surfaces = Some(SurfaceQuery::new(layers));
        self.configuration_error = None;
        info!(
            placeable = %self.settings.placeable_layer,
            environment = %self.settings.environment_layer,
            "surface layers resolved"
        );
        Ok(())
    }

    /// Replaces the settings, then resolves layers as [`Self::reconfigure`]
    /// does. Invalid settings are rejected and the current ones kept.
    pub fn reconfigure_with<B: SceneBackend + ?Sized>(
        &mut self,
        settings: InteractionSettings,
        backend: &B,
    ) -> Result<()> {
        settings.validate()?;
        self.classifier = GestureClassifier::new(&settings);
        self.machine.retune(&settings);
        self.settings = settings;
        self.reconfigure(backend)
    }

    pub fn process_frame<B: SceneBackend + ?Sized>(
        &mut self,
        frame: &TouchFrame,
        context: &AppContext,
        backend: &mut B,
    ) -> Option<GestureEvent> {
        self.machine.tick(frame.delta_time);
        let surfaces = self.surfaces?;

        for (root, outcome) in self.machine.finalize_ready(&surfaces, backend) {
            debug!(%root, ?outcome, "placement finalized");
        }
        self.machine.forget_stale(&*backend);

        if frame.touch_count() == 2 && self.machine.selected().is_some() {
            self.machine.cancel_drag();
        }

        let event = self.classifier.classify(
            frame,
            context,
            &self.machine.view(),
            &surfaces,
            &*backend,
        )?;
        debug!(?event, "gesture");
        self.machine.apply(&event, frame.time, &surfaces, backend);
        Some(event)
    }

    pub fn is_configured(&self) -> bool {
        self.surfaces.is_some()
    }

    pub fn configuration_error(&self) -> Option<&Error> {
        self.configuration_error.as_ref()
    }

    pub fn state(&self) -> InteractionState {
        self.machine.state()
    }

    pub fn selected(&self) -> Option<ObjectRef> {
        self.machine.selected()
    }

    pub fn machine(&self) -> &SelectionMachine {
        &self.machine
    }

    pub fn surfaces(&self) -> Option<SurfaceQuery> {
        self.surfaces
    }

    pub fn settings(&self) -> &InteractionSettings {
        &self.settings
    }
}
