use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use jardin_base::InteractionSettings;
use jardin_geometry::{Aabb, Point2, Point3, Vector2};
use jardin_placement::{
    AppContext, CatalogCategory, GestureEvent, PlacementController, Touch, TouchFrame, TouchPhase,
};
use jardin_scene::{MemoryScene, ModelHandle, OrthoCamera, Surface};
use serde::Deserialize;
use tracing::{info, warn};

/// Recorded touch session replayed against an in-memory scene.
#[derive(Debug, Deserialize)]
pub struct Session {
    #[serde(default = "default_pixels_per_unit")]
    pub pixels_per_unit: f32,
    #[serde(default)]
    pub surfaces: Vec<SurfaceRecord>,
    #[serde(default)]
    pub models: Vec<ModelRecord>,
    pub frames: Vec<FrameRecord>,
}

fn default_pixels_per_unit() -> f32 {
    100.0
}

/// Horizontal rectangle of detected ground.
#[derive(Debug, Deserialize)]
pub struct SurfaceRecord {
    pub center: [f32; 3],
    pub half_extent: [f32; 2],
}

#[derive(Debug, Deserialize)]
pub struct ModelRecord {
    pub name: String,
    /// Local bounds. A model without them has no renderable geometry.
    pub min: Option<[f32; 3]>,
    pub max: Option<[f32; 3]>,
}

#[derive(Debug, Deserialize)]
pub struct FrameRecord {
    #[serde(default = "default_dt")]
    pub dt: f64,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub touches: Vec<TouchRecord>,
}

fn default_dt() -> f64 {
    1.0 / 60.0
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    OpenCatalog,
    CloseCatalog,
    ShowCategory { category: CategoryName },
    SelectModel { name: String },
    OpenSavePanel,
    CloseSavePanel,
    ConfirmSave { name: String },
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryName {
    Vegetation,
    Surfaces,
    Decoration,
}

impl From<CategoryName> for CatalogCategory {
    fn from(value: CategoryName) -> Self {
        match value {
            CategoryName::Vegetation => CatalogCategory::Vegetation,
            CategoryName::Surfaces => CatalogCategory::Surfaces,
            CategoryName::Decoration => CatalogCategory::Decoration,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TouchRecord {
    #[serde(default)]
    pub id: u64,
    pub position: [f32; 2],
    #[serde(default)]
    pub delta: [f32; 2],
    pub phase: PhaseName,
    #[serde(default)]
    pub over_ui: bool,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseName {
    Began,
    Moved,
    Stationary,
    Ended,
    Canceled,
}

impl From<PhaseName> for TouchPhase {
    fn from(value: PhaseName) -> Self {
        match value {
            PhaseName::Began => TouchPhase::Began,
            PhaseName::Moved => TouchPhase::Moved,
            PhaseName::Stationary => TouchPhase::Stationary,
            PhaseName::Ended => TouchPhase::Ended,
            PhaseName::Canceled => TouchPhase::Canceled,
        }
    }
}

impl TouchRecord {
    fn to_touch(&self) -> Touch {
        let mut touch = Touch::new(
            self.id,
            Point2::new(self.position[0], self.position[1]),
            self.phase.into(),
        )
        .with_delta(Vector2::new(self.delta[0], self.delta[1]));
        touch.over_ui = self.over_ui;
        touch
    }
}

pub struct ReplayOutcome {
    pub scene: MemoryScene,
    pub events: Vec<(usize, GestureEvent)>,
    /// Name confirmed through the save panel, if any.
    pub saved_name: Option<String>,
}

impl Session {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let session: Self = serde_json::from_str(text).context("invalid session file")?;
        if session.pixels_per_unit <= 0.0 {
            bail!("pixels_per_unit must be positive");
        }
        Ok(session)
    }

    fn build_scene(
        &self,
        settings: &InteractionSettings,
    ) -> Result<(MemoryScene, HashMap<String, ModelHandle>)> {
        let mut scene = MemoryScene::new(OrthoCamera {
            pixels_per_unit: self.pixels_per_unit,
            ..OrthoCamera::default()
        });
        scene
            .add_layer(&settings.placeable_layer)
            .context("failed to add placeable layer")?;
        let ground = scene
            .add_layer(&settings.environment_layer)
            .context("failed to add environment layer")?;

        for surface in &self.surfaces {
            let [x, y, z] = surface.center;
            let [half_x, half_z] = surface.half_extent;
            scene.add_surface(Surface::quad(ground, Point3::new(x, y, z), half_x, half_z));
        }

        let mut models = HashMap::new();
        for model in &self.models {
            let bounds = match (model.min, model.max) {
                (Some(min), Some(max)) => Some(Aabb::new(min.into(), max.into())),
                (None, None) => None,
                _ => bail!("model '{}' needs both min and max bounds", model.name),
            };
            let handle = scene.register_model(&model.name, bounds);
            models.insert(model.name.clone(), handle);
        }
        Ok((scene, models))
    }

    pub fn replay(&self, settings: InteractionSettings) -> Result<ReplayOutcome> {
        let (mut scene, models) = self.build_scene(&settings)?;
        let mut controller = PlacementController::new(settings, &mut scene);
        if let Some(err) = controller.configuration_error() {
            bail!("placement is not configured: {err}");
        }

        let mut context = AppContext::new();
        let mut events = Vec::new();
        let mut saved_name = None;
        let mut time = 0.0;
        for (index, frame) in self.frames.iter().enumerate() {
            time += frame.dt;
            for action in &frame.actions {
                match action {
                    Action::OpenCatalog => context.catalog.open_panel(),
                    Action::CloseCatalog => context.catalog.close_panel(),
                    Action::ShowCategory { category } => {
                        context.catalog.show_category((*category).into())
                    }
                    Action::SelectModel { name } => {
                        let Some(model) = models.get(name) else {
                            bail!("frame {index}: unknown model '{name}'");
                        };
                        context.catalog.select_model(model.clone(), time);
                    }
                    Action::OpenSavePanel => context.open_save_panel(),
                    Action::CloseSavePanel => context.close_save_panel(),
                    Action::ConfirmSave { name } => {
                        if let Some(name) = context.confirm_save(name) {
                            saved_name = Some(name);
                        }
                    }
                }
            }

            let touch_frame = TouchFrame {
                time,
                delta_time: frame.dt,
                touches: frame.touches.iter().map(TouchRecord::to_touch).collect(),
            };
            if let Some(event) = controller.process_frame(&touch_frame, &context, &mut scene) {
                info!(frame = index, ?event, "gesture");
                events.push((index, event));
            }
            scene.advance_frame();
        }

        // Lets placements from the last frame finish grounding.
        controller.process_frame(&TouchFrame::new(time, 0.0), &context, &mut scene);
        if !controller.machine().pending().is_empty() {
            warn!(
                pending = controller.machine().pending().len(),
                "placements left ungrounded"
            );
        }

        Ok(ReplayOutcome {
            scene,
            events,
            saved_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jardin_scene::ObjectStore;

    const SESSION: &str = r#"{
        "surfaces": [{ "center": [5.0, 0.0, 5.0], "half_extent": [10.0, 10.0] }],
        "models": [{ "name": "Rosal", "min": [-0.5, 0.0, -0.5], "max": [0.5, 1.0, 0.5] }],
        "frames": [
            { "actions": [{ "action": "open_catalog" },
                          { "action": "show_category", "category": "vegetation" },
                          { "action": "select_model", "name": "Rosal" }] },
            { "dt": 0.6 },
            { "touches": [{ "position": [200.0, 300.0], "phase": "began" }] },
            { "touches": [{ "position": [200.0, 300.0], "phase": "ended" }] },
            { "actions": [{ "action": "open_save_panel" },
                          { "action": "confirm_save", "name": "Patio" }] }
        ]
    }"#;

    #[test]
    fn replay_places_the_selected_model() -> Result<()> {
        let session = Session::from_json_str(SESSION)?;
        let outcome = session.replay(InteractionSettings::default())?;

        assert_eq!(outcome.events.len(), 1);
        assert!(matches!(outcome.events[0].1, GestureEvent::PlaceNew { .. }));
        let placed = outcome.scene.placed_objects();
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].item_name, "Rosal");
        assert_eq!(outcome.saved_name.as_deref(), Some("Patio"));
        Ok(())
    }

    #[test]
    fn unknown_model_is_rejected() -> Result<()> {
        let session = Session::from_json_str(
            r#"{ "frames": [{ "actions": [{ "action": "select_model", "name": "Cactus" }] }] }"#,
        )?;
        assert!(session.replay(InteractionSettings::default()).is_err());
        Ok(())
    }

    #[test]
    fn half_specified_bounds_are_rejected() -> Result<()> {
        let session = Session::from_json_str(
            r#"{ "models": [{ "name": "Roca", "min": [0.0, 0.0, 0.0] }], "frames": [] }"#,
        )?;
        assert!(session.replay(InteractionSettings::default()).is_err());
        Ok(())
    }
}
