use jardin_base::{EntityId, InteractionSettings};
use jardin_geometry::{Point3, Vector3, surface_rotation};
use jardin_scene::{MaterialId, ModelHandle, ObjectRef, SceneBackend};
use tracing::{debug, info};

use crate::gesture::{GestureEvent, SelectionView, TapRecord};
use crate::grounding::{GroundingCorrector, GroundingOutcome};
use crate::surface::SurfaceQuery;
use crate::transform::TransformApplicator;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Selected,
    Dragging,
}

/// The highlighted object and the material to give back when it is released.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Selection {
    pub object: ObjectRef,
    /// `None` when the object has no render material; no highlight was applied.
    pub original_material: Option<MaterialId>,
}

/// A spawned object waiting for its geometry before it can be grounded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingPlacement {
    pub object: ObjectRef,
    pub requested_at: f64,
}

pub struct SelectionMachine {
    applicator: TransformApplicator,
    grounding: GroundingCorrector,
    cooldown_duration: f64,
    highlight: MaterialId,
    selection: Option<Selection>,
    dragging: bool,
    last_tap: Option<TapRecord>,
    cooldown: f64,
    pending: Vec<PendingPlacement>,
}

impl SelectionMachine {
    pub fn new(settings: &InteractionSettings, highlight: MaterialId) -> Self {
        Self {
            applicator: TransformApplicator::new(settings),
            grounding: GroundingCorrector::new(settings),
            cooldown_duration: settings.placement_cooldown,
            highlight,
            selection: None,
            dragging: false,
            last_tap: None,
            cooldown: 0.0,
            pending: Vec::new(),
        }
    }

    /// Takes new tuning without touching selection, tap memory or cooldown.
    pub fn retune(&mut self, settings: &InteractionSettings) {
        self.applicator = TransformApplicator::new(settings);
        self.grounding = GroundingCorrector::new(settings);
        self.cooldown_duration = settings.placement_cooldown;
    }

    pub fn state(&self) -> InteractionState {
        match (self.selection, self.dragging) {
            (None, _) => InteractionState::Idle,
            (Some(_), false) => InteractionState::Selected,
            (Some(_), true) => InteractionState::Dragging,
        }
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn selected(&self) -> Option<ObjectRef> {
        self.selection.map(|selection| selection.object)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn highlight(&self) -> MaterialId {
        self.highlight
    }

    pub fn cooldown_remaining(&self) -> f64 {
        self.cooldown
    }

    pub fn pending(&self) -> &[PendingPlacement] {
        &self.pending
    }

    pub fn view(&self) -> SelectionView {
        SelectionView {
            selected: self.selected(),
            dragging: self.dragging,
            cooldown_active: self.cooldown > 0.0,
            last_tap: self.last_tap,
        }
    }

    pub fn tick(&mut self, delta_time: f64) {
        if self.cooldown > 0.0 {
            self.cooldown = (self.cooldown - delta_time).max(0.0);
        }
    }

    pub fn cancel_drag(&mut self) {
        self.dragging = false;
    }

    /// Drops references to objects something else destroyed.
    pub fn forget_stale<B: SceneBackend + ?Sized>(&mut self, backend: &B) {
        if let Some(selection) = self.selection {
            if !backend.exists(selection.object.root) {
                debug!(root = %selection.object.root, "selected object vanished");
                self.selection = None;
                self.dragging = false;
            }
        }
        self.pending.retain(|pending| backend.exists(pending.object.root));
    }

    pub fn apply<B: SceneBackend + ?Sized>(
        &mut self,
        event: &GestureEvent,
        now: f64,
        surfaces: &SurfaceQuery,
        backend: &mut B,
    ) {
        match event {
            GestureEvent::SelectAndBeginDrag { object } => {
                self.select(*object, backend);
                self.dragging = true;
                self.last_tap = Some(TapRecord {
                    time: now,
                    root: object.root,
                });
            }
            GestureEvent::DoubleTapDelete { object } => self.delete(*object, backend),
            GestureEvent::DragTo { point, normal } => self.drag_to(*point, *normal, surfaces, backend),
            GestureEvent::EndDrag => self.dragging = false,
            GestureEvent::Deselect => self.deselect(backend),
            GestureEvent::PlaceNew {
                point,
                normal,
                model,
            } => {
                if self.selection.is_some() {
                    return;
                }
                self.begin_placement(model, *point, *normal, now, surfaces, backend);
            }
            GestureEvent::Rotate(gesture) => {
                self.dragging = false;
                let Some(selected) = self.selected() else {
                    return;
                };
                self.applicator
                    .apply_rotation(backend, selected.root, gesture);
            }
            GestureEvent::Scale(gesture) => {
                self.dragging = false;
                let Some(selected) = self.selected() else {
                    return;
                };
                if self
                    .applicator
                    .apply_scale(backend, selected.root, gesture)
                    .is_some()
                {
                    self.grounding.apply(backend, surfaces, selected.root);
                }
            }
        }
    }

    /// Spawns `model` on the surface and queues it for grounding once its
    /// geometry has registered.
    pub fn begin_placement<B: SceneBackend + ?Sized>(
        &mut self,
        model: &ModelHandle,
        point: Point3<f32>,
        normal: Vector3<f32>,
        now: f64,
        surfaces: &SurfaceQuery,
        backend: &mut B,
    ) -> PendingPlacement {
        let object = backend.instantiate(
            model,
            point,
            surface_rotation(normal),
            surfaces.layers().placeable,
        );
        backend.attach_anchor(object.root);
        info!(item = %model.item_name, root = %object.root, "placed");
        let pending = PendingPlacement {
            object,
            requested_at: now,
        };
        self.pending.push(pending);
        pending
    }

    /// Grounds a spawned object. Safe to call again on the same object.
    pub fn finalize_placement<B: SceneBackend + ?Sized>(
        &mut self,
        pending: PendingPlacement,
        surfaces: &SurfaceQuery,
        backend: &mut B,
    ) -> GroundingOutcome {
        self.pending
            .retain(|queued| queued.object.root != pending.object.root);
        self.grounding.apply(backend, surfaces, pending.object.root)
    }

    /// Finalizes every queued placement whose geometry is ready.
    pub fn finalize_ready<B: SceneBackend + ?Sized>(
        &mut self,
        surfaces: &SurfaceQuery,
        backend: &mut B,
    ) -> Vec<(EntityId, GroundingOutcome)> {
        let ready: Vec<PendingPlacement> = self
            .pending
            .iter()
            .copied()
            .filter(|pending| backend.geometry_ready(pending.object.root))
            .collect();
        ready
            .into_iter()
            .map(|pending| {
                let outcome = self.finalize_placement(pending, surfaces, backend);
                (pending.object.root, outcome)
            })
            .collect()
    }

    fn drag_to<B: SceneBackend + ?Sized>(
        &mut self,
        point: Point3<f32>,
        normal: Vector3<f32>,
        surfaces: &SurfaceQuery,
        backend: &mut B,
    ) {
        if !self.dragging {
            return;
        }
        let Some(selected) = self.selected() else {
            return;
        };
        let Some(mut transform) = backend.transform(selected.root) else {
            return;
        };
        transform.position = point;
        transform.rotation = surface_rotation(normal);
        backend.set_transform(selected.root, transform);
        self.grounding.apply(backend, surfaces, selected.root);
    }

    fn select<B: SceneBackend + ?Sized>(&mut self, object: ObjectRef, backend: &mut B) {
        if let Some(current) = self.selection {
            if current.object.root == object.root {
                return;
            }
            self.deselect(backend);
        }
        let original_material = backend.material(object);
        if original_material.is_some() {
            backend.set_material(object, self.highlight);
        }
        debug!(root = %object.root, "selected");
        self.selection = Some(Selection {
            object,
            original_material,
        });
    }

    fn deselect<B: SceneBackend + ?Sized>(&mut self, backend: &mut B) {
        self.dragging = false;
        let Some(selection) = self.selection.take() else {
            return;
        };
        if let Some(material) = selection.original_material {
            if backend.exists(selection.object.root) {
                backend.set_material(selection.object, material);
            }
        }
        debug!(root = %selection.object.root, "deselected");
    }

    fn delete<B: SceneBackend + ?Sized>(&mut self, object: ObjectRef, backend: &mut B) {
        self.deselect(backend);
        backend.destroy(object.root);
        self.pending
            .retain(|pending| pending.object.root != object.root);
        self.cooldown = self.cooldown_duration;
        self.last_tap = None;
        info!(root = %object.root, "deleted");
    }
}
