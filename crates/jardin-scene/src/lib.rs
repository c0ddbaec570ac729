//! Seam between the placement core and the engine that owns scene objects.
//!
//! The core never holds scene objects. It addresses them through
//! [`ObjectRef`] handles and asks a [`SceneBackend`] to raycast, move,
//! re-material, spawn and destroy them. [`MemoryScene`] is a complete
//! in-memory backend used for headless replays and tests.

use jardin_base::EntityId;
use jardin_geometry::{Aabb, One, Point2, Point3, Quaternion, Ray, Vector3};

mod memory;

pub use memory::{Error, MemoryScene, OrthoCamera, Result, Surface};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: Self = Self(0);

    pub fn from_index(index: u32) -> Self {
        Self(1 << index)
    }

    pub fn contains(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl std::ops::BitOr for LayerMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);

/// A placed item as the engine models it: the logical root that carries the
/// transform and the render node that carries the material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub root: EntityId,
    pub visual: EntityId,
}

impl ObjectRef {
    pub fn new(root: EntityId, visual: EntityId) -> Self {
        Self { root, visual }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub point: Point3<f32>,
    pub normal: Vector3<f32>,
    pub object: ObjectRef,
    pub distance: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Point3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn from_position(position: Point3<f32>) -> Self {
        Self {
            position,
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

/// A placeable model offered by the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelHandle {
    pub item_name: String,
    pub prefab: EntityId,
}

impl ModelHandle {
    pub fn new(item_name: impl Into<String>, prefab: EntityId) -> Self {
        Self {
            item_name: item_name.into(),
            prefab,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedObject {
    pub object: ObjectRef,
    pub item_name: String,
}

pub trait Raycaster {
    fn resolve_layer(&self, name: &str) -> Option<LayerMask>;

    fn screen_ray(&self, screen: Point2<f32>) -> Ray;

    /// Closest hit on any surface in `mask` within `max_distance`.
    fn raycast(&self, ray: &Ray, max_distance: f32, mask: LayerMask) -> Option<Hit>;
}

pub trait ObjectStore {
    fn exists(&self, root: EntityId) -> bool;

    fn transform(&self, root: EntityId) -> Option<Transform>;

    fn set_transform(&mut self, root: EntityId, transform: Transform);

    /// World bounds of every render node under `root`, or `None` when the
    /// object has no renderable geometry.
    fn visual_bounds(&self, root: EntityId) -> Option<Aabb>;

    /// False while a freshly spawned object has not registered its geometry.
    fn geometry_ready(&self, root: EntityId) -> bool;

    fn material(&self, object: ObjectRef) -> Option<MaterialId>;

    fn set_material(&mut self, object: ObjectRef, material: MaterialId);

    fn create_material(&mut self, color: [f32; 4]) -> MaterialId;

    fn instantiate(
        &mut self,
        model: &ModelHandle,
        position: Point3<f32>,
        rotation: Quaternion<f32>,
        layer: LayerMask,
    ) -> ObjectRef;

    /// Pins an object to the tracked real-world surface.
    fn attach_anchor(&mut self, root: EntityId);

    fn destroy(&mut self, root: EntityId);

    fn placed_objects(&self) -> Vec<PlacedObject>;
}

pub trait SceneBackend: Raycaster + ObjectStore {}

impl<T: Raycaster + ObjectStore> SceneBackend for T {}
