use std::collections::{BTreeMap, HashMap};

use jardin_base::EntityId;
use jardin_geometry::{
    Aabb, Point2, Point3, Quaternion, Ray, Vector3, ray_intersect_triangle, triangle_normal,
};
use thiserror::Error;
use tracing::debug;

use crate::{
    Hit, LayerMask, MaterialId, ModelHandle, ObjectRef, ObjectStore, PlacedObject, Raycaster,
    Transform,
};

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown layer: {0}")]
    UnknownLayer(String),
    #[error("too many layers (max 32)")]
    LayerLimit,
}

pub type Result<T> = std::result::Result<T, Error>;

/// Top-down orthographic camera. Screen pixels map onto the XZ plane.
#[derive(Clone, Copy, Debug)]
pub struct OrthoCamera {
    pub pixels_per_unit: f32,
    pub height: f32,
}

impl Default for OrthoCamera {
    fn default() -> Self {
        Self {
            pixels_per_unit: 100.0,
            height: 50.0,
        }
    }
}

impl OrthoCamera {
    pub fn ray(&self, screen: Point2<f32>) -> Ray {
        let origin = Point3::new(
            screen.x / self.pixels_per_unit,
            self.height,
            screen.y / self.pixels_per_unit,
        );
        Ray::new(origin, Vector3::new(0.0, -1.0, 0.0))
    }

    pub fn world_to_screen(&self, point: Point3<f32>) -> Point2<f32> {
        Point2::new(point.x * self.pixels_per_unit, point.z * self.pixels_per_unit)
    }
}

/// A detected real-world surface as a triangle soup.
#[derive(Clone, Debug)]
pub struct Surface {
    pub id: EntityId,
    pub layer: LayerMask,
    triangles: Vec<[Point3<f32>; 3]>,
}

impl Surface {
    pub fn from_triangles(layer: LayerMask, triangles: Vec<[Point3<f32>; 3]>) -> Self {
        Self {
            id: EntityId::new(),
            layer,
            triangles,
        }
    }

    /// Horizontal rectangle centered on `center`.
    pub fn quad(layer: LayerMask, center: Point3<f32>, half_x: f32, half_z: f32) -> Self {
        let a = Point3::new(center.x - half_x, center.y, center.z - half_z);
        let b = Point3::new(center.x + half_x, center.y, center.z - half_z);
        let c = Point3::new(center.x + half_x, center.y, center.z + half_z);
        let d = Point3::new(center.x - half_x, center.y, center.z + half_z);
        Self::from_triangles(layer, vec![[a, b, c], [a, c, d]])
    }

    pub fn triangles(&self) -> &[[Point3<f32>; 3]] {
        &self.triangles
    }

    fn intersect(&self, ray: &Ray) -> Option<(f32, Vector3<f32>)> {
        self.triangles
            .iter()
            .filter_map(|&[a, b, c]| {
                ray_intersect_triangle(ray, a, b, c)
                    .map(|t| (t, triangle_normal(a, b, c, ray.direction)))
            })
            .min_by(|x, y| x.0.total_cmp(&y.0))
    }
}

#[derive(Clone, Debug)]
struct Prefab {
    item_name: String,
    local_bounds: Option<Aabb>,
    material: MaterialId,
}

#[derive(Clone, Debug)]
struct SceneObject {
    object: ObjectRef,
    item_name: String,
    transform: Transform,
    local_bounds: Option<Aabb>,
    material: Option<MaterialId>,
    layer: LayerMask,
    anchored: bool,
    spawned_frame: Option<u64>,
}

#[derive(Debug, Default)]
pub struct MemoryScene {
    camera: OrthoCamera,
    layers: Vec<String>,
    prefabs: HashMap<EntityId, Prefab>,
    objects: BTreeMap<EntityId, SceneObject>,
    surfaces: Vec<Surface>,
    materials: Vec<[f32; 4]>,
    frame: u64,
}

impl MemoryScene {
    pub fn new(camera: OrthoCamera) -> Self {
        Self {
            camera,
            ..Self::default()
        }
    }

    pub fn camera(&self) -> OrthoCamera {
        self.camera
    }

    pub fn add_layer(&mut self, name: &str) -> Result<LayerMask> {
        if let Some(mask) = self.resolve_layer(name) {
            return Ok(mask);
        }
        if self.layers.len() >= 32 {
            return Err(Error::LayerLimit);
        }
        self.layers.push(name.to_string());
        Ok(LayerMask::from_index(self.layers.len() as u32 - 1))
    }

    pub fn layer(&self, name: &str) -> Result<LayerMask> {
        self.resolve_layer(name)
            .ok_or_else(|| Error::UnknownLayer(name.to_string()))
    }

    pub fn register_model(&mut self, item_name: &str, local_bounds: Option<Aabb>) -> ModelHandle {
        let material = self.create_material([0.8, 0.8, 0.8, 1.0]);
        let prefab = EntityId::new();
        self.prefabs.insert(
            prefab,
            Prefab {
                item_name: item_name.to_string(),
                local_bounds,
                material,
            },
        );
        ModelHandle::new(item_name, prefab)
    }

    pub fn add_surface(&mut self, surface: Surface) -> EntityId {
        let id = surface.id;
        self.surfaces.push(surface);
        id
    }

    /// Adds an object whose geometry is registered immediately.
    pub fn insert_object(
        &mut self,
        model: &ModelHandle,
        transform: Transform,
        layer: LayerMask,
    ) -> ObjectRef {
        let object = self.spawn(model, transform, layer);
        if let Some(entry) = self.objects.get_mut(&object.root) {
            entry.spawned_frame = None;
        }
        object
    }

    pub fn advance_frame(&mut self) {
        self.frame += 1;
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn is_anchored(&self, root: EntityId) -> bool {
        self.objects.get(&root).is_some_and(|entry| entry.anchored)
    }

    pub fn material_color(&self, material: MaterialId) -> Option<[f32; 4]> {
        self.materials.get(material.0 as usize).copied()
    }

    fn spawn(&mut self, model: &ModelHandle, transform: Transform, layer: LayerMask) -> ObjectRef {
        let prefab = self.prefabs.get(&model.prefab).cloned();
        let object = ObjectRef::new(EntityId::new(), EntityId::new());
        let (item_name, local_bounds, material) = match prefab {
            Some(prefab) => (prefab.item_name, prefab.local_bounds, Some(prefab.material)),
            None => (model.item_name.clone(), None, None),
        };
        self.objects.insert(
            object.root,
            SceneObject {
                object,
                item_name,
                transform,
                local_bounds,
                material,
                layer,
                anchored: false,
                spawned_frame: Some(self.frame),
            },
        );
        object
    }
}

impl Raycaster for MemoryScene {
    fn resolve_layer(&self, name: &str) -> Option<LayerMask> {
        self.layers
            .iter()
            .position(|layer| layer == name)
            .map(|index| LayerMask::from_index(index as u32))
    }

    fn screen_ray(&self, screen: Point2<f32>) -> Ray {
        self.camera.ray(screen)
    }

    fn raycast(&self, ray: &Ray, max_distance: f32, mask: LayerMask) -> Option<Hit> {
        let mut best: Option<Hit> = None;
        let mut consider = |hit: Hit| {
            if hit.distance > max_distance {
                return;
            }
            match best {
                Some(current) if current.distance <= hit.distance => {}
                _ => best = Some(hit),
            }
        };

        for surface in self.surfaces.iter().filter(|s| s.layer.contains(mask)) {
            if let Some((distance, normal)) = surface.intersect(ray) {
                consider(Hit {
                    point: ray.point_at(distance),
                    normal,
                    object: ObjectRef::new(surface.id, surface.id),
                    distance,
                });
            }
        }

        for entry in self.objects.values().filter(|o| o.layer.contains(mask)) {
            let Some(bounds) = self.visual_bounds(entry.object.root) else {
                continue;
            };
            if let Some(distance) = bounds.intersect_ray(ray) {
                let point = ray.point_at(distance);
                consider(Hit {
                    point,
                    normal: bounds.face_normal(point),
                    object: entry.object,
                    distance,
                });
            }
        }

        best
    }
}

impl ObjectStore for MemoryScene {
    fn exists(&self, root: EntityId) -> bool {
        self.objects.contains_key(&root)
    }

    fn transform(&self, root: EntityId) -> Option<Transform> {
        self.objects.get(&root).map(|entry| entry.transform)
    }

    fn set_transform(&mut self, root: EntityId, transform: Transform) {
        if let Some(entry) = self.objects.get_mut(&root) {
            entry.transform = transform;
        }
    }

    fn visual_bounds(&self, root: EntityId) -> Option<Aabb> {
        if !self.geometry_ready(root) {
            return None;
        }
        let entry = self.objects.get(&root)?;
        let local = entry.local_bounds?;
        let t = entry.transform;
        Some(local.transformed(t.position, t.rotation, t.scale))
    }

    fn geometry_ready(&self, root: EntityId) -> bool {
        match self.objects.get(&root) {
            Some(entry) => entry
                .spawned_frame
                .is_none_or(|spawned| self.frame > spawned),
            None => false,
        }
    }

    fn material(&self, object: ObjectRef) -> Option<MaterialId> {
        self.objects
            .get(&object.root)
            .filter(|entry| entry.object.visual == object.visual)
            .and_then(|entry| entry.material)
    }

    fn set_material(&mut self, object: ObjectRef, material: MaterialId) {
        if let Some(entry) = self.objects.get_mut(&object.root) {
            if entry.object.visual == object.visual {
                entry.material = Some(material);
            }
        }
    }

    fn create_material(&mut self, color: [f32; 4]) -> MaterialId {
        self.materials.push(color);
        MaterialId(self.materials.len() as u32 - 1)
    }

    fn instantiate(
        &mut self,
        model: &ModelHandle,
        position: Point3<f32>,
        rotation: Quaternion<f32>,
        layer: LayerMask,
    ) -> ObjectRef {
        let mut transform = Transform::from_position(position);
        transform.rotation = rotation;
        let object = self.spawn(model, transform, layer);
        debug!(item = %model.item_name, root = %object.root, frame = self.frame, "instantiated");
        object
    }

    fn attach_anchor(&mut self, root: EntityId) {
        if let Some(entry) = self.objects.get_mut(&root) {
            entry.anchored = true;
        }
    }

    fn destroy(&mut self, root: EntityId) {
        if let Some(entry) = self.objects.remove(&root) {
            debug!(item = %entry.item_name, %root, "destroyed");
        }
    }

    fn placed_objects(&self) -> Vec<PlacedObject> {
        self.objects
            .values()
            .map(|entry| PlacedObject {
                object: entry.object,
                item_name: entry.item_name.clone(),
            })
            .collect()
    }
}
