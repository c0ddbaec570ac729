use jardin_base::InteractionSettings;
use jardin_geometry::{Point2, Point3, Ray, Vector3};
use jardin_scene::{Hit, LayerMask, Raycaster};

use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceLayers {
    pub placeable: LayerMask,
    pub environment: LayerMask,
}

impl SurfaceLayers {
    pub fn resolve<R: Raycaster + ?Sized>(
        raycaster: &R,
        settings: &InteractionSettings,
    ) -> Result<Self> {
        Ok(Self {
            placeable: resolve_layer(raycaster, &settings.placeable_layer)?,
            environment: resolve_layer(raycaster, &settings.environment_layer)?,
        })
    }
}

fn resolve_layer<R: Raycaster + ?Sized>(raycaster: &R, name: &str) -> Result<LayerMask> {
    raycaster
        .resolve_layer(name)
        .ok_or_else(|| Error::MissingConfiguration(format!("surface layer '{name}' is not defined")))
}

/// The two raycasts the core needs: placed objects and real-world surfaces.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceQuery {
    layers: SurfaceLayers,
}

impl SurfaceQuery {
    pub fn new(layers: SurfaceLayers) -> Self {
        Self { layers }
    }

    pub fn layers(&self) -> SurfaceLayers {
        self.layers
    }

    pub fn raycast_placeable<R: Raycaster + ?Sized>(
        &self,
        raycaster: &R,
        screen: Point2<f32>,
    ) -> Option<Hit> {
        let ray = raycaster.screen_ray(screen);
        raycaster.raycast(&ray, f32::INFINITY, self.layers.placeable)
    }

    pub fn raycast_environment<R: Raycaster + ?Sized>(
        &self,
        raycaster: &R,
        screen: Point2<f32>,
    ) -> Option<Hit> {
        let ray = raycaster.screen_ray(screen);
        raycaster.raycast(&ray, f32::INFINITY, self.layers.environment)
    }

    /// World-space probe against environment surfaces only.
    pub fn probe_environment<R: Raycaster + ?Sized>(
        &self,
        raycaster: &R,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<Hit> {
        let ray = Ray::new(origin, direction);
        raycaster.raycast(&ray, max_distance, self.layers.environment)
    }
}
