use jardin_geometry::{Aabb, Point2, Point3, Vector3};
use jardin_scene::{
    MemoryScene, ObjectStore, OrthoCamera, Raycaster, Result, Surface, Transform,
};

fn scene() -> Result<MemoryScene> {
    let mut scene = MemoryScene::new(OrthoCamera::default());
    scene.add_layer("Placeable")?;
    let ground = scene.add_layer("Environment")?;
    scene.add_surface(Surface::quad(ground, Point3::new(0.0, 0.0, 0.0), 10.0, 10.0));
    Ok(scene)
}

fn cube() -> Option<Aabb> {
    Some(Aabb::from_center_half_extents(
        Point3::new(0.0, 0.5, 0.0),
        Vector3::new(0.5, 0.5, 0.5),
    ))
}

#[test]
fn screen_ray_hits_ground_under_the_pixel() -> Result<()> {
    let scene = scene()?;
    let ground = scene.layer("Environment")?;
    let ray = scene.screen_ray(Point2::new(150.0, 250.0));
    let hit = scene.raycast(&ray, f32::INFINITY, ground).expect("ground hit");
    assert!((hit.point.x - 1.5).abs() < 1.0e-5);
    assert!((hit.point.z - 2.5).abs() < 1.0e-5);
    assert_eq!(hit.normal, Vector3::new(0.0, 1.0, 0.0));
    Ok(())
}

#[test]
fn objects_are_hit_only_on_their_layer() -> Result<()> {
    let mut scene = scene()?;
    let placeable = scene.layer("Placeable")?;
    let ground = scene.layer("Environment")?;
    let model = scene.register_model("Olivo", cube());
    let placed = scene.insert_object(
        &model,
        Transform::from_position(Point3::new(1.0, 0.0, 1.0)),
        placeable,
    );

    let ray = scene.screen_ray(Point2::new(100.0, 100.0));
    let hit = scene.raycast(&ray, f32::INFINITY, placeable).expect("object hit");
    assert_eq!(hit.object, placed);
    assert!((hit.point.y - 1.0).abs() < 1.0e-5);

    let hit = scene.raycast(&ray, f32::INFINITY, ground).expect("ground hit");
    assert_ne!(hit.object, placed);
    Ok(())
}

#[test]
fn spawned_geometry_registers_next_frame() -> Result<()> {
    let mut scene = scene()?;
    let placeable = scene.layer("Placeable")?;
    let model = scene.register_model("Rosal", cube());
    let object = scene.instantiate(
        &model,
        Point3::new(0.0, 0.0, 0.0),
        jardin_geometry::surface_rotation(Vector3::unit_y()),
        placeable,
    );

    assert!(scene.exists(object.root));
    assert!(!scene.geometry_ready(object.root));
    assert!(scene.visual_bounds(object.root).is_none());

    scene.advance_frame();
    assert!(scene.geometry_ready(object.root));
    assert!(scene.visual_bounds(object.root).is_some());
    Ok(())
}

#[test]
fn material_swap_requires_matching_visual() -> Result<()> {
    let mut scene = scene()?;
    let placeable = scene.layer("Placeable")?;
    let model = scene.register_model("Maceta", cube());
    let object = scene.insert_object(&model, Transform::from_position(Point3::new(0.0, 0.0, 0.0)), placeable);
    let original = scene.material(object).expect("prefab material");
    let highlight = scene.create_material([1.0, 1.0, 0.0, 1.0]);

    let wrong = jardin_scene::ObjectRef::new(object.root, object.root);
    scene.set_material(wrong, highlight);
    assert_eq!(scene.material(object), Some(original));

    scene.set_material(object, highlight);
    assert_eq!(scene.material(object), Some(highlight));
    assert_eq!(scene.material_color(highlight), Some([1.0, 1.0, 0.0, 1.0]));
    Ok(())
}

#[test]
fn destroyed_objects_leave_inventory() -> Result<()> {
    let mut scene = scene()?;
    let placeable = scene.layer("Placeable")?;
    let model = scene.register_model("Banco", cube());
    let a = scene.insert_object(&model, Transform::from_position(Point3::new(0.0, 0.0, 0.0)), placeable);
    scene.insert_object(&model, Transform::from_position(Point3::new(3.0, 0.0, 0.0)), placeable);
    scene.attach_anchor(a.root);
    assert!(scene.is_anchored(a.root));

    scene.destroy(a.root);
    assert!(!scene.exists(a.root));
    assert_eq!(scene.placed_objects().len(), 1);
    assert_eq!(scene.placed_objects()[0].item_name, "Banco");
    Ok(())
}

#[test]
fn unknown_layer_is_an_error() {
    let scene = MemoryScene::new(OrthoCamera::default());
    assert!(scene.layer("Nope").is_err());
}
