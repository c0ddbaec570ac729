use jardin_design::{
    BackendConfig, DesignCreateData, DesignUploader, Error, Result, SaveOutcome, UploadRequest,
    inventory_from_scene, submit_design,
};
use jardin_scene::{LayerMask, MemoryScene, OrthoCamera, Transform};

#[derive(Default)]
struct RecordingUploader {
    requests: Vec<UploadRequest>,
}

impl DesignUploader for RecordingUploader {
    fn save_design(&mut self, request: UploadRequest) -> SaveOutcome {
        self.requests.push(request);
        SaveOutcome::Saved {
            status: 201,
            body: "{}".to_string(),
        }
    }
}

fn garden() -> MemoryScene {
    let mut scene = MemoryScene::new(OrthoCamera::default());
    let rose = scene.register_model("Rosal", None);
    let bench = scene.register_model("Banco", None);
    for x in [0.0, 1.0, 2.0] {
        scene.insert_object(&rose, Transform::from_position([x, 0.0, 0.0].into()), LayerMask(1));
    }
    scene.insert_object(&bench, Transform::from_position([0.0, 0.0, 4.0].into()), LayerMask(1));
    scene
}

#[test]
fn submission_carries_inventory_and_screenshot() -> Result<()> {
    let scene = garden();
    let mut uploader = RecordingUploader::default();
    let config = BackendConfig::new("https://jardin.example/api", "secret");

    let outcome = submit_design(&mut uploader, &config, " Patio ", &scene, Some(vec![0x89, 0x50]))?;
    assert!(matches!(outcome, SaveOutcome::Saved { status: 201, .. }));

    let request = &uploader.requests[0];
    assert_eq!(request.url, "https://jardin.example/api/designs/");
    assert_eq!(request.header("authorization"), Some("Bearer secret"));
    assert_eq!(request.timeout.as_secs(), 60);

    let data = request.part("design_data").expect("design part");
    assert_eq!(data.content_type, "application/json");
    let payload: DesignCreateData = serde_json::from_slice(&data.body)?;
    assert_eq!(payload.name, "Patio");
    assert_eq!(payload.items, inventory_from_scene(&scene));
    assert_eq!(payload.total_quantity(), 4);

    let screenshot = request.part("screenshot_file").expect("screenshot part");
    assert_eq!(screenshot.file_name.as_deref(), Some("screenshot.png"));
    assert_eq!(screenshot.content_type, "image/png");
    Ok(())
}

#[test]
fn no_screenshot_means_single_part() -> Result<()> {
    let scene = garden();
    let mut uploader = RecordingUploader::default();
    let config = BackendConfig::new("https://jardin.example/api", "secret");
    submit_design(&mut uploader, &config, "Terraza", &scene, None)?;
    assert_eq!(uploader.requests[0].parts.len(), 1);
    Ok(())
}

#[test]
fn missing_backend_url_stops_before_upload() {
    let scene = garden();
    let mut uploader = RecordingUploader::default();
    let config = BackendConfig::new("", "secret");
    let result = submit_design(&mut uploader, &config, "Terraza", &scene, None);
    assert!(matches!(result, Err(Error::MissingConfiguration(_))));
    assert!(uploader.requests.is_empty());
}
