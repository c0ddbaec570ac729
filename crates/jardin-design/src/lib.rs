//! Saved garden designs: the item inventory of a scene and the request that
//! submits it to the design backend.

use thiserror::Error;

mod payload;
mod upload;

pub use payload::{
    DesignCreateData, DesignItem, DesignSubmission, inventory_from_names, inventory_from_scene,
};
pub use upload::{
    BackendConfig, DesignUploader, FormPart, REQUEST_TIMEOUT, SaveOutcome, UploadRequest,
    submit_design,
};

#[derive(Error, Debug)]
pub enum Error {
    #[error("missing configuration: {0}")]
    MissingConfiguration(String),
    #[error("design name must not be empty")]
    EmptyName,
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
