//! gqcnn-depth library
//!
//! Renders a triangle mesh from a virtual pinhole camera into the training
//! inputs GQ-CNN style grasp planners consume: a raw depth array, a quantized
//! depth image, a segmentation mask and the camera intrinsics.

pub mod artifacts;
pub mod camera;
pub mod config;
pub mod error;
pub mod formats;
pub mod mesh;
pub mod paths;
pub mod pipeline;
pub mod render;

pub use camera::PinholeCamera;
pub use config::RenderConfig;
pub use error::{DepthError, Result};
pub use mesh::TriangleMesh;
pub use pipeline::{Overrides, run};
pub use render::{DepthBuffer, render_depth};
