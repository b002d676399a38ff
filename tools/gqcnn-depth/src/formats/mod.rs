//! On-disk formats written alongside the rendered images
//!
//! - [`npy`] - raw depth tensor as a NumPy `.npy` file
//! - [`intr`] - GQ-CNN camera intrinsics record

pub mod intr;
pub mod npy;

pub use intr::IntrinsicsRecord;
pub use npy::{read_npy_f32, write_npy_f32};
