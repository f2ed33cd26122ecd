//! Rendering
//!
//! `scene` turns a frame snapshot into primitive draw commands; the WebGPU
//! pipeline renders them with SDFs in the fragment shader.

pub mod scene;
pub mod sdf_pipeline;

pub use scene::{DrawCommand, DrawList, RenderSurface, Rgba, draw_frame};
pub use sdf_pipeline::SdfRenderState;
