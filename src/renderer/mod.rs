//! WebGPU rendering module
//!
//! The retained `Scene` is plain data and GPU-free; the pipeline tessellates
//! it into one vertex buffer per frame and draws with a single camera
//! uniform.

pub mod camera;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use camera::Camera;
pub use pipeline::RenderState;
pub use scene::{BoxInstance, Scene, VisualId};
pub use shapes::scene_vertices;
pub use vertex::Vertex;
