pub mod app;
pub mod camera;
pub mod error;
pub mod geometry;
pub mod light;
pub mod mesh;
pub mod model;
pub mod renderer;
pub mod scene;
pub mod shader;
pub mod texture;
pub mod transform;
