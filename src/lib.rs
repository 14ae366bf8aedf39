//! Stochastic path tracer for animated sphere scenes.
//!
//! A scene is a camera plus a list of sphere surfaces whose parameters
//! (and the camera's own) can vary over frame time. [`renderer::Renderer`]
//! turns the scene state at a given frame time into a row-major grid of
//! gamma-corrected pixel colors, ready for quantization by an image encoder.

pub mod animation;
pub mod camera;
pub mod color;
pub mod ray;
pub mod renderer;
pub mod scene;
pub mod world;

pub use ray::Ray;
