pub mod fixed;
pub mod vec2;
pub mod vec3;
