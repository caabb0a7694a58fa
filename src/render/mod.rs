pub mod bitmap;
pub mod rasterizer;
