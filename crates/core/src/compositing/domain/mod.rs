pub mod frame_compositor;
pub mod occlusion_image;
pub mod privacy_effect;
