pub mod cpu_privacy_compositor;
mod gaussian;
mod resample;
