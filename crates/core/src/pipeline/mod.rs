pub mod annotator;
pub mod frame_processor;
pub mod key_command;
pub mod mask_image_use_case;
