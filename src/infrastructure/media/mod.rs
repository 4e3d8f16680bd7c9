pub mod attachment_encoder;
pub mod image_processor;

pub use attachment_encoder::AttachmentEncoder;
pub use image_processor::AttachmentProcessor;
