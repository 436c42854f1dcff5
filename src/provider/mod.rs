//! Image provider module - trait and HTTP client for the external model API

pub mod openai;
pub mod traits;

pub use openai::OpenAiProvider;
pub use traits::ImageProvider;
