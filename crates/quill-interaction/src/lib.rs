pub mod gemini_stream;
pub mod sse;

pub use gemini_stream::GeminiStreamChannel;
