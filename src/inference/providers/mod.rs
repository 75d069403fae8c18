pub mod gemini;
pub mod remote;

pub use gemini::GeminiProvider;
pub use remote::RemoteSearchProvider;
