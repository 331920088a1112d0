// Sampler module - decoded drum samples and the instrument -> buffer mapping

pub mod bank;
pub mod loader;

pub use bank::{LoadFailure, SampleBank, SampleProvider, DEFAULT_KIT};
pub use loader::{load_sample, SampleBuffer, SampleError};
