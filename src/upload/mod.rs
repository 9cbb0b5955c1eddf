pub mod classify;
pub mod orchestrator;
mod progress;

pub use classify::{classify, partition, UploadFile};
pub use orchestrator::{BatchOutcome, SpeakerPhoto, UploadFailure, Uploader};
