pub mod modal_capture;
pub mod record_builder;
pub mod social_handle;

pub use modal_capture::{CaptureTimeouts, ModalCaptureDriver, RetryPolicy};
pub use record_builder::{build_record, clean_text};
pub use social_handle::{normalize_handle, Platform, SocialHandle};
