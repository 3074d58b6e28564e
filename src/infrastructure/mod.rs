pub mod js_executor;
pub mod speaker_page;

pub use js_executor::JsExecutor;
pub use speaker_page::{ModalProbe, SpeakerPage};
