pub mod document;
pub mod upload;

pub use document::Document;
pub use upload::{CloudUploadResult, UploadFile};
