pub mod error;
pub mod fake;
pub mod gateway;
pub mod image;
pub mod object_store;
pub mod s3;

#[cfg(test)]
mod tests;

pub use error::StorageError;
pub use fake::FakeObjectStore;
pub use gateway::{StorageGateway, UploadFile, UploadedImage, MAX_UPLOAD_BYTES};
pub use image::{preprocess, PreprocessOptions, ProcessedImage, DEFAULT_MAX_WIDTH};
pub use object_store::ObjectStore;
pub use s3::S3ObjectStore;
