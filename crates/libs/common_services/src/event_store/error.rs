use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("Invalid storage path: {0}")]
    Path(#[from] object_store::path::Error),
}
