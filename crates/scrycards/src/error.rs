use scrycards_core::catalog::CatalogError;
use scrycards_core::version::BackendError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
