use crate::config::ConfigError;
use crate::stations::error::StoreError;
use crate::transfer::error::TransferError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FuelMapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Transfer(#[from] TransferError),
}
