//! Admin catalog error types.

use thiserror::Error;

use crate::store::StoreError;

/// Rejections of a submitted product form.
///
/// The display strings are shown to the admin as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProductFormError {
    /// Price or stock is not a number.
    #[error("Price/stock must be numeric.")]
    NotNumeric,

    /// Name is blank.
    #[error("Name is required.")]
    NameRequired,

    /// Price or stock is negative.
    #[error("Price and stock must be >= 0.")]
    Negative,

    /// Price is above `Price::MAX`.
    #[error("Price must be at most 1000000000.")]
    PriceTooLarge,
}

/// Errors that can occur while saving a product.
#[derive(Debug, Error)]
pub enum UpsertError {
    /// The form failed validation; nothing was written.
    #[error(transparent)]
    Invalid(#[from] ProductFormError),

    /// Data file operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
