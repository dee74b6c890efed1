use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConversionError {
    #[error("Invalid quantity: {0} (must be finite and non-negative)")]
    InvalidQuantity(f64),

    #[error("Quantity {0} is too large to break down into US units")]
    TooLarge(f64),
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum RatingError {
    #[error("Rating {0} is out of range (expected 0 to 5)")]
    OutOfRange(f64),
}

#[derive(Error, Debug)]
pub enum SpoonacularError {
    #[error("Spoonacular is not configured: {0}")]
    NotConfigured(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Spoonacular returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse Spoonacular response: {0}")]
    ParseError(String),
}
