//! Commerce error types.

use thiserror::Error;

/// Errors that can occur while building carts and comparing store prices.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommerceError {
    /// No product matched the query, neither exactly nor as a substring.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Two catalog products share an id.
    #[error("Duplicate product id in catalog: {0}")]
    DuplicateProduct(u64),

    /// A price references a product the catalog does not know.
    #[error("Price for unknown product {product_id} at chain {chain}")]
    UnknownProduct { chain: String, product_id: u64 },

    /// A catalog price is negative, not a number, or too large to hold in cents.
    #[error("Invalid price {price} for product {product_id} at chain {chain}")]
    InvalidPrice {
        chain: String,
        product_id: u64,
        price: f64,
    },

    /// A chain key appears twice in the price table.
    #[error("Duplicate chain in price table: {0}")]
    DuplicateChain(String),

    /// The price table has no chains to assign stores to.
    #[error("Price table has no chains")]
    NoChains,

    /// Chain is not part of the price table.
    #[error("Unknown chain: {0}")]
    UnknownChain(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}

/// Failure reported by an external lookup (store locator or route planner).
///
/// These never abort a comparison: the session substitutes fallback stores or
/// marks a distance as unavailable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The service could not be reached or answered with an error.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// The service answered but had nothing for the request (e.g. no route).
    #[error("Nothing found: {0}")]
    NotFound(String),

    /// The lookup did not finish in time.
    #[error("Lookup timed out: {0}")]
    Timeout(String),

    /// The response could not be understood.
    #[error("Malformed response: {0}")]
    Malformed(String),
}
