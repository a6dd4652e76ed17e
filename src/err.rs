use std::fmt::Display;

#[derive(Debug, PartialEq, Clone)]
pub enum MarketErr {
    /// Item name was empty or whitespace-only at add time.
    InvalidItemName,
    /// Listing price was zero or negative at add time.
    InvalidPrice,
    IOError(String),
}

impl std::error::Error for MarketErr {}

impl Display for MarketErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketErr::InvalidItemName => write!(f, "Item name cannot be empty."),
            MarketErr::InvalidPrice => write!(f, "Price must be greater than 0."),
            MarketErr::IOError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl From<std::io::Error> for MarketErr {
    fn from(err: std::io::Error) -> Self {
        MarketErr::IOError(err.to_string())
    }
}

impl From<MarketErr> for String {
    fn from(err: MarketErr) -> Self {
        err.to_string()
    }
}
