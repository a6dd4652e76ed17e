mod catalog;
mod command;
mod err;
mod executor;
mod helper;
mod shutdown;

pub mod arg;
pub mod server;

pub use arg::Arg;
pub use err::MarketErr;

type Result<T> = std::result::Result<T, MarketErr>;
