mod month;
mod summary;
mod transaction;

pub use month::MonthLabel;
pub use summary::Summary;
pub use transaction::{format_timestamp, now_local, parse_timestamp, Transaction};

#[cfg(test)]
mod tests;
