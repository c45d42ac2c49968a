mod util;

pub(crate) use util::{format_amount, format_signed, truncate};

#[cfg(test)]
mod util_tests;
