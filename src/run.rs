mod cli;

pub(crate) use cli::{as_cli, print_month_summary};
