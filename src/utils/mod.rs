mod perf;
mod time_utils;

pub use time_utils::{TimeUtils, format_local, format_price};
