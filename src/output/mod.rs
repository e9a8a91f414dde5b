mod format;
mod json;
mod table;

pub(crate) use json::output_tracking_json;
pub(crate) use table::print_tracking_table;
