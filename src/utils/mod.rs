pub(crate) mod date;
pub(crate) mod link;
pub(crate) mod timezone;

pub(crate) use date::format_display_date;
pub(crate) use link::share_url;
pub(crate) use timezone::Timezone;
