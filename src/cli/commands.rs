//! CLI subcommand definitions

use clap::Subcommand;

use super::args::{ServeArgs, TrackArgs};

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Look up an order and show its fulfillment timeline
    Track(TrackArgs),
    /// Run the proxy service that holds the WMS credentials
    Serve(ServeArgs),
    /// Show or clear the cached WMS session
    Session {
        /// Delete the cached session
        #[arg(long)]
        clear: bool,
    },
}
