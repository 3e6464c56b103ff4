//! Maps UI service errors to geoloc_core::AppError so the page shows one
//! consistent set of messages.

mod location;
mod search;
