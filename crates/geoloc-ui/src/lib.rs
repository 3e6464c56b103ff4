pub mod bridge;
pub mod error_mapping;
pub mod format;
pub mod models;
pub mod page;
pub mod services;

#[cfg(test)]
mod test_support;

pub use bridge::{initialize_services, Services};
pub use page::{InfoCard, PageController, PageState, SearchControl};

// Re-export cxx-qt generated types
pub use models::background_model::qobject::BackgroundModel;
pub use models::map_model::qobject::MapModel;
pub use models::page_model::qobject::PageModel;
pub use models::search_model::qobject::SearchModel;
