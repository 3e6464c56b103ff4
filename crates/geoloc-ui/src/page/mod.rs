//! Toolkit-independent page state. The QObjects in `models` wrap these.

pub mod background;
pub mod controller;
pub mod info_card;
pub mod map_view;
pub mod search_control;

pub use background::{GeoBackground, Orb};
pub use controller::{PageController, PageState, CTA_IDLE, CTA_LOADING, REFRESH_LABEL};
pub use info_card::{card_delay, info_cards, CardIcon, InfoCard, CARD_LAYOUT};
pub use map_view::{
    FlyTo, MapSettings, MapView, POPUP_CURRENT_POSITION, POPUP_SEARCHED_LOCATION,
};
pub use search_control::SearchControl;
