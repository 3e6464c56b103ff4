//! Map view state: the authoritative position, the user's click and search
//! markers, and where the camera should be. Tiles and the fly-to animation
//! itself are left to the QtLocation map in QML.

use std::time::Duration;

use geoloc_geo::Coordinate;

use crate::format::format_coordinate_pair;

pub const POPUP_CURRENT_POSITION: &str = "Você está aqui!";
pub const POPUP_SEARCHED_LOCATION: &str = "Local pesquisado";

/// Map behaviour derived from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    pub tile_url: String,
    pub attribution: String,
    pub initial_zoom: f64,
    pub fly_to_zoom: f64,
    pub fly_to_duration: Duration,
    pub click_radius_m: f64,
}

/// A camera move for the renderer to animate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyTo {
    pub target: Coordinate,
    pub zoom: f64,
    pub duration: Duration,
}

pub struct MapView {
    position: Coordinate,
    accuracy: Option<f64>,
    clicked: Option<Coordinate>,
    searched: Option<Coordinate>,
    target: Coordinate,
    settings: MapSettings,
}

impl MapView {
    pub fn new(position: Coordinate, accuracy: Option<f64>, settings: MapSettings) -> Self {
        Self {
            position,
            accuracy,
            clicked: None,
            searched: None,
            target: position,
            settings,
        }
    }

    /// The move played when the map first opens, from the initial zoom
    /// down onto the position.
    pub fn opening_flight(&self) -> FlyTo {
        self.flight(self.target)
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub fn clicked(&self) -> Option<Coordinate> {
        self.clicked
    }

    pub fn searched(&self) -> Option<Coordinate> {
        self.searched
    }

    pub fn settings(&self) -> &MapSettings {
        &self.settings
    }

    /// Radius of the accuracy circle; only a positive accuracy draws one.
    pub fn accuracy_radius(&self) -> Option<f64> {
        self.accuracy.filter(|a| a.is_finite() && *a > 0.0)
    }

    /// Popup text of the click marker.
    pub fn click_popup(&self) -> Option<String> {
        self.clicked.map(format_coordinate_pair)
    }

    /// Searched coordinate if any, else the authoritative position.
    /// Clicks never move the camera.
    pub fn camera_target(&self) -> Coordinate {
        self.searched.unwrap_or(self.position)
    }

    /// New authoritative position from the page (e.g. after a refresh).
    pub fn set_position(&mut self, position: Coordinate, accuracy: Option<f64>) -> Option<FlyTo> {
        self.position = position;
        self.accuracy = accuracy;
        self.retarget()
    }

    /// Record a click on the map, replacing the previous one.
    pub fn click(&mut self, at: Coordinate) {
        tracing::debug!("Map clicked at {}", at);
        self.clicked = Some(at);
    }

    /// Show a search result: it becomes the camera target and clears the click.
    pub fn show_search_result(&mut self, at: Coordinate) -> Option<FlyTo> {
        self.searched = Some(at);
        self.clicked = None;
        self.retarget()
    }

    // Fly only when the effective target actually changes.
    fn retarget(&mut self) -> Option<FlyTo> {
        let target = self.camera_target();
        if target == self.target {
            return None;
        }
        self.target = target;
        Some(self.flight(target))
    }

    fn flight(&self, target: Coordinate) -> FlyTo {
        FlyTo {
            target,
            zoom: self.settings.fly_to_zoom,
            duration: self.settings.fly_to_duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SP: Coordinate = Coordinate::new(-23.55, -46.63);
    const RIO: Coordinate = Coordinate::new(-22.91, -43.17);

    fn settings() -> MapSettings {
        crate::bridge::map_settings(&geoloc_core::Config::default())
    }

    fn map() -> MapView {
        MapView::new(SP, Some(15.0), settings())
    }

    #[test]
    fn test_opening_flight_targets_position() {
        let map = map();
        let flight = map.opening_flight();
        assert_eq!(flight.target, SP);
        assert_eq!(flight.zoom, 14.0);
        assert_eq!(flight.duration, Duration::from_secs(2));
        assert_eq!(map.settings().initial_zoom, 13.0);
    }

    #[test]
    fn test_accuracy_circle_only_when_positive() {
        let mut map = map();
        assert_eq!(map.accuracy_radius(), Some(15.0));

        map.set_position(SP, Some(0.0));
        assert_eq!(map.accuracy_radius(), None);

        map.set_position(SP, Some(f64::NAN));
        assert_eq!(map.accuracy_radius(), None);

        map.set_position(SP, None);
        assert_eq!(map.accuracy_radius(), None);
    }

    #[test]
    fn test_click_records_marker_and_keeps_camera() {
        let mut map = map();
        map.click(RIO);
        assert_eq!(map.clicked(), Some(RIO));
        assert_eq!(map.click_popup().as_deref(), Some("-22.910000, -43.170000"));
        assert_eq!(map.camera_target(), SP);
    }

    #[test]
    fn test_second_click_replaces_first() {
        let mut map = map();
        map.click(RIO);
        map.click(SP);
        assert_eq!(map.clicked(), Some(SP));
    }

    #[test]
    fn test_search_result_clears_click_and_moves_camera() {
        let mut map = map();
        map.click(SP);

        let flight = map.show_search_result(RIO);
        assert_eq!(map.clicked(), None);
        assert_eq!(map.searched(), Some(RIO));
        assert_eq!(map.camera_target(), RIO);
        assert_eq!(flight.map(|f| f.target), Some(RIO));
    }

    #[test]
    fn test_click_after_search_keeps_search_target() {
        let mut map = map();
        map.show_search_result(RIO);

        map.click(SP);
        assert_eq!(map.clicked(), Some(SP));
        assert_eq!(map.searched(), Some(RIO));
        assert_eq!(map.camera_target(), RIO);
    }

    #[test]
    fn test_same_target_does_not_refly() {
        let mut map = map();
        assert_eq!(map.set_position(SP, Some(20.0)), None);
        assert_eq!(map.accuracy_radius(), Some(20.0));
        assert_eq!(map.position(), SP);
    }

    #[test]
    fn test_new_position_flies_unless_search_holds_camera() {
        let mut map = map();
        assert_eq!(map.set_position(RIO, Some(10.0)).map(|f| f.target), Some(RIO));

        map.show_search_result(SP);
        assert_eq!(map.set_position(Coordinate::new(-22.0, -47.0), None), None);
        assert_eq!(map.camera_target(), SP);
    }

    #[test]
    fn test_same_search_result_twice_flies_once() {
        let mut map = map();
        assert!(map.show_search_result(RIO).is_some());
        assert!(map.show_search_result(RIO).is_none());
    }
}
