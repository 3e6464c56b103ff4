//! Background model for QML: orb sizes, colors and drift offsets.

use std::time::Duration;

use cxx_qt::CxxQtType;

use crate::page::{GeoBackground, Orb};

#[cxx_qt::bridge]
pub mod qobject {
    extern "RustQt" {
        #[qobject]
        #[qml_element]
        #[qproperty(i32, orb_count)]
        #[qproperty(f64, grid_spacing)]
        #[qproperty(f64, grid_opacity)]
        type BackgroundModel = super::BackgroundModelRust;

        #[qinvokable]
        fn orb_size(self: &BackgroundModel, index: i32) -> f64;

        #[qinvokable]
        fn orb_hue(self: &BackgroundModel, index: i32) -> f64;

        #[qinvokable]
        fn orb_opacity(self: &BackgroundModel, index: i32) -> f64;

        /// Horizontal drift of an orb `elapsed_ms` after the page opened.
        #[qinvokable]
        fn orb_x(self: &BackgroundModel, index: i32, elapsed_ms: f64) -> f64;

        #[qinvokable]
        fn orb_y(self: &BackgroundModel, index: i32, elapsed_ms: f64) -> f64;
    }
}

pub struct BackgroundModelRust {
    orb_count: i32,
    grid_spacing: f64,
    grid_opacity: f64,
    background: GeoBackground,
}

impl Default for BackgroundModelRust {
    fn default() -> Self {
        let background = GeoBackground::default();
        Self {
            orb_count: background.orbs.len() as i32,
            grid_spacing: f64::from(background.grid_spacing_px),
            grid_opacity: f64::from(background.grid_opacity),
            background,
        }
    }
}

impl BackgroundModelRust {
    fn orb(&self, index: i32) -> Option<&Orb> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.background.orbs.get(i))
    }

    fn offset(&self, index: i32, elapsed_ms: f64) -> (f64, f64) {
        let elapsed = Duration::try_from_secs_f64(elapsed_ms.max(0.0) / 1000.0).unwrap_or_default();
        self.orb(index)
            .map(|orb| {
                let (x, y) = orb.offset_at(elapsed);
                (f64::from(x), f64::from(y))
            })
            .unwrap_or_default()
    }
}

impl qobject::BackgroundModel {
    pub fn orb_size(&self, index: i32) -> f64 {
        self.rust().orb(index).map(|o| f64::from(o.size_px)).unwrap_or(0.0)
    }

    pub fn orb_hue(&self, index: i32) -> f64 {
        self.rust().orb(index).map(|o| f64::from(o.hue)).unwrap_or(0.0)
    }

    pub fn orb_opacity(&self, index: i32) -> f64 {
        self.rust().orb(index).map(|o| f64::from(o.opacity)).unwrap_or(0.0)
    }

    pub fn orb_x(&self, index: i32, elapsed_ms: f64) -> f64 {
        self.rust().offset(index, elapsed_ms).0
    }

    pub fn orb_y(&self, index: i32, elapsed_ms: f64) -> f64 {
        self.rust().offset(index, elapsed_ms).1
    }
}
