//! Decorative backdrop: drifting gradient orbs over a faint grid.
//! Pure function of elapsed time; holds no state.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orb {
    /// Diameter in pixels
    pub size_px: f32,
    /// HSL hue of the radial gradient center
    pub hue: f32,
    pub opacity: f32,
    /// Drift keyframes, in pixels, visited in order and back to the start
    pub path: [(f32, f32); 3],
    pub period: Duration,
}

impl Orb {
    /// Offset from the resting position after `elapsed`.
    pub fn offset_at(&self, elapsed: Duration) -> (f32, f32) {
        let period = self.period.as_secs_f32();
        if period <= 0.0 {
            return self.path[0];
        }

        let phase = (elapsed.as_secs_f32() % period) / period;
        let segments = (self.path.len() - 1) as f32;
        let position = phase * segments;
        let index = (position.floor() as usize).min(self.path.len() - 2);
        let t = ease_in_out(position - index as f32);

        let (x0, y0) = self.path[index];
        let (x1, y1) = self.path[index + 1];
        (x0 + (x1 - x0) * t, y0 + (y1 - y0) * t)
    }
}

fn ease_in_out(t: f32) -> f32 {
    // Sine ease, matching CSS "ease-in-out" closely enough for decoration
    (1.0 - (t * std::f32::consts::PI).cos()) / 2.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeoBackground {
    pub orbs: Vec<Orb>,
    pub grid_spacing_px: f32,
    pub grid_opacity: f32,
}

impl Default for GeoBackground {
    fn default() -> Self {
        Self {
            orbs: vec![
                Orb {
                    size_px: 500.0,
                    hue: 174.0,
                    opacity: 0.20,
                    path: [(0.0, 0.0), (40.0, -30.0), (0.0, 0.0)],
                    period: Duration::from_secs(15),
                },
                Orb {
                    size_px: 600.0,
                    hue: 265.0,
                    opacity: 0.15,
                    path: [(0.0, 0.0), (-50.0, 40.0), (0.0, 0.0)],
                    period: Duration::from_secs(20),
                },
                Orb {
                    size_px: 300.0,
                    hue: 215.0,
                    opacity: 0.10,
                    path: [(0.0, 0.0), (30.0, 50.0), (0.0, 0.0)],
                    period: Duration::from_secs(18),
                },
            ],
            grid_spacing_px: 60.0,
            grid_opacity: 0.03,
        }
    }
}
