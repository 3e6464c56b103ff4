//! The grid of label/value cards under the map.

use chrono::TimeZone;
use geoloc_geo::LocationReading;

use crate::format::{
    format_accuracy, format_altitude, format_coordinate, format_speed, format_time_of_day, Axis,
};

/// Icon shown on the left of a card (Lucide names).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardIcon {
    MapPin,
    Navigation,
    Target,
    Compass,
    Zap,
    Globe,
}

impl CardIcon {
    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::MapPin => "map-pin",
            Self::Navigation => "navigation",
            Self::Target => "target",
            Self::Compass => "compass",
            Self::Zap => "zap",
            Self::Globe => "globe",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfoCard {
    pub icon: CardIcon,
    pub label: &'static str,
    pub value: String,
    /// Entrance animation delay in seconds
    pub delay: f32,
}

/// Cards stagger in 0.1 s apart.
const DELAY_STEP: f32 = 0.1;

/// Icon and label of each card, in display order.
pub const CARD_LAYOUT: [(CardIcon, &str); 6] = [
    (CardIcon::MapPin, "Latitude"),
    (CardIcon::Navigation, "Longitude"),
    (CardIcon::Target, "Precisão"),
    (CardIcon::Compass, "Altitude"),
    (CardIcon::Zap, "Velocidade"),
    (CardIcon::Globe, "Timestamp"),
];

/// Entrance delay of the card at `index`.
pub fn card_delay(index: usize) -> f32 {
    DELAY_STEP * (index as f32 + 1.0)
}

/// The six cards for a reading, in display order.
pub fn info_cards<Tz>(reading: &LocationReading, tz: &Tz) -> Vec<InfoCard>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let values = [
        format_coordinate(reading.latitude, Axis::Latitude),
        format_coordinate(reading.longitude, Axis::Longitude),
        format_accuracy(reading.accuracy),
        format_altitude(reading.altitude),
        format_speed(reading.speed),
        format_time_of_day(reading.timestamp, tz),
    ];

    CARD_LAYOUT
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (&(icon, label), value))| InfoCard {
            icon,
            label,
            value,
            delay: card_delay(i),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sao_paulo_reading;
    use chrono::Utc;

    #[test]
    fn test_sao_paulo_walkthrough() {
        let cards = info_cards(&sao_paulo_reading(), &Utc);
        let values: Vec<&str> = cards.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(
            values,
            vec![
                "23.550000° S",
                "46.630000° W",
                "± 15 metros",
                "Indisponível",
                "Parado",
                "22:13:20",
            ]
        );
    }

    #[test]
    fn test_labels_icons_and_delays() {
        let cards = info_cards(&sao_paulo_reading(), &Utc);
        assert_eq!(cards.len(), 6);
        assert_eq!(cards[2].label, "Precisão");
        assert_eq!(cards[4].icon, CardIcon::Zap);
        assert_eq!(cards[4].icon.icon_name(), "zap");
        assert!((cards[0].delay - 0.1).abs() < 1e-6);
        assert!((cards[5].delay - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_moving_reading() {
        let reading = LocationReading {
            altitude: Some(12.0),
            speed: Some(10.0),
            ..sao_paulo_reading()
        };
        let cards = info_cards(&reading, &Utc);
        assert_eq!(cards[3].value, "12.0 m");
        assert_eq!(cards[4].value, "36.0 km/h");
    }
}
