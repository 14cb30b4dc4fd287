use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;

/// Zoom level used when a single city is selected on the map
pub const CITY_ZOOM: u8 = 13;

/// A map centre plus zoom level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: Coordinates,
    pub zoom: u8,
}

/// Whole-country view shown when the city facet is "All"
pub const NATIONAL_VIEW: Viewport = Viewport {
    center: Coordinates {
        latitude: 20.5937,
        longitude: 78.9629,
    },
    zoom: 5,
};

/// Static reference entry for a jurisdiction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct City {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
}

const fn city(name: &'static str, latitude: f64, longitude: f64) -> City {
    City {
        name,
        latitude,
        longitude,
        zoom: CITY_ZOOM,
    }
}

static CITIES: [City; 10] = [
    city("Delhi", 28.6139, 77.2090),
    city("Mumbai", 19.0760, 72.8777),
    city("Chennai", 13.0827, 80.2707),
    city("Kolkata", 22.5726, 88.3639),
    city("Bengaluru", 12.9716, 77.5946),
    city("Hyderabad", 17.3850, 78.4867),
    city("Jaipur", 26.9124, 75.7873),
    city("Pune", 18.5204, 73.8567),
    city("Ahmedabad", 23.0225, 72.5714),
    city("Lucknow", 26.8467, 80.9462),
];

impl City {
    /// All known cities
    pub fn all() -> &'static [City] {
        &CITIES
    }

    /// Exact-name lookup
    pub fn by_name(name: &str) -> Option<&'static City> {
        CITIES.iter().find(|c| c.name == name)
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// Map view centred on this city
    pub fn viewport(&self) -> Viewport {
        Viewport {
            center: self.coordinates(),
            zoom: self.zoom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_exact() {
        assert!(City::by_name("Chennai").is_some());
        assert!(City::by_name("chennai").is_none());
    }

    #[test]
    fn test_city_viewport_uses_city_zoom() {
        let jaipur = City::by_name("Jaipur").unwrap();
        let view = jaipur.viewport();
        assert_eq!(view.zoom, CITY_ZOOM);
        assert_eq!(view.center.latitude, 26.9124);
    }
}
