use std::collections::BTreeMap;

use super::observation::Observation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            9..=11 => Self::Autumn,
            _ => Self::Winter,
        }
    }
}

/// Named model inputs. Winter is the baseline season, so it has no
/// indicator of its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    values: BTreeMap<&'static str, f64>,
}

impl FeatureVector {
    pub fn from_observation(obs: &Observation, month: u32) -> Self {
        let season = Season::from_month(month);
        let indicator = |s: Season| if season == s { 1.0 } else { 0.0 };

        let values = BTreeMap::from([
            ("RH", obs.neerslag),
            ("PG", obs.luchtd),
            ("FHN", obs.windsnelheid),
            ("FXX", obs.windstoten),
            ("DDVEC", obs.windrgr),
            ("Q", obs.zon),
            ("UX", obs.lv),
            ("TN", obs.temp),
            ("TG", obs.temp24),
            ("temperature_2m", obs.temp),
            ("relative_humidity_2m", obs.lv),
            ("wind_speed_10m", obs.windsnelheid),
            ("wind_direction_10m", obs.windrgr),
            ("dew_point", obs.dauwp),
            ("temperature_diff", 0.0),
            ("humidity_diff", 0.0),
            ("turbulence", 0.0),
            ("month", f64::from(month)),
            ("season_spring", indicator(Season::Spring)),
            ("season_summer", indicator(Season::Summer)),
            ("season_autumn", indicator(Season::Autumn)),
        ]);

        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn months_map_to_meteorological_seasons() {
        assert_eq!(Season::from_month(12), Season::Winter);
        assert_eq!(Season::from_month(2), Season::Winter);
        assert_eq!(Season::from_month(3), Season::Spring);
        assert_eq!(Season::from_month(8), Season::Summer);
        assert_eq!(Season::from_month(11), Season::Autumn);
    }

    #[test]
    fn observation_fields_feed_both_naming_schemes() {
        let obs = Observation {
            temp: 12.5,
            lv: 88.0,
            windrgr: 240.0,
            ..Observation::default()
        };
        let features = FeatureVector::from_observation(&obs, 10);
        assert_eq!(features.get("TN"), Some(12.5));
        assert_eq!(features.get("temperature_2m"), Some(12.5));
        assert_eq!(features.get("UX"), Some(88.0));
        assert_eq!(features.get("relative_humidity_2m"), Some(88.0));
        assert_eq!(features.get("DDVEC"), Some(240.0));
        assert_eq!(features.get("month"), Some(10.0));
        assert_eq!(features.get("season_autumn"), Some(1.0));
        assert_eq!(features.get("season_spring"), Some(0.0));
        assert_eq!(features.get("turbulence"), Some(0.0));
        assert_eq!(features.len(), 21);
    }

    #[test]
    fn winter_has_no_indicator() {
        let features = FeatureVector::from_observation(&Observation::default(), 1);
        for name in ["season_spring", "season_summer", "season_autumn"] {
            assert_eq!(features.get(name), Some(0.0));
        }
        assert_eq!(features.get("season_winter"), None);
    }
}
