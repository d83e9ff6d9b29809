use crate::model::config::EnvironmentConfig;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Season {
    #[default]
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    #[must_use]
    pub fn next(&self) -> Season {
        match self {
            Season::Spring => Season::Summer,
            Season::Summer => Season::Fall,
            Season::Fall => Season::Winter,
            Season::Winter => Season::Spring,
        }
    }

    fn base_temperature(&self) -> f64 {
        match self {
            Season::Spring => 15.0,
            Season::Summer => 28.0,
            Season::Fall => 10.0,
            Season::Winter => -2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Weather {
    #[default]
    Clear,
    Cloudy,
    Rain,
    Storm,
    Snow,
    Fog,
}

impl Weather {
    /// Weather that cuts the sunlight reaching plants.
    #[must_use]
    pub fn blocks_sunlight(&self) -> bool {
        matches!(self, Weather::Cloudy | Weather::Rain | Weather::Storm)
    }

    /// Weather that wets the ground.
    #[must_use]
    pub fn is_wet(&self) -> bool {
        matches!(self, Weather::Rain | Weather::Storm)
    }

    fn temperature_offset(&self) -> f64 {
        match self {
            Weather::Clear => 3.0,
            Weather::Cloudy => 0.0,
            Weather::Rain => -2.0,
            Weather::Storm => -4.0,
            Weather::Snow => -8.0,
            Weather::Fog => -1.0,
        }
    }
}

/// A transition observed while advancing the environment clock. The world
/// turns these into journal events.
#[derive(Debug, Clone, Copy)]
pub enum EnvChange {
    Season { from: Season, to: Season },
    Weather { from: Weather, to: Weather },
}

/// Global simulation clock, calendar and weather. Owned by the application
/// and passed into `World::update` each tick; the core reads it only.
#[derive(Serialize, Deserialize, Clone)]
pub struct Environment {
    time: f64,
    day_length: f64,
    season_length: f64,
    season: Season,
    season_clock: f64,
    weather: Weather,
    weather_clock: f64,
    temperature: f64,
    weather_interval_min: f64,
    weather_interval_max: f64,
}

impl Environment {
    pub fn new(cfg: &EnvironmentConfig) -> Self {
        let season = Season::Spring;
        let weather = Weather::Clear;
        Self {
            time: 0.0,
            day_length: cfg.day_length,
            season_length: cfg.season_length,
            season,
            season_clock: 0.0,
            weather,
            weather_clock: cfg.weather_interval_min,
            temperature: season.base_temperature() + weather.temperature_offset(),
            weather_interval_min: cfg.weather_interval_min,
            weather_interval_max: cfg.weather_interval_max,
        }
    }

    /// Advances the clock by `dt` seconds, rolling seasons and weather as
    /// their timers expire. Returns the transitions that happened.
    pub fn tick(&mut self, dt: f64, rng: &mut ChaCha8Rng) -> Vec<EnvChange> {
        let mut changes = Vec::new();
        self.time += dt;

        self.season_clock += dt;
        while self.season_clock >= self.season_length {
            self.season_clock -= self.season_length;
            let from = self.season;
            self.season = self.season.next();
            changes.push(EnvChange::Season {
                from,
                to: self.season,
            });
        }

        self.weather_clock -= dt;
        if self.weather_clock <= 0.0 {
            let from = self.weather;
            self.weather = Self::roll_weather(self.season, rng);
            self.weather_clock = rng.gen_range(self.weather_interval_min..self.weather_interval_max);
            if self.weather != from {
                changes.push(EnvChange::Weather {
                    from,
                    to: self.weather,
                });
            }
        }

        self.temperature = self.season.base_temperature() + self.weather.temperature_offset();
        changes
    }

    fn roll_weather(season: Season, rng: &mut ChaCha8Rng) -> Weather {
        let table: &[(Weather, f64)] = match season {
            Season::Spring => &[
                (Weather::Clear, 0.35),
                (Weather::Cloudy, 0.25),
                (Weather::Rain, 0.25),
                (Weather::Storm, 0.05),
                (Weather::Fog, 0.10),
            ],
            Season::Summer => &[
                (Weather::Clear, 0.55),
                (Weather::Cloudy, 0.20),
                (Weather::Rain, 0.10),
                (Weather::Storm, 0.10),
                (Weather::Fog, 0.05),
            ],
            Season::Fall => &[
                (Weather::Clear, 0.30),
                (Weather::Cloudy, 0.30),
                (Weather::Rain, 0.20),
                (Weather::Storm, 0.05),
                (Weather::Fog, 0.15),
            ],
            Season::Winter => &[
                (Weather::Clear, 0.30),
                (Weather::Cloudy, 0.30),
                (Weather::Snow, 0.30),
                (Weather::Fog, 0.10),
            ],
        };
        let mut roll: f64 = rng.gen();
        for &(weather, weight) in table {
            if roll < weight {
                return weather;
            }
            roll -= weight;
        }
        table[0].0
    }

    /// Total simulated seconds since the world started.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    #[must_use]
    pub fn season(&self) -> Season {
        self.season
    }

    #[must_use]
    pub fn weather(&self) -> Weather {
        self.weather
    }

    #[must_use]
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Hour of the simulated day in `[0, 24)`.
    #[must_use]
    pub fn hour_of_day(&self) -> f64 {
        (self.time % self.day_length) / self.day_length * 24.0
    }

    /// Sunlight factor in [0, 1]: dim at night, partial at dawn and dusk,
    /// full at midday, reduced under sun-blocking weather.
    #[must_use]
    pub fn light_level(&self) -> f64 {
        let hour = self.hour_of_day();
        let base = if !(6.0..18.0).contains(&hour) {
            0.2
        } else if !(8.0..16.0).contains(&hour) {
            0.6
        } else {
            1.0
        };
        if self.weather.blocks_sunlight() {
            base * 0.7
        } else {
            base
        }
    }

    /// Jumps the clock to the given hour of the current day. Test hook.
    pub fn set_hour(&mut self, hour: f64) {
        let day_start = (self.time / self.day_length).floor() * self.day_length;
        self.time = day_start + hour / 24.0 * self.day_length;
    }

    /// Forces a season, resetting its clock. Test hook.
    pub fn set_season(&mut self, season: Season) {
        self.season = season;
        self.season_clock = 0.0;
        self.temperature = season.base_temperature() + self.weather.temperature_offset();
    }

    /// Forces a weather state. Test hook.
    pub fn set_weather(&mut self, weather: Weather) {
        self.weather = weather;
        self.temperature = self.season.base_temperature() + weather.temperature_offset();
    }
}
