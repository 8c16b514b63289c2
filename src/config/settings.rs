pub struct EloSettings {
    pub starting_rating: i32,
    pub k_factor: f64,
}

impl Default for EloSettings {
    fn default() -> Self {
        Self {
            starting_rating: 1000,
            k_factor: 32.0,
        }
    }
}

pub struct AppConfig {
    pub elo: EloSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            elo: EloSettings::default(),
        }
    }
}

// Passed explicitly into the services (dependency injection) rather than
// held as a global.
