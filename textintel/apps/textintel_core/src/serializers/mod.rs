pub mod textintel_error;
pub mod textintel_health;
