pub mod textintel_errors;
pub mod textintel_health;
