pub mod error_rate;
