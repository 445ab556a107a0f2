pub mod postgres;
pub mod reqwest;
