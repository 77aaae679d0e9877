pub mod controller;
pub mod generator;
pub mod worker;

pub use controller::{CollectionController, NO_CITIES_MESSAGE};
pub use generator::MockDataGenerator;
pub use worker::WorkerTiming;
