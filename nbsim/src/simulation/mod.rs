pub mod vector;
pub mod states;
pub mod store;
pub mod params;
pub mod engine;
pub mod forces;
pub mod barnes_hut;
pub mod integrator;
pub mod collision;
pub mod center_of_mass;
pub mod observer;
pub mod driver;
pub mod scenario;
