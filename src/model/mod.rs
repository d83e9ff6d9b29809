pub mod animal;
pub mod config;
pub mod entity;
pub mod environment;
pub mod error;
pub mod history;
pub mod needs;
pub mod persistence;
pub mod plant;
pub mod resource;
pub mod spatial_hash;
pub mod terrain;
pub mod tick;
pub mod world;
