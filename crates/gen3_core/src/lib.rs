pub mod builder;
pub mod catalog;
pub mod charset;
pub mod core_api;
pub mod creature;
pub mod gender;
pub mod image;
pub mod layout;
pub mod pc;
pub mod pid;
pub mod pokedex;
pub mod reader;
pub mod record;
pub mod section;
pub mod slot;
pub mod stats;
pub mod team;
pub mod trainer;
