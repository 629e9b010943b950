//! different utility modules used throughout the project
/// tiny module to initialize terminal logging
pub mod logger;
