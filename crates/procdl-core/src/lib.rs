pub mod config;
pub mod logging;

pub mod controls;
pub mod download;
pub mod filename;
pub mod form;
pub mod handler;
pub mod selection;
pub mod transport;
