//! Optional YAML layout file: marker name, excluded directory names and the
//! skeleton of directories to create.

mod layout_config;

pub use layout_config::{LayoutConfig, LayoutConfigError};
