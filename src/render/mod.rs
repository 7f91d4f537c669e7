pub mod map;

pub use map::{geocode_unique, render_map};
