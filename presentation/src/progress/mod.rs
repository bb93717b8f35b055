//! Progress reporting during a session

pub mod reporter;
