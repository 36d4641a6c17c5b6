#![allow(dead_code)]

pub mod atlas_env;
pub mod fixtures;
pub mod projector;
pub mod surface;
