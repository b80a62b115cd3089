mod model;

pub mod aggregate;
pub mod builder;
pub mod census;
pub mod enrich;
pub mod lean;
pub mod manual;
pub mod mock;
pub mod parser;
pub mod states;
pub mod store;

pub use crate::model::*;
