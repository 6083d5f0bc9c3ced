//! Centralized exchanges

mod bishino;

pub use bishino::{
    parse_status, Bishino, BishinoOptions, BishinoOrderType, OrderParams, OrderShape,
};
