#![forbid(unsafe_code)]

pub mod grade;
pub mod model;
pub mod ranking;
