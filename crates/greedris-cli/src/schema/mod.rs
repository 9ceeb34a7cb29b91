pub mod position;
pub mod weight_model;
