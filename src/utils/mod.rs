pub mod vector;
pub mod weight;
