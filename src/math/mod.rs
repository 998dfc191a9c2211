pub mod bin_ladder;
pub mod shape;
