pub mod normalize;
pub mod similarity;

pub use normalize::normalize;
pub use similarity::{edit_distance, similarity, MATCH_THRESHOLD};
