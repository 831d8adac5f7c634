pub mod activation;
pub mod normalize;
