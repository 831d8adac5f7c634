pub mod backward;
pub mod forward;
pub mod params;

pub use backward::{backward, Gradients};
pub use forward::{forward, Activations};
pub use params::ParameterSet;
