//! Scalar numeric helpers shared by the model and fit code.

mod special;

pub use special::{erf, std_normal_cdf};
