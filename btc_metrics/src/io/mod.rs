//! Hand-off of derived frames to an external renderer.
pub mod dataframe;

pub use dataframe::{OutputFormat, write_frame};
