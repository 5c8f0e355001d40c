mod anchor;
mod spline;

pub use anchor::{assign_chord_times, AnchorPoint};
pub use spline::{FrameSample, Spline};
