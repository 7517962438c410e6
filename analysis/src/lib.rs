pub mod curve;
pub mod plot;

pub use curve::{Curve, Scale};
pub use plot::{render_all, Chart, PlotError};
