//! Index curves and rate resolution

mod curve;
mod resolver;
pub mod loader;

pub use curve::{RateCurve, RateScenario};
pub use resolver::{RateResolver, BPS};
pub use loader::{load_curves, load_curves_from_reader};
