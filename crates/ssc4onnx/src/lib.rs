pub mod check;
pub mod reconcile;
pub mod report;
pub mod size;
pub mod style;

pub use check::{CheckError, StructureCheck};
pub use style::Style;
