pub mod faulty_errors_as;

pub use faulty_errors_as::{FaultyErrorsAsLint, HelperTarget};
