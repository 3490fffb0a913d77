//! Shared primitive types used across the entire analysis pipeline.

/// A skill or requirement level. Nominally 1-5, but parsed leniently:
/// a value that is not a number is carried as `NaN`.
pub type Level = f64;

/// A stable identifier for an employee, as given in the skills table.
pub type EmployeeId = String;

/// The canonical analysis run identifier.
pub type RunId = String;
