//! Dimension schema for point collections.
//!
//! A [`Schema`] is the ordered set of named `f64` dimensions a point record
//! carries. Source stages declare dimensions during `prepare`; downstream
//! stages resolve the dimensions they need by name before any point flows.
//! Lookup is case-insensitive, so `x`, `X`, and a file header spelling of
//! `X ` resolve to the same dimension after trimming.

use serde::{Deserialize, Serialize};

/// Conventional name of the x coordinate dimension.
pub const DIM_X: &str = "X";
/// Conventional name of the y coordinate dimension.
pub const DIM_Y: &str = "Y";
/// Conventional name of the z coordinate dimension.
pub const DIM_Z: &str = "Z";

/// Ordered, named `f64` dimensions of a point record.
///
/// # Examples
///
/// ```rust
/// use pointpipe::pipeline::schema::{DIM_X, DIM_Y, Schema};
///
/// let mut schema = Schema::new();
/// let x = schema.add(DIM_X);
/// let y = schema.add(DIM_Y);
/// assert_eq!(schema.index_of("x"), Some(x));
/// assert_eq!(schema.index_of(DIM_Y), Some(y));
/// assert!(schema.has_xy());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    dimensions: Vec<String>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dimensions: Vec::new(),
        }
    }

    /// Creates a schema from dimension names, in order.
    pub fn with_dimensions<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut schema = Self::new();
        for name in names {
            schema.add(&name.into());
        }
        schema
    }

    /// Adds a dimension and returns its index.
    ///
    /// Re-adding an existing name (case-insensitively) returns the existing
    /// index instead of declaring a second column.
    pub fn add(&mut self, name: &str) -> usize {
        let name = name.trim();
        if let Some(index) = self.index_of(name) {
            return index;
        }
        self.dimensions.push(name.to_string());
        self.dimensions.len() - 1
    }

    /// Index of the dimension with the given name, case-insensitively.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.dimensions
            .iter()
            .position(|dim| dim.eq_ignore_ascii_case(name))
    }

    /// Number of dimensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    /// Returns `true` when no dimensions are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    /// Dimension names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.dimensions.iter().map(String::as_str)
    }

    /// Returns `true` when both planar coordinate dimensions are declared.
    #[must_use]
    pub fn has_xy(&self) -> bool {
        self.index_of(DIM_X).is_some() && self.index_of(DIM_Y).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_case_insensitive_and_idempotent() {
        let mut schema = Schema::new();
        let first = schema.add("X");
        assert_eq!(schema.add("x"), first);
        assert_eq!(schema.len(), 1);
    }

    #[test]
    fn lookup_trims_and_ignores_case() {
        let schema = Schema::with_dimensions(["X", "Y", "Z"]);
        assert_eq!(schema.index_of(" y "), Some(1));
        assert_eq!(schema.index_of("intensity"), None);
    }

    #[test]
    fn has_xy_requires_both_axes() {
        assert!(!Schema::with_dimensions(["X"]).has_xy());
        assert!(!Schema::with_dimensions(["Y", "Z"]).has_xy());
        assert!(Schema::with_dimensions(["X", "Y"]).has_xy());
    }
}
