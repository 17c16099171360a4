//! Typed named-parameter tables.
//!
//! Committed backend objects are configured by name/value tables. The value
//! set mirrors what ray-tracing backends accept: scalars, short vectors, and
//! flat buffers. A [`BTreeMap`] keeps iteration deterministic, which matters
//! for test assertions against the recording mock device.

use std::collections::BTreeMap;

use glam::{UVec3, Vec2, Vec3, Vec4};

/// A single typed parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Boolean flag.
    Bool(bool),
    /// Signed integer scalar.
    Int(i64),
    /// Float scalar.
    Float(f32),
    /// 2-component vector.
    Vec2(Vec2),
    /// 3-component vector.
    Vec3(Vec3),
    /// 3-component unsigned integer vector (e.g. grid dimensions).
    UVec3(UVec3),
    /// 4-component vector.
    Vec4(Vec4),
    /// Flat float buffer (e.g. packed sphere centers + radii).
    FloatBuffer(Vec<f32>),
    /// Buffer of 4-component vectors (e.g. per-element colors).
    Vec4Buffer(Vec<Vec4>),
    /// Text value (e.g. a sub-object kind name).
    Text(String),
}

/// A named-parameter table for one committed object.
pub type ParamMap = BTreeMap<String, ParamValue>;

/// Convenience builder for [`ParamMap`] literals.
#[derive(Debug, Default)]
pub struct Params {
    map: ParamMap,
}

impl Params {
    /// Start an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter.
    #[must_use]
    pub fn set(mut self, name: impl Into<String>, value: ParamValue) -> Self {
        self.map.insert(name.into(), value);
        self
    }

    /// Finish the table.
    #[must_use]
    pub fn build(self) -> ParamMap {
        self.map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_builder() {
        let map = Params::new()
            .set("radius", ParamValue::Float(1.0))
            .set("kind", ParamValue::Text("sphere".into()))
            .build();
        assert_eq!(map.len(), 2);
        assert_eq!(map["radius"], ParamValue::Float(1.0));
    }

    #[test]
    fn test_param_map_iteration_is_sorted() {
        let map = Params::new()
            .set("b", ParamValue::Int(2))
            .set("a", ParamValue::Int(1))
            .build();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
