//! Named simulation parameters.
//!
//! Written only by the interaction layer, read every frame by the
//! simulator. Single writer, single reader, one thread.

use std::collections::HashMap;

/// Global speed multiplier applied to simulation advancement.
pub const SPEED: &str = "speed";
/// Whether the measurement interaction has collapsed the pool.
pub const COLLAPSED: &str = "collapsed";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Scalar(f32),
    Flag(bool),
}

/// Parameter set for one visualization's lifetime.
#[derive(Debug, Clone, Default)]
pub struct ParamSet {
    values: HashMap<String, ParamValue>,
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_scalar(&mut self, name: &str, value: f32) {
        self.values
            .insert(name.to_string(), ParamValue::Scalar(value));
    }

    pub fn set_flag(&mut self, name: &str, value: bool) {
        self.values.insert(name.to_string(), ParamValue::Flag(value));
    }

    /// Read a scalar, falling back when unset or set as a flag.
    pub fn scalar(&self, name: &str, default: f32) -> f32 {
        match self.values.get(name) {
            Some(ParamValue::Scalar(v)) => *v,
            _ => default,
        }
    }

    /// Read a flag, falling back when unset or set as a scalar.
    pub fn flag(&self, name: &str, default: bool) -> bool {
        match self.values.get(name) {
            Some(ParamValue::Flag(v)) => *v,
            _ => default,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}
