//! Recoverable anomalies reported during a conversion.
//!
//! Codecs never abort on these. Each one degrades to a documented default,
//! is logged at `warn` level, and is handed back to the caller next to the
//! result in an [`Outcome`].

use std::fmt;

use log::warn;

/// A recoverable anomaly found while converting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A device model has no mapping to a known device kind.
    UnsupportedModel { device: String, model: String },
    /// A link endpoint names a device that does not exist.
    UnresolvedReference { link: usize, device: String },
    /// A cable element carries fewer than two ports; the link was skipped.
    IncompleteCable { link: usize, ports: usize },
    /// A device element lacks a required child; the device was skipped.
    SkippedDevice { index: usize, missing: &'static str },
    /// A field held a value that could not be used; the default was kept.
    InvalidValue {
        device: String,
        field: &'static str,
        value: String,
    },
}

impl Warning {
    /// Short stable identifier, used as a structured log key.
    pub fn code(&self) -> &'static str {
        match self {
            Warning::UnsupportedModel { .. } => "unsupported-model",
            Warning::UnresolvedReference { .. } => "unresolved-reference",
            Warning::IncompleteCable { .. } => "incomplete-cable",
            Warning::SkippedDevice { .. } => "skipped-device",
            Warning::InvalidValue { .. } => "invalid-value",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnsupportedModel { device, model } => {
                write!(f, "device `{device}` has unsupported model `{model}`")
            }
            Warning::UnresolvedReference { link, device } => {
                write!(f, "link #{link} references unknown device `{device}`")
            }
            Warning::IncompleteCable { link, ports } => {
                write!(f, "link #{link} has {ports} port(s), expected 2; skipped")
            }
            Warning::SkippedDevice { index, missing } => {
                write!(f, "device #{index} has no <{missing}> element; skipped")
            }
            Warning::InvalidValue {
                device,
                field,
                value,
            } => write!(f, "device `{device}` has invalid {field} `{value}`"),
        }
    }
}

/// Accumulates warnings during a conversion, logging each as it arrives.
#[derive(Debug, Default)]
pub struct Warnings {
    warnings: Vec<Warning>,
}

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning.
    pub fn emit(&mut self, warning: Warning) {
        warn!(code = warning.code(); "{warning}");
        self.warnings.push(warning);
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Attach the collected warnings to a result value.
    pub fn finish<T>(self, value: T) -> Outcome<T> {
        Outcome {
            value,
            warnings: self.warnings,
        }
    }
}

/// A conversion result together with the warnings raised producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    value: T,
    warnings: Vec<Warning>,
}

impl<T> Outcome<T> {
    /// Wrap a value that produced no warnings.
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn into_parts(self) -> (T, Vec<Warning>) {
        (self.value, self.warnings)
    }

    /// Transform the value, keeping the warnings.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            warnings: self.warnings,
        }
    }

    /// Transform the value with a fallible function, keeping the warnings.
    ///
    /// # Errors
    ///
    /// Returns the error of `f`; the warnings are dropped with it.
    pub fn try_map<U, E, F: FnOnce(T) -> Result<U, E>>(self, f: F) -> Result<Outcome<U>, E> {
        Ok(Outcome {
            value: f(self.value)?,
            warnings: self.warnings,
        })
    }

    /// Keep only the warnings for which `keep` returns true.
    pub fn retain_warnings<F: FnMut(&Warning) -> bool>(mut self, keep: F) -> Self {
        self.warnings.retain(keep);
        self
    }

    /// Chain a further conversion step, concatenating warnings in order.
    pub fn and_then<U, F: FnOnce(T) -> Outcome<U>>(self, f: F) -> Outcome<U> {
        let mut next = f(self.value);
        let mut warnings = self.warnings;
        warnings.append(&mut next.warnings);
        Outcome {
            value: next.value,
            warnings,
        }
    }
}
