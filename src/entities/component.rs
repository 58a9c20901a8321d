//! Component entity type - a single device under test

use serde::{Deserialize, Serialize};

use crate::core::error::BenchError;

/// Kind of electronic component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Resistor,
    Capacitor,
    Inductor,
    Transistor,
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentKind::Resistor => write!(f, "Resistor"),
            ComponentKind::Capacitor => write!(f, "Capacitor"),
            ComponentKind::Inductor => write!(f, "Inductor"),
            ComponentKind::Transistor => write!(f, "Transistor"),
        }
    }
}

impl std::str::FromStr for ComponentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "resistor" => Ok(ComponentKind::Resistor),
            "capacitor" => Ok(ComponentKind::Capacitor),
            "inductor" => Ok(ComponentKind::Inductor),
            "transistor" => Ok(ComponentKind::Transistor),
            _ => Err(format!(
                "Invalid component kind: {}. Use resistor, capacitor, inductor, or transistor",
                s
            )),
        }
    }
}

/// A component waiting to be tested.
///
/// Fields are private so a `Component` can only exist with validated
/// parameters. The measured value lives on [`TestedComponent`], which the
/// executor produces exactly once per component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Component {
    kind: ComponentKind,
    nominal: f64,
    tolerance: f64,
}

impl Component {
    /// Create a new component, rejecting non-finite values and tolerances
    /// outside `[0, 1)`
    pub fn new(kind: ComponentKind, nominal: f64, tolerance: f64) -> Result<Self, BenchError> {
        if !nominal.is_finite() {
            return Err(BenchError::configuration(format!(
                "{} nominal value must be finite, got {}",
                kind, nominal
            )));
        }
        if !tolerance.is_finite() || !(0.0..1.0).contains(&tolerance) {
            return Err(BenchError::configuration(format!(
                "{} tolerance must be in [0, 1), got {}",
                kind, tolerance
            )));
        }

        Ok(Self {
            kind,
            nominal,
            tolerance,
        })
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn nominal(&self) -> f64 {
        self.nominal
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Largest allowed absolute deviation from nominal
    pub fn allowed_deviation(&self) -> f64 {
        self.tolerance * self.nominal.abs()
    }

    /// Record a measured value read back from an instrument, consuming the
    /// untested component
    pub fn into_tested(self, actual: f64) -> TestedComponent {
        let deviation = actual - self.nominal;
        TestedComponent {
            component: self,
            actual,
            deviation,
        }
    }

    /// Record a measurement produced by offsetting the nominal value by
    /// `deviation`.
    ///
    /// The offset is kept as given, so classification does not depend on
    /// rounding in `nominal + deviation`.
    pub fn into_measured(self, deviation: f64) -> TestedComponent {
        TestedComponent {
            actual: self.nominal + deviation,
            component: self,
            deviation,
        }
    }
}

impl<'de> Deserialize<'de> for Component {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Raw {
            kind: ComponentKind,
            nominal: f64,
            tolerance: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        Component::new(raw.kind, raw.nominal, raw.tolerance).map_err(serde::de::Error::custom)
    }
}

/// A component with its measured value assigned
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestedComponent {
    #[serde(flatten)]
    component: Component,

    /// Simulated measured value
    actual: f64,

    /// Signed offset from nominal that produced `actual`
    deviation: f64,
}

impl TestedComponent {
    pub fn component(&self) -> &Component {
        &self.component
    }

    pub fn kind(&self) -> ComponentKind {
        self.component.kind
    }

    pub fn nominal(&self) -> f64 {
        self.component.nominal
    }

    pub fn tolerance(&self) -> f64 {
        self.component.tolerance
    }

    pub fn actual(&self) -> f64 {
        self.actual
    }

    /// Signed difference between measured and nominal value
    pub fn deviation(&self) -> f64 {
        self.deviation
    }

    /// Whether the measured value lies within nominal ± tolerance (inclusive)
    pub fn passes(&self) -> bool {
        self.deviation().abs() <= self.component.allowed_deviation()
    }
}
