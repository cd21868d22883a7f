//! Spacecraft and central-body parameters for one propagation.
//!
//! A [`PropagationConfig`] can only be obtained through
//! [`PropagationConfigBuilder::build`] (or serde, which goes through the same
//! checks), so holding one means every invariant already holds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Earth's gravitational parameter, km³/s².
pub const EARTH_MU: f64 = 398_600.435_436;

/// Earth's equatorial radius as the engine expects it, km.
pub const EARTH_RADIUS_KM: f64 = 6378.0;

pub const DEFAULT_DRAG_COEFFICIENT: f64 = 2.2;

pub const DEFAULT_REFLECTIVITY_COEFFICIENT: f64 = 1.2;

// ---------------------------------------------------------------------------
// PropagationConfig
// ---------------------------------------------------------------------------

/// Immutable, validated propagation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PropagationConfigDef")]
pub struct PropagationConfig {
    /// km
    position: [f64; 3],
    /// km/s
    velocity: [f64; 3],
    /// m²
    area: f64,
    /// kg
    mass: f64,
    drag_coefficient: f64,
    reflectivity_coefficient: f64,
    /// km³/s²
    gravitational_parameter: f64,
    /// km
    body_radius: f64,
    initial_julian_date: f64,
}

impl PropagationConfig {
    /// Start a builder with the required fields; the rest take Earth defaults.
    pub fn builder(
        position: impl AsRef<[f64]>,
        velocity: impl AsRef<[f64]>,
        area: f64,
        mass: f64,
        initial_julian_date: f64,
    ) -> PropagationConfigBuilder {
        PropagationConfigBuilder {
            position: position.as_ref().to_vec(),
            velocity: velocity.as_ref().to_vec(),
            area,
            mass,
            initial_julian_date,
            drag_coefficient: DEFAULT_DRAG_COEFFICIENT,
            reflectivity_coefficient: DEFAULT_REFLECTIVITY_COEFFICIENT,
            gravitational_parameter: EARTH_MU,
            body_radius: EARTH_RADIUS_KM,
        }
    }

    /// Like [`builder`](Self::builder), with the initial epoch given as a UTC
    /// instant and converted to a Julian date.
    pub fn builder_at_epoch(
        position: impl AsRef<[f64]>,
        velocity: impl AsRef<[f64]>,
        area: f64,
        mass: f64,
        epoch: &DateTime<Utc>,
    ) -> PropagationConfigBuilder {
        Self::builder(position, velocity, area, mass, crate::epoch::julian_date(epoch))
    }

    pub fn position(&self) -> [f64; 3] {
        self.position
    }

    pub fn velocity(&self) -> [f64; 3] {
        self.velocity
    }

    /// Position followed by velocity.
    pub fn state_vector(&self) -> [f64; 6] {
        let [px, py, pz] = self.position;
        let [vx, vy, vz] = self.velocity;
        [px, py, pz, vx, vy, vz]
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn drag_coefficient(&self) -> f64 {
        self.drag_coefficient
    }

    pub fn reflectivity_coefficient(&self) -> f64 {
        self.reflectivity_coefficient
    }

    pub fn gravitational_parameter(&self) -> f64 {
        self.gravitational_parameter
    }

    pub fn body_radius(&self) -> f64 {
        self.body_radius
    }

    pub fn initial_julian_date(&self) -> f64 {
        self.initial_julian_date
    }

    /// The initial epoch as a UTC instant, if it is within chrono's range.
    pub fn initial_epoch(&self) -> Option<DateTime<Utc>> {
        crate::epoch::utc_from_julian_date(self.initial_julian_date)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Collects raw values; nothing is checked until [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct PropagationConfigBuilder {
    position: Vec<f64>,
    velocity: Vec<f64>,
    area: f64,
    mass: f64,
    initial_julian_date: f64,
    drag_coefficient: f64,
    reflectivity_coefficient: f64,
    gravitational_parameter: f64,
    body_radius: f64,
}

impl PropagationConfigBuilder {
    pub fn drag_coefficient(mut self, cd: f64) -> Self {
        self.drag_coefficient = cd;
        self
    }

    pub fn reflectivity_coefficient(mut self, cr: f64) -> Self {
        self.reflectivity_coefficient = cr;
        self
    }

    pub fn gravitational_parameter(mut self, mu: f64) -> Self {
        self.gravitational_parameter = mu;
        self
    }

    pub fn body_radius(mut self, radius: f64) -> Self {
        self.body_radius = radius;
        self
    }

    /// Validate every field and freeze the config.
    pub fn build(self) -> Result<PropagationConfig, ValidationError> {
        Ok(PropagationConfig {
            position: vector3("position", &self.position)?,
            velocity: vector3("velocity", &self.velocity)?,
            area: positive("area", self.area)?,
            mass: positive("mass", self.mass)?,
            drag_coefficient: non_negative("drag_coefficient", self.drag_coefficient)?,
            reflectivity_coefficient: non_negative(
                "reflectivity_coefficient",
                self.reflectivity_coefficient,
            )?,
            gravitational_parameter: positive(
                "gravitational_parameter",
                self.gravitational_parameter,
            )?,
            body_radius: positive("body_radius", self.body_radius)?,
            initial_julian_date: finite("initial_julian_date", self.initial_julian_date)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Serde shadow
// ---------------------------------------------------------------------------

/// Wire shape accepted by serde; optional fields fall back to the builder defaults.
#[derive(Debug, Deserialize)]
struct PropagationConfigDef {
    position: Vec<f64>,
    velocity: Vec<f64>,
    area: f64,
    mass: f64,
    initial_julian_date: f64,
    drag_coefficient: Option<f64>,
    reflectivity_coefficient: Option<f64>,
    gravitational_parameter: Option<f64>,
    body_radius: Option<f64>,
}

impl TryFrom<PropagationConfigDef> for PropagationConfig {
    type Error = ValidationError;

    fn try_from(def: PropagationConfigDef) -> Result<Self, Self::Error> {
        let mut builder = PropagationConfig::builder(
            def.position,
            def.velocity,
            def.area,
            def.mass,
            def.initial_julian_date,
        );
        if let Some(cd) = def.drag_coefficient {
            builder = builder.drag_coefficient(cd);
        }
        if let Some(cr) = def.reflectivity_coefficient {
            builder = builder.reflectivity_coefficient(cr);
        }
        if let Some(mu) = def.gravitational_parameter {
            builder = builder.gravitational_parameter(mu);
        }
        if let Some(radius) = def.body_radius {
            builder = builder.body_radius(radius);
        }
        builder.build()
    }
}

// ---------------------------------------------------------------------------
// Field checks
// ---------------------------------------------------------------------------

pub(crate) fn finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NonFinite { field, value })
    }
}

fn positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    let value = finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    let value = finite(field, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::Negative { field, value })
    }
}

fn vector3(field: &'static str, values: &[f64]) -> Result<[f64; 3], ValidationError> {
    let vector: [f64; 3] = values.try_into().map_err(|_| ValidationError::VectorArity {
        field,
        len: values.len(),
    })?;
    for component in vector {
        finite(field, component)?;
    }
    Ok(vector)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
