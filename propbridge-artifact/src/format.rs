//! The engine's `key=value` artifact format.
//!
//! ```text
//! initial_state=7000,0,0,0,7.5,0
//! area=10
//! cd=2.2
//! mass=500
//! mu=398600.435436
//! t0=0
//! tf=3600
//! dx=60
//! output_file=traj.txt
//! init_jd=2460000.5
//! cr=1.2
//! body_radius=6378
//! add_pertubations=true
//! ```
//!
//! Key order is part of the contract: some engines read positionally.
//! Numbers use `f64`'s shortest round-trip `Display`, so parsing a line back
//! yields the exact same bit pattern. Values are never quoted or escaped.

use std::collections::HashMap;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

use propbridge_core::{Perturbations, PropagationConfig, PropagationRequest};

use crate::error::{parse_err, ArtifactError};

pub const KEY_INITIAL_STATE: &str = "initial_state";
pub const KEY_AREA: &str = "area";
pub const KEY_DRAG_COEFFICIENT: &str = "cd";
pub const KEY_MASS: &str = "mass";
pub const KEY_MU: &str = "mu";
pub const KEY_START_TIME: &str = "t0";
pub const KEY_END_TIME: &str = "tf";
pub const KEY_STEP_SIZE: &str = "dx";
pub const KEY_OUTPUT_FILE: &str = "output_file";
pub const KEY_INITIAL_JD: &str = "init_jd";
pub const KEY_REFLECTIVITY_COEFFICIENT: &str = "cr";
pub const KEY_BODY_RADIUS: &str = "body_radius";
/// Misspelt on purpose: this is the key the engine reads.
pub const KEY_PERTURBATIONS: &str = "add_pertubations";

/// Every key, in the order it is written.
pub const KEYS: [&str; 13] = [
    KEY_INITIAL_STATE,
    KEY_AREA,
    KEY_DRAG_COEFFICIENT,
    KEY_MASS,
    KEY_MU,
    KEY_START_TIME,
    KEY_END_TIME,
    KEY_STEP_SIZE,
    KEY_OUTPUT_FILE,
    KEY_INITIAL_JD,
    KEY_REFLECTIVITY_COEFFICIENT,
    KEY_BODY_RADIUS,
    KEY_PERTURBATIONS,
];

// ---------------------------------------------------------------------------
// serialize
// ---------------------------------------------------------------------------

/// Render the full artifact text. Pure; no I/O.
pub fn serialize(config: &PropagationConfig, request: &PropagationRequest) -> String {
    format!(
        "{KEY_INITIAL_STATE}={state}\n\
         {KEY_AREA}={area}\n\
         {KEY_DRAG_COEFFICIENT}={cd}\n\
         {KEY_MASS}={mass}\n\
         {KEY_MU}={mu}\n\
         {KEY_START_TIME}={t0}\n\
         {KEY_END_TIME}={tf}\n\
         {KEY_STEP_SIZE}={dx}\n\
         {KEY_OUTPUT_FILE}={output}\n\
         {KEY_INITIAL_JD}={jd}\n\
         {KEY_REFLECTIVITY_COEFFICIENT}={cr}\n\
         {KEY_BODY_RADIUS}={radius}\n\
         {KEY_PERTURBATIONS}={perturbations}\n",
        state = join(&config.state_vector()),
        area = config.area(),
        cd = config.drag_coefficient(),
        mass = config.mass(),
        mu = config.gravitational_parameter(),
        t0 = request.start_time(),
        tf = request.end_time(),
        dx = request.step_size(),
        output = request.output_path().display(),
        jd = config.initial_julian_date(),
        cr = config.reflectivity_coefficient(),
        radius = config.body_radius(),
        perturbations = request.perturbations().as_literal(),
    )
}

fn join(values: &[f64]) -> String {
    values
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Lowercase hex SHA-256 of the artifact text.
pub fn digest(text: &str) -> String {
    let mut h = Sha256::new();
    h.update(text.as_bytes());
    hex::encode(h.finalize())
}

// ---------------------------------------------------------------------------
// parse
// ---------------------------------------------------------------------------

/// Read artifact text back into the config and request that produced it.
///
/// Lookup is by key, so order does not matter here. Blank lines, a trailing
/// `\r` and whitespace around keys are ignored. Values are taken verbatim
/// (numbers and the flag tolerate surrounding spaces; `output_file` does not,
/// since a path may legitimately start or end with one). Missing, duplicate
/// and unknown keys are errors.
pub fn parse(text: &str) -> Result<(PropagationConfig, PropagationRequest), ArtifactError> {
    let mut entries: HashMap<&str, (usize, &str)> = HashMap::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = raw.strip_suffix('\r').unwrap_or(raw);
        if content.trim().is_empty() {
            continue;
        }
        let (key, value) = content
            .split_once('=')
            .ok_or_else(|| parse_err(line, format!("expected `key=value`, got `{content}`")))?;
        let key = key.trim();
        if !KEYS.contains(&key) {
            return Err(parse_err(line, format!("unknown key `{key}`")));
        }
        if let Some((first, _)) = entries.insert(key, (line, value)) {
            return Err(parse_err(
                line,
                format!("duplicate key `{key}` (first seen on line {first})"),
            ));
        }
    }

    let entries = Entries(entries);
    let (state_line, state_text) = entries.get(KEY_INITIAL_STATE)?;
    let state = state_text
        .split(',')
        .map(|v| number(state_line, KEY_INITIAL_STATE, v.trim()))
        .collect::<Result<Vec<_>, _>>()?;
    if state.len() != 6 {
        return Err(parse_err(
            state_line,
            format!("{KEY_INITIAL_STATE} needs 6 values, got {}", state.len()),
        ));
    }

    let config = PropagationConfig::builder(
        &state[..3],
        &state[3..],
        entries.number(KEY_AREA)?,
        entries.number(KEY_MASS)?,
        entries.number(KEY_INITIAL_JD)?,
    )
    .drag_coefficient(entries.number(KEY_DRAG_COEFFICIENT)?)
    .reflectivity_coefficient(entries.number(KEY_REFLECTIVITY_COEFFICIENT)?)
    .gravitational_parameter(entries.number(KEY_MU)?)
    .body_radius(entries.number(KEY_BODY_RADIUS)?)
    .build()?;

    let (_, output) = entries.get(KEY_OUTPUT_FILE)?;
    let (flag_line, flag) = entries.get(KEY_PERTURBATIONS)?;
    let perturbations: Perturbations = flag
        .trim()
        .parse()
        .map_err(|e| parse_err(flag_line, format!("{KEY_PERTURBATIONS}: {e}")))?;

    let request = PropagationRequest::new(
        entries.number(KEY_START_TIME)?,
        entries.number(KEY_END_TIME)?,
        entries.number(KEY_STEP_SIZE)?,
        PathBuf::from(output),
    )?
    .with_perturbations(perturbations);

    Ok((config, request))
}

struct Entries<'a>(HashMap<&'a str, (usize, &'a str)>);

impl<'a> Entries<'a> {
    fn get(&self, key: &str) -> Result<(usize, &'a str), ArtifactError> {
        self.0
            .get(key)
            .copied()
            .ok_or_else(|| ArtifactError::MissingKey { key: key.to_string() })
    }

    fn number(&self, key: &str) -> Result<f64, ArtifactError> {
        let (line, value) = self.get(key)?;
        number(line, key, value)
    }
}

fn number(line: usize, key: &str, value: &str) -> Result<f64, ArtifactError> {
    let value = value.trim();
    value
        .parse::<f64>()
        .map_err(|e| parse_err(line, format!("{key}: `{value}` is not a number ({e})")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
