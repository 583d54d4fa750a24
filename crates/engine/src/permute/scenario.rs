//! Scenario model and parsers.
//!
//! A scenario is a named list of (field, values) pairs. Three sources
//! exist: the default six-field cartesian product, `FIELD=V1,V2,…`
//! command-line arguments, and `PROFILE:` log files in which each
//! START/END block pins every listed field to a single value.

use serde::Deserialize;

use crate::error::EngineError;
use crate::permute::descriptor::{self, BitDescriptor};

/// One permutation field and the values it ranges over.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScenarioField {
    /// Bit-descriptor name.
    pub name: String,
    /// Symbolic values, a subset of the descriptor's domain.
    pub values: Vec<String>,
}

/// A named permutation scenario.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Scenario {
    /// Scenario name; prefixes per-point report files.
    pub name: String,
    /// Fields to permute, each with its value list.
    pub fields: Vec<ScenarioField>,
}

impl Scenario {
    /// The default scenario: the full cartesian product over the six
    /// default fields, values drawn from the registry domains.
    pub fn default_product(registry: &[BitDescriptor]) -> Self {
        let fields = descriptor::DEFAULT_FIELDS
            .iter()
            .filter_map(|&name| {
                registry.iter().find(|d| d.name == name).map(|d| ScenarioField {
                    name: name.to_owned(),
                    values: d.values.clone(),
                })
            })
            .collect();
        Self {
            name: "default".into(),
            fields,
        }
    }

    /// Parses `FIELD=V1,V2,…` argument strings into a scenario.
    pub fn from_args(
        name: &str,
        args: &[String],
        registry: &[BitDescriptor],
    ) -> Result<Self, EngineError> {
        let mut fields = Vec::new();
        for arg in args {
            let Some((field, values)) = arg.split_once('=') else {
                return Err(EngineError::InvalidScenario(format!(
                    "expected FIELD=VALUES, got: {arg}"
                )));
            };
            let descriptor = registry
                .iter()
                .find(|d| d.name == field)
                .ok_or_else(|| EngineError::InvalidScenario(format!("unknown field: {field}")))?;
            let values: Vec<String> = values.split(',').map(str::to_owned).collect();
            for value in &values {
                if !descriptor.values.contains(value) {
                    return Err(EngineError::InvalidScenario(format!(
                        "{field}: value {value} is not in the field's domain"
                    )));
                }
            }
            fields.push(ScenarioField {
                name: field.to_owned(),
                values,
            });
        }
        Ok(Self {
            name: name.to_owned(),
            fields,
        })
    }

    /// Parses a `PROFILE:` log into one scenario per START/END block.
    ///
    /// ```text
    /// PROFILE: START
    /// PROFILE: <option>=<value>
    /// …
    /// PROFILE: END
    /// ```
    ///
    /// Values are `true`, `false`, or a bareword enum tag; each block pins
    /// its fields to exactly one value. Malformed lines are fatal.
    pub fn parse_profile_log(
        input: &str,
        registry: &[BitDescriptor],
    ) -> Result<Vec<Scenario>, EngineError> {
        let mut scenarios = Vec::new();
        let mut current: Option<Vec<ScenarioField>> = None;
        let mut start_line = 0;

        for (number, raw) in input.lines().enumerate() {
            let number = number + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let Some(body) = line.strip_prefix("PROFILE:") else {
                return Err(EngineError::InvalidProfileLine {
                    line: number,
                    reason: format!("missing PROFILE: prefix: {line}"),
                });
            };
            let body = body.trim();
            match body {
                "START" => {
                    if current.is_some() {
                        return Err(EngineError::InvalidProfileLine {
                            line: number,
                            reason: "START inside an open profile block".into(),
                        });
                    }
                    current = Some(Vec::new());
                    start_line = number;
                }
                "END" => {
                    let Some(fields) = current.take() else {
                        return Err(EngineError::InvalidProfileLine {
                            line: number,
                            reason: "END without a matching START".into(),
                        });
                    };
                    scenarios.push(Scenario {
                        name: format!("profile{}", scenarios.len() + 1),
                        fields,
                    });
                }
                option => {
                    let Some(fields) = current.as_mut() else {
                        return Err(EngineError::InvalidProfileLine {
                            line: number,
                            reason: "option outside a profile block".into(),
                        });
                    };
                    let Some((field, value)) = option.split_once('=') else {
                        return Err(EngineError::InvalidProfileLine {
                            line: number,
                            reason: format!("expected option=value, got: {option}"),
                        });
                    };
                    let (field, value) = (field.trim(), value.trim());
                    let descriptor =
                        registry.iter().find(|d| d.name == field).ok_or_else(|| {
                            EngineError::InvalidProfileLine {
                                line: number,
                                reason: format!("unknown option: {field}"),
                            }
                        })?;
                    if !descriptor.values.iter().any(|v| v == value) {
                        return Err(EngineError::InvalidProfileLine {
                            line: number,
                            reason: format!("{field}: value out of domain: {value}"),
                        });
                    }
                    fields.push(ScenarioField {
                        name: field.to_owned(),
                        values: vec![value.to_owned()],
                    });
                }
            }
        }
        if current.is_some() {
            return Err(EngineError::InvalidProfileLine {
                line: start_line,
                reason: "unterminated profile block".into(),
            });
        }
        Ok(scenarios)
    }
}
