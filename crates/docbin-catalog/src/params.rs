//! Parameter schemas, values and validation
//!
//! Parameters cross the catalog boundary as a loosely typed map of
//! [`ParamValue`]s (typically parsed from JSON, where numbers may arrive as
//! floats even when they are integral). [`resolve`] checks such a map
//! against an algorithm's schema and produces [`ResolvedParams`], in which
//! every schema parameter is present with its canonical type.

use crate::{CatalogError, CatalogResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Declared type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Int,
    Float,
    Bool,
    Enum,
}

/// A parameter value
///
/// Deserialized without a tag: JSON `5` is `Int`, `5.0` is `Float`,
/// `true` is `Bool` and `"x"` is `Enum`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Enum(String),
}

impl ParamValue {
    fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Int(_) => "int",
            ParamValue::Float(_) => "float",
            ParamValue::Bool(_) => "bool",
            ParamValue::Enum(_) => "string",
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Enum(v.to_string())
    }
}

/// Parameter map as supplied by a caller
pub type ParameterMap = BTreeMap<String, ParamValue>;

/// Parse a JSON object into a [`ParameterMap`]
///
/// # Examples
///
/// ```
/// use docbin_catalog::{ParamValue, parse_params_json};
///
/// let params = parse_params_json(r#"{"window_size": 25.0, "k": 0.3}"#).unwrap();
/// assert_eq!(params["window_size"], ParamValue::Float(25.0));
/// ```
pub fn parse_params_json(json: &str) -> CatalogResult<ParameterMap> {
    Ok(serde_json::from_str(json)?)
}

/// Schema entry of one parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ParamType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max: Option<f64>,
    pub default: ParamValue,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub options: Vec<String>,
}

impl ParameterSpec {
    /// Integer parameter in `[min, max]`
    pub fn int(name: &str, min: i64, max: i64, default: i64, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ParamType::Int,
            min: Some(min as f64),
            max: Some(max as f64),
            default: ParamValue::Int(default),
            description: description.to_string(),
            options: Vec::new(),
        }
    }

    /// Float parameter in `[min, max]`
    pub fn float(name: &str, min: f64, max: f64, default: f64, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ParamType::Float,
            min: Some(min),
            max: Some(max),
            default: ParamValue::Float(default),
            description: description.to_string(),
            options: Vec::new(),
        }
    }

    /// Boolean parameter
    pub fn bool(name: &str, default: bool, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ParamType::Bool,
            min: None,
            max: None,
            default: ParamValue::Bool(default),
            description: description.to_string(),
            options: Vec::new(),
        }
    }

    /// Parameter restricted to a fixed set of names
    pub fn enumeration(name: &str, options: &[&str], default: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ParamType::Enum,
            min: None,
            max: None,
            default: ParamValue::Enum(default.to_string()),
            description: description.to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn check_range(&self, v: f64) -> CatalogResult<()> {
        if let Some(min) = self.min
            && v < min
        {
            return Err(CatalogError::validation(
                &self.name,
                format!("{} is below the minimum {}", v, min),
            ));
        }
        if let Some(max) = self.max
            && v > max
        {
            return Err(CatalogError::validation(
                &self.name,
                format!("{} is above the maximum {}", v, max),
            ));
        }
        Ok(())
    }

    /// Coerce a supplied value to this parameter's type and check it
    pub fn coerce(&self, value: &ParamValue) -> CatalogResult<ParamValue> {
        let mismatch = || {
            CatalogError::validation(
                &self.name,
                format!("expected {:?}, got {}", self.kind, value.type_name()),
            )
        };
        match (self.kind, value) {
            (ParamType::Int, ParamValue::Int(i)) => {
                self.check_range(*i as f64)?;
                Ok(ParamValue::Int(*i))
            }
            (ParamType::Int, ParamValue::Float(f)) => {
                if !f.is_finite() {
                    return Err(CatalogError::validation(
                        &self.name,
                        format!("{} is not a finite number", f),
                    ));
                }
                let rounded = f.round();
                self.check_range(rounded)?;
                Ok(ParamValue::Int(rounded as i64))
            }
            (ParamType::Float, ParamValue::Float(f)) => {
                if !f.is_finite() {
                    return Err(CatalogError::validation(
                        &self.name,
                        format!("{} is not a finite number", f),
                    ));
                }
                self.check_range(*f)?;
                Ok(ParamValue::Float(*f))
            }
            (ParamType::Float, ParamValue::Int(i)) => {
                self.check_range(*i as f64)?;
                Ok(ParamValue::Float(*i as f64))
            }
            (ParamType::Bool, ParamValue::Bool(b)) => Ok(ParamValue::Bool(*b)),
            (ParamType::Enum, ParamValue::Enum(s)) => {
                if self.options.iter().any(|o| o == s) {
                    Ok(ParamValue::Enum(s.clone()))
                } else {
                    Err(CatalogError::validation(
                        &self.name,
                        format!("{:?} is not one of {:?}", s, self.options),
                    ))
                }
            }
            _ => Err(mismatch()),
        }
    }
}

/// Parameters after schema validation: every schema entry present, each
/// with its declared type
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParams {
    values: BTreeMap<String, ParamValue>,
}

impl ResolvedParams {
    fn get(&self, name: &str) -> CatalogResult<&ParamValue> {
        self.values
            .get(name)
            .ok_or_else(|| CatalogError::validation(name, "not declared in the schema"))
    }

    /// Integer parameter
    pub fn int(&self, name: &str) -> CatalogResult<i64> {
        match self.get(name)? {
            ParamValue::Int(i) => Ok(*i),
            other => Err(CatalogError::validation(
                name,
                format!("resolved as {}, not int", other.type_name()),
            )),
        }
    }

    /// Non-negative integer parameter as `u32`
    pub fn uint(&self, name: &str) -> CatalogResult<u32> {
        let i = self.int(name)?;
        u32::try_from(i).map_err(|_| CatalogError::validation(name, format!("{} out of range", i)))
    }

    /// Float parameter
    pub fn float(&self, name: &str) -> CatalogResult<f64> {
        match self.get(name)? {
            ParamValue::Float(f) => Ok(*f),
            other => Err(CatalogError::validation(
                name,
                format!("resolved as {}, not float", other.type_name()),
            )),
        }
    }

    /// Boolean parameter
    pub fn bool(&self, name: &str) -> CatalogResult<bool> {
        match self.get(name)? {
            ParamValue::Bool(b) => Ok(*b),
            other => Err(CatalogError::validation(
                name,
                format!("resolved as {}, not bool", other.type_name()),
            )),
        }
    }

    /// Enum parameter
    pub fn choice(&self, name: &str) -> CatalogResult<&str> {
        match self.get(name)? {
            ParamValue::Enum(s) => Ok(s.as_str()),
            other => Err(CatalogError::validation(
                name,
                format!("resolved as {}, not enum", other.type_name()),
            )),
        }
    }

    /// The resolved values as a plain map
    pub fn to_map(&self) -> ParameterMap {
        self.values.clone()
    }
}

/// Default value of every parameter in a schema
pub fn defaults(schema: &[ParameterSpec]) -> ParameterMap {
    schema
        .iter()
        .map(|spec| (spec.name.clone(), spec.default.clone()))
        .collect()
}

/// Validate a supplied map against a schema
///
/// Missing parameters take their defaults; parameters not in the schema
/// are ignored.
pub fn resolve(schema: &[ParameterSpec], params: &ParameterMap) -> CatalogResult<ResolvedParams> {
    for name in params.keys() {
        if !schema.iter().any(|spec| &spec.name == name) {
            debug!(param = %name, "ignoring unknown parameter");
        }
    }

    let mut values = BTreeMap::new();
    for spec in schema {
        let value = match params.get(&spec.name) {
            Some(v) => spec.coerce(v)?,
            None => spec.coerce(&spec.default)?,
        };
        values.insert(spec.name.clone(), value);
    }
    Ok(ResolvedParams { values })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::int("window_size", 3, 101, 15, "window"),
            ParameterSpec::float("k", -1.0, 1.0, -0.2, "weight"),
            ParameterSpec::bool("interpolation", true, "interpolate"),
            ParameterSpec::enumeration("mode", &["fast", "exact"], "fast", "mode"),
        ]
    }

    #[test]
    fn test_json_value_kinds() {
        let p = parse_params_json(r#"{"a": 5, "b": 5.0, "c": true, "d": "x"}"#).unwrap();
        assert_eq!(p["a"], ParamValue::Int(5));
        assert_eq!(p["b"], ParamValue::Float(5.0));
        assert_eq!(p["c"], ParamValue::Bool(true));
        assert_eq!(p["d"], ParamValue::Enum("x".into()));
        assert!(matches!(
            parse_params_json("[1, 2]"),
            Err(CatalogError::Json(_))
        ));
    }

    #[test]
    fn test_defaults_fill_missing() {
        let r = resolve(&schema(), &ParameterMap::new()).unwrap();
        assert_eq!(r.int("window_size").unwrap(), 15);
        assert_eq!(r.float("k").unwrap(), -0.2);
        assert!(r.bool("interpolation").unwrap());
        assert_eq!(r.choice("mode").unwrap(), "fast");
        assert_eq!(r.to_map(), defaults(&schema()));
    }

    #[test]
    fn test_coercion() {
        let mut p = ParameterMap::new();
        p.insert("window_size".into(), 24.6f64.into());
        p.insert("k".into(), 1i64.into());
        let r = resolve(&schema(), &p).unwrap();
        assert_eq!(r.int("window_size").unwrap(), 25);
        assert_eq!(r.float("k").unwrap(), 1.0);
    }

    #[test]
    fn test_validation_errors() {
        let cases: Vec<(&str, ParamValue)> = vec![
            ("window_size", ParamValue::Int(2)),
            ("window_size", ParamValue::Float(101.6)),
            ("window_size", ParamValue::Float(f64::NAN)),
            ("window_size", ParamValue::Bool(true)),
            ("k", ParamValue::Float(1.5)),
            ("k", ParamValue::Float(f64::INFINITY)),
            ("interpolation", ParamValue::Int(1)),
            ("mode", ParamValue::Enum("slow".into())),
        ];
        for (name, value) in cases {
            let mut p = ParameterMap::new();
            p.insert(name.into(), value.clone());
            match resolve(&schema(), &p) {
                Err(CatalogError::Validation { param, .. }) => assert_eq!(param, name),
                other => panic!("{name} = {value:?}: expected validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_unknown_ignored() {
        let mut p = ParameterMap::new();
        p.insert("colour".into(), "red".into());
        let r = resolve(&schema(), &p).unwrap();
        assert!(!r.to_map().contains_key("colour"));
        assert!(r.int("colour").is_err());
    }

    #[test]
    fn test_schema_serializes() {
        let json = serde_json::to_value(schema()).unwrap();
        assert_eq!(json[0]["type"], "int");
        assert_eq!(json[0]["min"], 3.0);
        assert_eq!(json[3]["options"][1], "exact");
        assert!(json[2].get("min").is_none());
    }
}
