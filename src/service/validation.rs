//! Request validation from per-field rules.

use crate::error::AppError;
use crate::model::FuelType;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationRule {
    /// Value must be present, non-null and, for strings, non-blank.
    pub required: bool,
    pub minimum: Option<f64>,
    pub allowed: Option<Vec<Value>>,
}

impl ValidationRule {
    pub fn required() -> Self {
        ValidationRule {
            required: true,
            ..Default::default()
        }
    }

    pub fn min(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(values.into_iter().map(|s| Value::String(s.into())).collect());
        self
    }
}

/// Ordered field rules, keyed by the JSON field name of the request.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    rules: Vec<(&'static str, ValidationRule)>,
}

impl RuleSet {
    pub fn new() -> Self {
        RuleSet { rules: Vec::new() }
    }

    pub fn field(mut self, name: &'static str, rule: ValidationRule) -> Self {
        self.rules.push((name, rule));
        self
    }

    pub fn car() -> Self {
        RuleSet::new()
            .field("name", ValidationRule::required())
            .field("year", ValidationRule::required().min(1886.0))
            .field("brand", ValidationRule::required())
            .field(
                "fuelType",
                ValidationRule::required().one_of(FuelType::ALL.iter().map(|f| f.as_str())),
            )
            .field("engine", ValidationRule::required())
            .field("price", ValidationRule::required().min(1.0))
    }

    pub fn engine() -> Self {
        RuleSet::new()
            .field("displacement", ValidationRule::required().min(1.0))
            .field("noOfCylinders", ValidationRule::required().min(1.0))
            .field("carRange", ValidationRule::required().min(1.0))
    }
}

/// Immutable validator handed to a service at construction.
#[derive(Clone, Debug)]
pub struct RequestValidator {
    rules: Arc<RuleSet>,
}

impl RequestValidator {
    pub fn new(rules: RuleSet) -> Self {
        RequestValidator {
            rules: Arc::new(rules),
        }
    }

    /// Validate a typed request. Every violation is reported, joined by `"; "`.
    pub fn validate<T: Serialize>(&self, request: &T) -> Result<(), AppError> {
        let value = serde_json::to_value(request)
            .map_err(|e| AppError::BadRequest(format!("request is not serializable: {}", e)))?;
        match value {
            Value::Object(body) => self.validate_map(&body),
            _ => Err(AppError::BadRequest("body must be a JSON object".into())),
        }
    }

    pub fn validate_map(&self, body: &Map<String, Value>) -> Result<(), AppError> {
        let violations: Vec<String> = self
            .rules
            .rules
            .iter()
            .filter_map(|(field, rule)| check_field(field, body.get(*field), rule))
            .collect();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(violations.join("; ")))
        }
    }
}

fn check_field(field: &str, value: Option<&Value>, rule: &ValidationRule) -> Option<String> {
    let v = match value {
        None | Some(Value::Null) => {
            return rule.required.then(|| format!("{} is required", field));
        }
        Some(v) => v,
    };
    if rule.required {
        if let Some(s) = v.as_str() {
            if s.trim().is_empty() {
                return Some(format!("{} is required", field));
            }
        }
    }
    if let Some(ref allowed) = rule.allowed {
        if !allowed.iter().any(|a| value_eq(v, a)) {
            let names: Vec<String> = allowed
                .iter()
                .map(|a| a.as_str().map(str::to_string).unwrap_or_else(|| a.to_string()))
                .collect();
            return Some(format!("{} must be one of: {}", field, names.join(", ")));
        }
    }
    if let Some(min) = rule.minimum {
        if let Some(n) = v.as_f64() {
            if n < min {
                return Some(format!("{} must be at least {}", field, min));
            }
        }
    }
    None
}

fn value_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::String(s), Value::String(t)) => s == t,
        (Value::Number(n), Value::Number(m)) => n.as_f64() == m.as_f64(),
        _ => a == b,
    }
}
