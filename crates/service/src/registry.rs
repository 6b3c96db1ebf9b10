use crate::errors::{Result, ServiceError};

use log::{debug, info};
use samplebox_select::{
    ActiveLearningSelector, EquidistantSelector, SamplingPointSelector, SelectorConfig,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// Name of the active learning selector in the default registry
pub const ACTIVE_LEARNING_NAME: &str = "isse.activelearningselector";
/// Name of the equidistant selector in the default registry
pub const EQUIDISTANT_NAME: &str = "isse.equidistantselector";

/// A selector callable remotely
pub enum SelectorObject {
    /// Active learning selector backed by a regression forest
    ActiveLearning(Box<ActiveLearningSelector>),
    /// Equidistant selector
    Equidistant(EquidistantSelector),
}

impl SelectorObject {
    fn selector(&mut self) -> &mut dyn SamplingPointSelector {
        match self {
            SelectorObject::ActiveLearning(s) => s.as_mut(),
            SelectorObject::Equidistant(s) => s,
        }
    }
}

/// A remote call: a method of a named object with positional arguments
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Request {
    /// Registered name of the selector
    pub object: String,
    /// Method name (camelCase)
    pub method: String,
    /// Positional arguments
    #[serde(default)]
    pub args: Vec<Value>,
}

/// The answer to a [Request], serialized as `{"ok": value}` or `{"error": message}`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reply {
    /// Returned value, `null` for methods returning nothing
    Ok(Value),
    /// Error message
    Error(String),
}

fn arg<T: DeserializeOwned>(method: &str, args: &[Value], i: usize) -> Result<T> {
    let value = args.get(i).ok_or_else(|| ServiceError::ArgumentError {
        method: method.to_string(),
        reason: format!("missing argument #{i}"),
    })?;
    serde_json::from_value(value.clone()).map_err(|e| ServiceError::ArgumentError {
        method: method.to_string(),
        reason: format!("argument #{i}: {e}"),
    })
}

/// Selectors indexed by name
#[derive(Default)]
pub struct Registry {
    objects: BTreeMap<String, SelectorObject>,
}

impl Registry {
    /// Constructor of an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding an active learning selector configured with `config`
    /// and an equidistant selector under their default names.
    pub fn with_defaults(config: SelectorConfig) -> Result<Self> {
        let mut registry = Self::new();
        registry.register(
            ACTIVE_LEARNING_NAME,
            SelectorObject::ActiveLearning(Box::new(ActiveLearningSelector::new(config)?)),
        );
        registry.register(
            EQUIDISTANT_NAME,
            SelectorObject::Equidistant(EquidistantSelector::new()),
        );
        Ok(registry)
    }

    /// Register `object` under `name`, replacing any object of the same name
    pub fn register(&mut self, name: &str, object: SelectorObject) {
        info!("Register {name}");
        self.objects.insert(name.to_string(), object);
    }

    /// Registered names
    pub fn names(&self) -> Vec<&str> {
        self.objects.keys().map(|k| k.as_str()).collect()
    }

    /// Registered object
    pub fn get_mut(&mut self, name: &str) -> Option<&mut SelectorObject> {
        self.objects.get_mut(name)
    }

    /// Call the requested method
    pub fn dispatch(&mut self, request: &Request) -> Result<Value> {
        let Request {
            object,
            method,
            args,
        } = request;
        let target = self
            .objects
            .get_mut(object)
            .ok_or_else(|| ServiceError::UnknownObjectError(object.clone()))?;
        debug!("{object}.{method}({args:?})");

        let value = match (method.as_str(), &mut *target) {
            ("setFeasibleRegions", SelectorObject::ActiveLearning(s)) => {
                let lowers: Vec<f64> = arg(method, args, 0)?;
                let uppers: Vec<f64> = arg(method, args, 1)?;
                s.set_feasible_regions(&lowers, &uppers)?;
                Value::Null
            }
            ("setCompletePoints", SelectorObject::Equidistant(s)) => {
                let points: Vec<f64> = arg(method, args, 0)?;
                s.set_complete_points(&points);
                Value::Null
            }
            ("reset", target) => {
                // the equidistant selector may be reset without argument
                let n_points: usize = if args.is_empty() { 0 } else { arg(method, args, 0)? };
                target.selector().reset(n_points)?;
                Value::Null
            }
            ("setInitialPoints", target) => {
                let inputs: Vec<f64> = arg(method, args, 0)?;
                let outputs: Vec<f64> = arg(method, args, 1)?;
                target.selector().set_initial_points(&inputs, &outputs)?;
                Value::Null
            }
            ("setSampledPoints", target) => {
                let points: Vec<(f64, f64)> = arg(method, args, 0)?;
                target.selector().set_sampled_points(&points)?;
                Value::Null
            }
            ("inform", target) => {
                let input: f64 = arg(method, args, 0)?;
                let output: f64 = arg(method, args, 1)?;
                target.selector().inform(input, output)?;
                Value::Null
            }
            ("informFailure", target) => {
                let input: f64 = arg(method, args, 0)?;
                target.selector().inform_failure(input)?;
                Value::Null
            }
            ("hasNextInput", target) => json!(target.selector().has_next_input()),
            ("getNextInput", target) => json!(target.selector().get_next_input()?),
            _ => {
                return Err(ServiceError::UnknownMethodError {
                    object: object.clone(),
                    method: method.clone(),
                });
            }
        };
        Ok(value)
    }

    /// Answer a JSON request line with a JSON reply line
    pub fn handle_line(&mut self, line: &str) -> String {
        let reply = match serde_json::from_str::<Request>(line) {
            Ok(request) => match self.dispatch(&request) {
                Ok(value) => Reply::Ok(value),
                Err(err) => Reply::Error(err.to_string()),
            },
            Err(err) => Reply::Error(ServiceError::from(err).to_string()),
        };
        serde_json::to_string(&reply).unwrap_or_else(|err| {
            format!(r#"{{"error":"{}"}}"#, err.to_string().replace('"', "'"))
        })
    }
}
