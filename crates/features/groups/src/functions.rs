//! Aggregation functions and their name-based registry.
//!
//! Functions are persisted by name (see
//! [`GroupFunctionSpec`]); the [`FunctionRegistry`] maps those names back to
//! executable combinators through explicit constructor closures, so adding a
//! custom function is a single `register` call.

use crate::error::GroupError;
use fxhash::FxHashMap;
use hearth_domain::{Command, GroupFunctionSpec, State};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::warn;

/// A combinator that folds member states into a single group state.
pub trait GroupFunction: std::fmt::Debug + Send + Sync {
    /// The named, persistable form of this function.
    fn spec(&self) -> GroupFunctionSpec;

    /// Folds the states of the group's members into the group state.
    fn calculate(&self, states: &[State]) -> State;

    /// Rewrites a command sent to the group into the per-member command.
    ///
    /// `None` means this function does not decompose commands; the engine
    /// then forwards the original command to members unmodified.
    fn decompose(&self, _command: &Command) -> Option<Command> {
        None
    }
}

/// Common state iff every defined member state is identical, else undefined.
#[derive(Debug, Default, Clone, Copy)]
pub struct Equality;

impl GroupFunction for Equality {
    fn spec(&self) -> GroupFunctionSpec {
        GroupFunctionSpec::new("EQUALITY", vec![])
    }

    fn calculate(&self, states: &[State]) -> State {
        let mut defined = states.iter().filter(|s| !s.is_undef());
        let Some(first) = defined.next() else {
            return State::Undef;
        };
        if defined.all(|s| s == first) { first.clone() } else { State::Undef }
    }
}

/// Logical AND over two designated states: `active` iff every member holds
/// it, undefined when there are no members.
#[derive(Debug, Clone)]
pub struct All {
    pub active: State,
    pub inactive: State,
}

impl GroupFunction for All {
    fn spec(&self) -> GroupFunctionSpec {
        GroupFunctionSpec::new("AND", vec![self.active.to_string(), self.inactive.to_string()])
    }

    fn calculate(&self, states: &[State]) -> State {
        if states.is_empty() {
            return State::Undef;
        }
        if states.iter().all(|s| *s == self.active) {
            self.active.clone()
        } else {
            self.inactive.clone()
        }
    }

    fn decompose(&self, command: &Command) -> Option<Command> {
        Some(command.clone())
    }
}

/// Logical OR over two designated states: `active` iff at least one member
/// holds it, undefined when there are no members.
#[derive(Debug, Clone)]
pub struct Any {
    pub active: State,
    pub inactive: State,
}

impl GroupFunction for Any {
    fn spec(&self) -> GroupFunctionSpec {
        GroupFunctionSpec::new("OR", vec![self.active.to_string(), self.inactive.to_string()])
    }

    fn calculate(&self, states: &[State]) -> State {
        if states.is_empty() {
            return State::Undef;
        }
        if states.iter().any(|s| *s == self.active) {
            self.active.clone()
        } else {
            self.inactive.clone()
        }
    }

    fn decompose(&self, command: &Command) -> Option<Command> {
        Some(command.clone())
    }
}

/// How a numeric fold combines its members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumericKind {
    Sum,
    Avg,
    Min,
    Max,
}

/// Arithmetic over the numeric member states. Members without a numeric
/// state do not contribute; with no contributors the result is undefined.
#[derive(Debug, Clone, Copy)]
pub struct Arithmetic {
    kind: NumericKind,
}

impl Arithmetic {
    #[must_use]
    pub const fn sum() -> Self {
        Self { kind: NumericKind::Sum }
    }

    #[must_use]
    pub const fn avg() -> Self {
        Self { kind: NumericKind::Avg }
    }

    #[must_use]
    pub const fn min() -> Self {
        Self { kind: NumericKind::Min }
    }

    #[must_use]
    pub const fn max() -> Self {
        Self { kind: NumericKind::Max }
    }
}

impl GroupFunction for Arithmetic {
    fn spec(&self) -> GroupFunctionSpec {
        let name = match self.kind {
            NumericKind::Sum => "SUM",
            NumericKind::Avg => "AVG",
            NumericKind::Min => "MIN",
            NumericKind::Max => "MAX",
        };
        GroupFunctionSpec::new(name, vec![])
    }

    fn calculate(&self, states: &[State]) -> State {
        let numbers: Vec<f64> = states.iter().filter_map(State::as_number).collect();
        if numbers.is_empty() {
            return State::Undef;
        }

        #[allow(clippy::cast_precision_loss)]
        let value = match self.kind {
            NumericKind::Sum => numbers.iter().sum(),
            NumericKind::Avg => numbers.iter().sum::<f64>() / numbers.len() as f64,
            NumericKind::Min => numbers.iter().copied().fold(f64::INFINITY, f64::min),
            NumericKind::Max => numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        };
        State::Number(value)
    }
}

/// Number of members whose textual state equals the pattern parameter.
#[derive(Debug, Clone)]
pub struct Count {
    pub pattern: String,
}

impl GroupFunction for Count {
    fn spec(&self) -> GroupFunctionSpec {
        GroupFunctionSpec::new("COUNT", vec![self.pattern.clone()])
    }

    fn calculate(&self, states: &[State]) -> State {
        let matched = states.iter().filter(|s| s.to_string() == self.pattern).count();
        #[allow(clippy::cast_precision_loss)]
        State::Number(matched as f64)
    }
}

type Constructor =
    Arc<dyn Fn(&[String]) -> Result<Arc<dyn GroupFunction>, GroupError> + Send + Sync>;

/// Maps persisted function names to constructor closures.
///
/// Names are matched case-insensitively. Unknown names resolve to
/// [`Equality`] with a warning rather than failing the whole group: a
/// record written by a newer version with an unknown function still loads.
pub struct FunctionRegistry {
    ctors: RwLock<FxHashMap<String, Constructor>>,
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self.ctors.read().keys().cloned().collect();
        f.debug_struct("FunctionRegistry").field("functions", &names).finish()
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl FunctionRegistry {
    /// A registry pre-populated with the built-in functions.
    #[must_use]
    pub fn with_builtins() -> Self {
        let registry = Self { ctors: RwLock::new(FxHashMap::default()) };
        registry.register("EQUALITY", |_| Ok(Arc::new(Equality)));
        registry.register("AND", |params| {
            let (active, inactive) = two_state_params("AND", params)?;
            Ok(Arc::new(All { active, inactive }))
        });
        registry.register("OR", |params| {
            let (active, inactive) = two_state_params("OR", params)?;
            Ok(Arc::new(Any { active, inactive }))
        });
        registry.register("SUM", |_| Ok(Arc::new(Arithmetic::sum())));
        registry.register("AVG", |_| Ok(Arc::new(Arithmetic::avg())));
        registry.register("MIN", |_| Ok(Arc::new(Arithmetic::min())));
        registry.register("MAX", |_| Ok(Arc::new(Arithmetic::max())));
        registry.register("COUNT", |params| {
            let pattern = params.first().ok_or_else(|| GroupError::BadParams {
                message: "COUNT needs a pattern parameter".into(),
                context: None,
            })?;
            Ok(Arc::new(Count { pattern: pattern.clone() }))
        });
        registry
    }

    /// Registers (or replaces) a constructor under `name`.
    pub fn register<F>(&self, name: &str, ctor: F)
    where
        F: Fn(&[String]) -> Result<Arc<dyn GroupFunction>, GroupError> + Send + Sync + 'static,
    {
        self.ctors.write().insert(name.to_ascii_uppercase(), Arc::new(ctor));
    }

    /// Constructs the function registered under `name`.
    ///
    /// # Errors
    /// [`GroupError::UnknownFunction`] when nothing is registered under
    /// `name`, or whatever the constructor itself rejects.
    pub fn create(
        &self,
        name: &str,
        params: &[String],
    ) -> Result<Arc<dyn GroupFunction>, GroupError> {
        let ctor = self
            .ctors
            .read()
            .get(&name.to_ascii_uppercase())
            .cloned()
            .ok_or_else(|| GroupError::UnknownFunction { message: name.to_owned().into(), context: None })?;
        ctor(params)
    }

    /// Resolves a persisted spec, defaulting to [`Equality`] when the name
    /// is unknown.
    ///
    /// # Errors
    /// Propagates [`GroupError::BadParams`] from the constructor; an unknown
    /// name is not an error.
    pub fn resolve(&self, spec: &GroupFunctionSpec) -> Result<Arc<dyn GroupFunction>, GroupError> {
        match self.create(&spec.name, &spec.params) {
            Err(GroupError::UnknownFunction { .. }) => {
                warn!(function = %spec.name, "Unknown group function, defaulting to EQUALITY");
                Ok(Arc::new(Equality))
            },
            other => other,
        }
    }
}

/// Interprets a textual function parameter as a state value.
///
/// `ON`/`OFF` map to switch states, parseable numbers to number states,
/// anything else stays text.
#[must_use]
pub fn state_from_param(param: &str) -> State {
    match param {
        "ON" => State::Switch(true),
        "OFF" => State::Switch(false),
        _ => param
            .parse::<f64>()
            .map_or_else(|_| State::Text(param.to_owned()), State::Number),
    }
}

fn two_state_params(name: &str, params: &[String]) -> Result<(State, State), GroupError> {
    match params {
        [active, inactive, ..] => Ok((state_from_param(active), state_from_param(inactive))),
        _ => Err(GroupError::BadParams {
            message: format!("{name} needs active and inactive state parameters").into(),
            context: None,
        }),
    }
}
