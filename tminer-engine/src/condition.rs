//! # Conditions
//!
//! A small predicate language over resolved tokens. Conditions are a tagged
//! union; the textual form (`"active.size.key == normal"`, `"!props.$ghost"`) is a
//! convenience parsed by [`Condition::parse`].
//!
//! Binary operators are tried in a fixed order, first match wins:
//! `nin`, `in`, `!=`, `==`, `>`, `>=`, `<`, `<=`. Then the prefix markers `!!`
//! (equals false), `==` (equals true) and `!` (not set). Anything else means
//! "is set". The left side is always a token path; the right side is a literal.
//!
//! Text converted with `From` stays unparsed until evaluation, so it honors the
//! operator tokens of the engine it is evaluated with.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::active::ActiveState;
use crate::config::OperatorTokens;
use crate::engine::Engine;
use crate::properties::PropertyBag;
use crate::value;

/// Caller-supplied predicate over the property bag.
pub type Predicate = Arc<dyn Fn(&PropertyBag) -> bool + Send + Sync>;

/// A boolean predicate evaluated against a property bag.
#[derive(Clone)]
pub enum Condition {
    /// The token resolves to a truthy value.
    IsSet(String),
    /// The token is absent or falsy.
    IsNotSet(String),
    /// The token loosely equals `true`.
    IsTrue(String),
    /// The token loosely equals `false`.
    IsFalse(String),
    /// The token loosely equals the literal.
    Equals(String, String),
    /// The token does not loosely equal the literal.
    NotEquals(String, String),
    /// The token is greater than the literal.
    GreaterThan(String, String),
    /// The token is greater than or equal to the literal.
    GreaterOrEqual(String, String),
    /// The token is less than the literal.
    LessThan(String, String),
    /// The token is less than or equal to the literal.
    LessOrEqual(String, String),
    /// The token is a non-empty list containing the literal.
    In(String, String),
    /// The token is a non-empty list not containing the literal.
    NotIn(String, String),
    /// The token looks like a color string.
    IsColor(String),
    /// A caller-supplied predicate.
    Custom(Predicate),
    /// Every condition holds. Vacuously true when empty.
    All(Vec<Condition>),
    /// At least one condition holds. False when empty.
    Any(Vec<Condition>),
    /// Condition text, parsed with the engine's operator tokens on evaluation.
    Text(String),
}

type BinaryCtor = fn(String, String) -> Condition;

impl Condition {
    /// Parse a condition string with the default operator tokens.
    pub fn parse(text: &str) -> Self {
        Self::parse_with(text, &OperatorTokens::default())
    }

    /// Parse a condition string with custom operator tokens.
    ///
    /// Never fails: strings without an operator mean "is set".
    pub fn parse_with(text: &str, ops: &OperatorTokens) -> Self {
        let binary: [(&str, BinaryCtor); 8] = [
            (ops.nin.as_str(), Condition::NotIn),
            (ops.is_in.as_str(), Condition::In),
            (ops.ne.as_str(), Condition::NotEquals),
            (ops.eq.as_str(), Condition::Equals),
            (ops.gt.as_str(), Condition::GreaterThan),
            (ops.gte.as_str(), Condition::GreaterOrEqual),
            (ops.lt.as_str(), Condition::LessThan),
            (ops.lte.as_str(), Condition::LessOrEqual),
        ];

        for (token, ctor) in binary {
            if token.is_empty() {
                continue;
            }
            if let Some((path, literal)) = text.split_once(token) {
                return ctor(path.trim().to_string(), literal.trim().to_string());
            }
        }

        let prefixes: [(&str, fn(String) -> Condition); 3] = [
            (ops.is_false.as_str(), Condition::IsFalse),
            (ops.is_true.as_str(), Condition::IsTrue),
            (ops.nset.as_str(), Condition::IsNotSet),
        ];

        for (marker, ctor) in prefixes {
            if marker.is_empty() {
                continue;
            }
            if let Some(path) = text.strip_prefix(marker) {
                return ctor(path.trim().to_string());
            }
        }

        Condition::IsSet(text.trim().to_string())
    }

    /// Wrap a predicate.
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&PropertyBag) -> bool + Send + Sync + 'static,
    {
        Condition::Custom(Arc::new(predicate))
    }

    /// All of `conditions` must hold.
    pub fn all<I, C>(conditions: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Condition>,
    {
        Condition::All(conditions.into_iter().map(Into::into).collect())
    }

    /// Any of `conditions` must hold.
    pub fn any<I, C>(conditions: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Condition>,
    {
        Condition::Any(conditions.into_iter().map(Into::into).collect())
    }

    /// Evaluate against `props`, resolving token paths through `engine`.
    pub fn evaluate(
        &self,
        engine: &Engine,
        props: &PropertyBag,
        precomputed: Option<&ActiveState>,
    ) -> bool {
        let get = |path: &str| engine.resolve(path, props, precomputed);

        match self {
            Condition::IsSet(path) => value::is_set(get(path).as_ref()),
            Condition::IsNotSet(path) => !value::is_set(get(path).as_ref()),
            Condition::IsTrue(path) => match get(path) {
                Some(Value::Bool(b)) => b,
                Some(other) => value::as_number(&other) == Some(1.0),
                None => false,
            },
            Condition::IsFalse(path) => match get(path) {
                Some(Value::Bool(b)) => !b,
                Some(Value::String(s)) if s.trim().is_empty() => true,
                Some(other) => value::as_number(&other) == Some(0.0),
                None => false,
            },
            Condition::Equals(path, literal) => value::loose_eq(get(path).as_ref(), literal),
            Condition::NotEquals(path, literal) => !value::loose_eq(get(path).as_ref(), literal),
            Condition::GreaterThan(path, literal) => {
                value::loose_cmp(get(path).as_ref(), literal).map_or(false, |o| o.is_gt())
            }
            Condition::GreaterOrEqual(path, literal) => {
                value::loose_cmp(get(path).as_ref(), literal).map_or(false, |o| o.is_ge())
            }
            Condition::LessThan(path, literal) => {
                value::loose_cmp(get(path).as_ref(), literal).map_or(false, |o| o.is_lt())
            }
            Condition::LessOrEqual(path, literal) => {
                value::loose_cmp(get(path).as_ref(), literal).map_or(false, |o| o.is_le())
            }
            Condition::In(path, literal) => {
                value::contains(get(path).as_ref(), literal).unwrap_or(false)
            }
            Condition::NotIn(path, literal) => {
                value::contains(get(path).as_ref(), literal).map_or(false, |found| !found)
            }
            Condition::IsColor(path) => value::is_color(get(path).as_ref()),
            Condition::Custom(predicate) => predicate(props),
            Condition::All(conditions) => conditions
                .iter()
                .all(|c| c.evaluate(engine, props, precomputed)),
            Condition::Any(conditions) => conditions
                .iter()
                .any(|c| c.evaluate(engine, props, precomputed)),
            Condition::Text(text) => engine.condition(text).evaluate(engine, props, precomputed),
        }
    }
}

impl From<&str> for Condition {
    fn from(text: &str) -> Self {
        Condition::Text(text.to_string())
    }
}

impl From<String> for Condition {
    fn from(text: String) -> Self {
        Condition::Text(text)
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::IsSet(p) => f.debug_tuple("IsSet").field(p).finish(),
            Condition::IsNotSet(p) => f.debug_tuple("IsNotSet").field(p).finish(),
            Condition::IsTrue(p) => f.debug_tuple("IsTrue").field(p).finish(),
            Condition::IsFalse(p) => f.debug_tuple("IsFalse").field(p).finish(),
            Condition::Equals(p, l) => f.debug_tuple("Equals").field(p).field(l).finish(),
            Condition::NotEquals(p, l) => f.debug_tuple("NotEquals").field(p).field(l).finish(),
            Condition::GreaterThan(p, l) => f.debug_tuple("GreaterThan").field(p).field(l).finish(),
            Condition::GreaterOrEqual(p, l) => {
                f.debug_tuple("GreaterOrEqual").field(p).field(l).finish()
            }
            Condition::LessThan(p, l) => f.debug_tuple("LessThan").field(p).field(l).finish(),
            Condition::LessOrEqual(p, l) => f.debug_tuple("LessOrEqual").field(p).field(l).finish(),
            Condition::In(p, l) => f.debug_tuple("In").field(p).field(l).finish(),
            Condition::NotIn(p, l) => f.debug_tuple("NotIn").field(p).field(l).finish(),
            Condition::IsColor(p) => f.debug_tuple("IsColor").field(p).finish(),
            Condition::Custom(_) => write!(f, "Custom(..)"),
            Condition::All(c) => f.debug_tuple("All").field(c).finish(),
            Condition::Any(c) => f.debug_tuple("Any").field(c).finish(),
            Condition::Text(t) => f.debug_tuple("Text").field(t).finish(),
        }
    }
}

/// Function computing a branch value from the property bag.
pub type BranchFn = Arc<dyn Fn(&PropertyBag) -> Option<Value> + Send + Sync>;

/// One arm of a [`Cond`].
#[derive(Clone)]
pub enum Branch {
    /// A literal value.
    Value(Value),
    /// A token path resolved when the branch is taken.
    Token(String),
    /// A function invoked when the branch is taken.
    Compute(BranchFn),
}

impl Branch {
    /// Branch resolving a token path.
    pub fn token(path: impl Into<String>) -> Self {
        Branch::Token(path.into())
    }

    /// Branch computed by `f`.
    pub fn compute<F>(f: F) -> Self
    where
        F: Fn(&PropertyBag) -> Option<Value> + Send + Sync + 'static,
    {
        Branch::Compute(Arc::new(f))
    }

    fn produce(
        &self,
        engine: &Engine,
        props: &PropertyBag,
        precomputed: Option<&ActiveState>,
    ) -> Option<Value> {
        match self {
            Branch::Value(value) => Some(value.clone()),
            Branch::Token(path) => engine.resolve(path, props, precomputed),
            Branch::Compute(f) => f(props),
        }
    }
}

impl From<Value> for Branch {
    fn from(value: Value) -> Self {
        Branch::Value(value)
    }
}

impl From<&str> for Branch {
    fn from(text: &str) -> Self {
        Branch::Value(Value::String(text.to_string()))
    }
}

impl fmt::Debug for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Branch::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Branch::Token(p) => f.debug_tuple("Token").field(p).finish(),
            Branch::Compute(_) => write!(f, "Compute(..)"),
        }
    }
}

/// If/then/else selection.
///
/// ```rust
/// use tminer_engine::condition::Cond;
///
/// let uppercase = Cond::when("active.scale.key == sc-2")
///     .then("uppercase")
///     .otherwise("none");
/// ```
#[derive(Clone, Debug)]
pub struct Cond {
    /// The condition.
    pub when: Condition,
    /// Taken when the condition holds.
    pub then: Option<Branch>,
    /// Taken otherwise.
    pub otherwise: Option<Branch>,
}

impl Cond {
    /// Start a branch on `condition`.
    pub fn when(condition: impl Into<Condition>) -> Self {
        Self {
            when: condition.into(),
            then: None,
            otherwise: None,
        }
    }

    /// Set the branch taken when the condition holds.
    pub fn then(mut self, branch: impl Into<Branch>) -> Self {
        self.then = Some(branch.into());
        self
    }

    /// Set the branch taken when the condition fails.
    pub fn otherwise(mut self, branch: impl Into<Branch>) -> Self {
        self.otherwise = Some(branch.into());
        self
    }

    /// Evaluate the condition and produce the chosen branch, if any.
    pub fn resolve(
        &self,
        engine: &Engine,
        props: &PropertyBag,
        precomputed: Option<&ActiveState>,
    ) -> Option<Value> {
        let branch = if self.when.evaluate(engine, props, precomputed) {
            self.then.as_ref()
        } else {
            self.otherwise.as_ref()
        };
        branch.and_then(|b| b.produce(engine, props, precomputed))
    }
}
