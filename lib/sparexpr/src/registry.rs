use crate::coercion::{ArgumentKind, NativeValue};
use crate::error::EvalError;
use rustc_hash::FxHashMap;
use sparterm::{NamedNode, NamedNodeRef, Term};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// The implementation of a registered function.
///
/// It receives the arguments already coerced following the function [`FunctionSignature`].
pub type FunctionImpl = Arc<dyn (Fn(&[NativeValue]) -> Result<Term, EvalError>) + Send + Sync>;

const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

/// The name a function is called by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FunctionName {
    /// A SPARQL built-in function keyword like `STR`, stored upper case
    Builtin(String),
    /// An extension function or a cast addressed by IRI
    Custom(NamedNode),
}

impl FunctionName {
    /// Names a built-in function. Keywords are case-insensitive.
    ///
    /// ```
    /// use sparexpr::FunctionName;
    ///
    /// assert_eq!(FunctionName::builtin("strlen"), FunctionName::builtin("STRLEN"));
    /// ```
    #[inline]
    pub fn builtin(keyword: &str) -> Self {
        Self::Builtin(keyword.to_ascii_uppercase())
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(keyword) => f.write_str(keyword),
            Self::Custom(iri) => iri.fmt(f),
        }
    }
}

impl From<NamedNode> for FunctionName {
    #[inline]
    fn from(iri: NamedNode) -> Self {
        Self::Custom(iri)
    }
}

impl From<NamedNodeRef<'_>> for FunctionName {
    #[inline]
    fn from(iri: NamedNodeRef<'_>) -> Self {
        Self::Custom(iri.into_owned())
    }
}

impl FromStr for FunctionName {
    type Err = FunctionNameParseError;

    /// Parses a built-in keyword (`STR`), an IRI with or without brackets,
    /// or an `xsd:` prefixed cast name.
    ///
    /// ```
    /// use sparexpr::FunctionName;
    /// use sparterm::NamedNode;
    /// use sparterm::vocab::xsd;
    /// use std::str::FromStr;
    ///
    /// assert_eq!(FunctionName::from_str("str")?, FunctionName::builtin("STR"));
    /// assert_eq!(FunctionName::from_str("xsd:float")?, xsd::FLOAT.into());
    /// assert_eq!(
    ///     FunctionName::from_str("<http://example.com/f>")?,
    ///     NamedNode::new("http://example.com/f")?.into()
    /// );
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let error = || FunctionNameParseError(s.to_owned());
        if s.starts_with('<') {
            return NamedNode::from_str(s).map(Self::Custom).map_err(|_| error());
        }
        if let Some(local) = s.strip_prefix("xsd:") {
            return NamedNode::new(format!("{XSD_NAMESPACE}{local}"))
                .map(Self::Custom)
                .map_err(|_| error());
        }
        if s.contains(':') {
            return NamedNode::new(s).map(Self::Custom).map_err(|_| error());
        }
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
            Ok(Self::builtin(s))
        } else {
            Err(error())
        }
    }
}

/// An error raised while parsing a [`FunctionName`].
#[derive(Debug, thiserror::Error)]
#[error("'{0}' is neither a built-in function keyword nor an absolute IRI")]
pub struct FunctionNameParseError(String);

/// The argument kinds a function takes. Its arity is the number of kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionSignature {
    arguments: Vec<ArgumentKind>,
}

impl FunctionSignature {
    #[inline]
    pub fn new(arguments: impl IntoIterator<Item = ArgumentKind>) -> Self {
        Self {
            arguments: arguments.into_iter().collect(),
        }
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    #[inline]
    pub fn arguments(&self) -> &[ArgumentKind] {
        &self.arguments
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, kind) in self.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            kind.fmt(f)?;
        }
        f.write_str(")")
    }
}

/// A function as stored in a [`FunctionRegistry`].
#[derive(Clone)]
pub struct RegisteredFunction {
    signature: FunctionSignature,
    implementation: FunctionImpl,
}

impl RegisteredFunction {
    #[inline]
    pub fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    /// Calls the implementation with already coerced arguments.
    #[inline]
    pub fn call(&self, arguments: &[NativeValue]) -> Result<Term, EvalError> {
        (self.implementation)(arguments)
    }
}

impl fmt::Debug for RegisteredFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredFunction")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Maps function names to their implementations.
///
/// Registration happens before evaluation starts. The registry is then shared read-only,
/// usually behind an [`Arc`], by all the evaluators that need it.
///
/// ```
/// use sparexpr::{ArgumentKind, EvalError, FunctionName, FunctionRegistry, FunctionSignature};
/// use sparterm::{Literal, NamedNode};
///
/// let twice = NamedNode::new("http://example.com/twice")?;
/// let registry = FunctionRegistry::new().with_function(
///     twice.clone(),
///     FunctionSignature::new([ArgumentKind::Numeric]),
///     |args| Ok(Literal::from(args[0].numeric()? * 2.).into()),
/// );
/// assert_eq!(registry.lookup(&twice.clone().into(), 1)?.signature().arity(), 1);
/// assert!(matches!(
///     registry.lookup(&twice.into(), 2),
///     Err(EvalError::ArityMismatch { expected: 1, actual: 2, .. })
/// ));
/// assert!(matches!(
///     registry.lookup(&FunctionName::builtin("STR"), 1),
///     Err(EvalError::UnknownFunction(_))
/// ));
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: FxHashMap<FunctionName, RegisteredFunction>,
}

impl FunctionRegistry {
    /// Builds an empty registry.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry with the SPARQL built-in functions and XSD casts.
    pub fn with_builtins() -> Self {
        crate::builtins::register_builtin_functions(Self::new())
    }

    /// Registers a function, replacing and returning any function previously registered under the same name.
    pub fn register(
        &mut self,
        name: impl Into<FunctionName>,
        signature: FunctionSignature,
        implementation: impl Fn(&[NativeValue]) -> Result<Term, EvalError> + Send + Sync + 'static,
    ) -> Option<RegisteredFunction> {
        let name = name.into();
        let function = RegisteredFunction {
            signature,
            implementation: Arc::new(implementation),
        };
        let previous = self.functions.insert(name.clone(), function);
        if let Some(previous) = &previous {
            tracing::debug!(
                function = %name,
                previous_signature = %previous.signature,
                "replaced a registered function"
            );
        }
        previous
    }

    /// Builder-style version of [`register`](Self::register).
    #[inline]
    #[must_use]
    pub fn with_function(
        mut self,
        name: impl Into<FunctionName>,
        signature: FunctionSignature,
        implementation: impl Fn(&[NativeValue]) -> Result<Term, EvalError> + Send + Sync + 'static,
    ) -> Self {
        self.register(name, signature, implementation);
        self
    }

    /// Finds the function to call with `arg_count` arguments.
    pub fn lookup(
        &self,
        name: &FunctionName,
        arg_count: usize,
    ) -> Result<&RegisteredFunction, EvalError> {
        let function = self
            .functions
            .get(name)
            .ok_or_else(|| EvalError::UnknownFunction(name.clone()))?;
        if function.signature.arity() != arg_count {
            return Err(EvalError::ArityMismatch {
                name: name.clone(),
                expected: function.signature.arity(),
                actual: arg_count,
            });
        }
        Ok(function)
    }

    #[inline]
    pub fn contains(&self, name: &FunctionName) -> bool {
        self.functions.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Iterates the registered functions, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&FunctionName, &RegisteredFunction)> {
        self.functions.iter()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.functions.keys().collect();
        names.sort();
        f.debug_struct("FunctionRegistry")
            .field("functions", &names)
            .finish()
    }
}
