//! Primitive abstraction for the execution graph.
//!
//! Two-layer design:
//! - **`PrimitivePlugin` trait**: for user-defined primitives contributed at start-up.
//! - **`BuiltinPrimitive` enum**: for all built-in primitives. Dispatch is a
//!   match, no trait object involved.
//!
//! `AnyPrimitive` wraps either variant so instances can handle both uniformly.
//! A [`PrimitiveHandle`] is the shared, reference-counted handle to one
//! constructed instance; graphs are built by placing handles in the operand
//! lists of other instances.

use crate::execution::error::{PrimitiveError, PrimitiveResult, Site};
use crate::execution::placement::Locality;
use crate::execution::primitives::{
    AccessArgument, Arithmetic, Block, Comparison, ConstantsOfNature, ForOperation, IfOperation,
    ParallelBlock, Statistics, Store, Variable, WhileOperation,
};
use crate::types::Value;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

/// Arguments bound to one evaluation call.
pub type Args = Arc<[Value]>;

/// The future every evaluation returns.
pub type EvalFuture = BoxFuture<'static, PrimitiveResult<Value>>;

/// Empty argument list.
pub fn no_args() -> Args {
    Arc::from(Vec::new())
}

/// State shared by every primitive kind: the fixed operands and the site.
#[derive(Clone)]
pub struct PrimitiveBase {
    operands: Arc<[Value]>,
    site: Arc<Site>,
}

impl PrimitiveBase {
    pub fn new(operands: Vec<Value>, name: &str, codename: &str) -> Self {
        Self {
            operands: operands.into(),
            site: Arc::new(Site::new(name, codename)),
        }
    }

    pub fn operands(&self) -> &Arc<[Value]> {
        &self.operands
    }

    pub fn site(&self) -> &Arc<Site> {
        &self.site
    }

    pub fn name(&self) -> &str {
        &self.site.name
    }

    pub fn codename(&self) -> &str {
        &self.site.codename
    }

    pub fn no_operands(&self) -> bool {
        self.operands.is_empty()
    }

    /// Operands and arguments for one call.
    ///
    /// An instance constructed without operands takes its operands from the
    /// call arguments; those operands are then evaluated without arguments.
    pub fn bind(&self, args: &Args) -> (Arc<[Value]>, Args) {
        if self.operands.is_empty() {
            (Arc::clone(args), no_args())
        } else {
            (Arc::clone(&self.operands), Arc::clone(args))
        }
    }

    pub fn require_exact(&self, count: usize, message: &str) -> PrimitiveResult<()> {
        if self.operands.len() != count {
            return Err(PrimitiveError::arity(&self.site, message));
        }
        Ok(())
    }

    pub fn require_between(&self, min: usize, max: usize, message: &str) -> PrimitiveResult<()> {
        let n = self.operands.len();
        if n < min || n > max {
            return Err(PrimitiveError::arity(&self.site, message));
        }
        Ok(())
    }

    pub fn require_at_least(&self, min: usize, message: &str) -> PrimitiveResult<()> {
        if self.operands.len() < min {
            return Err(PrimitiveError::arity(&self.site, message));
        }
        Ok(())
    }

    /// Every operand must be a non-empty value.
    pub fn require_valid(&self, message: &str) -> PrimitiveResult<()> {
        if self.operands.iter().any(|op| !op.is_valid()) {
            return Err(PrimitiveError::invalid_operand(&self.site, message));
        }
        Ok(())
    }
}

/// Trait for user-defined primitives.
pub trait PrimitivePlugin: Send + Sync {
    /// Canonical primitive name, e.g. `"__ge"`.
    fn kind(&self) -> &str;

    /// Start evaluating with the given fixed state and call arguments.
    ///
    /// All work must happen inside the returned future so that it runs on the
    /// instance's locality.
    fn eval(&self, base: &PrimitiveBase, args: &Args) -> EvalFuture;
}

/// Enum dispatch for built-in primitives.
pub enum BuiltinPrimitive {
    Constant(ConstantsOfNature),
    Variable(Variable),
    Store(Store),
    Argument(AccessArgument),
    Compare(Comparison),
    Arithmetic(Arithmetic),
    Statistics(Statistics),
    For(ForOperation),
    While(WhileOperation),
    If(IfOperation),
    Block(Block),
    ParallelBlock(ParallelBlock),
}

impl BuiltinPrimitive {
    pub fn kind(&self) -> &str {
        match self {
            BuiltinPrimitive::Constant(p) => p.kind(),
            BuiltinPrimitive::Variable(p) => p.kind(),
            BuiltinPrimitive::Store(p) => p.kind(),
            BuiltinPrimitive::Argument(p) => p.kind(),
            BuiltinPrimitive::Compare(p) => p.kind(),
            BuiltinPrimitive::Arithmetic(p) => p.kind(),
            BuiltinPrimitive::Statistics(p) => p.kind(),
            BuiltinPrimitive::For(p) => p.kind(),
            BuiltinPrimitive::While(p) => p.kind(),
            BuiltinPrimitive::If(p) => p.kind(),
            BuiltinPrimitive::Block(p) => p.kind(),
            BuiltinPrimitive::ParallelBlock(p) => p.kind(),
        }
    }

    pub fn eval(&self, base: &PrimitiveBase, args: &Args) -> EvalFuture {
        match self {
            BuiltinPrimitive::Constant(p) => p.eval(base, args),
            BuiltinPrimitive::Variable(p) => p.eval(base, args),
            BuiltinPrimitive::Store(p) => p.eval(base, args),
            BuiltinPrimitive::Argument(p) => p.eval(base, args),
            BuiltinPrimitive::Compare(p) => p.eval(base, args),
            BuiltinPrimitive::Arithmetic(p) => p.eval(base, args),
            BuiltinPrimitive::Statistics(p) => p.eval(base, args),
            BuiltinPrimitive::For(p) => p.eval(base, args),
            BuiltinPrimitive::While(p) => p.eval(base, args),
            BuiltinPrimitive::If(p) => p.eval(base, args),
            BuiltinPrimitive::Block(p) => p.eval(base, args),
            BuiltinPrimitive::ParallelBlock(p) => p.eval(base, args),
        }
    }
}

/// Wrapper that holds either a built-in primitive or a plugin.
pub enum AnyPrimitive {
    Builtin(BuiltinPrimitive),
    Plugin(Box<dyn PrimitivePlugin>),
}

impl AnyPrimitive {
    pub fn kind(&self) -> &str {
        match self {
            AnyPrimitive::Builtin(p) => p.kind(),
            AnyPrimitive::Plugin(p) => p.kind(),
        }
    }

    pub fn eval(&self, base: &PrimitiveBase, args: &Args) -> EvalFuture {
        match self {
            AnyPrimitive::Builtin(p) => p.eval(base, args),
            AnyPrimitive::Plugin(p) => p.eval(base, args),
        }
    }
}

impl From<BuiltinPrimitive> for AnyPrimitive {
    fn from(p: BuiltinPrimitive) -> Self {
        AnyPrimitive::Builtin(p)
    }
}

impl From<Box<dyn PrimitivePlugin>> for AnyPrimitive {
    fn from(p: Box<dyn PrimitivePlugin>) -> Self {
        AnyPrimitive::Plugin(p)
    }
}

/// One constructed node of the execution graph.
pub struct PrimitiveInstance {
    base: PrimitiveBase,
    locality: Locality,
    primitive: AnyPrimitive,
}

/// Shared handle to a primitive instance.
///
/// Cloning is cheap. The instance lives as long as any handle does, including
/// handles held in other instances' operand lists.
#[derive(Clone)]
pub struct PrimitiveHandle(Arc<PrimitiveInstance>);

impl PrimitiveHandle {
    pub fn new(locality: Locality, base: PrimitiveBase, primitive: impl Into<AnyPrimitive>) -> Self {
        let primitive = primitive.into();
        tracing::debug!(
            "Created primitive '{}' as {} on {}",
            primitive.kind(),
            base.site(),
            locality.id()
        );
        Self(Arc::new(PrimitiveInstance {
            base,
            locality,
            primitive,
        }))
    }

    pub fn name(&self) -> &str {
        self.0.base.name()
    }

    pub fn codename(&self) -> &str {
        self.0.base.codename()
    }

    pub fn site(&self) -> &Site {
        self.0.base.site()
    }

    pub fn kind(&self) -> &str {
        self.0.primitive.kind()
    }

    pub fn locality(&self) -> &Locality {
        &self.0.locality
    }

    pub fn operands(&self) -> &[Value] {
        self.0.base.operands()
    }

    pub fn as_builtin(&self) -> Option<&BuiltinPrimitive> {
        match &self.0.primitive {
            AnyPrimitive::Builtin(p) => Some(p),
            AnyPrimitive::Plugin(_) => None,
        }
    }

    /// Evaluate with freshly bound arguments.
    pub fn evaluate(&self, args: Vec<Value>) -> EvalFuture {
        self.evaluate_shared(args.into())
    }

    /// Evaluate with arguments shared with sibling evaluations.
    pub fn evaluate_shared(&self, args: Args) -> EvalFuture {
        let instance = &self.0;
        let job = instance.primitive.eval(&instance.base, &args);
        instance.locality.run(instance.base.site(), job)
    }

    pub fn ptr_eq(&self, other: &PrimitiveHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for PrimitiveHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for PrimitiveHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimitiveHandle")
            .field("kind", &self.kind())
            .field("name", &self.name())
            .field("locality", &self.locality().id())
            .finish()
    }
}
