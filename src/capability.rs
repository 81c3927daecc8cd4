use std::collections::BTreeSet;
use std::fmt::Display;
use std::sync::Mutex;

use append_only_vec::AppendOnlyVec;

///
/// Identifiers of the operations that a ring context may provide.
///
/// The first eight entries ([`OpId::CORE`]) must be provided by every ring, all
/// other operations can be synthesized generically from more primitive ones, as
/// described by [`OpId::generic_recipe()`].
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OpId {
    Zero, One, SetSi, Add, Neg, Mul, IsZero, Equal,
    Sub, Sqr, MulSi, AddMul, SubMul, PowUi, IsOne, IsNegOne,
    Inv, Div, DivExact, IsInvertible, Sqrt, IsSquare, Exp, Log, Gcd,
    RandomElement, VecDot, PolyMullow, MatMul, MatDet
}

impl OpId {

    pub const CORE: [OpId; 8] = [OpId::Zero, OpId::One, OpId::SetSi, OpId::Add, OpId::Neg, OpId::Mul, OpId::IsZero, OpId::Equal];

    pub const ALL: [OpId; 30] = [
        OpId::Zero, OpId::One, OpId::SetSi, OpId::Add, OpId::Neg, OpId::Mul, OpId::IsZero, OpId::Equal,
        OpId::Sub, OpId::Sqr, OpId::MulSi, OpId::AddMul, OpId::SubMul, OpId::PowUi, OpId::IsOne, OpId::IsNegOne,
        OpId::Inv, OpId::Div, OpId::DivExact, OpId::IsInvertible, OpId::Sqrt, OpId::IsSquare, OpId::Exp, OpId::Log, OpId::Gcd,
        OpId::RandomElement, OpId::VecDot, OpId::PolyMullow, OpId::MatMul, OpId::MatDet
    ];

    pub fn is_core(self) -> bool {
        Self::CORE.contains(&self)
    }

    ///
    /// Returns the operations from which a generic default of this operation
    /// is built, or `None` if there is no such default.
    ///
    /// Operations without a recipe still have a default implementation, but it
    /// only handles trivial inputs (e.g. inverting `1`) and returns
    /// [`crate::status::Status::Unable`] otherwise.
    ///
    pub fn generic_recipe(self) -> Option<&'static [OpId]> {
        match self {
            OpId::Zero | OpId::One | OpId::SetSi | OpId::Add | OpId::Neg | OpId::Mul | OpId::IsZero | OpId::Equal => None,
            OpId::Sub => Some(&[OpId::Neg, OpId::Add]),
            OpId::Sqr => Some(&[OpId::Mul]),
            OpId::MulSi => Some(&[OpId::SetSi, OpId::Mul]),
            OpId::AddMul => Some(&[OpId::Mul, OpId::Add]),
            OpId::SubMul => Some(&[OpId::Mul, OpId::Sub]),
            OpId::PowUi => Some(&[OpId::One, OpId::Sqr, OpId::Mul]),
            OpId::IsOne => Some(&[OpId::One, OpId::Equal]),
            OpId::IsNegOne => Some(&[OpId::One, OpId::Neg, OpId::Equal]),
            OpId::Div => Some(&[OpId::Inv, OpId::Mul]),
            OpId::DivExact => Some(&[OpId::Div]),
            OpId::IsInvertible => Some(&[OpId::Inv]),
            OpId::IsSquare => Some(&[OpId::Sqrt]),
            OpId::RandomElement => Some(&[OpId::SetSi]),
            OpId::VecDot => Some(&[OpId::Mul, OpId::Add]),
            OpId::PolyMullow => Some(&[OpId::Mul, OpId::Add, OpId::Sub]),
            OpId::MatMul => Some(&[OpId::VecDot]),
            OpId::MatDet => Some(&[OpId::Mul, OpId::Sub]),
            OpId::Inv | OpId::Sqrt | OpId::Exp | OpId::Log | OpId::Gcd => None
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OpId::Zero => "zero",
            OpId::One => "one",
            OpId::SetSi => "set_si",
            OpId::Add => "add",
            OpId::Neg => "neg",
            OpId::Mul => "mul",
            OpId::IsZero => "is_zero",
            OpId::Equal => "equal",
            OpId::Sub => "sub",
            OpId::Sqr => "sqr",
            OpId::MulSi => "mul_si",
            OpId::AddMul => "addmul",
            OpId::SubMul => "submul",
            OpId::PowUi => "pow_ui",
            OpId::IsOne => "is_one",
            OpId::IsNegOne => "is_neg_one",
            OpId::Inv => "inv",
            OpId::Div => "div",
            OpId::DivExact => "divexact",
            OpId::IsInvertible => "is_invertible",
            OpId::Sqrt => "sqrt",
            OpId::IsSquare => "is_square",
            OpId::Exp => "exp",
            OpId::Log => "log",
            OpId::Gcd => "gcd",
            OpId::RandomElement => "random_element",
            OpId::VecDot => "vec_dot",
            OpId::PolyMullow => "poly_mullow",
            OpId::MatMul => "mat_mul",
            OpId::MatDet => "mat_det"
        }
    }
}

impl Display for OpId {

    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

///
/// The kind of a ring. Capability tables are shared between all rings of the
/// same kind.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RingKind {
    Integer,
    Rational,
    ModularInteger,
    Real64,
    RealBall,
    Polynomial,
    SeriesMod,
    ///
    /// Kinds defined outside of this crate.
    ///
    Custom(&'static str)
}

///
/// How an operation is implemented for a ring kind.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    ///
    /// The ring provides its own implementation.
    ///
    Specific,
    ///
    /// The operation is synthesized from the given more primitive operations,
    /// all of which are available.
    ///
    Generic(&'static [OpId]),
    ///
    /// The operation is available only in the trivial cases handled by the default
    /// implementation, and will return [`crate::status::Status::Unable`] otherwise.
    ///
    Unsupported
}

impl Method {

    pub fn is_supported(self) -> bool {
        self != Method::Unsupported
    }
}

///
/// The registry of operations a ring kind implements itself.
///
/// Tables are built once per [`RingKind`] through [`CapabilityTable::register()`]
/// and are immutable afterwards. Per-instance differences between rings of the
/// same kind (e.g. whether `Z/nZ` is a field) are not expressed here, but through
/// context predicates like [`crate::ring::RingBase::ctx_is_field()`].
///
#[derive(Debug)]
pub struct CapabilityTable {
    kind: RingKind,
    specific: BTreeSet<OpId>
}

pub struct CapabilityTableBuilder {
    kind: RingKind,
    specific: BTreeSet<OpId>
}

impl CapabilityTableBuilder {

    pub fn new(kind: RingKind) -> Self {
        CapabilityTableBuilder { kind, specific: BTreeSet::new() }
    }

    pub fn provide(mut self, ops: &[OpId]) -> Self {
        self.specific.extend(ops.iter().copied());
        return self;
    }

    ///
    /// # Panics
    ///
    /// Panics if one of the [`OpId::CORE`] operations is missing, since these cannot
    /// be synthesized generically.
    ///
    pub fn build(self) -> CapabilityTable {
        for op in OpId::CORE {
            assert!(self.specific.contains(&op), "ring kind {:?} does not provide the core operation {}", self.kind, op);
        }
        CapabilityTable { kind: self.kind, specific: self.specific }
    }
}

static TABLES: AppendOnlyVec<CapabilityTable> = AppendOnlyVec::new();
static REGISTRATION_LOCK: Mutex<()> = Mutex::new(());

fn lookup(kind: RingKind) -> Option<&'static CapabilityTable> {
    (0..TABLES.len()).map(|i| &TABLES[i]).find(|table| table.kind == kind)
}

impl CapabilityTable {

    ///
    /// Returns the capability table of the given ring kind, building it with `build`
    /// if this is the first time the kind is used.
    ///
    /// Registration is idempotent and safe to call concurrently: the table is built
    /// at most once, and all callers receive a reference to the same table. Once a
    /// kind is registered, `build` is ignored in later calls.
    ///
    pub fn register<F>(kind: RingKind, build: F) -> &'static CapabilityTable
        where F: FnOnce(CapabilityTableBuilder) -> CapabilityTableBuilder
    {
        if let Some(table) = lookup(kind) {
            return table;
        }
        let _guard = REGISTRATION_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(table) = lookup(kind) {
            return table;
        }
        let table = build(CapabilityTableBuilder::new(kind)).build();
        tracing::debug!(kind = ?kind, specific = table.specific.len(), "registered capability table");
        let index = TABLES.push(table);
        return &TABLES[index];
    }

    pub fn registered(kind: RingKind) -> Option<&'static CapabilityTable> {
        lookup(kind)
    }

    pub fn kind(&self) -> RingKind {
        self.kind
    }

    pub fn provides(&self, op: OpId) -> bool {
        self.specific.contains(&op)
    }

    ///
    /// Determines how `op` is implemented for this ring kind.
    ///
    pub fn resolve(&self, op: OpId) -> Method {
        if self.specific.contains(&op) {
            return Method::Specific;
        }
        match op.generic_recipe() {
            Some(recipe) if recipe.iter().all(|dep| self.resolve(*dep).is_supported()) => Method::Generic(recipe),
            _ => Method::Unsupported
        }
    }
}

#[cfg(test)]
fn minimal(builder: CapabilityTableBuilder) -> CapabilityTableBuilder {
    builder.provide(&OpId::CORE)
}

#[test]
fn test_resolve_generic_default() {
    let table = CapabilityTable::register(RingKind::Custom("test_resolve_generic_default"), minimal);
    assert_eq!(Method::Specific, table.resolve(OpId::Add));
    assert_eq!(Method::Generic(&[OpId::Neg, OpId::Add]), table.resolve(OpId::Sub));
    assert_eq!(Method::Unsupported, table.resolve(OpId::Inv));
    assert_eq!(Method::Unsupported, table.resolve(OpId::Div));
    assert!(table.resolve(OpId::PowUi).is_supported());
    assert!(table.resolve(OpId::MatMul).is_supported());
}

#[test]
fn test_resolve_with_inverse() {
    let table = CapabilityTable::register(RingKind::Custom("test_resolve_with_inverse"), |b| minimal(b).provide(&[OpId::Inv]));
    assert_eq!(Method::Generic(&[OpId::Inv, OpId::Mul]), table.resolve(OpId::Div));
    assert_eq!(Method::Generic(&[OpId::Div]), table.resolve(OpId::DivExact));
    assert_eq!(Method::Generic(&[OpId::Inv]), table.resolve(OpId::IsInvertible));
}

#[test]
fn test_register_idempotent() {
    let kind = RingKind::Custom("test_register_idempotent");
    let first = CapabilityTable::register(kind, minimal);
    let second = CapabilityTable::register(kind, |b| minimal(b).provide(&[OpId::Sqrt]));
    assert!(std::ptr::eq(first, second));
    assert!(!second.provides(OpId::Sqrt));
    assert!(std::ptr::eq(first, CapabilityTable::registered(kind).unwrap()));
}

#[test]
fn test_register_concurrently() {
    let kind = RingKind::Custom("test_register_concurrently");
    let handles = (0..8).map(|_| std::thread::spawn(move || {
        CapabilityTable::register(kind, minimal) as *const CapabilityTable as usize
    })).collect::<Vec<_>>();
    let addresses = handles.into_iter().map(|h| h.join().unwrap()).collect::<Vec<_>>();
    assert!(addresses.iter().all(|a| *a == addresses[0]));
    assert_eq!(1, (0..TABLES.len()).filter(|i| TABLES[*i].kind == kind).count());
}

#[test]
#[should_panic]
fn test_missing_core_op() {
    let _ = CapabilityTable::register(RingKind::Custom("test_missing_core_op"), |b| b.provide(&[OpId::Add, OpId::Mul]));
}
