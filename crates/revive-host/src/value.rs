//! `HostValue`: the runtime value representation every revive crate above
//! `revive-host` treats as "a live value in the host's memory". Mirrors how
//! real engines represent every reference kind as one object shape carrying
//! internal slots, rather than a separate Rust enum variant per node kind.

use revive_ast::FunctionFlavor;
use revive_tracker::CaptureDescriptor;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A host value. Primitives with structural equality are stored inline;
/// every reference kind shares one heap representation (`ObjectData`)
/// distinguished by `ObjectKind`, node-kind list.
#[derive(Clone)]
pub enum HostValue {
    Undefined,
    Null,
    Boolean(bool),
    /// Excludes `-0`, distinguished from `+0` separately below since
    /// `-0.0_f64 == 0.0_f64` under IEEE rules, so we carry it
    /// as a sum-type tag rather than trusting bit-identical comparison.
    Number(f64),
    NegativeZero,
    String(Rc<str>),
    /// Decimal digit text, arbitrary precision not evaluated by this
    /// reference host.
    BigInt(Rc<str>),
    Symbol(Rc<SymbolData>),
    Object(Rc<RefCell<ObjectData>>),
}

impl fmt::Debug for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::Undefined => write!(f, "undefined"),
            HostValue::Null => write!(f, "null"),
            HostValue::Boolean(b) => write!(f, "{b}"),
            HostValue::Number(n) => write!(f, "{n}"),
            HostValue::NegativeZero => write!(f, "-0"),
            HostValue::String(s) => write!(f, "{s:?}"),
            HostValue::BigInt(s) => write!(f, "{s}n"),
            HostValue::Symbol(s) => write!(f, "Symbol({:?})", s.description),
            HostValue::Object(o) => write!(f, "Object(#{:?})", Rc::as_ptr(o)),
        }
    }
}

/// Stable identity for reference-typed values. Primitives with structural equality
/// are deliberately excluded — they dedup by value, not by identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HostIdentity(usize);

impl HostValue {
    pub fn identity(&self) -> Option<HostIdentity> {
        match self {
            HostValue::Object(o) => Some(HostIdentity(Rc::as_ptr(o) as usize)),
            HostValue::Symbol(s) => Some(HostIdentity(Rc::as_ptr(s) as usize)),
            _ => None,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, HostValue::Object(_))
    }

    pub fn as_object(&self) -> Option<&Rc<RefCell<ObjectData>>> {
        match self {
            HostValue::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn truthy(&self) -> bool {
        match self {
            HostValue::Undefined | HostValue::Null => false,
            HostValue::Boolean(b) => *b,
            HostValue::Number(n) => *n != 0.0 && !n.is_nan(),
            HostValue::NegativeZero => false,
            HostValue::String(s) => !s.is_empty(),
            HostValue::BigInt(s) => s != "0",
            HostValue::Symbol(_) | HostValue::Object(_) => true,
        }
    }

    pub fn type_of(&self) -> &'static str {
        match self {
            HostValue::Undefined => "undefined",
            HostValue::Null => "object",
            HostValue::Boolean(_) => "boolean",
            HostValue::Number(_) | HostValue::NegativeZero => "number",
            HostValue::String(_) => "string",
            HostValue::BigInt(_) => "bigint",
            HostValue::Symbol(_) => "symbol",
            HostValue::Object(o) => {
                if matches!(
                    o.borrow().kind,
                    ObjectKind::Function(_) | ObjectKind::Bound(_) | ObjectKind::Class(_) | ObjectKind::Native(_)
                ) {
                    "function"
                } else {
                    "object"
                }
            }
        }
    }

    pub fn object(kind: ObjectKind, prototype: Option<HostValue>) -> HostValue {
        HostValue::Object(Rc::new(RefCell::new(ObjectData {
            kind,
            properties: IndexMap::new(),
            prototype,
            extensibility: ExtensibilityState::Extensible,
        })))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolCategory {
    Unique,
    Registered,
    WellKnown,
}

#[derive(Debug)]
pub struct SymbolData {
    pub id: u64,
    pub description: Option<Rc<str>>,
    pub category: SymbolCategory,
}

static NEXT_SYMBOL_ID: AtomicU64 = AtomicU64::new(0);

impl SymbolData {
    pub fn new(description: Option<Rc<str>>, category: SymbolCategory) -> Rc<SymbolData> {
        Rc::new(SymbolData { id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed), description, category })
    }
}

/// Property keys.
#[derive(Clone, Debug)]
pub enum PropertyKey {
    String(Rc<str>),
    Symbol(Rc<SymbolData>),
}

impl PartialEq for PropertyKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropertyKey::String(a), PropertyKey::String(b)) => a == b,
            (PropertyKey::Symbol(a), PropertyKey::Symbol(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}
impl Eq for PropertyKey {}
impl std::hash::Hash for PropertyKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            PropertyKey::String(s) => {
                0u8.hash(state);
                s.hash(state);
            }
            PropertyKey::Symbol(s) => {
                1u8.hash(state);
                (Rc::as_ptr(s) as usize).hash(state);
            }
        }
    }
}

impl PropertyKey {
    /// The canonical array index this key names, if any: a string of
    /// decimal digits with no leading zero (other than `"0"` itself) that
    /// fits in a `usize`. `Array` objects store their indexed slots in
    /// `ObjectKind::Array`'s element vector rather than in the generic
    /// `properties` map, so every array-aware lookup goes through this
    /// first.
    pub fn as_array_index(&self) -> Option<usize> {
        let PropertyKey::String(s) = self else { return None };
        if s.is_empty() || (s.len() > 1 && s.starts_with('0')) || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse().ok()
    }
}

/// A property descriptor: either a
/// data property or an accessor pair, plus the three attribute flags.
#[derive(Clone, Debug)]
pub enum PropertyDescriptor {
    Data { value: HostValue, writable: bool, enumerable: bool, configurable: bool },
    Accessor { get: Option<HostValue>, set: Option<HostValue>, enumerable: bool, configurable: bool },
}

impl PropertyDescriptor {
    pub fn data(value: HostValue) -> Self {
        PropertyDescriptor::Data { value, writable: true, enumerable: true, configurable: true }
    }

    pub fn configurable(&self) -> bool {
        match self {
            PropertyDescriptor::Data { configurable, .. } => *configurable,
            PropertyDescriptor::Accessor { configurable, .. } => *configurable,
        }
    }

    pub fn enumerable(&self) -> bool {
        match self {
            PropertyDescriptor::Data { enumerable, .. } => *enumerable,
            PropertyDescriptor::Accessor { enumerable, .. } => *enumerable,
        }
    }

    pub fn writable(&self) -> bool {
        match self {
            PropertyDescriptor::Data { writable, .. } => *writable,
            PropertyDescriptor::Accessor { .. } => false,
        }
    }

    pub fn value(&self) -> Option<&HostValue> {
        match self {
            PropertyDescriptor::Data { value, .. } => Some(value),
            PropertyDescriptor::Accessor { .. } => None,
        }
    }
}

/// Extensibility state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExtensibilityState {
    #[default]
    Extensible,
    PreventExtensions,
    Sealed,
    Frozen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectionKind {
    Set,
    Map,
    WeakSet,
    WeakMap,
}

impl CollectionKind {
    pub fn is_map_like(self) -> bool {
        matches!(self, CollectionKind::Map | CollectionKind::WeakMap)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypedElementKind {
    I8,
    U8,
    U8Clamped,
    I16,
    U16,
    I32,
    U32,
    F32,
    F64,
    BigI64,
    BigU64,
}

impl TypedElementKind {
    pub fn byte_size(self) -> usize {
        match self {
            TypedElementKind::I8 | TypedElementKind::U8 | TypedElementKind::U8Clamped => 1,
            TypedElementKind::I16 | TypedElementKind::U16 => 2,
            TypedElementKind::I32 | TypedElementKind::U32 | TypedElementKind::F32 => 4,
            TypedElementKind::F64 | TypedElementKind::BigI64 | TypedElementKind::BigU64 => 8,
        }
    }

    /// Decodes one element at `bytes[0..byte_size()]` (little-endian, the
    /// platform every typed-array constructor defaults to) into the
    /// `HostValue` a read of that slot should observe.
    pub fn read(self, bytes: &[u8]) -> HostValue {
        match self {
            TypedElementKind::I8 => HostValue::Number(bytes[0] as i8 as f64),
            TypedElementKind::U8 | TypedElementKind::U8Clamped => HostValue::Number(bytes[0] as f64),
            TypedElementKind::I16 => HostValue::Number(i16::from_le_bytes([bytes[0], bytes[1]]) as f64),
            TypedElementKind::U16 => HostValue::Number(u16::from_le_bytes([bytes[0], bytes[1]]) as f64),
            TypedElementKind::I32 => HostValue::Number(i32::from_le_bytes(bytes[..4].try_into().unwrap()) as f64),
            TypedElementKind::U32 => HostValue::Number(u32::from_le_bytes(bytes[..4].try_into().unwrap()) as f64),
            TypedElementKind::F32 => HostValue::Number(f32::from_le_bytes(bytes[..4].try_into().unwrap()) as f64),
            TypedElementKind::F64 => HostValue::Number(f64::from_le_bytes(bytes[..8].try_into().unwrap())),
            TypedElementKind::BigI64 => HostValue::BigInt(i64::from_le_bytes(bytes[..8].try_into().unwrap()).to_string()),
            TypedElementKind::BigU64 => HostValue::BigInt(u64::from_le_bytes(bytes[..8].try_into().unwrap()).to_string()),
        }
    }

    /// Encodes `value` into `bytes[0..byte_size()]`; out-of-range numbers
    /// truncate the way `ToInt32`/`ToUint8Clamp` do, rather than panicking.
    pub fn write(self, bytes: &mut [u8], value: &HostValue) {
        if matches!(self, TypedElementKind::BigI64 | TypedElementKind::BigU64) {
            let digits = match value {
                HostValue::BigInt(digits) => digits.as_str(),
                _ => "0",
            };
            let signed: i64 = digits.parse().unwrap_or(0);
            bytes[..8].copy_from_slice(&signed.to_le_bytes());
            return;
        }
        let n = match value {
            HostValue::Number(n) => *n,
            HostValue::NegativeZero => 0.0,
            HostValue::BigInt(digits) => digits.parse::<i64>().unwrap_or(0) as f64,
            _ => return,
        };
        match self {
            TypedElementKind::I8 => bytes[0] = (n as i64 as i8) as u8,
            TypedElementKind::U8 => bytes[0] = n as i64 as u8,
            TypedElementKind::U8Clamped => bytes[0] = n.round().clamp(0.0, 255.0) as u8,
            TypedElementKind::I16 => bytes[..2].copy_from_slice(&(n as i64 as i16).to_le_bytes()),
            TypedElementKind::U16 => bytes[..2].copy_from_slice(&(n as i64 as u16).to_le_bytes()),
            TypedElementKind::I32 => bytes[..4].copy_from_slice(&(n as i64 as i32).to_le_bytes()),
            TypedElementKind::U32 => bytes[..4].copy_from_slice(&(n as i64 as u32).to_le_bytes()),
            TypedElementKind::F32 => bytes[..4].copy_from_slice(&(n as f32).to_le_bytes()),
            TypedElementKind::F64 => bytes[..8].copy_from_slice(&n.to_le_bytes()),
            TypedElementKind::BigI64 | TypedElementKind::BigU64 => unreachable!("handled above"),
        }
    }

    /// The constructor name the emitter/graph-builder renders this view
    /// under.
    pub fn constructor_name(self) -> &'static str {
        match self {
            TypedElementKind::I8 => "Int8Array",
            TypedElementKind::U8 => "Uint8Array",
            TypedElementKind::U8Clamped => "Uint8ClampedArray",
            TypedElementKind::I16 => "Int16Array",
            TypedElementKind::U16 => "Uint16Array",
            TypedElementKind::I32 => "Int32Array",
            TypedElementKind::U32 => "Uint32Array",
            TypedElementKind::F32 => "Float32Array",
            TypedElementKind::F64 => "Float64Array",
            TypedElementKind::BigI64 => "BigInt64Array",
            TypedElementKind::BigU64 => "BigUint64Array",
        }
    }
}

/// The payload distinguishing one `ObjectData` shape from another.
pub enum ObjectKind {
    Plain,
    /// Dense or sparse slots; a `None` element is a
    /// hole. Indexed access goes through `PropertyKey::as_array_index`
    /// rather than `ObjectData.properties`; `length` is derived from this
    /// vector's length rather than stored as a descriptor.
    Array(Vec<Option<HostValue>>),
    Function(HostFunctionData),
    Class(HostClassData),
    Bound(BoundData),
    /// Built-in globals (`Map`, `Array.isArray`, `console.log`, ...): a
    /// native closure rather than an AST body, invoked the same way as any
    /// other callable.
    Native(NativeFunctionData),
    Collection(CollectionData),
    Buffer(BufferData),
    BufferView(BufferViewData),
    /// Marker only — `message`/`stack`/`cause` are ordinary own properties
    /// like any other object; the prototype chain carries class identity.
    Error,
    Regex { pattern: Rc<str>, flags: Rc<str> },
    Boxed(HostValue),
    GlobalRef(Vec<Rc<str>>),
    ModuleRef { module: Rc<str>, export: Option<Rc<str>> },
}

pub struct HostFunctionData {
    pub key: revive_tracker::HostFunctionKey,
    pub identity: revive_ast::FunctionId,
    pub flavor: FunctionFlavor,
    /// Original source text for this function literal, used by the
    /// emitter to re-synthesize its body and as the verbatim fallback when capture metadata is
    /// missing.
    pub source_text: Rc<str>,
    /// `None` when produced by uninstrumented source.
    pub capture: Option<Arc<CaptureDescriptor>>,
    /// `capture.info_record.free_names` with each `Atom` resolved to text
    /// against the defining program's interner at closure-creation time
    /// (the only moment both the atom and that interner are in scope
    /// together — see `TreeWalkHost::make_closure_with_super`). Empty when
    /// `capture` is `None`.
    pub resolved_free_names: Vec<(Rc<str>, Vec<revive_instrument::NameUsage>)>,
}

pub struct HostClassData {
    pub constructor: HostValue,
    pub super_class: Option<HostValue>,
    /// `false` when the class declared no `constructor` method; `new` then
    /// forwards straight to `super_class`'s constructor instead of running
    /// `constructor`'s (placeholder) body.
    pub has_explicit_constructor: bool,
}

#[derive(Clone)]
pub struct NativeFunctionData {
    pub name: Rc<str>,
    #[allow(clippy::type_complexity)]
    pub call: Rc<dyn Fn(&crate::tree_walk::TreeWalkHost, HostValue, Vec<HostValue>) -> Result<HostValue, crate::host::HostError>>,
}

impl fmt::Debug for NativeFunctionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunctionData({})", self.name)
    }
}

pub struct BoundData {
    pub target: HostValue,
    pub bound_this: HostValue,
    pub bound_args: Vec<HostValue>,
}

pub struct CollectionData {
    pub kind: CollectionKind,
    /// Value component is `None` for `Set`/`WeakSet` entries.
    pub entries: Vec<(HostValue, Option<HostValue>)>,
}

pub struct BufferData {
    pub bytes: Rc<RefCell<Vec<u8>>>,
    pub shared: bool,
}

pub struct BufferViewData {
    pub buffer: HostValue,
    pub element_kind: TypedElementKind,
    pub byte_offset: usize,
    pub length: usize,
}

pub struct ObjectData {
    pub kind: ObjectKind,
    /// Host observation order: insertion order is
    /// preserved as-is; the *emitter* is responsible for the string/symbol
    /// interleaving rule, not this map.
    pub properties: IndexMap<PropertyKey, PropertyDescriptor>,
    pub prototype: Option<HostValue>,
    pub extensibility: ExtensibilityState,
}

impl ObjectData {
    pub fn get_own(&self, key: &PropertyKey) -> Option<&PropertyDescriptor> {
        self.properties.get(key)
    }

    pub fn set_own(&mut self, key: PropertyKey, descriptor: PropertyDescriptor) {
        self.properties.insert(key, descriptor);
    }

    pub fn own_keys(&self) -> Vec<PropertyKey> {
        self.properties.keys().cloned().collect()
    }
}
