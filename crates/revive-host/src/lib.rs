//! The host-language contract: a `Host` trait abstracting
//! "parse source", "evaluate source", and "enumerate a value's own
//! properties" so the rest of the workspace never assumes a JS engine is
//! linked in-process, plus one concrete implementation (`tree_walk`) that
//! exercises the whole pipeline end-to-end without one.

pub mod host;
pub mod tree_walk;
pub mod value;

pub use host::{FrameBinding, FrameBindings, Host, HostError, Program};
pub use tree_walk::TreeWalkHost;
pub use value::{
    BoundData, BufferData, BufferViewData, CollectionData, CollectionKind, ExtensibilityState, HostClassData,
    HostFunctionData, HostIdentity, HostValue, NativeFunctionData, ObjectData, ObjectKind, PropertyDescriptor,
    PropertyKey, SymbolCategory, SymbolData, TypedElementKind,
};
