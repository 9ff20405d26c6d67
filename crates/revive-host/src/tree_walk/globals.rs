//! The built-in globals the tree-walker starts every program with: just
//! enough of `console`, `Object`, `Array`, the collection/buffer
//! constructors, the error hierarchy, `Symbol`, and `eval` for the value
//! graph builder to recognize real programs' output. Each is an `ObjectKind::Native` value so it
//! calls through exactly the same `Host::call`/`Host::construct` path as
//! any user-defined closure.

use crate::host::{Host, HostError};
use crate::tree_walk::interpreter::to_display_string;
use crate::tree_walk::TreeWalkHost;
use crate::value::*;
use std::cell::RefCell;
use std::rc::Rc;

fn native(name: &str, f: impl Fn(&TreeWalkHost, HostValue, Vec<HostValue>) -> Result<HostValue, HostError> + 'static) -> HostValue {
    HostValue::object(ObjectKind::Native(NativeFunctionData { name: Rc::from(name), call: Rc::new(f) }), None)
}

fn set(target: &HostValue, key: &str, value: HostValue) {
    if let Some(obj) = target.as_object() {
        obj.borrow_mut().set_own(
            PropertyKey::String(Rc::from(key)),
            PropertyDescriptor::Data { value, writable: true, enumerable: false, configurable: true },
        );
    }
}

fn arg(args: &[HostValue], i: usize) -> HostValue {
    args.get(i).cloned().unwrap_or(HostValue::Undefined)
}

/// SameValueZero comparison: `Map`/`Set` key comparison treats `NaN` as
/// equal to itself, unlike `===`.
fn same_value_zero(a: &HostValue, b: &HostValue) -> bool {
    match (a, b) {
        (HostValue::Number(a), HostValue::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
        (HostValue::NegativeZero, HostValue::NegativeZero) => true,
        (HostValue::NegativeZero, HostValue::Number(n)) | (HostValue::Number(n), HostValue::NegativeZero) => *n == 0.0,
        (HostValue::String(a), HostValue::String(b)) => a == b,
        (HostValue::Boolean(a), HostValue::Boolean(b)) => a == b,
        (HostValue::BigInt(a), HostValue::BigInt(b)) => a == b,
        (HostValue::Undefined, HostValue::Undefined) | (HostValue::Null, HostValue::Null) => true,
        (HostValue::Symbol(a), HostValue::Symbol(b)) => Rc::ptr_eq(a, b),
        (HostValue::Object(a), HostValue::Object(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

pub fn install(host: &Rc<TreeWalkHost>) {
    install_console(host);
    install_object(host);
    install_array(host);
    install_collections(host);
    install_buffers(host);
    install_errors(host);
    install_symbol(host);
    install_function(host);
    install_eval(host);
    install_atob(host);
    host.set_global_binding("undefined", HostValue::Undefined);
    host.set_global_binding("NaN", HostValue::Number(f64::NAN));
    host.set_global_binding("Infinity", HostValue::Number(f64::INFINITY));
}

/// `Function.prototype.bind`, reached through every ordinary closure's
/// prototype chain (`TreeWalkHost::new` already parents them to it).
fn install_function(host: &Rc<TreeWalkHost>) {
    let Some(proto) = host.function_prototype() else { return };
    set(&proto, "bind", native("bind", |_host, this, mut args| {
        let bound_this = if args.is_empty() { HostValue::Undefined } else { args.remove(0) };
        Ok(HostValue::object(ObjectKind::Bound(BoundData { target: this, bound_this, bound_args: args }), None))
    }));
    set(&proto, "call", native("call", |host, this, mut args| {
        let call_this = if args.is_empty() { HostValue::Undefined } else { args.remove(0) };
        host.call(&this, call_this, args)
    }));
    set(&proto, "apply", native("apply", |host, this, args| {
        let call_this = arg(&args, 0);
        let call_args = match args.into_iter().nth(1) {
            Some(HostValue::Object(o)) => match &o.borrow().kind {
                ObjectKind::Array(items) => items.iter().cloned().map(|v| v.unwrap_or(HostValue::Undefined)).collect(),
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };
        host.call(&this, call_this, call_args)
    }));
    let ctor = native("Function", |_h, _this, _args| {
        Err(HostError::Evaluation("dynamic Function construction is not supported by this host".into()))
    });
    set(&ctor, "prototype", proto);
    host.set_global_binding("Function", ctor);
}

/// `atob`, the one ambient decode primitive the base64-literal fallback
/// relies on; paired with `String.prototype.charCodeAt` so the
/// `Uint8Array.from(atob(...), c => c.charCodeAt(0))` idiom actually
/// evaluates instead of throwing on a bare string receiver.
fn install_atob(host: &Rc<TreeWalkHost>) {
    host.set_global_binding("atob", native("atob", |_h, _this, args| {
        let HostValue::String(encoded) = arg(&args, 0) else {
            return Err(HostError::Evaluation("atob: argument is not a string".into()));
        };
        use base64::engine::general_purpose::STANDARD as BASE64;
        use base64::Engine as _;
        let bytes = BASE64
            .decode(encoded.as_bytes())
            .map_err(|e| HostError::Evaluation(format!("atob: invalid base64 input: {e}")))?;
        let chars: String = bytes.into_iter().map(|b| b as char).collect();
        Ok(HostValue::String(Rc::from(chars)))
    }));
}

fn install_console(host: &Rc<TreeWalkHost>) {
    let console = HostValue::object(ObjectKind::Plain, host.object_prototype());
    for level in ["log", "info", "warn", "error", "debug"] {
        let tag = level;
        set(
            &console,
            level,
            native(level, move |_h, _this, args| {
                let line = args.iter().map(to_display_string).collect::<Vec<_>>().join(" ");
                match tag {
                    "warn" => tracing::warn!(target: "console", "{line}"),
                    "error" => tracing::error!(target: "console", "{line}"),
                    "debug" => tracing::debug!(target: "console", "{line}"),
                    _ => tracing::info!(target: "console", "{line}"),
                }
                Ok(HostValue::Undefined)
            }),
        );
    }
    host.set_global_binding("console", console);
}

fn install_object(host: &Rc<TreeWalkHost>) {
    let ctor = native("Object", |host, _this, args| match args.into_iter().next() {
        Some(v @ HostValue::Object(_)) => Ok(v),
        _ => Ok(HostValue::object(ObjectKind::Plain, host.object_prototype())),
    });
    set(&ctor, "keys", native("keys", |host, _this, args| {
        let target = arg(&args, 0);
        let keys = host
            .own_keys(&target)
            .into_iter()
            .filter(|k| matches!(k, PropertyKey::String(_)))
            .filter(|k| host.get_own_property(&target, k).is_some_and(|d| d.enumerable()))
            .filter_map(|k| match k {
                PropertyKey::String(s) => Some(HostValue::String(s)),
                PropertyKey::Symbol(_) => None,
            })
            .collect();
        Ok(make_array(host, keys))
    }));
    set(&ctor, "values", native("values", |host, _this, args| {
        let target = arg(&args, 0);
        let values = host
            .own_keys(&target)
            .into_iter()
            .filter(|k| host.get_own_property(&target, k).is_some_and(|d| d.enumerable()))
            .filter_map(|k| host.get_own_property(&target, &k).and_then(|d| d.value().cloned()))
            .collect();
        Ok(make_array(host, values))
    }));
    set(&ctor, "entries", native("entries", |host, _this, args| {
        let target = arg(&args, 0);
        let entries = host
            .own_keys(&target)
            .into_iter()
            .filter(|k| matches!(k, PropertyKey::String(_)))
            .filter(|k| host.get_own_property(&target, k).is_some_and(|d| d.enumerable()))
            .filter_map(|k| {
                let PropertyKey::String(s) = k.clone() else { return None };
                let value = host.get_own_property(&target, &k).and_then(|d| d.value().cloned())?;
                Some(make_array(host, vec![HostValue::String(s), value]))
            })
            .collect();
        Ok(make_array(host, entries))
    }));
    set(&ctor, "getPrototypeOf", native("getPrototypeOf", |host, _this, args| {
        Ok(host.prototype_of(&arg(&args, 0)).unwrap_or(HostValue::Null))
    }));
    set(&ctor, "freeze", native("freeze", |_host, _this, args| {
        let target = arg(&args, 0);
        if let Some(obj) = target.as_object() {
            obj.borrow_mut().extensibility = ExtensibilityState::Frozen;
            let keys: Vec<_> = obj.borrow().own_keys();
            for key in keys {
                let descriptor = obj.borrow().get_own(&key).cloned();
                if let Some(PropertyDescriptor::Data { value, enumerable, .. }) = descriptor {
                    obj.borrow_mut().set_own(key, PropertyDescriptor::Data { value, writable: false, enumerable, configurable: false });
                }
            }
        }
        Ok(target)
    }));
    set(&ctor, "isFrozen", native("isFrozen", |_host, _this, args| {
        let target = arg(&args, 0);
        Ok(HostValue::Boolean(target.as_object().is_none_or(|o| o.borrow().extensibility == ExtensibilityState::Frozen)))
    }));
    set(&ctor, "assign", native("assign", |_host, _this, args| {
        let mut iter = args.into_iter();
        let target = iter.next().unwrap_or(HostValue::Undefined);
        for source in iter {
            let Some(src_obj) = source.as_object() else { continue };
            let entries: Vec<_> = src_obj.borrow().properties.iter().filter(|(_, d)| d.enumerable()).map(|(k, d)| (k.clone(), d.clone())).collect();
            if let Some(dst) = target.as_object() {
                for (k, d) in entries {
                    if let Some(v) = d.value() {
                        dst.borrow_mut().set_own(k, PropertyDescriptor::data(v.clone()));
                    }
                }
            }
        }
        Ok(target)
    }));
    set(&ctor, "create", native("create", |host, _this, args| {
        let proto = match arg(&args, 0) {
            HostValue::Null => None,
            other => Some(other),
        };
        let obj = HostValue::object(ObjectKind::Plain, proto);
        let props = arg(&args, 1);
        if let Some(props_obj) = props.as_object() {
            let keys: Vec<_> = props_obj.borrow().own_keys();
            for key in keys {
                let descriptor_value = host.get_property_chain(&props, &key, &props)?;
                if let Some(target) = obj.as_object() {
                    target.borrow_mut().set_own(key, read_descriptor(host, &descriptor_value));
                }
            }
        }
        Ok(obj)
    }));
    set(&ctor, "defineProperty", native("defineProperty", |host, _this, args| {
        let target = arg(&args, 0);
        let key = to_property_key(arg(&args, 1));
        let descriptor_value = arg(&args, 2);
        if let Some(obj) = target.as_object() {
            let descriptor = read_descriptor(host, &descriptor_value);
            obj.borrow_mut().set_own(key, descriptor);
        }
        Ok(target)
    }));
    set(&ctor, "setPrototypeOf", native("setPrototypeOf", |_host, _this, args| {
        let target = arg(&args, 0);
        let proto = arg(&args, 1);
        if let Some(obj) = target.as_object() {
            obj.borrow_mut().prototype = match proto {
                HostValue::Null => None,
                other => Some(other),
            };
        }
        Ok(target)
    }));
    set(&ctor, "seal", native("seal", |_host, _this, args| {
        let target = arg(&args, 0);
        if let Some(obj) = target.as_object() {
            if obj.borrow().extensibility != ExtensibilityState::Frozen {
                obj.borrow_mut().extensibility = ExtensibilityState::Sealed;
            }
            let keys: Vec<_> = obj.borrow().own_keys();
            for key in keys {
                let descriptor = obj.borrow().get_own(&key).cloned();
                let sealed = match descriptor {
                    Some(PropertyDescriptor::Data { value, writable, enumerable, .. }) => {
                        Some(PropertyDescriptor::Data { value, writable, enumerable, configurable: false })
                    }
                    Some(PropertyDescriptor::Accessor { get, set, enumerable, .. }) => {
                        Some(PropertyDescriptor::Accessor { get, set, enumerable, configurable: false })
                    }
                    None => None,
                };
                if let Some(descriptor) = sealed {
                    obj.borrow_mut().set_own(key, descriptor);
                }
            }
        }
        Ok(target)
    }));
    set(&ctor, "isSealed", native("isSealed", |_host, _this, args| {
        Ok(HostValue::Boolean(
            arg(&args, 0).as_object().is_none_or(|o| matches!(o.borrow().extensibility, ExtensibilityState::Sealed | ExtensibilityState::Frozen)),
        ))
    }));
    set(&ctor, "preventExtensions", native("preventExtensions", |_host, _this, args| {
        let target = arg(&args, 0);
        if let Some(obj) = target.as_object() {
            if obj.borrow().extensibility == ExtensibilityState::Extensible {
                obj.borrow_mut().extensibility = ExtensibilityState::PreventExtensions;
            }
        }
        Ok(target)
    }));
    set(&ctor, "isExtensible", native("isExtensible", |_host, _this, args| {
        Ok(HostValue::Boolean(arg(&args, 0).as_object().is_some_and(|o| o.borrow().extensibility == ExtensibilityState::Extensible)))
    }));
    host.set_global_binding("Object", ctor);
}

fn to_property_key(value: HostValue) -> PropertyKey {
    match value {
        HostValue::Symbol(s) => PropertyKey::Symbol(s),
        other => PropertyKey::String(Rc::from(to_display_string(&other))),
    }
}

/// Reads a `{value, writable, enumerable, configurable}` or
/// `{get, set, enumerable, configurable}` descriptor literal the way
/// `Object.defineProperty`/`Object.create`'s second argument does.
fn read_descriptor(host: &TreeWalkHost, descriptor_value: &HostValue) -> PropertyDescriptor {
    let field = |name: &str| {
        host.get_property_chain(descriptor_value, &PropertyKey::String(Rc::from(name)), descriptor_value).unwrap_or(HostValue::Undefined)
    };
    let get = field("get");
    let set_fn = field("set");
    let enumerable = matches!(field("enumerable"), HostValue::Boolean(true));
    let configurable = matches!(field("configurable"), HostValue::Boolean(true));
    if !matches!(get, HostValue::Undefined) || !matches!(set_fn, HostValue::Undefined) {
        PropertyDescriptor::Accessor {
            get: (!matches!(get, HostValue::Undefined)).then_some(get),
            set: (!matches!(set_fn, HostValue::Undefined)).then_some(set_fn),
            enumerable,
            configurable,
        }
    } else {
        PropertyDescriptor::Data { value: field("value"), writable: matches!(field("writable"), HostValue::Boolean(true)), enumerable, configurable }
    }
}

fn make_array(host: &TreeWalkHost, items: Vec<HostValue>) -> HostValue {
    HostValue::object(ObjectKind::Array(items.into_iter().map(Some).collect()), host.array_prototype())
}

fn install_array(host: &Rc<TreeWalkHost>) {
    let ctor = native("Array", |host, _this, args| {
        if let [HostValue::Number(n)] = args.as_slice() {
            let holes = vec![None; *n as usize];
            return Ok(HostValue::object(ObjectKind::Array(holes), host.array_prototype()));
        }
        Ok(make_array(host, args))
    });
    set(&ctor, "isArray", native("isArray", |_host, _this, args| {
        Ok(HostValue::Boolean(matches!(arg(&args, 0), HostValue::Object(o) if matches!(o.borrow().kind, ObjectKind::Array(_)))))
    }));
    host.set_global_binding("Array", ctor);
}

fn with_collection<T>(this: &HostValue, f: impl FnOnce(&CollectionData) -> T) -> Option<T> {
    let obj = this.as_object()?;
    let b = obj.borrow();
    match &b.kind {
        ObjectKind::Collection(c) => Some(f(c)),
        _ => None,
    }
}

fn with_collection_mut<T>(this: &HostValue, f: impl FnOnce(&mut CollectionData) -> T) -> Option<T> {
    let obj = this.as_object()?;
    let mut b = obj.borrow_mut();
    match &mut b.kind {
        ObjectKind::Collection(c) => Some(f(c)),
        _ => None,
    }
}

fn seed_entries(args: &[HostValue], is_map_like: bool) -> Vec<(HostValue, Option<HostValue>)> {
    let Some(HostValue::Object(iterable)) = args.first() else { return Vec::new() };
    let ObjectKind::Array(items) = &iterable.borrow().kind else { return Vec::new() };
    items
        .iter()
        .filter_map(|item| item.clone())
        .map(|item| {
            if is_map_like {
                if let HostValue::Object(pair) = &item {
                    if let ObjectKind::Array(elements) = &pair.borrow().kind {
                        let key = elements.first().cloned().flatten().unwrap_or(HostValue::Undefined);
                        let value = elements.get(1).cloned().flatten();
                        return (key, value);
                    }
                }
                (item, None)
            } else {
                (item, None)
            }
        })
        .collect()
}

fn attach_collection_methods(proto: &HostValue, is_map_like: bool) {
    set(proto, "has", native("has", move |_h, this, args| {
        let key = arg(&args, 0);
        Ok(HostValue::Boolean(with_collection(&this, |c| c.entries.iter().any(|(k, _)| same_value_zero(k, &key))).unwrap_or(false)))
    }));
    set(proto, "delete", native("delete", move |_h, this, args| {
        let key = arg(&args, 0);
        let removed = with_collection_mut(&this, |c| {
            let before = c.entries.len();
            c.entries.retain(|(k, _)| !same_value_zero(k, &key));
            before != c.entries.len()
        })
        .unwrap_or(false);
        Ok(HostValue::Boolean(removed))
    }));
    set(proto, "clear", native("clear", |_h, this, _args| {
        with_collection_mut(&this, |c| c.entries.clear());
        Ok(HostValue::Undefined)
    }));
    if is_map_like {
        set(proto, "set", native("set", |_h, this, args| {
            let key = arg(&args, 0);
            let value = args.get(1).cloned();
            with_collection_mut(&this, |c| match c.entries.iter_mut().find(|(k, _)| same_value_zero(k, &key)) {
                Some(entry) => entry.1 = value,
                None => c.entries.push((key, value)),
            });
            Ok(this)
        }));
        set(proto, "get", native("get", |_h, this, args| {
            let key = arg(&args, 0);
            Ok(with_collection(&this, |c| c.entries.iter().find(|(k, _)| same_value_zero(k, &key)).and_then(|(_, v)| v.clone()))
                .flatten()
                .unwrap_or(HostValue::Undefined))
        }));
    } else {
        set(proto, "add", native("add", |_h, this, args| {
            let key = arg(&args, 0);
            with_collection_mut(&this, |c| {
                if !c.entries.iter().any(|(k, _)| same_value_zero(k, &key)) {
                    c.entries.push((key, None));
                }
            });
            Ok(this)
        }));
    }
    if let Some(obj) = proto.as_object() {
        let getter = native("size", |_h, this, _args| Ok(HostValue::Number(with_collection(&this, |c| c.entries.len()).unwrap_or(0) as f64)));
        obj.borrow_mut().set_own(
            PropertyKey::String(Rc::from("size")),
            PropertyDescriptor::Accessor { get: Some(getter), set: None, enumerable: false, configurable: true },
        );
    }
}

fn install_collections(host: &Rc<TreeWalkHost>) {
    let map_proto = HostValue::object(ObjectKind::Plain, host.object_prototype());
    attach_collection_methods(&map_proto, true);
    let set_proto = HostValue::object(ObjectKind::Plain, host.object_prototype());
    attach_collection_methods(&set_proto, false);

    install_collection_ctor(host, "Map", CollectionKind::Map, map_proto.clone(), true);
    install_collection_ctor(host, "WeakMap", CollectionKind::WeakMap, map_proto, true);
    install_collection_ctor(host, "Set", CollectionKind::Set, set_proto.clone(), false);
    install_collection_ctor(host, "WeakSet", CollectionKind::WeakSet, set_proto, false);
}

fn install_collection_ctor(host: &Rc<TreeWalkHost>, name: &'static str, kind: CollectionKind, proto: HostValue, is_map_like: bool) {
    let proto_for_ctor = proto.clone();
    let ctor = native(name, move |_h, _this, args| {
        let entries = seed_entries(&args, is_map_like);
        Ok(HostValue::object(ObjectKind::Collection(CollectionData { kind, entries }), Some(proto_for_ctor.clone())))
    });
    set(&ctor, "prototype", proto);
    host.set_global_binding(name, ctor);
}

fn install_buffers(host: &Rc<TreeWalkHost>) {
    let ctor = native("ArrayBuffer", |_h, _this, args| {
        let length = match arg(&args, 0) {
            HostValue::Number(n) => n as usize,
            _ => 0,
        };
        Ok(HostValue::object(ObjectKind::Buffer(BufferData { bytes: Rc::new(RefCell::new(vec![0u8; length])), shared: false }), None))
    });
    host.set_global_binding("ArrayBuffer", ctor);

    for kind in [
        TypedElementKind::I8,
        TypedElementKind::U8,
        TypedElementKind::U8Clamped,
        TypedElementKind::I16,
        TypedElementKind::U16,
        TypedElementKind::I32,
        TypedElementKind::U32,
        TypedElementKind::F32,
        TypedElementKind::F64,
        TypedElementKind::BigI64,
        TypedElementKind::BigU64,
    ] {
        install_typed_array_ctor(host, kind);
    }
}

fn install_typed_array_ctor(host: &Rc<TreeWalkHost>, kind: TypedElementKind) {
    let name = kind.constructor_name();
    let ctor = native(name, move |_h, _this, args| {
        let first = arg(&args, 0);
        let (buffer, length) = match &first {
            HostValue::Object(o) if matches!(o.borrow().kind, ObjectKind::Buffer(_)) => {
                let byte_len = match &o.borrow().kind {
                    ObjectKind::Buffer(b) => b.bytes.borrow().len(),
                    _ => unreachable!(),
                };
                (first.clone(), byte_len / kind.byte_size())
            }
            HostValue::Number(n) => {
                let len = *n as usize;
                (HostValue::object(ObjectKind::Buffer(BufferData { bytes: Rc::new(RefCell::new(vec![0u8; len * kind.byte_size()])), shared: false }), None), len)
            }
            HostValue::Object(o) if matches!(o.borrow().kind, ObjectKind::Array(_)) => {
                let items = match &o.borrow().kind {
                    ObjectKind::Array(items) => items.clone(),
                    _ => unreachable!(),
                };
                let bytes = Rc::new(RefCell::new(vec![0u8; items.len() * kind.byte_size()]));
                {
                    let mut bytes = bytes.borrow_mut();
                    for (i, item) in items.iter().enumerate() {
                        let Some(value) = item else { continue };
                        let start = i * kind.byte_size();
                        kind.write(&mut bytes[start..start + kind.byte_size()], value);
                    }
                }
                (HostValue::object(ObjectKind::Buffer(BufferData { bytes, shared: false }), None), items.len())
            }
            _ => (HostValue::object(ObjectKind::Buffer(BufferData { bytes: Rc::new(RefCell::new(Vec::new())), shared: false }), None), 0),
        };
        Ok(HostValue::object(ObjectKind::BufferView(BufferViewData { buffer, element_kind: kind, byte_offset: 0, length }), None))
    });
    set(&ctor, "from", native("from", move |host, _this, args| {
        let iterable = arg(&args, 0);
        let map_fn = args.get(1).cloned();
        let receiver = HostValue::Undefined;
        let length = match host.get_property_chain(&iterable, &PropertyKey::String(Rc::from("length")), &receiver)? {
            HostValue::Number(n) => n as usize,
            _ => 0,
        };
        let bytes = Rc::new(RefCell::new(vec![0u8; length * kind.byte_size()]));
        {
            let mut bytes = bytes.borrow_mut();
            for i in 0..length {
                let key = PropertyKey::String(Rc::from(i.to_string()));
                let raw = host.get_property_chain(&iterable, &key, &receiver)?;
                let mapped = match &map_fn {
                    Some(f) => host.call(f, HostValue::Undefined, vec![raw, HostValue::Number(i as f64)])?,
                    None => raw,
                };
                let start = i * kind.byte_size();
                kind.write(&mut bytes[start..start + kind.byte_size()], &mapped);
            }
        }
        let buffer = HostValue::object(ObjectKind::Buffer(BufferData { bytes, shared: false }), None);
        Ok(HostValue::object(ObjectKind::BufferView(BufferViewData { buffer, element_kind: kind, byte_offset: 0, length }), None))
    }));
    host.set_global_binding(name, ctor);
}

fn install_errors(host: &Rc<TreeWalkHost>) {
    let error_prototype = HostValue::object(ObjectKind::Plain, host.object_prototype());
    set(&error_prototype, "name", HostValue::String(Rc::from("Error")));
    set(&error_prototype, "message", HostValue::String(Rc::from("")));
    set(&error_prototype, "toString", native("toString", |_h, this, _args| {
        let name = match &this {
            HostValue::Object(o) => o.borrow().get_own(&PropertyKey::String(Rc::from("name"))).and_then(|d| d.value().cloned()),
            _ => None,
        }
        .unwrap_or(HostValue::String(Rc::from("Error")));
        let message = match &this {
            HostValue::Object(o) => o.borrow().get_own(&PropertyKey::String(Rc::from("message"))).and_then(|d| d.value().cloned()),
            _ => None,
        }
        .unwrap_or(HostValue::String(Rc::from("")));
        Ok(HostValue::String(Rc::from(format!("{}: {}", to_display_string(&name), to_display_string(&message)))))
    }));

    for name in ["Error", "TypeError", "RangeError", "SyntaxError", "ReferenceError", "EvalError", "URIError"] {
        install_error_ctor(host, name, error_prototype.clone());
    }
}

fn install_error_ctor(host: &Rc<TreeWalkHost>, name: &'static str, prototype: HostValue) {
    let proto_for_ctor = prototype.clone();
    let ctor = native(name, move |_h, _this, args| {
        let instance = HostValue::object(ObjectKind::Error, Some(proto_for_ctor.clone()));
        if let HostValue::String(_) = arg(&args, 0) {
            set(&instance, "message", arg(&args, 0));
        }
        set(&instance, "name", HostValue::String(Rc::from(name)));
        set(&instance, "stack", HostValue::String(Rc::from(name)));
        Ok(instance)
    });
    set(&ctor, "prototype", prototype);
    host.set_global_binding(name, ctor);
}

fn install_symbol(host: &Rc<TreeWalkHost>) {
    let registry: Rc<RefCell<Vec<(Rc<str>, HostValue)>>> = Rc::new(RefCell::new(Vec::new()));
    let registry_for_for = registry.clone();
    let ctor = native("Symbol", |_h, _this, args| {
        let description = match arg(&args, 0) {
            HostValue::String(s) => Some(s),
            HostValue::Undefined => None,
            other => Some(Rc::from(to_display_string(&other))),
        };
        Ok(HostValue::Symbol(SymbolData::new(description, SymbolCategory::Unique)))
    });
    set(&ctor, "for", native("for", move |_h, _this, args| {
        let key: Rc<str> = match arg(&args, 0) {
            HostValue::String(s) => s,
            other => Rc::from(to_display_string(&other)),
        };
        if let Some((_, existing)) = registry_for_for.borrow().iter().find(|(k, _)| *k == key) {
            return Ok(existing.clone());
        }
        let symbol = HostValue::Symbol(SymbolData::new(Some(key.clone()), SymbolCategory::Registered));
        registry_for_for.borrow_mut().push((key, symbol.clone()));
        Ok(symbol)
    }));
    for well_known in ["iterator", "asyncIterator", "toPrimitive", "toStringTag", "hasInstance"] {
        set(&ctor, well_known, HostValue::Symbol(SymbolData::new(Some(Rc::from(format!("Symbol.{well_known}"))), SymbolCategory::WellKnown)));
    }
    host.set_global_binding("Symbol", ctor);
}

fn install_eval(host: &Rc<TreeWalkHost>) {
    // Only reached for *indirect* eval (`const e = eval; e(...)`); a direct
    // `eval(...)` call is intercepted by the interpreter before it ever
    // looks up this binding, and runs against the caller's own scope
    // instead of the fresh global one `Host::evaluate` creates here.
    let eval_fn = native("eval", |host, _this, args| {
        let HostValue::String(source) = arg(&args, 0) else { return Ok(arg(&args, 0)) };
        host.evaluate(&source, revive_tracker::EvalContext::new(revive_common::SourceKind::Script, None))
    });
    host.set_global_binding("eval", eval_fn);
}
