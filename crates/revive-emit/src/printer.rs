//! The emitter's main pass: walks the value graph computed
//! by `revive-graph` and produces host-language source text.
//!
//! Follows a two-phase construction scheme: variable allocation
//! pre-assigns a name to every node that needs one
//! (`usage::analyze_usage`'s `refcount > 1` test, which a back-edge always
//! satisfies on its own), then a single recursive pass builds each node's
//! initializer expression, skipping any edge that points back at a node
//! still under construction and recording it as a deferred patch statement
//! instead — construct with non-circular properties first, then apply the
//! cyclic ones through an explicit assignment afterward.

use crate::alloc::NameAllocator;
use crate::literals::{render_base64_decode_expr, render_bigint, render_number, render_regex, render_string};
use crate::options::SerializeOptions;
use crate::rewrite::rewrite_closure_source;
use crate::usage::{analyze_usage, UsageInfo};
use crate::EmitError;
use revive_common::{Diagnostic, Span};
use revive_graph::{
    ClassNode, ClosureNode, GraphNode, GraphNodeId, ObjectShape, PropertyDescriptorNode, PropertyKeyNode, ValueGraph,
};
use revive_host::{CollectionKind, ExtensibilityState, HostValue, TypedElementKind};
use rustc_hash::{FxHashMap, FxHashSet};
use std::rc::Rc;

pub struct Printer<'g> {
    graph: &'g ValueGraph,
    options: &'g SerializeOptions,
    usage: UsageInfo,
    alloc: NameAllocator,
    names: FxHashMap<GraphNodeId, Rc<str>>,
    constructing: FxHashSet<GraphNodeId>,
    assigned: FxHashSet<GraphNodeId>,
    statements: Vec<String>,
    patches: Vec<String>,
}

/// The result of one full `print` call: every hoisted-declaration/patch
/// statement, in emission order, plus one final expression per root.
pub struct PrintResult {
    pub statements: Vec<String>,
    pub roots: Vec<(Rc<str>, String)>,
    /// Every local name `statements` declares, in declaration order. Used
    /// by `revive-emit`'s code-splitting mode to re-export the common
    /// file's bindings by name rather than relying on a bare `require` for
    /// side effects.
    pub hoisted_names: Vec<Rc<str>>,
}

pub fn print(graph: &ValueGraph, options: &SerializeOptions) -> Result<PrintResult, EmitError> {
    let usage = analyze_usage(graph);
    let mut printer = Printer {
        graph,
        options,
        usage,
        alloc: NameAllocator::new(options.mangle),
        names: FxHashMap::default(),
        constructing: FxHashSet::default(),
        assigned: FxHashSet::default(),
        statements: Vec::new(),
        patches: Vec::new(),
    };
    printer.preassign_names();
    let mut roots = Vec::new();
    for root in &graph.roots {
        let expr = printer.value_ref(root.node)?;
        roots.push((root.name.clone(), expr));
    }
    let hoisted_names: Vec<Rc<str>> = printer.names.values().cloned().collect();
    let mut statements = printer.statements;
    statements.extend(printer.patches);
    Ok(PrintResult { statements, roots, hoisted_names })
}

impl<'g> Printer<'g> {
    fn preassign_names(&mut self) {
        for (id, _) in self.graph.iter() {
            if self.usage.should_hoist(id, self.options.inline) {
                let name = self.alloc.fresh("v");
                self.statements.push(format!("let {name};"));
                self.names.insert(id, name);
            }
        }
    }

    /// Returns an expression referencing `id`: either a hoisted variable
    /// name (constructing it first if this is the first reference) or, for
    /// single-use acyclic nodes, a freshly built inline expression.
    fn value_ref(&mut self, id: GraphNodeId) -> Result<String, EmitError> {
        if let Some(name) = self.names.get(&id).cloned() {
            self.ensure_constructed(id, &name)?;
            return Ok(name.to_string());
        }
        self.build_expr(id, None)
    }

    fn ensure_constructed(&mut self, id: GraphNodeId, name: &Rc<str>) -> Result<(), EmitError> {
        if self.assigned.contains(&id) || self.constructing.contains(&id) {
            return Ok(());
        }
        self.constructing.insert(id);
        let expr = self.build_expr(id, Some(name.clone()))?;
        self.statements.push(format!("{name} = {expr};"));
        self.constructing.remove(&id);
        self.assigned.insert(id);
        Ok(())
    }

    /// Resolves `child` for inclusion as a property of the node currently
    /// being constructed under `self_name`. Returns `None` (and queues a
    /// deferred patch) when `child` is a back-edge to an ancestor still
    /// under construction.
    fn resolve_or_defer(
        &mut self,
        self_name: &str,
        child: GraphNodeId,
        patch: impl FnOnce(&str) -> String,
    ) -> Result<Option<String>, EmitError> {
        if self.constructing.contains(&child) {
            let target = self
                .names
                .get(&child)
                .cloned()
                .ok_or_else(|| EmitError::Internal("cyclic reference to a node that was never hoisted".into()))?;
            self.patches.push(patch(&target));
            let _ = self_name;
            return Ok(None);
        }
        Ok(Some(self.value_ref(child)?))
    }

    fn build_expr(&mut self, id: GraphNodeId, self_name: Option<Rc<str>>) -> Result<String, EmitError> {
        let node = self.graph.get(id).clone();
        match node {
            GraphNode::Undefined => Ok("undefined".to_string()),
            GraphNode::Null => Ok("null".to_string()),
            GraphNode::Boolean(b) => Ok(b.to_string()),
            GraphNode::Number(n) => Ok(render_number(n)),
            GraphNode::NegativeZero => Ok("-0".to_string()),
            GraphNode::String(s) => Ok(render_string(&s)),
            GraphNode::BigInt(s) => Ok(render_bigint(&s)),
            GraphNode::Symbol { description, .. } => Ok(match description {
                Some(d) => format!("Symbol({})", render_string(&d)),
                None => "Symbol()".to_string(),
            }),
            GraphNode::PlainObject(shape) => self.render_shaped(self_name, "Object.create(null)", &shape, true),
            GraphNode::Array { elements, shape } => self.render_array(self_name, &elements, &shape),
            GraphNode::Closure(closure) => self.render_closure(&closure, self_name),
            GraphNode::Class(class) => self.render_class(&class),
            GraphNode::Bound(bound) => {
                let target = self.value_ref(bound.target)?;
                let this_arg = self.value_ref(bound.bound_this)?;
                let mut args = vec![this_arg];
                for a in &bound.bound_args {
                    args.push(self.value_ref(*a)?);
                }
                self.render_shaped(self_name, &format!("({target}).bind({})", args.join(", ")), &bound.shape, false)
            }
            GraphNode::Native { name } => Ok(format!(
                "(() => {{ throw new Error({}); }})",
                render_string(&format!("native function `{name}` has no structural representation"))
            )),
            GraphNode::Collection { kind, entries, shape } => self.render_collection(self_name, kind, &entries, &shape),
            GraphNode::Buffer { bytes, shared } => Ok(self.render_buffer(&bytes, shared)),
            GraphNode::BufferView { buffer, element_kind, byte_offset, length, shape } => {
                let GraphNode::Buffer { bytes, shared } = self.graph.get(buffer).clone() else {
                    return Err(EmitError::Internal("buffer view's buffer node is not a raw buffer".into()));
                };
                let base = if shared || length > DENSE_ELEMENT_LIST_MAX_LEN {
                    // A shared buffer's identity matters more than its
                    // contents read back as a dense literal, so route
                    // through the same `ArrayBuffer` reconstruction a bare
                    // buffer node gets; a long view is likewise cheaper to
                    // read back through base64 than as one literal per slot.
                    let buf = self.value_ref(buffer)?;
                    let ctor = element_kind.constructor_name();
                    format!("new {ctor}(({buf}), {byte_offset}, {length})")
                } else {
                    render_typed_element_list(&bytes, element_kind, byte_offset, length)
                };
                self.render_shaped(self_name, &base, &shape, false)
            }
            GraphNode::Error(shape) => self.render_shaped(self_name, "Object.create(Error.prototype)", &shape, true),
            GraphNode::Regex { pattern, flags, shape } => {
                self.render_shaped(self_name, &render_regex(&pattern, &flags), &shape, false)
            }
            GraphNode::Boxed { value, shape } => {
                let v = self.value_ref(value)?;
                self.render_shaped(self_name, &format!("Object({v})"), &shape, false)
            }
            GraphNode::GlobalRef(path) => Ok(path.join(".")),
            GraphNode::ModuleRef { module, export } => {
                let base = format!("require({})", render_string(&module));
                Ok(match export {
                    Some(e) => format!("{base}.{e}"),
                    None => base,
                })
            }
            GraphNode::Frame(frame) => self.render_frame_object(&frame),
        }
    }

    // -- plain objects, arrays, and every other shape-bearing node --------

    /// Builds `base_expr`, then (only if the shape carries anything a bare
    /// literal/constructor call wouldn't produce on its own) wraps
    /// construction in an immediately-invoked arrow that installs every
    /// property via `Object.defineProperty` and applies the prototype link
    /// and extensibility state last.
    fn render_shaped(
        &mut self,
        self_name: Option<Rc<str>>,
        base_expr: &str,
        shape: &ObjectShape,
        set_prototype_explicitly: bool,
    ) -> Result<String, EmitError> {
        if shape.properties.is_empty() && shape.prototype.is_none() && shape.extensibility == ExtensibilityState::Extensible
        {
            return Ok(base_expr.to_string());
        }
        let var = self.alloc.fresh("o");
        let mut body = vec![format!("const {var} = {base_expr};")];
        if set_prototype_explicitly {
            if let Some(proto) = shape.prototype {
                let proto_expr = self.value_ref(proto)?;
                body.push(format!("Object.setPrototypeOf({var}, {proto_expr});"));
            }
        }
        self.install_properties(self_name.as_deref().unwrap_or(&var), &var, shape, &mut body)?;
        self.install_extensibility(&var, shape.extensibility, &mut body);
        body.push(format!("return {var};"));
        Ok(format!("(() => {{ {} }})()", body.join(" ")))
    }

    fn install_properties(
        &mut self,
        self_name: &str,
        var: &str,
        shape: &ObjectShape,
        body: &mut Vec<String>,
    ) -> Result<(), EmitError> {
        for (key, descriptor) in &shape.properties {
            let key_expr = self.render_key(key)?;
            let descriptor_expr = match descriptor {
                PropertyDescriptorNode::Data { value, writable, enumerable, configurable } => {
                    let value_expr = match self.resolve_or_defer(self_name, *value, |target| {
                        format!(
                            "Object.defineProperty({self_name}, {key_expr}, {{ value: {target}, writable: {writable}, enumerable: {enumerable}, configurable: {configurable} }});",
                        )
                    })? {
                        Some(v) => v,
                        None => continue,
                    };
                    format!(
                        "{{ value: {value_expr}, writable: {writable}, enumerable: {enumerable}, configurable: {configurable} }}"
                    )
                }
                PropertyDescriptorNode::Accessor { get, set, enumerable, configurable } => {
                    let get_expr = match get {
                        Some(g) => self.value_ref(*g)?,
                        None => "undefined".to_string(),
                    };
                    let set_expr = match set {
                        Some(s) => self.value_ref(*s)?,
                        None => "undefined".to_string(),
                    };
                    format!("{{ get: {get_expr}, set: {set_expr}, enumerable: {enumerable}, configurable: {configurable} }}")
                }
            };
            body.push(format!("Object.defineProperty({var}, {key_expr}, {descriptor_expr});"));
        }
        Ok(())
    }

    fn install_extensibility(&self, var: &str, state: ExtensibilityState, body: &mut Vec<String>) {
        match state {
            ExtensibilityState::Extensible => {}
            ExtensibilityState::PreventExtensions => body.push(format!("Object.preventExtensions({var});")),
            ExtensibilityState::Sealed => body.push(format!("Object.seal({var});")),
            ExtensibilityState::Frozen => body.push(format!("Object.freeze({var});")),
        }
    }

    fn render_key(&mut self, key: &PropertyKeyNode) -> Result<String, EmitError> {
        match key {
            PropertyKeyNode::String(s) => Ok(render_string(s)),
            PropertyKeyNode::Symbol(s) => self.value_ref(*s),
        }
    }

    fn render_array(
        &mut self,
        self_name: Option<Rc<str>>,
        elements: &[Option<GraphNodeId>],
        shape: &ObjectShape,
    ) -> Result<String, EmitError> {
        let var = self.alloc.fresh("a");
        let owner = self_name.clone().unwrap_or_else(|| var.clone());
        let mut slots = Vec::with_capacity(elements.len());
        let mut deferred_indices = Vec::new();
        for (idx, element) in elements.iter().enumerate() {
            match element {
                None => slots.push(String::new()),
                Some(child) => {
                    let resolved = self.resolve_or_defer(&owner, *child, |target| format!("{var}[{idx}] = {target};"))?;
                    match resolved {
                        Some(expr) => slots.push(expr),
                        None => {
                            slots.push(String::new());
                            deferred_indices.push(idx);
                        }
                    }
                }
            }
        }
        let literal = format!("[{}]", slots.join(", "));
        if shape.properties.is_empty() && shape.prototype.is_none() && shape.extensibility == ExtensibilityState::Extensible
        {
            return Ok(literal);
        }
        let mut body = vec![format!("const {var} = {literal};")];
        if let Some(proto) = shape.prototype {
            let proto_expr = self.value_ref(proto)?;
            body.push(format!("Object.setPrototypeOf({var}, {proto_expr});"));
        }
        self.install_properties(&owner, &var, shape, &mut body)?;
        self.install_extensibility(&var, shape.extensibility, &mut body);
        body.push(format!("return {var};"));
        Ok(format!("(() => {{ {} }})()", body.join(" ")))
    }

    fn render_collection(
        &mut self,
        self_name: Option<Rc<str>>,
        kind: CollectionKind,
        entries: &[(GraphNodeId, Option<GraphNodeId>)],
        shape: &ObjectShape,
    ) -> Result<String, EmitError> {
        let ctor = match kind {
            CollectionKind::Set => "Set",
            CollectionKind::Map => "Map",
            CollectionKind::WeakSet => "WeakSet",
            CollectionKind::WeakMap => "WeakMap",
        };
        let mut rendered = Vec::with_capacity(entries.len());
        for (k, v) in entries {
            let key_expr = self.value_ref(*k)?;
            match v {
                Some(v) => {
                    let value_expr = self.value_ref(*v)?;
                    rendered.push(format!("[{key_expr}, {value_expr}]"));
                }
                None => rendered.push(key_expr),
            }
        }
        let base = format!("new {ctor}([{}])", rendered.join(", "));
        self.render_shaped(self_name, &base, shape, false)
    }

    fn render_buffer(&self, bytes: &[u8], shared: bool) -> String {
        let decode = render_base64_decode_expr(bytes);
        if shared {
            // Best-effort: the emitted program is re-evaluated fresh, so no
            // actual cross-agent sharing is observable at reconstruction
            // time; approximate with a plain ArrayBuffer (see DESIGN.md).
            format!("({decode}).buffer")
        } else {
            format!("({decode}).buffer")
        }
    }

    fn render_frame_object(&mut self, frame: &revive_graph::FrameNode) -> Result<String, EmitError> {
        let mut entries = Vec::new();
        for binding in &frame.bindings {
            let value_expr = self.value_ref(binding.value)?;
            entries.push(format!("{}: {value_expr}", sanitize_member(&binding.name)));
        }
        if let Some(t) = frame.this_value {
            entries.push(format!("this_value: {}", self.value_ref(t)?));
        }
        if let Some(a) = frame.arguments_object {
            entries.push(format!("arguments_value: {}", self.value_ref(a)?));
        }
        if let Some(n) = frame.new_target {
            entries.push(format!("new_target_value: {}", self.value_ref(n)?));
        }
        Ok(format!("{{ {} }}", entries.join(", ")))
    }

    // -- closures -----------------------------------------------------

    fn render_closure(&mut self, closure: &ClosureNode, self_name: Option<Rc<str>>) -> Result<String, EmitError> {
        if closure.missing_capture {
            if self.options.allow_missing_capture {
                return Ok(format!("({})", closure.source_text));
            }
            return Err(EmitError::MissingCapture(Diagnostic::missing_capture(Span::synthetic(), "<unresolved>")));
        }

        let is_arrow = closure.flavor.is_arrow();
        let with_frame = closure.frames.iter().copied().find(|f| matches!(self.graph.get(*f), GraphNode::Frame(fr) if fr.is_with));

        let mut substitutions: FxHashMap<String, String> = FxHashMap::default();
        let mut frame_params: Vec<(Rc<str>, String)> = Vec::new();
        let mut this_replacement = None;
        let mut arguments_replacement = None;
        let mut new_target_replacement = None;

        for &frame_id in &closure.frames {
            let is_with = matches!(self.graph.get(frame_id), GraphNode::Frame(fr) if fr.is_with);
            if is_with {
                continue;
            }
            let param = self.alloc.fresh("frame");
            let frame_expr = self.value_ref(frame_id)?;
            let GraphNode::Frame(frame) = self.graph.get(frame_id).clone() else { unreachable!() };
            for binding in &frame.bindings {
                substitutions.insert(binding.name.to_string(), format!("{param}.{}", sanitize_member(&binding.name)));
            }
            if is_arrow {
                if frame.this_value.is_some() {
                    this_replacement = Some(format!("{param}.this_value"));
                }
                if frame.arguments_object.is_some() {
                    arguments_replacement = Some(format!("{param}.arguments_value"));
                }
                if frame.new_target.is_some() {
                    new_target_replacement = Some(format!("{param}.new_target_value"));
                }
            }
            frame_params.push((param, frame_expr));
        }

        let rewritten = rewrite_closure_source(
            &closure.source_text,
            &substitutions,
            is_arrow,
            this_replacement.as_deref(),
            arguments_replacement.as_deref(),
            new_target_replacement.as_deref(),
        );

        let mut expr = format!("({rewritten})");
        for (param, _) in frame_params.iter().rev() {
            expr = format!("({param}) => {expr}");
        }
        for (_, frame_expr) in &frame_params {
            expr = format!("({expr})({frame_expr})");
        }

        if let Some(with_frame_id) = with_frame {
            let GraphNode::Frame(with_frame) = self.graph.get(with_frame_id).clone() else { unreachable!() };
            let with_object = with_frame.with_object.ok_or_else(|| {
                EmitError::Internal("`with` frame node missing its bound object".into())
            })?;
            let obj_expr = self.value_ref(with_object)?;
            expr = format!("(() => {{ with ({obj_expr}) {{ return {expr}; }} }})()");
        }

        if closure.strictness == revive_common::Strictness::Strict && !self.container_is_strict() {
            expr = format!("(function() {{ \"use strict\"; return {expr}; }})()");
        } else if closure.strictness == revive_common::Strictness::Sloppy && self.container_is_strict() {
            // A strict container's lexical scope makes every nested function
            // strict by inheritance, with no per-function way to opt back
            // out. An indirect call to `eval` is the one construct that
            // re-parses its argument as a fresh, non-strict program, so
            // round tripping a sloppy closure here has to go through it.
            let source = render_string(&format!("({expr})"));
            expr = format!("(0, eval)({source})");
        }

        self.render_shaped(None, &expr, &closure.shape, false)
    }

    fn container_is_strict(&self) -> bool {
        use revive_common::OutputFormat;
        self.options.strict_env || matches!(self.options.format, OutputFormat::SingleExportModule | OutputFormat::DefaultExportModule)
    }

    // -- classes --------------------------------------------------------

    fn render_class(&mut self, class: &ClassNode) -> Result<String, EmitError> {
        let GraphNode::Closure(ctor) = self.graph.get(class.constructor).clone() else {
            return Err(EmitError::Internal("class constructor node is not a closure".into()));
        };

        let mut substitutions: FxHashMap<String, String> = FxHashMap::default();
        let mut frame_params: Vec<(Rc<str>, String)> = Vec::new();
        for &frame_id in &ctor.frames {
            if matches!(self.graph.get(frame_id), GraphNode::Frame(fr) if fr.is_with) {
                continue;
            }
            let param = self.alloc.fresh("frame");
            let frame_expr = self.value_ref(frame_id)?;
            let GraphNode::Frame(frame) = self.graph.get(frame_id).clone() else { unreachable!() };
            for binding in &frame.bindings {
                substitutions.insert(binding.name.to_string(), format!("{param}.{}", sanitize_member(&binding.name)));
            }
            frame_params.push((param, frame_expr));
        }

        let super_expr = match class.super_class {
            Some(s) => Some(self.value_ref(s)?),
            None => None,
        };

        let class_name = self.alloc.fresh("Class");
        let mut out = String::new();
        out.push_str("class ");
        out.push_str(&class_name);
        if let Some(sup) = &super_expr {
            out.push_str(" extends (");
            out.push_str(sup);
            out.push(')');
        }
        out.push_str(" {\n");
        if class.has_explicit_constructor {
            out.push_str("  ");
            out.push_str(&rewrite_closure_source(&ctor.source_text, &substitutions, false, None, None, None));
            out.push('\n');
        }

        let mut static_extra = Vec::new();
        for (key, descriptor) in &class.shape.properties {
            let name = match key {
                PropertyKeyNode::String(s) => s.as_ref(),
                PropertyKeyNode::Symbol(_) => continue,
            };
            if matches!(name, "prototype" | "length" | "name") {
                continue;
            }
            self.render_member_into(&mut out, key, descriptor, &substitutions, true)?;
            let _ = &mut static_extra;
        }

        if let Some((_, PropertyDescriptorNode::Data { value: proto_id, .. })) =
            class.shape.properties.iter().find(|(k, _)| matches!(k, PropertyKeyNode::String(s) if &**s == "prototype"))
        {
            if let GraphNode::PlainObject(proto_shape) = self.graph.get(*proto_id).clone() {
                for (key, descriptor) in &proto_shape.properties {
                    if matches!(key, PropertyKeyNode::String(s) if &**s == "constructor") {
                        continue;
                    }
                    self.render_member_into(&mut out, key, descriptor, &substitutions, false)?;
                }
            }
        }
        out.push('}');

        let mut expr = out;
        for (param, _) in frame_params.iter().rev() {
            expr = format!("({param}) => ({expr})");
        }
        for (_, frame_expr) in &frame_params {
            expr = format!("({expr})({frame_expr})");
        }
        if frame_params.is_empty() {
            expr = format!("({expr})");
        }

        self.render_shaped(None, &expr, &ClassStaticExtras::empty_shape(), false)
    }

    fn render_member_into(
        &mut self,
        out: &mut String,
        key: &PropertyKeyNode,
        descriptor: &PropertyDescriptorNode,
        substitutions: &FxHashMap<String, String>,
        is_static: bool,
    ) -> Result<(), EmitError> {
        let key_text = match key {
            PropertyKeyNode::String(s) => s.to_string(),
            PropertyKeyNode::Symbol(_) => return Ok(()),
        };
        match descriptor {
            PropertyDescriptorNode::Data { value, .. } => {
                if let GraphNode::Closure(member) = self.graph.get(*value).clone() {
                    let prefix = member_prefix(&member);
                    let rewritten = rewrite_closure_source(&member.source_text, substitutions, false, None, None, None);
                    out.push_str("  ");
                    if is_static {
                        out.push_str("static ");
                    }
                    out.push_str(&prefix);
                    out.push_str(&rewritten);
                    out.push('\n');
                } else {
                    // A non-function own property (a class field). Render
                    // as a static/instance field initializer.
                    let value_expr = self.value_ref(*value)?;
                    out.push_str("  ");
                    if is_static {
                        out.push_str("static ");
                    }
                    out.push_str(&key_text);
                    out.push_str(" = ");
                    out.push_str(&value_expr);
                    out.push_str(";\n");
                }
            }
            PropertyDescriptorNode::Accessor { get, set, .. } => {
                if let Some(g) = get {
                    if let GraphNode::Closure(member) = self.graph.get(*g).clone() {
                        let rewritten = rewrite_closure_source(&member.source_text, substitutions, false, None, None, None);
                        out.push_str("  ");
                        if is_static {
                            out.push_str("static ");
                        }
                        out.push_str("get ");
                        out.push_str(&rewritten);
                        out.push('\n');
                    }
                }
                if let Some(s) = set {
                    if let GraphNode::Closure(member) = self.graph.get(*s).clone() {
                        let rewritten = rewrite_closure_source(&member.source_text, substitutions, false, None, None, None);
                        out.push_str("  ");
                        if is_static {
                            out.push_str("static ");
                        }
                        out.push_str("set ");
                        out.push_str(&rewritten);
                        out.push('\n');
                    }
                }
            }
        }
        Ok(())
    }
}

/// Above this many elements, a base64-encoded `ArrayBuffer` is more compact
/// than one literal per slot; at or below it a dense/sparse element list
/// reads back as ordinary structural data instead of an opaque blob.
const DENSE_ELEMENT_LIST_MAX_LEN: usize = 16;

/// Renders a typed-array view over a non-shared buffer as a dense/sparse
/// element list — `new Uint8Array([100, , 200])` — leaving a hole at every
/// default-valued (zero) slot instead of round-tripping through base64.
fn render_typed_element_list(bytes: &[u8], element_kind: TypedElementKind, byte_offset: usize, length: usize) -> String {
    let size = element_kind.byte_size();
    let ctor = element_kind.constructor_name();
    let mut slots = Vec::with_capacity(length);
    for i in 0..length {
        let start = byte_offset + i * size;
        let end = start + size;
        let value = if end <= bytes.len() { element_kind.read(&bytes[start..end]) } else { HostValue::Number(0.0) };
        let is_default = match &value {
            HostValue::Number(n) => *n == 0.0,
            HostValue::BigInt(d) => d.as_str() == "0",
            _ => false,
        };
        slots.push(if is_default { String::new() } else { render_typed_element(&value) });
    }
    format!("new {ctor}([{}])", slots.join(", "))
}

fn render_typed_element(value: &HostValue) -> String {
    match value {
        HostValue::BigInt(digits) => render_bigint(digits),
        HostValue::Number(n) => render_number(*n),
        _ => "0".to_string(),
    }
}

fn member_prefix(member: &ClosureNode) -> String {
    use revive_ast::FunctionFlavor;
    match member.flavor {
        FunctionFlavor::Generator => "*".to_string(),
        FunctionFlavor::Async => "async ".to_string(),
        FunctionFlavor::AsyncGenerator => "async *".to_string(),
        _ => String::new(),
    }
}

/// A binding name may be a valid JS identifier already (the overwhelmingly
/// common case, since it came from source) or, rarely, something that needs
/// bracket-notation access; this workspace's AST only admits identifier
/// binding names, so a direct member name is always safe here.
fn sanitize_member(name: &str) -> &str {
    name
}

/// Placeholder for a shapeless class expression: its own attribute set (no
/// extensibility/prototype overrides beyond what `class` syntax already
/// sets up) so `render_shaped` can reuse the generic skip-the-wrap fast
/// path.
struct ClassStaticExtras;
impl ClassStaticExtras {
    fn empty_shape() -> ObjectShape {
        ObjectShape::default()
    }
}

#[cfg(test)]
#[path = "../tests/printer.rs"]
mod tests;
