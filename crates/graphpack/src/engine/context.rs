//! Per-call state handed to adapters.
//!
//! A context lives for one `encode`, `decode` or `copy` call. It owns the
//! cursor, the reference table and the depth counter, and exposes the
//! recursive entry points adapters use for their children.

use std::collections::HashMap;

use graphpack_buffers::{HexPreview, Reader, Writer};
use graphpack_runtime::{EnumType, Identity, Interface, Obj, Value};
use tracing::{debug, trace, warn};

use crate::constants::Tag;
use crate::engine::{Engine, Registration, TypeKey};
use crate::{GraphError, Result};

fn enter(depth: &mut usize, max: usize) -> Result<()> {
    if *depth >= max {
        return Err(GraphError::DepthExceeded(max));
    }
    *depth += 1;
    Ok(())
}

pub struct WriteContext<'e> {
    engine: &'e Engine,
    out: Writer,
    /// Tracked objects stay alive with their id, so no address is reused
    /// during the call.
    seen: HashMap<Identity, (u32, Obj)>,
    depth: usize,
}

impl<'e> WriteContext<'e> {
    pub(crate) fn new(engine: &'e Engine) -> Self {
        Self {
            engine,
            out: Writer::new(),
            seen: HashMap::new(),
            depth: 0,
        }
    }

    pub(crate) fn finish(mut self) -> Vec<u8> {
        self.out.flush()
    }

    /// Raw output for an adapter's primitive fields.
    pub fn output(&mut self) -> &mut Writer {
        &mut self.out
    }

    /// Writes any value, prefixed by its tag and, for objects, its class id.
    pub fn write_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.out.u8(Tag::Null.into()),
            Value::Bool(false) => self.out.u8(Tag::False.into()),
            Value::Bool(true) => self.out.u8(Tag::True.into()),
            Value::Int(i) => {
                self.out.u8(Tag::Int.into());
                self.out.var_i64(*i);
            }
            Value::Float(f) => {
                self.out.u8(Tag::Float.into());
                self.out.f64(*f);
            }
            Value::Str(s) => {
                self.out.u8(Tag::Str.into());
                self.out.str(s);
            }
            Value::Obj(obj) => {
                if self.write_back_reference(obj) {
                    return Ok(());
                }
                let engine = self.engine;
                let registration = engine
                    .registry()
                    .lookup(obj.concrete_type_id())
                    .ok_or(GraphError::UnregisteredType(obj.type_name()))?;
                self.out.u8(Tag::Object.into());
                self.out.var_u32(registration.id());
                self.write_record(registration, obj, value)?;
            }
        }
        Ok(())
    }

    /// Writes a value whose type the reader already knows; no class id.
    ///
    /// Null-accepting adapters write their record directly, without a tag
    /// and without reference tracking.
    pub fn write_object(&mut self, value: &Value, ty: &TypeKey) -> Result<()> {
        let engine = self.engine;
        let registration = engine.registry().get(ty)?;
        if registration.adapter().accepts_null() {
            enter(&mut self.depth, engine.config().max_depth)?;
            let result = registration.adapter().encode(self, value);
            self.depth -= 1;
            return result;
        }
        match value {
            Value::Null => {
                self.out.u8(Tag::Null.into());
                Ok(())
            }
            Value::Obj(obj) if obj.concrete_type_id() == ty.type_id() => {
                if self.write_back_reference(obj) {
                    return Ok(());
                }
                self.out.u8(Tag::Object.into());
                self.write_record(registration, obj, value)
            }
            other => Err(GraphError::UnexpectedType {
                expected: ty.name(),
                found: other.kind_name(),
            }),
        }
    }

    /// Writes the class id of a registered type.
    pub fn write_class(&mut self, ty: &TypeKey) -> Result<()> {
        let id = self.engine.registry().get(ty)?.id();
        self.out.var_u32(id);
        Ok(())
    }

    fn write_back_reference(&mut self, obj: &Obj) -> bool {
        if !self.engine.config().references {
            return false;
        }
        match self.seen.get(&obj.identity()) {
            Some(&(id, _)) => {
                self.out.u8(Tag::Reference.into());
                self.out.var_u32(id);
                true
            }
            None => false,
        }
    }

    fn write_record(&mut self, registration: &Registration, obj: &Obj, value: &Value) -> Result<()> {
        if self.engine.config().references {
            let id = self.seen.len() as u32;
            self.seen.insert(obj.identity(), (id, obj.clone()));
        }
        trace!(ty = registration.key().name(), "encode object");
        enter(&mut self.depth, self.engine.config().max_depth)?;
        let result = registration.adapter().encode(self, value);
        self.depth -= 1;
        result
    }
}

#[derive(Debug)]
enum Slot {
    Reserved,
    Placeholder,
    Bound(Value),
}

#[derive(Debug)]
struct Frame {
    slot: Option<u32>,
}

/// Claim on the reference slot of the object being decoded.
///
/// Obtained from [`ReadContext::reserve_placeholder`] before reading
/// children that may point back at the object, and handed to
/// [`ReadContext::fulfil`] once the object exists.
#[must_use]
#[derive(Debug)]
pub struct Placeholder {
    id: Option<u32>,
}

pub struct ReadContext<'e, 'a> {
    engine: &'e Engine,
    input: Reader<'a>,
    refs: Vec<Slot>,
    frames: Vec<Frame>,
    depth: usize,
}

impl<'e, 'a> ReadContext<'e, 'a> {
    pub(crate) fn new(engine: &'e Engine, bytes: &'a [u8]) -> Self {
        Self {
            engine,
            input: Reader::new(bytes),
            refs: Vec::new(),
            frames: Vec::new(),
            depth: 0,
        }
    }

    pub(crate) fn finish(self) -> Result<()> {
        match self.input.size() {
            0 => Ok(()),
            n => Err(self.rejected(GraphError::TrailingBytes(n))),
        }
    }

    /// Logs where decoding stopped, then hands `err` back.
    pub(crate) fn rejected(&self, err: GraphError) -> GraphError {
        let rest = self.input.uint8.get(self.input.x..self.input.end).unwrap_or_default();
        debug!(offset = self.input.x, next = %HexPreview::new(rest), %err, "decode failed");
        err
    }

    /// Raw input for an adapter's primitive fields.
    pub fn input(&mut self) -> &mut Reader<'a> {
        &mut self.input
    }

    pub fn read_value(&mut self) -> Result<Value> {
        let tag = Tag::try_from(self.input.u8()?)?;
        Ok(match tag {
            Tag::Null => Value::Null,
            Tag::False => Value::Bool(false),
            Tag::True => Value::Bool(true),
            Tag::Int => Value::Int(self.input.var_i64()?),
            Tag::Float => Value::Float(self.input.f64()?),
            Tag::Str => Value::from(self.input.str()?),
            Tag::Object => {
                let engine = self.engine;
                let registration = engine.registry().by_id(self.input.var_u32()?)?;
                self.read_record(registration)?
            }
            Tag::Reference => self.read_back_reference()?,
        })
    }

    /// Reads a value written by [`WriteContext::write_object`].
    pub fn read_object(&mut self, ty: &TypeKey) -> Result<Value> {
        let engine = self.engine;
        let registration = engine.registry().get(ty)?;
        if registration.adapter().accepts_null() {
            return self.decode_in_frame(registration, None);
        }
        match Tag::try_from(self.input.u8()?)? {
            Tag::Null => Ok(Value::Null),
            Tag::Object => self.read_record(registration),
            Tag::Reference => self.read_back_reference(),
            other => Err(GraphError::InvalidTag(other.into())),
        }
    }

    /// Reads a class id written by [`WriteContext::write_class`].
    pub fn read_class(&mut self) -> Result<TypeKey> {
        let id = self.input.var_u32()?;
        Ok(*self.engine.registry().by_id(id)?.key())
    }

    /// Binds the object being decoded to its reference id.
    ///
    /// Call before reading children that may refer back to the object.
    /// Later calls for the same object are ignored.
    pub fn reference(&mut self, obj: &Obj) {
        if let Some(id) = self.current_slot() {
            let slot = &mut self.refs[id as usize];
            if !matches!(slot, Slot::Bound(_)) {
                *slot = Slot::Bound(Value::Obj(obj.clone()));
            }
        }
    }

    /// First phase of the two-phase reference protocol.
    ///
    /// Until [`ReadContext::fulfil`] runs, a back-reference to the object
    /// fails with [`GraphError::UnresolvedReference`].
    pub fn reserve_placeholder(&mut self) -> Placeholder {
        let id = self.current_slot();
        if let Some(id) = id {
            let slot = &mut self.refs[id as usize];
            if matches!(slot, Slot::Reserved) {
                *slot = Slot::Placeholder;
            }
        }
        Placeholder { id }
    }

    pub fn fulfil(&mut self, placeholder: Placeholder, obj: &Obj) -> Result<()> {
        let Some(id) = placeholder.id else {
            return Ok(());
        };
        match self.refs.get_mut(id as usize) {
            Some(slot) if matches!(slot, Slot::Placeholder) => {
                *slot = Slot::Bound(Value::Obj(obj.clone()));
                Ok(())
            }
            Some(_) => Err(GraphError::NoPendingReference),
            None => Err(GraphError::InvalidReference(id)),
        }
    }

    /// The [`EnumType`] of a type registered through
    /// [`Registry::register_enum`](crate::Registry::register_enum).
    pub fn enum_type(&self, ty: &TypeKey) -> Result<EnumType> {
        self.engine
            .registry()
            .enum_type(ty.type_id())
            .ok_or(GraphError::UnregisteredType(ty.name()))
    }

    pub fn resolve_name(&self, name: &str) -> Result<TypeKey> {
        self.engine.registry().resolve_name(name)
    }

    pub fn resolve_interface(&self, name: &str) -> Result<Interface> {
        self.engine.registry().resolve_interface(name)
    }

    /// Upper bound for a decoded element count: every element takes at
    /// least one byte.
    pub fn read_len(&mut self, kind: &'static str) -> Result<usize> {
        let len = self.input.var_usize()?;
        if len > self.input.size() {
            return Err(GraphError::invalid_record(
                kind,
                format!("length {len} exceeds the remaining {} bytes", self.input.size()),
            ));
        }
        Ok(len)
    }

    fn current_slot(&self) -> Option<u32> {
        self.frames.last().and_then(|f| f.slot)
    }

    fn read_record(&mut self, registration: &Registration) -> Result<Value> {
        let slot = if self.engine.config().references {
            let id = self.refs.len() as u32;
            self.refs.push(Slot::Reserved);
            Some(id)
        } else {
            None
        };
        let value = self.decode_in_frame(registration, slot)?;
        if let Some(id) = slot {
            let slot = &mut self.refs[id as usize];
            if matches!(slot, Slot::Placeholder) {
                warn!(
                    id,
                    ty = registration.key().name(),
                    "placeholder left pending by adapter; binding decoded value"
                );
            }
            if !matches!(slot, Slot::Bound(_)) {
                *slot = Slot::Bound(value.clone());
            }
        }
        Ok(value)
    }

    fn decode_in_frame(&mut self, registration: &Registration, slot: Option<u32>) -> Result<Value> {
        trace!(ty = registration.key().name(), ?slot, "decode object");
        enter(&mut self.depth, self.engine.config().max_depth)?;
        self.frames.push(Frame { slot });
        let result = registration.adapter().decode(self, registration.key());
        self.frames.pop();
        self.depth -= 1;
        result
    }

    fn read_back_reference(&mut self) -> Result<Value> {
        let id = self.input.var_u32()?;
        if !self.engine.config().references {
            return Err(GraphError::InvalidReference(id));
        }
        match self.refs.get(id as usize) {
            Some(Slot::Bound(value)) => Ok(value.clone()),
            Some(Slot::Reserved | Slot::Placeholder) => Err(GraphError::UnresolvedReference(id)),
            None => Err(GraphError::InvalidReference(id)),
        }
    }
}

pub struct CopyContext<'e> {
    engine: &'e Engine,
    /// Original object and its copy, keyed by the original's identity.
    memo: HashMap<Identity, (Obj, Value)>,
    originals: Vec<Obj>,
    depth: usize,
}

impl<'e> CopyContext<'e> {
    pub(crate) fn new(engine: &'e Engine) -> Self {
        Self {
            engine,
            memo: HashMap::new(),
            originals: Vec::new(),
            depth: 0,
        }
    }

    /// Deep-copies `value`. Scalars and immutable objects come back as is.
    pub fn copy(&mut self, value: &Value) -> Result<Value> {
        let Value::Obj(obj) = value else {
            return Ok(value.clone());
        };
        let sharing = self.engine.config().copy_references;
        if sharing {
            if let Some((_, copy)) = self.memo.get(&obj.identity()) {
                return Ok(copy.clone());
            }
        }
        let engine = self.engine;
        let registration = engine
            .registry()
            .lookup(obj.concrete_type_id())
            .ok_or(GraphError::UnregisteredType(obj.type_name()))?;
        let adapter = registration.adapter();
        if adapter.is_immutable() {
            return Ok(value.clone());
        }
        trace!(ty = registration.key().name(), "copy object");
        enter(&mut self.depth, engine.config().max_depth)?;
        self.originals.push(obj.clone());
        let result = adapter.duplicate(self, obj);
        self.originals.pop();
        self.depth -= 1;
        let copy = result?;
        if sharing {
            self.memo
                .entry(obj.identity())
                .or_insert_with(|| (obj.clone(), copy.clone()));
        }
        Ok(copy)
    }

    /// Records `copy` as the copy of the object being duplicated, so
    /// children referring back to the original resolve to it.
    pub fn reference(&mut self, copy: &Obj) {
        if !self.engine.config().copy_references {
            return;
        }
        if let Some(original) = self.originals.last() {
            self.memo.insert(
                original.identity(),
                (original.clone(), Value::Obj(copy.clone())),
            );
        }
    }
}
