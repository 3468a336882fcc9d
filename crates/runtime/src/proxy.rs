//! Dynamic proxies: an interface list plus a handler receiving every call.

use crate::{Obj, Object, RuntimeError, Value};

/// A named interface a proxy can claim to implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interface {
    name: &'static str,
}

impl Interface {
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

#[derive(Debug)]
pub struct Proxy {
    interfaces: Vec<Interface>,
    handler: Obj,
}

impl Proxy {
    /// Fails unless `handler` is an invocation handler.
    pub fn new(interfaces: Vec<Interface>, handler: Obj) -> Result<Obj, RuntimeError> {
        if handler.get().as_invocation_handler().is_none() {
            return Err(RuntimeError::MissingCapability(
                handler.type_name(),
                "invocation handler",
            ));
        }
        Ok(Obj::new(Proxy {
            interfaces,
            handler,
        }))
    }

    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    pub fn handler(&self) -> &Obj {
        &self.handler
    }

    pub fn implements(&self, name: &str) -> bool {
        self.interfaces.iter().any(|i| i.name == name)
    }

    /// Routes a call on `interface` to the handler.
    pub fn invoke(&self, interface: &str, method: &str, args: &[Value]) -> Result<Value, RuntimeError> {
        if !self.implements(interface) {
            return Err(RuntimeError::UnsupportedOperation("interface not implemented by proxy"));
        }
        self.handler
            .get()
            .as_invocation_handler()
            .ok_or(RuntimeError::MissingCapability(
                self.handler.type_name(),
                "invocation handler",
            ))?
            .invoke(interface, method, args)
    }
}

impl Object for Proxy {}
