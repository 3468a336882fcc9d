//! Built-in adapters, grouped by how they capture state.
//!
//! * [`reflective`]: private state read through field handles.
//! * [`structural`]: rebuilt through public constructors and factories.
//! * [`tokens`]: written as a small token and resolved on decode.

pub mod reflective;
pub mod structural;
pub mod tokens;

use tracing::debug;

use crate::engine::Registry;
use crate::Result;

/// Registers every built-in adapter.
///
/// Class ids follow registration order, so applications registering their
/// own types should do so after this call, in a fixed order.
pub fn register_defaults(registry: &mut Registry) -> Result<()> {
    structural::register(registry)?;
    reflective::register(registry)?;
    tokens::register(registry)?;
    debug!(types = registry.len(), "registered default adapters");
    Ok(())
}
