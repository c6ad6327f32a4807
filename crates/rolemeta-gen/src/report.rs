//! Concept report: a human-readable listing of generated handlers.
//!
//! ```text
//! Block Role::STATEMENT
//!   ItemType: Statement
//!   GET: statements() : List<Statement>
//!   SET: set_statements(List<Statement>) : ()
//! ----------------------------------------
//! ```

use rolemeta_core::Colors;

use crate::synth::Generation;

const SEPARATOR_WIDTH: usize = 40;

/// Render one block per handler of `generation`, in handler order.
///
/// `ItemType` is the normalized value type the handler is typed by; the
/// accessor lines show the declared field type.
pub fn render_report(generation: &Generation, colors: Colors) -> String {
    let c = colors;
    let separator = "-".repeat(SEPARATOR_WIDTH);
    let mut out = String::new();

    for (desc, artifact) in generation.iter() {
        out.push_str(&format!(
            "{}{}{} Role::{}{}{}\n",
            c.name, desc.owner_name, c.reset, c.name, desc.role, c.reset
        ));
        out.push_str(&format!(
            "  ItemType: {}{}{}\n",
            c.ty, desc.value_type, c.reset
        ));
        out.push_str(&format!(
            "  {}GET:{} {}() : {}{}{}\n",
            c.muted, c.reset, desc.getter, c.ty, desc.declared_type, c.reset
        ));
        if let Some(setter) = &artifact.params.setter_name {
            out.push_str(&format!(
                "  {}SET:{} {}({}{}{}) : ()\n",
                c.muted, c.reset, setter, c.ty, desc.declared_type, c.reset
            ));
        }
        out.push_str(&format!("{}{}{}\n", c.muted, separator, c.reset));
    }

    out
}
