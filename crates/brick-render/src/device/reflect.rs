//! Name lookup for the inputs of a WGSL program.
//!
//! wgpu binds by location/binding index rather than by name, so the backend
//! parses each stage with naga and recovers the names the renderer asks for
//! from the resulting module.

use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{Binding, Module, ShaderStage, TypeInner};

use crate::gfx::ContextError;

/// Parses and validates one shader stage.
pub(crate) fn compile(stage: &'static str, source: &str) -> Result<Module, ContextError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ContextError::Compile {
        stage,
        message: e.emit_to_string(source),
    })?;

    Validator::new(ValidationFlags::all(), Capabilities::default())
        .validate(&module)
        .map_err(|e| ContextError::Compile {
            stage,
            message: e.emit_to_string(source),
        })?;

    Ok(module)
}

pub(crate) fn has_entry_point(module: &Module, stage: ShaderStage, name: &str) -> bool {
    module
        .entry_points
        .iter()
        .any(|ep| ep.stage == stage && ep.name == name)
}

/// `@location` inputs of the entry point `entry`, including those declared
/// as members of a struct argument.
pub(crate) fn vertex_inputs(module: &Module, entry: &str) -> Vec<(String, u32)> {
    let Some(ep) = module.entry_points.iter().find(|ep| ep.name == entry) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for arg in &ep.function.arguments {
        match (&arg.binding, &module.types[arg.ty].inner) {
            (Some(Binding::Location { location, .. }), _) => {
                if let Some(name) = &arg.name {
                    out.push((name.clone(), *location));
                }
            }
            (None, TypeInner::Struct { members, .. }) => {
                for member in members {
                    if let (Some(Binding::Location { location, .. }), Some(name)) =
                        (&member.binding, &member.name)
                    {
                        out.push((name.clone(), *location));
                    }
                }
            }
            _ => {}
        }
    }
    out
}

/// Member names of the struct `struct_name`, in declaration order.
pub(crate) fn struct_members(module: &Module, struct_name: &str) -> Vec<String> {
    module
        .types
        .iter()
        .find_map(|(_, ty)| match &ty.inner {
            TypeInner::Struct { members, .. } if ty.name.as_deref() == Some(struct_name) => Some(
                members
                    .iter()
                    .filter_map(|m| m.name.clone())
                    .collect(),
            ),
            _ => None,
        })
        .unwrap_or_default()
}
