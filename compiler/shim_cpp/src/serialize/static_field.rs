//! Static fields become a `_get_`/`_set_` accessor pair on the type.
//!
//! | style       | getter               | setter                |
//! |-------------|----------------------|-----------------------|
//! | Normal      | `std::optional<T>`   | no-op on failure      |
//! | CrashUnless | `T`, aborts          | aborts                |
//! | ThrowUnless | `T`, throws          | throws                |

use shim_ir::Field;

use crate::serialize::{wrap, write_unresolved, TypeScope};
use crate::{CppWriter, OutputStyle, Slot};

/// Accessor declarations inside the type body. Types without a source unit
/// get the definitions inline instead.
pub(super) fn declare(scope: &TypeScope<'_, '_>, w: &mut CppWriter) {
    for (field, slot) in static_fields(scope) {
        let ty = match slot {
            Slot::Rendered(ty) => ty,
            Slot::Diagnostic(unresolved) => {
                write_unresolved(w, unresolved);
                continue;
            }
            Slot::Omitted => continue,
        };
        let accessors = Accessors::new(scope, field, ty);
        if scope.has_source {
            w.comment(&format!("Get static field: {}", accessors.description));
            w.declaration(&format!("static {}", accessors.getter("")));
            w.comment(&format!("Set static field: {}", accessors.description));
            w.declaration(&format!("static {}", accessors.setter("")));
        } else {
            accessors.write_definitions(w, "static ", "");
        }
    }
}

/// Out-of-line accessor definitions for the source unit.
pub(super) fn define(scope: &TypeScope<'_, '_>, w: &mut CppWriter) {
    let qualifier = format!("{}::", scope.qualifier());
    for (field, slot) in static_fields(scope) {
        if let Slot::Rendered(ty) = slot {
            w.blank();
            Accessors::new(scope, field, ty).write_definitions(w, "", &qualifier);
        }
    }
}

fn static_fields<'s>(
    scope: &'s TypeScope<'_, '_>,
) -> impl Iterator<Item = (&'s Field, &'s Slot<String>)> {
    scope
        .data
        .fields
        .iter()
        .zip(scope.cx.fields())
        .filter(|(field, _)| field.is_static())
}

struct Accessors<'f> {
    field: &'f Field,
    ty: &'f str,
    suffix: String,
    /// `static System.Int32 count`, for comments.
    description: String,
    class_args: String,
    style: OutputStyle,
}

impl<'f> Accessors<'f> {
    fn new(scope: &TypeScope<'_, '_>, field: &'f Field, ty: &'f str) -> Self {
        let specifiers = field.specifiers.to_string();
        let described = scope.graph.resolver.describe(field.ty);
        let description = if specifiers.is_empty() {
            format!("{described} {}", field.name)
        } else {
            format!("{specifiers} {described} {}", field.name)
        };
        Accessors {
            field,
            ty,
            suffix: scope.options.naming.accessor_suffix(&field.name),
            description,
            class_args: scope.class_args(),
            style: scope.options.output_style,
        }
    }

    fn getter(&self, qualifier: &str) -> String {
        let ret = match self.style {
            OutputStyle::Normal => format!("std::optional<{}>", self.ty),
            OutputStyle::CrashUnless | OutputStyle::ThrowUnless => self.ty.to_owned(),
        };
        format!("{ret} {qualifier}_get_{}()", self.suffix)
    }

    fn setter(&self, qualifier: &str) -> String {
        format!("void {qualifier}_set_{}({} value)", self.suffix, self.ty)
    }

    fn write_definitions(&self, w: &mut CppWriter, prefix: &str, qualifier: &str) {
        let get = format!(
            "il2cpp_utils::GetFieldValue<{}>({}, \"{}\")",
            self.ty, self.class_args, self.field.name
        );
        let set = format!(
            "il2cpp_utils::SetFieldValue({}, \"{}\", value)",
            self.class_args, self.field.name
        );
        let (get, set) = match self.style.macro_name() {
            Some(macro_name) => (wrap(macro_name, &get), wrap(macro_name, &set)),
            None => (get, wrap("RET_V_UNLESS", &set)),
        };

        w.comment("Autogenerated static field getter");
        w.comment(&format!("Get static field: {}", self.description));
        w.open(&format!("{prefix}{}", self.getter(qualifier)));
        w.line(&format!("return {get};"));
        w.close("}");
        w.comment("Autogenerated static field setter");
        w.comment(&format!("Set static field: {}", self.description));
        w.open(&format!("{prefix}{}", self.setter(qualifier)));
        w.line(&format!("{set};"));
        w.close("}");
    }
}
