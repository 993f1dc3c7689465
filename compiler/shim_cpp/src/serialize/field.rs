//! Instance fields: plain data members, in declaration order.

use crate::serialize::{write_unresolved, TypeScope};
use crate::{CppWriter, Slot};

pub(super) fn declare(scope: &TypeScope<'_, '_>, w: &mut CppWriter) {
    for (field, slot) in scope.data.fields.iter().zip(scope.cx.fields()) {
        if field.is_static() {
            continue;
        }
        match slot {
            Slot::Rendered(ty) => {
                if field.offset >= 0 {
                    w.comment(&format!("Offset: 0x{:X}", field.offset));
                }
                let name = scope.options.naming.identifier(&field.name);
                w.declaration(&format!("{ty} {name}"));
            }
            Slot::Diagnostic(unresolved) => write_unresolved(w, unresolved),
            Slot::Omitted => {}
        }
    }
}
