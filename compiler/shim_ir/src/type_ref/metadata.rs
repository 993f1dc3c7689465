//! Metadata-backed type symbols.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::RefKind;
use crate::MetadataHandle;

/// One entry of the binary metadata symbol table, as handed over by the
/// metadata reader. Relations are expressed as handles into the same table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataSymbol {
    pub handle: MetadataHandle,
    #[serde(default)]
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub kind: RefKind,
    #[serde(default)]
    pub generic_parameters: Vec<MetadataHandle>,
    /// Absent unless the symbol is a generic instance.
    #[serde(default)]
    pub generic_arguments: Option<Vec<MetadataHandle>>,
    #[serde(default)]
    pub declaring_type: Option<MetadataHandle>,
    /// Pointee, array element or by-ref target.
    #[serde(default)]
    pub element_type: Option<MetadataHandle>,
}

impl MetadataSymbol {
    /// A plain named symbol with no relations.
    pub fn named(handle: MetadataHandle, namespace: &str, name: &str) -> Self {
        MetadataSymbol {
            handle,
            namespace: namespace.to_owned(),
            name: name.to_owned(),
            kind: RefKind::Named,
            generic_parameters: Vec::new(),
            generic_arguments: None,
            declaring_type: None,
            element_type: None,
        }
    }
}

/// Symbol table of the binary metadata input, keyed by handle.
#[derive(Clone, Debug, Default)]
pub struct MetadataTable {
    symbols: FxHashMap<MetadataHandle, MetadataSymbol>,
}

impl MetadataTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symbol, replacing any earlier symbol with the same handle.
    pub fn insert(&mut self, symbol: MetadataSymbol) {
        self.symbols.insert(symbol.handle, symbol);
    }

    pub fn get(&self, handle: MetadataHandle) -> Option<&MetadataSymbol> {
        self.symbols.get(&handle)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl FromIterator<MetadataSymbol> for MetadataTable {
    fn from_iter<I: IntoIterator<Item = MetadataSymbol>>(iter: I) -> Self {
        let mut table = MetadataTable::new();
        for symbol in iter {
            table.insert(symbol);
        }
        table
    }
}
