//! Concatenated string tables with minimal-width offset indexes.
//!
//! Every lookup returns a slice of one blob per run instead of one string
//! constant per declaration. The offsets into the blob use the narrowest
//! unsigned integer that can address it.

use std::fmt;

use serde::Serialize;

use crate::declaration::ConstantDeclaration;
use crate::runs::Run;
use crate::strategy::Strategy;

/// Integer type of an emitted offset index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexWidth {
    U8,
    U16,
    U32,
}

impl IndexWidth {
    /// Smallest width whose range covers offsets up to `len`.
    pub fn for_len(len: usize) -> Self {
        if len < 1 << 8 {
            IndexWidth::U8
        } else if len < 1 << 16 {
            IndexWidth::U16
        } else {
            // Blobs past u32::MAX bytes have no emittable index.
            IndexWidth::U32
        }
    }

    pub fn rust_name(&self) -> &'static str {
        match self {
            IndexWidth::U8 => "u8",
            IndexWidth::U16 => "u16",
            IndexWidth::U32 => "u32",
        }
    }

}

impl fmt::Display for IndexWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rust_name())
    }
}

/// Which text of a declaration a table holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableField {
    Name,
    Description,
}

impl TableField {
    pub fn text<'a>(&self, decl: &'a ConstantDeclaration) -> &'a str {
        match self {
            TableField::Name => &decl.trimmed_name,
            TableField::Description => &decl.description,
        }
    }

    /// Fragment used in emitted item names.
    pub fn tag(&self) -> &'static str {
        match self {
            TableField::Name => "NAME",
            TableField::Description => "DESC",
        }
    }

    /// Accessor method the field backs.
    pub fn accessor(&self) -> &'static str {
        match self {
            TableField::Name => "name",
            TableField::Description => "description",
        }
    }
}

/// Concatenated entries plus byte offsets delimiting them.
///
/// `offsets[i]..offsets[i + 1]` is entry `i`. Tables over a single entry
/// carry no offsets: the whole blob is the entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringTable {
    text: String,
    offsets: Option<Vec<usize>>,
    count: usize,
}

impl StringTable {
    /// Concatenate `entries` in order, recording offsets unless the table
    /// holds a single entry.
    pub fn build<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut text = String::new();
        let mut offsets = vec![0];
        for entry in entries {
            text.push_str(entry);
            offsets.push(text.len());
        }
        let count = offsets.len() - 1;
        let offsets = (count != 1).then_some(offsets);
        Self {
            text,
            offsets,
            count,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn offsets(&self) -> Option<&[usize]> {
        self.offsets.as_deref()
    }

    pub fn has_index(&self) -> bool {
        self.offsets.is_some()
    }

    /// Width of the emitted offset index.
    pub fn width(&self) -> IndexWidth {
        IndexWidth::for_len(self.text.len())
    }

    /// Byte range of entry `i`.
    pub fn span(&self, i: usize) -> Option<(usize, usize)> {
        match &self.offsets {
            Some(offsets) if i + 1 < offsets.len() => Some((offsets[i], offsets[i + 1])),
            Some(_) => None,
            None => (i == 0).then_some((0, self.text.len())),
        }
    }

    pub fn entry(&self, i: usize) -> Option<&str> {
        self.span(i).map(|(lo, hi)| &self.text[lo..hi])
    }
}

/// Parallel name and description tables over the same declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePair {
    pub names: StringTable,
    pub descriptions: StringTable,
}

impl TablePair {
    pub fn build(members: &[ConstantDeclaration]) -> Self {
        Self {
            names: StringTable::build(members.iter().map(|d| TableField::Name.text(d))),
            descriptions: StringTable::build(
                members.iter().map(|d| TableField::Description.text(d)),
            ),
        }
    }

    pub fn get(&self, field: TableField) -> &StringTable {
        match field {
            TableField::Name => &self.names,
            TableField::Description => &self.descriptions,
        }
    }
}

/// Tables for one type, shaped by the strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tables {
    /// One pair per run, in run order.
    PerRun(Vec<TablePair>),
    /// One pair over every declaration, for value-keyed maps. Map entries
    /// carry their spans, so no index array is emitted.
    Global(TablePair),
}

impl Tables {
    pub fn build(strategy: Strategy, runs: &[Run<'_>], values: &[ConstantDeclaration]) -> Self {
        if strategy.uses_per_run_tables() {
            Tables::PerRun(runs.iter().map(|run| TablePair::build(run.members())).collect())
        } else {
            Tables::Global(TablePair::build(values))
        }
    }

    /// Strategy the tables were built for.
    pub fn strategy(&self) -> Strategy {
        match self {
            Tables::PerRun(pairs) if pairs.len() == 1 => Strategy::SingleRun,
            Tables::PerRun(_) => Strategy::MultipleRuns,
            Tables::Global(_) => Strategy::SparseMap,
        }
    }

    /// Whether the emitted code indexes tables through offset arrays.
    pub fn emits_index(&self) -> bool {
        matches!(self, Tables::PerRun(_))
    }

    pub fn pairs(&self) -> &[TablePair] {
        match self {
            Tables::PerRun(pairs) => pairs,
            Tables::Global(pair) => std::slice::from_ref(pair),
        }
    }
}
