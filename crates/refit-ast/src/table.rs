//! Table representations.
//!
//! [`SimpleTable`] is the flat shape hosts usually have at hand: one caption,
//! per-column alignment and width, a header row and body rows, optionally
//! followed by further header rows and footer rows. [`Table`] is the
//! canonical block form that backends consume. `Table::from(simple)` converts.

use serde::{Deserialize, Serialize};

use crate::attr::Attr;
use crate::node::{Block, Inline};

/// Horizontal cell alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    AlignLeft,
    AlignRight,
    AlignCenter,
    #[default]
    AlignDefault,
}

/// Column properties.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColSpec {
    pub align: Alignment,
    /// Relative width in `(0, 1]`; `None` lets the backend decide.
    pub width: Option<f64>,
}

/// Table cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub align: Alignment,
    #[serde(default = "one")]
    pub row_span: u32,
    #[serde(default = "one")]
    pub col_span: u32,
    pub content: Vec<Block>,
}

fn one() -> u32 {
    1
}

impl Cell {
    /// Cell spanning one row and one column with default alignment.
    #[must_use]
    pub fn new(content: Vec<Block>) -> Self {
        Self {
            align: Alignment::AlignDefault,
            row_span: 1,
            col_span: 1,
            content,
        }
    }
}

/// Table row.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<Cell>,
}

/// Canonical block table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Table {
    pub attr: Attr,
    pub caption: Vec<Block>,
    pub col_specs: Vec<ColSpec>,
    pub head: Vec<Row>,
    pub body: Vec<Row>,
    pub foot: Vec<Row>,
}

impl Table {
    /// Number of columns, taken from the column specs.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.col_specs.len()
    }
}

/// Flat table as produced by hosts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimpleTable {
    pub attr: Attr,
    pub caption: Vec<Inline>,
    pub aligns: Vec<Alignment>,
    /// Relative column widths; `0.0` means unspecified.
    pub widths: Vec<f64>,
    pub headers: Vec<Vec<Block>>,
    pub rows: Vec<Vec<Vec<Block>>>,
    /// Header rows below `headers`.
    pub subheaders: Vec<Vec<Vec<Block>>>,
    pub footer: Vec<Vec<Vec<Block>>>,
}

impl From<SimpleTable> for Table {
    fn from(simple: SimpleTable) -> Self {
        let col_specs = simple
            .aligns
            .iter()
            .enumerate()
            .map(|(i, &align)| ColSpec {
                align,
                width: simple.widths.get(i).copied().filter(|w| *w > 0.0),
            })
            .collect();

        let to_row = |cells: Vec<Vec<Block>>| Row {
            cells: cells.into_iter().map(Cell::new).collect(),
        };

        // An all-empty header row means the table has no head.
        let mut head = if simple.headers.iter().all(Vec::is_empty) {
            Vec::new()
        } else {
            vec![to_row(simple.headers)]
        };
        head.extend(simple.subheaders.into_iter().map(to_row));

        let caption = if simple.caption.is_empty() {
            Vec::new()
        } else {
            vec![Block::Plain(simple.caption)]
        };

        Self {
            attr: simple.attr,
            caption,
            col_specs,
            head,
            body: simple.rows.into_iter().map(to_row).collect(),
            foot: simple.footer.into_iter().map(to_row).collect(),
        }
    }
}
