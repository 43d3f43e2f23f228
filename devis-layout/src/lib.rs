pub mod composer;
pub mod config;
pub mod error;
pub mod footer;
pub mod model;
pub mod pagination;
pub mod quantity;
pub mod row;
pub mod totals;
pub mod wrap;

pub use composer::{render, render_document, render_pdf};
pub use config::{Alignment, Column, ColumnRole, LayoutConfig, Supplier, TaxDisplay};
pub use error::{LayoutError, Result};
pub use footer::{FooterLog, FooterRecord};
pub use model::{Client, DocumentInput, DocumentKind, HeaderInfo, LineItem};
pub use pagination::{CursorState, PageCursor, PageState};
pub use quantity::{format_quantity, QuantityUnit};
pub use row::{RowBuilder, RowCells, WrappedRow};
pub use totals::{aggregate, format_amount, Totals};
pub use wrap::{try_wrap, wrap};
