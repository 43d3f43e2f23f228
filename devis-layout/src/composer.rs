//! Lays out one complete invoice or estimate.

use pdf_surface::{BuiltinFont, DrawingSurface, PdfSurface, TextStyle};
use tracing::{debug, warn};

use crate::config::{LayoutConfig, TaxDisplay};
use crate::error::{LayoutError, Result};
use crate::model::{Client, DocumentInput, DocumentKind, HeaderInfo, LineItem};
use crate::pagination::PageCursor;
use crate::row::RowBuilder;
use crate::totals::{aggregate, format_amount, Totals};
use crate::wrap::try_wrap;

const TITLE_SIZE: f64 = 16.0;
const META_SIZE: f64 = 12.0;
const META_LINE: f64 = 20.0;
/// Offset of header values from their labels.
const META_VALUE_X: f64 = 170.0;
const PARTY_NAME_SIZE: f64 = 11.0;
const PARTY_SIZE: f64 = 10.0;
const PARTY_LINE: f64 = 15.0;
/// The party block is never shorter than the stock supplier block.
const PARTY_MIN_HEIGHT: f64 = 85.0;
const PROJECT_SIZE: f64 = 11.0;
const TOTALS_SIZE: f64 = 10.0;
const TOTALS_LINE: f64 = 20.0;
const LEGAL_LINE: f64 = 10.0;

/// Render with a [`PdfSurface`] sized and configured from `config`.
pub fn render_pdf(
    kind: DocumentKind,
    header: &HeaderInfo,
    client: &Client,
    items: &[LineItem],
    config: &LayoutConfig,
) -> Result<Vec<u8>> {
    let mut surface = PdfSurface::new(config.page_width, config.page_height);
    surface
        .set_compression(config.compress)
        .set_line_width(config.rule_width)
        .set_info("Title", &format!("{} {}", kind.title(), header.doc_number))
        .set_info("Creator", "devis-layout");
    render(kind, header, client, items, config, surface)
}

/// [`render_pdf`] for a parsed input document.
pub fn render_document(input: &DocumentInput, config: &LayoutConfig) -> Result<Vec<u8>> {
    render_pdf(input.kind, &input.header, &input.client, &input.items, config)
}

/// Lay out a whole document on `surface` and return the emitted bytes.
///
/// Inputs, and the configured geometry against the surface's page size, are
/// validated before anything is drawn. Any error abandons the
/// surface with every page it buffered.
pub fn render<S: DrawingSurface>(
    kind: DocumentKind,
    header: &HeaderInfo,
    client: &Client,
    items: &[LineItem],
    config: &LayoutConfig,
    surface: S,
) -> Result<Vec<u8>> {
    config.validate()?;
    let (page_width, page_height) = surface.page_size();
    config.check_page_size(page_width, page_height)?;
    header.validate()?;
    for (index, item) in items.iter().enumerate() {
        item.validate(index)?;
    }

    let totals = match config.tax_display {
        TaxDisplay::PerItem => aggregate(items),
        TaxDisplay::FlatRate(rate) => {
            warn!(%rate, "flat tax rate configured, per-item rates are ignored in totals");
            Totals::with_flat_rate(items, rate)
        }
    };
    debug!(
        kind = kind.title(),
        doc_number = %header.doc_number,
        items = items.len(),
        "composing document"
    );

    let mut cursor = PageCursor::new(surface, config, &header.doc_number);
    draw_heading(&mut cursor, kind, header, config)?;
    draw_parties(&mut cursor, client, config)?;
    if let Some(project) = header.project.as_deref().filter(|p| !p.trim().is_empty()) {
        cursor.ensure_space(PARTY_LINE)?;
        let y = cursor.cursor_y();
        let style = TextStyle::regular(PROJECT_SIZE);
        cursor
            .surface_mut()
            .draw_text(&format!("Chantier {}", project.trim()), config.margin_left, y, &style);
        cursor.advance(PARTY_LINE);
    }

    cursor.ensure_space(config.header_height + config.base_row_height)?;
    let top = cursor.cursor_y();
    cursor.begin_table(top)?;
    let builder = RowBuilder::new(config);
    for item in items {
        let row = builder.build(item, |text, font, size| {
            cursor.surface().measure_text(text, font, size)
        })?;
        cursor.place_row(&row)?;
    }
    cursor.end_table()?;

    draw_totals(&mut cursor, &totals, config)?;
    draw_legal(&mut cursor, config)?;
    cursor.finish()
}

fn text_width<S: DrawingSurface>(surface: &S, text: &str, font: BuiltinFont, size: f64) -> Result<f64> {
    surface
        .measure_text(text, font, size)
        .map_err(LayoutError::MeasurementUnavailable)
}

/// Title, number, dates and logo.
fn draw_heading<S: DrawingSurface>(
    cursor: &mut PageCursor<'_, S>,
    kind: DocumentKind,
    header: &HeaderInfo,
    config: &LayoutConfig,
) -> Result<()> {
    let left = config.margin_left;
    let y = cursor.cursor_y();
    let surface = cursor.surface_mut();
    surface.draw_text(kind.title(), left, y, &TextStyle::bold(TITLE_SIZE));
    let title_width = text_width(surface, kind.title(), BuiltinFont::HelveticaBold, TITLE_SIZE)?;
    surface.draw_text(
        &format!("N° {}", header.doc_number),
        left + (title_width + 16.0).max(80.0),
        y,
        &TextStyle::regular(META_SIZE),
    );

    if let Some(logo) = &config.logo {
        let x = config.table_right() - config.logo_width;
        surface.draw_image(logo, x, config.logo_y, config.logo_width, config.logo_height)?;
    }
    cursor.advance(1.5 * META_LINE);

    let mut dates = vec![("Date d'émission", header.issue_date)];
    if let Some(expiry) = header.expiry_date {
        dates.push(("Date d'expiration", expiry));
    }
    for (label, date) in dates {
        let y = cursor.cursor_y();
        let surface = cursor.surface_mut();
        surface.draw_text(label, left, y, &TextStyle::bold(META_SIZE));
        surface.draw_text(
            &date.format("%d/%m/%Y").to_string(),
            left + META_VALUE_X,
            y,
            &TextStyle::regular(META_SIZE),
        );
        cursor.advance(META_LINE);
    }
    cursor.advance(2.0 * META_LINE);
    Ok(())
}

/// Supplier on the left, client on the right.
fn draw_parties<S: DrawingSurface>(
    cursor: &mut PageCursor<'_, S>,
    client: &Client,
    config: &LayoutConfig,
) -> Result<()> {
    let supplier = &config.supplier;
    let mut supplier_lines: Vec<String> = supplier.address_lines.clone();
    supplier_lines.extend(supplier.email.iter().cloned());
    supplier_lines.extend(supplier.registration.iter().cloned());
    supplier_lines.extend(supplier.tax_id.iter().map(|id| format!("Numéro de TVA: {}", id)));

    let client_width = config.table_right() - config.client_x;
    let name_lines = try_wrap(client.display_name(), client_width, |s| {
        cursor.surface().measure_text(s, BuiltinFont::HelveticaBold, PARTY_NAME_SIZE)
    })
    .map_err(LayoutError::MeasurementUnavailable)?;
    let mut client_lines = Vec::new();
    if let Some(address) = client.address.as_deref() {
        client_lines = try_wrap(address, client_width, |s| {
            cursor.surface().measure_text(s, BuiltinFont::Helvetica, PARTY_SIZE)
        })
        .map_err(LayoutError::MeasurementUnavailable)?;
    }
    client_lines.extend(client.email.iter().cloned());
    client_lines.extend(client.phone.iter().cloned());
    client_lines.extend(client.tax_id.iter().map(|id| format!("Numéro de TVA: {}", id)));

    let rows = (1 + supplier_lines.len()).max(name_lines.len() + client_lines.len());
    let height = (rows as f64 * PARTY_LINE).max(PARTY_MIN_HEIGHT);
    cursor.ensure_space(height)?;

    let top = cursor.cursor_y();
    let surface = cursor.surface_mut();
    let name_style = TextStyle::bold(PARTY_NAME_SIZE);
    let body_style = TextStyle::regular(PARTY_SIZE);

    surface.draw_text(&supplier.name, config.margin_left, top, &name_style);
    let mut left_y = top - PARTY_LINE;
    for line in &supplier_lines {
        surface.draw_text(line, config.margin_left, left_y, &body_style);
        left_y -= PARTY_LINE;
    }

    let mut right_y = top;
    for line in &name_lines {
        surface.draw_text(line, config.client_x, right_y, &name_style);
        right_y -= PARTY_LINE;
    }
    for line in &client_lines {
        surface.draw_text(line, config.client_x, right_y, &body_style);
        right_y -= PARTY_LINE;
    }

    cursor.advance(height + PARTY_LINE);
    Ok(())
}

/// Total HT, tax and Total TTC, right-aligned on the table's right edge.
fn draw_totals<S: DrawingSurface>(
    cursor: &mut PageCursor<'_, S>,
    totals: &Totals,
    config: &LayoutConfig,
) -> Result<()> {
    let tax_label = match config.tax_display {
        TaxDisplay::PerItem => "Total TVA:".to_string(),
        TaxDisplay::FlatRate(rate) => format!("TVA ({}%):", rate.normalize()),
    };
    let lines = [
        ("Total HT:".to_string(), totals.total_ht),
        (tax_label, totals.total_tva),
        ("Total TTC:".to_string(), totals.total_ttc),
    ];

    cursor.ensure_space(TOTALS_LINE * (lines.len() + 1) as f64)?;
    cursor.advance(TOTALS_LINE);
    let style = TextStyle::bold(TOTALS_SIZE);
    for (label, amount) in &lines {
        let baseline = cursor.cursor_y() - config.baseline_offset;
        let value = format!("{}{}", format_amount(*amount), config.currency_suffix);
        let surface = cursor.surface_mut();
        let width = text_width(surface, &value, BuiltinFont::HelveticaBold, TOTALS_SIZE)?;
        surface.draw_text(label, config.margin_left + config.cell_padding, baseline, &style);
        surface.draw_text(
            &value,
            config.table_right() - config.cell_padding - width,
            baseline,
            &style,
        );
        cursor.advance(TOTALS_LINE);
    }
    Ok(())
}

/// Payment terms and legal mentions. Kept together on one page when they
/// fit on one, flowed line by line across pages otherwise.
fn draw_legal<S: DrawingSurface>(cursor: &mut PageCursor<'_, S>, config: &LayoutConfig) -> Result<()> {
    if config.legal_text.trim().is_empty() {
        return Ok(());
    }
    let size = config.footer_font_size;
    let lines = try_wrap(&config.legal_text, config.table_width, |s| {
        cursor.surface().measure_text(s, BuiltinFont::HelveticaOblique, size)
    })
    .map_err(LayoutError::MeasurementUnavailable)?;

    let block = TOTALS_LINE + lines.len() as f64 * LEGAL_LINE;
    if block <= cursor.block_capacity() {
        cursor.ensure_space(block)?;
    } else {
        cursor.ensure_space(TOTALS_LINE + LEGAL_LINE)?;
    }
    cursor.advance(TOTALS_LINE);
    let style = TextStyle::oblique(size);
    for line in &lines {
        cursor.ensure_space(LEGAL_LINE)?;
        let y = cursor.cursor_y();
        cursor.surface_mut().draw_text(line, config.margin_left, y, &style);
        cursor.advance(LEGAL_LINE);
    }
    Ok(())
}
