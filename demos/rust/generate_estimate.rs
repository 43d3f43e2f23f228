/// Estimate example: a multi-page devis with wrapped descriptions.
///
/// Shows the table header repeating on every page and the
/// "{number} · k/N" footer stamped once the page count is known.
///
/// Run with:
///   cargo run --example generate_estimate -p devis-demos
///
/// Opens output at: output/devis-estimate.pdf
use chrono::NaiveDate;
use devis_layout::{
    render_pdf, Client, DocumentKind, HeaderInfo, LayoutConfig, LineItem, QuantityUnit,
};
use rust_decimal::Decimal;

const WORKS: &[(&str, i64, QuantityUnit, i64, u32)] = &[
    ("Dépose de l'ancien tableau électrique", 1, QuantityUnit::Set, 18000, 10),
    (
        "Fourniture et pose d'un tableau électrique trois rangées avec \
         disjoncteurs différentiels 30 mA, repérage et étiquetage des circuits",
        1,
        QuantityUnit::Set,
        124000,
        10,
    ),
    ("Prise de courant 16 A encastrée", 14, QuantityUnit::Unit, 4550, 10),
    ("Passage de câbles sous goulotte", 37, QuantityUnit::Meter, 840, 10),
    ("Point lumineux plafond avec boîte DCL", 9, QuantityUnit::Unit, 6200, 10),
    (
        "Mise à la terre des huisseries métalliques et liaison équipotentielle \
         de la salle de bains",
        1,
        QuantityUnit::Set,
        31000,
        10,
    ),
    ("Interrupteur va-et-vient", 6, QuantityUnit::Unit, 3890, 10),
    ("Contrôle Consuel et attestation de conformité", 1, QuantityUnit::Unit, 19500, 20),
];

fn main() {
    std::fs::create_dir_all("output").unwrap();
    let path = "output/devis-estimate.pdf";

    let header = HeaderInfo {
        doc_number: "D-2024-031".to_string(),
        issue_date: NaiveDate::from_ymd_opt(2024, 6, 12).unwrap(),
        expiry_date: NaiveDate::from_ymd_opt(2024, 7, 12),
        project: Some("Rénovation appartement Monceau".to_string()),
    };
    let client = Client {
        name: "M. et Mme Garnier".to_string(),
        address: Some("8 rue des Acacias\n75017 Paris".to_string()),
        tax_id: None,
        email: Some("garnier.famille@example.fr".to_string()),
        phone: Some("01 45 67 89 10".to_string()),
    };

    // Repeat the work list per room so the table spans several pages.
    let rooms = ["Cuisine", "Séjour", "Chambre 1", "Chambre 2", "Salle de bains", "Entrée"];
    let items: Vec<LineItem> = rooms
        .iter()
        .flat_map(|room| {
            WORKS.iter().map(move |&(what, qty, unit, cents, rate)| {
                LineItem::new(
                    format!("{} : {}", room, what),
                    Decimal::from(qty),
                    unit,
                    Decimal::new(cents, 2),
                    Decimal::from(rate),
                )
            })
        })
        .collect();

    let mut config = LayoutConfig::default();
    config.footer_left_text = "Devis valable 30 jours · NEXT NR–GIE".to_string();

    let bytes = render_pdf(DocumentKind::Estimate, &header, &client, &items, &config)
        .expect("render estimate");
    std::fs::write(path, &bytes).expect("write PDF");
    println!("Written {} ({} items, {} bytes)", path, items.len(), bytes.len());
}
