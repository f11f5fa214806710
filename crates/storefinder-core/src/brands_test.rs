use super::*;

#[test]
fn slug_simple_label() {
    assert_eq!(BrandQuery::new("Food Lion").slug(), "food-lion");
}

#[test]
fn slug_strips_punctuation_and_keeps_digits() {
    assert_eq!(BrandQuery::new("99 Cents Only").slug(), "99-cents-only");
    assert_eq!(BrandQuery::new("Michael's  Crafts").slug(), "michaels-crafts");
}

#[test]
fn default_brands_are_valid() {
    let brands = default_brands();
    assert_eq!(brands.len(), 13);
    assert!(validate_brands(&brands).is_ok());
    assert!(brands.iter().all(|b| b.label == b.search_term));
    assert!(brands.iter().any(|b| b.label == "Walmart"));
}

#[test]
fn parse_brands_defaults_search_term_to_label() {
    let yaml = r"
brands:
  - label: Walmart
  - label: Party City
    search_term: party city balloons
";
    let brands = parse_brands(yaml).expect("valid yaml");
    assert_eq!(brands.len(), 2);
    assert_eq!(brands[0].search_term, "Walmart");
    assert_eq!(brands[1].search_term, "party city balloons");
}

#[test]
fn parse_brands_trims_whitespace() {
    let yaml = "brands:\n  - label: '  CVS '\n    search_term: '   '\n";
    let brands = parse_brands(yaml).expect("valid yaml");
    assert_eq!(brands[0].label, "CVS");
    assert_eq!(brands[0].search_term, "CVS");
}

#[test]
fn parse_brands_rejects_duplicate_labels_case_insensitively() {
    let yaml = "brands:\n  - label: Kroger\n  - label: kroger\n";
    let err = parse_brands(yaml).unwrap_err();
    assert!(
        matches!(err, ConfigError::Validation(ref msg) if msg.contains("duplicate brand label")),
        "got: {err:?}"
    );
}

#[test]
fn parse_brands_rejects_duplicate_slugs() {
    let yaml = "brands:\n  - label: Food Lion\n  - label: Food-Lion\n";
    let err = parse_brands(yaml).unwrap_err();
    assert!(
        matches!(err, ConfigError::Validation(ref msg) if msg.contains("duplicate brand slug")),
        "got: {err:?}"
    );
}

#[test]
fn parse_brands_rejects_empty_list() {
    let err = parse_brands("brands: []\n").unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)), "got: {err:?}");
}

#[test]
fn parse_brands_rejects_blank_label() {
    let err = parse_brands("brands:\n  - label: '   '\n").unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)), "got: {err:?}");
}

#[test]
fn parse_brands_reports_yaml_errors() {
    let err = parse_brands("brands: [label: ").unwrap_err();
    assert!(matches!(err, ConfigError::BrandsFileParse(_)), "got: {err:?}");
}

#[test]
fn load_brands_reports_missing_file() {
    let err = load_brands(Path::new("/nonexistent/storefinder/brands.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::BrandsFileIo { .. }), "got: {err:?}");
}

#[test]
fn brand_query_serializes_label_and_term() {
    let json = serde_json::to_value(BrandQuery::new("Five Below")).expect("serialize");
    assert_eq!(json["label"], "Five Below");
    assert_eq!(json["search_term"], "Five Below");
}
