//! 재질 카탈로그 로드/정렬 테스트.
use thermal_growth::material_db::{load_all, CatalogLoadError, MaterialCatalog};

const SAMPLE: &str = r#"[
    {"name": "Stainless Steel 316", "alpha": 16.0, "category": "Stainless Steel"},
    {"name": "Aluminium 7075", "alpha": 23.4, "category": "Aluminium", "desc": "High strength", "density": 2.81},
    {"name": "Aluminium 2014", "alpha": 22.5, "category": "Aluminium"},
    {"name": "PEEK", "alpha": 47.0, "category": "Plastics", "supplier": {"id": 3}},
    {"name": "Stainless Steel 304", "alpha": 17.3, "category": "Stainless Steel"}
]"#;

#[test]
fn unknown_fields_are_ignored() {
    let catalog = MaterialCatalog::from_json(SAMPLE).expect("catalog");
    assert_eq!(catalog.len(), 5);
    let al = catalog.find("aluminium 7075").expect("case-insensitive lookup");
    assert_eq!(al.alpha, 23.4);
    assert_eq!(al.description.as_deref(), Some("High strength"));
    assert_eq!(catalog.find("PEEK").and_then(|m| m.description.clone()), None);
}

#[test]
fn natural_order_is_kept() {
    let catalog = MaterialCatalog::from_json(SAMPLE).expect("catalog");
    assert_eq!(
        catalog.first().map(|m| m.name.as_str()),
        Some("Stainless Steel 316")
    );
}

#[test]
fn grouped_sorted_by_category_then_name() {
    let catalog = MaterialCatalog::from_json(SAMPLE).expect("catalog");
    let groups = catalog.grouped_by_category();
    let layout: Vec<(&str, Vec<&str>)> = groups
        .iter()
        .map(|g| {
            (
                g.category.as_str(),
                g.materials.iter().map(|m| m.name.as_str()).collect(),
            )
        })
        .collect();
    assert_eq!(
        layout,
        vec![
            ("Aluminium", vec!["Aluminium 2014", "Aluminium 7075"]),
            ("Plastics", vec!["PEEK"]),
            ("Stainless Steel", vec!["Stainless Steel 304", "Stainless Steel 316"]),
        ]
    );
}

#[test]
fn grouping_is_idempotent() {
    let catalog = MaterialCatalog::from_json(SAMPLE).expect("catalog");
    let first = catalog.grouped_by_category().to_vec();
    let second = catalog.grouped_by_category();
    assert_eq!(first.as_slice(), second);
    assert!(std::ptr::eq(second, catalog.grouped_by_category()));
}

#[test]
fn malformed_json_is_a_load_error() {
    assert!(matches!(
        MaterialCatalog::from_json(r#"[{"name": "X", "category": "Y"}]"#),
        Err(CatalogLoadError::Parse(_))
    ));
    assert!(matches!(
        MaterialCatalog::from_json("not json"),
        Err(CatalogLoadError::Parse(_))
    ));
}

#[test]
fn duplicate_names_are_rejected() {
    let json = r#"[
        {"name": "Brass", "alpha": 20.9, "category": "Copper Alloys"},
        {"name": "Brass", "alpha": 19.0, "category": "Copper Alloys"}
    ]"#;
    assert!(matches!(
        MaterialCatalog::from_json(json),
        Err(CatalogLoadError::DuplicateName(name)) if name == "Brass"
    ));
}

#[test]
fn missing_file_is_a_load_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = MaterialCatalog::load_file(dir.path().join("materials.json"));
    assert!(matches!(result, Err(CatalogLoadError::Io(_))));
}

#[test]
fn load_from_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("materials.json");
    std::fs::write(&path, SAMPLE).expect("write sample");
    let catalog = MaterialCatalog::load_file(&path).expect("catalog");
    assert_eq!(catalog.grouped_by_category().len(), 3);
}

#[test]
fn bundled_catalog_is_grouped() {
    let catalog = MaterialCatalog::bundled().expect("bundled");
    let groups = catalog.grouped_by_category();
    assert!(groups.windows(2).all(|w| w[0].category < w[1].category));
    for g in groups {
        assert!(g.materials.windows(2).all(|w| w[0].name <= w[1].name));
    }
    let total: usize = groups.iter().map(|g| g.materials.len()).sum();
    assert_eq!(total, catalog.len());
}

#[test]
fn load_all_keeps_resource_order() {
    let materials = load_all().expect("bundled resource");
    assert_eq!(materials[0].name, "Aluminium 2014");
    let catalog = MaterialCatalog::bundled().expect("bundled");
    assert_eq!(catalog.materials(), materials.as_slice());
}
