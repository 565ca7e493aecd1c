use std::collections::HashSet;
use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crmgen::config::{Config, SchemaSource};
use crmgen::json::builtin_schema;
use crmgen::output::{generate_data, write_csv};
use crmgen::schema::Schema;

fn config_for(entity: &str, dir: &Path) -> Config {
    Config {
        schema: SchemaSource::Builtin(entity.to_string()),
        num_rows: None,
        output_file: None,
        seed: None,
        output_dir: dir.join("outputs").to_string_lossy().into_owned(),
        header: None,
        batch_size: 1000,
        log_file: None,
        verbose: false,
    }
}

fn write_seeded(schema: &Schema, seed: u64, count: u64, path: &Path) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    write_csv(schema, schema.rows(&mut rng, count), path, 1000).unwrap();
    fs::read_to_string(path).unwrap()
}

fn read_records(path: &Path) -> (csv::StringRecord, Vec<csv::StringRecord>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let header = reader.headers().unwrap().clone();
    let records = reader.records().map(|r| r.unwrap()).collect();
    (header, records)
}

#[test]
fn same_seed_gives_identical_bytes() {
    let dir = tempfile::tempdir().unwrap();
    for entity in ["account", "account-api", "contact"] {
        let schema = builtin_schema(entity).unwrap();
        let first = write_seeded(&schema, 42, 250, &dir.path().join("a.csv"));
        let second = write_seeded(&schema, 42, 250, &dir.path().join("b.csv"));
        assert_eq!(first, second, "{} output differs between runs", entity);
    }
}

#[test]
fn different_seeds_differ() {
    let dir = tempfile::tempdir().unwrap();
    let schema = builtin_schema("account").unwrap();
    let first = write_seeded(&schema, 1, 50, &dir.path().join("a.csv"));
    let second = write_seeded(&schema, 2, 50, &dir.path().join("b.csv"));
    assert_ne!(first, second);
}

#[test]
fn account_three_rows_seed_seven() {
    let dir = tempfile::tempdir().unwrap();
    let schema = builtin_schema("account").unwrap();
    let path = dir.path().join("accounts.csv");
    let first = write_seeded(&schema, 7, 3, &path);
    let second = write_seeded(&schema, 7, 3, &path);
    assert_eq!(first, second);

    let (header, records) = read_records(&path);
    assert_eq!(&header[0], "Account Currency");
    assert_eq!(records.len(), 3);
    for record in records.iter() {
        assert_eq!(&record[0], "PEN");
    }
}

#[test]
fn row_count_and_shape_match_header() {
    let dir = tempfile::tempdir().unwrap();
    for entity in ["account", "account-api", "contact"] {
        let schema = builtin_schema(entity).unwrap();
        let path = dir.path().join(format!("{}.csv", entity));
        write_seeded(&schema, 3, 137, &path);

        let (header, records) = read_records(&path);
        let expected: Vec<&str> = schema.columns();
        assert_eq!(header.iter().collect::<Vec<_>>(), expected);
        assert_eq!(records.len(), 137);
        for record in records.iter() {
            assert_eq!(record.len(), header.len());
        }
    }
}

#[test]
fn boolean_rates_track_configured_weights() {
    let schema = builtin_schema("contact").unwrap();
    let mut rng = StdRng::seed_from_u64(2024);
    let n = 100_000u64;

    let mut active = 0u64;
    let mut consent = 0u64;
    let mut fraud = 0u64;
    for row in schema.rows(&mut rng, n) {
        if row.get("Active") == Some("true") {
            active += 1;
        }
        if row.get("Consentimiento terminos y condiciones") == Some("true") {
            consent += 1;
        }
        if row.get("Fraud") == Some("true") {
            fraud += 1;
        }
    }

    let rate = |hits: u64| hits as f64 / n as f64;
    assert!((rate(active) - 0.9).abs() < 0.01);
    assert!((rate(consent) - 0.6).abs() < 0.01);
    assert!((rate(fraud) - 0.03).abs() < 0.005);
}

#[test]
fn booleans_are_literal_true_or_false() {
    let schema = builtin_schema("account-api").unwrap();
    let mut rng = StdRng::seed_from_u64(9);
    for row in schema.rows(&mut rng, 500) {
        for column in ["IsDeleted", "IsPartner", "vlocity_cmt__HasFraud__c"] {
            let value = row.get(column).unwrap();
            assert!(value == "true" || value == "false", "{} = {}", column, value);
        }
        assert!(!row.get("Name").unwrap().is_empty());
    }
}

#[test]
fn contact_ids_are_unique_and_fixed_width() {
    let schema = builtin_schema("contact").unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    let mut seen = HashSet::new();

    for row in schema.rows(&mut rng, 2000) {
        let id = row.get("Legacy Contact Id").unwrap().to_string();
        assert_eq!(id, format!("CONTACT00{:08}", row.index()));
        assert_eq!(id.len(), "CONTACT00".len() + 8);
        assert!(seen.insert(id));
    }
    assert_eq!(seen.len(), 2000);
}

#[test]
fn generate_data_uses_schema_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for("contact", dir.path());

    let summary = generate_data(&config).unwrap();
    assert_eq!(summary.rows, 200);
    assert_eq!(summary.seed, 7);
    assert_eq!(
        summary.path,
        dir.path().join("outputs").join("contacts_filtered.csv")
    );

    let (_, records) = read_records(&summary.path);
    assert_eq!(records.len(), 200);
}

#[test]
fn generate_data_honours_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("custom").join("accounts_api.csv");
    fs::create_dir_all(target.parent().unwrap()).unwrap();

    let mut config = config_for("account", dir.path());
    config.num_rows = Some(12);
    config.seed = Some(5);
    config.output_file = Some(target.to_string_lossy().into_owned());
    config.header = Some(crmgen::schema::HeaderMode::Api);

    let summary = generate_data(&config).unwrap();
    assert_eq!(summary.path, target);
    assert!(!dir.path().join("outputs").exists());

    let (header, records) = read_records(&target);
    assert_eq!(&header[0], "CurrencyIsoCode");
    assert_eq!(records.len(), 12);
}

#[test]
fn unseeded_runs_report_their_seed() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_for("account", dir.path());
    config.num_rows = Some(20);
    config.output_file = Some("first.csv".to_string());
    let first = generate_data(&config).unwrap();

    config.seed = Some(first.seed);
    config.output_file = Some("replay.csv".to_string());
    let replay = generate_data(&config).unwrap();

    assert_eq!(
        fs::read(&first.path).unwrap(),
        fs::read(&replay.path).unwrap()
    );
}

#[test]
fn custom_schema_file() {
    let dir = tempfile::tempdir().unwrap();
    let schema_path = dir.path().join("lead.json");
    fs::write(
        &schema_path,
        r#"{
            "entity": "Lead",
            "header": "api",
            "defaults": {"num_rows": 4, "output_file": "leads.csv", "seed": 1},
            "fields": [
                {"label": "Owner", "api_name": "OwnerId", "generator": "record_id"},
                {"label": "Lead Id", "api_name": "Lead_Id__c", "generator": "sequential", "prefix": "LEAD", "width": 3},
                {"label": "Hot", "api_name": "IsHot__c", "generator": "bool", "probability": 0.0}
            ]
        }"#,
    )
    .unwrap();

    let mut config = config_for("unused", dir.path());
    config.schema = SchemaSource::File(schema_path.to_string_lossy().into_owned());

    let summary = generate_data(&config).unwrap();
    let (header, records) = read_records(&summary.path);
    assert_eq!(header.iter().collect::<Vec<_>>(), vec!["OwnerId", "Lead_Id__c", "IsHot__c"]);
    assert_eq!(records.len(), 4);
    assert_eq!(&records[3][1], "LEAD004");
    assert_eq!(records[0][0].len(), 18);
    assert!(records.iter().all(|r| &r[2] == "false"));
}

#[test]
fn invalid_schema_file_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let schema_path = dir.path().join("bad.json");
    fs::write(
        &schema_path,
        r#"{"entity": "Bad", "fields": [
            {"label": "X", "api_name": "X", "generator": "bool", "probability": -0.1}
        ]}"#,
    )
    .unwrap();

    let mut config = config_for("unused", dir.path());
    config.schema = SchemaSource::File(schema_path.to_string_lossy().into_owned());

    assert!(matches!(
        generate_data(&config),
        Err(crmgen::Error::Schema(_))
    ));
    assert!(!dir.path().join("outputs").exists());
}
