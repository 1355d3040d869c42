mod common;

use chrono::NaiveDate;
use encoding_rs::EUC_KR;
use partner_batches::{
    ConvertError,
    data::Value,
    loader::{self, LoadOptions},
};

use common::{Cell, TestWorkspace, headers, number, text};

#[test]
fn workbook_cells_are_typed_and_headers_disambiguated() {
    let workspace = TestWorkspace::new();
    let sheet = vec![
        headers(&["거래처코드", "위도", "담당변경일", "거래처코드"]),
        vec![text("P1"), number(37.5665), Cell::Date(2024, 7, 1), text("P1")],
        vec![Cell::Blank, Cell::Blank, Cell::Blank, Cell::Blank],
        vec![text("P2"), number(12345.0)],
    ];
    let path = workspace.write_workbook("partners.xlsx", &[("Sheet1", sheet)]);

    let rows = loader::load(&path, &LoadOptions::default()).unwrap();
    assert_eq!(rows.headers, vec!["거래처코드", "위도", "담당변경일", "거래처코드.1"]);
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows.rows[0],
        vec![
            Value::String("P1".into()),
            Value::Float(37.5665),
            Value::Date(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()),
            Value::String("P1".into()),
        ]
    );
    assert_eq!(
        rows.rows[1],
        vec![
            Value::String("P2".into()),
            Value::Integer(12345),
            Value::Null,
            Value::Null,
        ]
    );
}

#[test]
fn first_sheet_is_default_and_others_are_selectable() {
    let workspace = TestWorkspace::new();
    let path = workspace.write_workbook(
        "multi.xlsx",
        &[
            ("Current", vec![headers(&["a"]), vec![text("current")]]),
            ("Archive", vec![headers(&["b"]), vec![text("archived")]]),
        ],
    );

    assert_eq!(loader::sheet_names(&path).unwrap(), vec!["Current", "Archive"]);

    let first = loader::load(&path, &LoadOptions::default()).unwrap();
    assert_eq!(first.headers, vec!["a"]);

    let options = LoadOptions {
        sheet: Some("Archive".to_string()),
        ..LoadOptions::default()
    };
    let archive = loader::load(&path, &options).unwrap();
    assert_eq!(archive.value(0, "b"), Some(&Value::String("archived".into())));

    let missing = LoadOptions {
        sheet: Some("Nope".to_string()),
        ..LoadOptions::default()
    };
    assert!(matches!(
        loader::load(&path, &missing),
        Err(ConvertError::SourceUnreadable { .. })
    ));
}

#[test]
fn csv_input_honours_encoding_and_delimiter() {
    let workspace = TestWorkspace::new();
    let (encoded, _, _) = EUC_KR.encode("거래처코드;거래처명;우편번호(사업자기준)\nP1;한빛;06236\nP2;;\n");
    let path = workspace.write("partners.csv", &encoded);

    let options = LoadOptions {
        sheet: None,
        delimiter: Some(b';'),
        encoding: EUC_KR,
    };
    let rows = loader::load(&path, &options).unwrap();
    assert_eq!(rows.headers, vec!["거래처코드", "거래처명", "우편번호(사업자기준)"]);
    assert_eq!(rows.value(0, "거래처명"), Some(&Value::String("한빛".into())));
    assert_eq!(
        rows.value(0, "우편번호(사업자기준)"),
        Some(&Value::String("06236".into()))
    );
    assert_eq!(rows.value(1, "거래처명"), Some(&Value::Null));
}

#[test]
fn csv_rows_wider_than_header_are_rejected() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("bad.csv", b"a,b\n1,2,3\n");
    let err = loader::load(&path, &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, ConvertError::SourceUnreadable { .. }));
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn missing_source_is_not_found() {
    let workspace = TestWorkspace::new();
    let err = loader::load(&workspace.path().join("none.xlsx"), &LoadOptions::default())
        .unwrap_err();
    assert!(matches!(err, ConvertError::SourceNotFound(_)));
}

#[test]
fn header_and_cell_whitespace_is_preserved() {
    let workspace = TestWorkspace::new();
    let sheet = vec![
        headers(&["거래처코드", "간판명", "거래처명 "]),
        vec![text("P1"), text("   "), text("x")],
    ];
    let path = workspace.write_workbook("partners.xlsx", &[("Sheet1", sheet)]);

    let rows = loader::load(&path, &LoadOptions::default()).unwrap();
    assert_eq!(rows.headers, vec!["거래처코드", "간판명", "거래처명 "]);
    assert_eq!(
        rows.rows[0],
        vec![
            Value::String("P1".into()),
            Value::String("   ".into()),
            Value::String("x".into()),
        ]
    );
}

#[test]
fn csv_whitespace_fields_stay_strings() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("partners.csv", "code, name \n1,  \n2,\n".as_bytes());

    let rows = loader::load(&path, &LoadOptions::default()).unwrap();
    assert_eq!(rows.headers, vec!["code", " name "]);
    assert_eq!(rows.value(0, " name "), Some(&Value::String("  ".into())));
    assert_eq!(rows.value(1, " name "), Some(&Value::Null));
}
