//! Integration tests for cleaning extracted JSON payloads.

use std::io::Write;

use pdfclean::error::Error;
use pdfclean::render::{report_to_json, JsonFormat};
use pdfclean::{clean_payload, read_documents, CommaPolicy, NormalizeOptions};

const PAYLOAD: &str = r#"[
  [
    {
      "Contents": {
        "Text": [
          {"Char": [{"Font": "F1", "FontSize": 10, "X": 10, "Y": 700, "W": 5, "S": "Ｎ"},
                    {"Font": "F1", "FontSize": 10, "X": 15, "Y": 700, "W": 5, "S": "ｏ"}]},
          {"Char": [{"S": "3"}, {"S": ","}, {"S": "5"}]}
        ],
        "Table": [
          {"Cell": [
            {"Min": {"X": 0, "Y": 0}, "Max": {"X": 50, "Y": 20},
             "Text": [{"Char": [{"S": "ア"}, {"S": "・"}, {"S": "−"}]}]}
          ]}
        ],
        "Line": null
      },
      "MediaBox": {"Min": {"X": 0, "Y": 0}, "Max": {"X": 595, "Y": 842}}
    }
  ],
  []
]"#;

#[test]
fn test_clean_literal_payload() {
    let report = clean_payload(PAYLOAD.as_bytes(), &NormalizeOptions::default()).unwrap();
    assert!(report.is_complete());

    let docs: Vec<_> = report.successful().collect();
    assert_eq!(docs.len(), 2);
    assert!(docs[1].is_empty());

    let content = &docs[0].pages[0].contents;
    assert_eq!(content.text.len(), 1);
    assert_eq!(content.text[0].text(), "No");
    assert_eq!(content.text[0].chars[0].font_size, 10.0);
    assert_eq!(
        content.table[0].cells[0].text[0].graphemes(),
        vec!["ア", "･", "－"]
    );
}

#[test]
fn test_file_payload_matches_literal() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(PAYLOAD.as_bytes()).unwrap();
    let path = file.path().display().to_string();

    let options = NormalizeOptions::new().with_comma_policy(CommaPolicy::BlankGlyph);
    let from_file = clean_payload(path.as_bytes(), &options).unwrap();
    let literal = clean_payload(PAYLOAD.as_bytes(), &options).unwrap();

    let a = report_to_json(&from_file, JsonFormat::Pretty).unwrap();
    let b = report_to_json(&literal, JsonFormat::Pretty).unwrap();
    assert_eq!(a, b);
    assert!(a.contains(r#""S": """#));
}

#[test]
fn test_cleaning_is_idempotent() {
    let options = NormalizeOptions::default();
    let once = clean_payload(PAYLOAD.as_bytes(), &options).unwrap();
    let json = report_to_json(&once, JsonFormat::Compact).unwrap();
    let twice = clean_payload(json.as_bytes(), &options).unwrap();
    assert_eq!(json, report_to_json(&twice, JsonFormat::Compact).unwrap());
}

#[test]
fn test_failed_document_holds_its_slot() {
    let page = r#"{"Contents":{"Text":[{"Char":[{"S":"Ｂ"}]}]},"MediaBox":{"Min":{"X":0,"Y":0},"Max":{"X":1,"Y":1}}}"#;
    let raw = format!("[[{page}], 42, [{page}, {page}]]");
    let report = clean_payload(raw.as_bytes(), &NormalizeOptions::default()).unwrap();

    let json = report_to_json(&report, JsonFormat::Compact).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let docs = value.as_array().unwrap();
    assert_eq!(docs.len(), 3);
    assert_eq!(docs[0].as_array().unwrap().len(), 1);
    assert!(docs[1].is_null());
    assert_eq!(docs[2].as_array().unwrap().len(), 2);
}

#[test]
fn test_schema_failures_are_per_document() {
    let raw = r#"[[{"Contents": {"Text": []}}], [], [{"Contents": {}, "MediaBox": "oops"}]]"#;
    let docs = read_documents(raw.as_bytes()).unwrap();

    assert_eq!(docs.len(), 3);
    assert!(matches!(docs[0], Err(Error::Schema { index: 0, .. })));
    assert!(docs[1].is_ok());
    assert!(matches!(docs[2], Err(Error::Schema { index: 2, .. })));
}

#[test]
fn test_invalid_payloads() {
    let options = NormalizeOptions::default();
    assert!(matches!(clean_payload(b"[[", &options), Err(Error::Json(_))));
    assert!(matches!(clean_payload(b"{}", &options), Err(Error::Json(_))));
    assert!(matches!(clean_payload(b"   ", &options), Err(Error::EmptyInput)));
    assert!(matches!(
        clean_payload(b"no/such/payload.json", &options),
        Err(Error::Io(_))
    ));
}
