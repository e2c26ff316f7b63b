mod common;

use std::sync::Arc;

use common::{Member, SAMPLE_CSV, ZipBuilder, sample_archive};
use tempfile::TempDir;
use tivreport::dataset::parse_records;
use tivreport::{CsvArchive, MemoryReader, Record, ReportError, load_dataset};

fn archive(bytes: Vec<u8>) -> CsvArchive<MemoryReader> {
    CsvArchive::new(Arc::new(MemoryReader::new(bytes)))
}

#[tokio::test]
async fn reads_stored_member() {
    let bytes = ZipBuilder::new()
        .member(Member::stored("FL_insurance.csv", b"county,tiv_2011,tiv_2012\n"))
        .build();

    let (entry, stream) = archive(bytes).open_csv().await.unwrap();
    assert_eq!(entry.file_name, "FL_insurance.csv");
    assert_eq!(stream.into_inner(), b"county,tiv_2011,tiv_2012\n");
}

#[tokio::test]
async fn reads_deflated_member() {
    let (entry, stream) = archive(sample_archive()).open_csv().await.unwrap();
    assert_eq!(entry.uncompressed_size, SAMPLE_CSV.len() as u64);

    let dataset = parse_records(stream).unwrap();
    assert_eq!(
        dataset.records(),
        &[
            Record::new("A", 100.0, 150.0),
            Record::new("B", 200.0, 180.0),
            Record::new("A", 50.0, 60.0),
        ]
    );
}

#[tokio::test]
async fn picks_first_csv_in_archive_order() {
    let bytes = ZipBuilder::new()
        .member(Member::stored("README.txt", b"not data"))
        .member(Member::stored("upper.CSV", b"wrong case"))
        .member(Member::stored("folder.csv/", b""))
        .member(Member::deflated("data/second.csv", b"first"))
        .member(Member::stored("first.csv", b"second"))
        .build();

    let archive = archive(bytes);
    let entries = archive.list_entries().await.unwrap();
    assert_eq!(entries.len(), 5);
    assert!(entries[2].is_directory);

    let entry = archive.find_csv_entry().await.unwrap();
    assert_eq!(entry.file_name, "data/second.csv");
    assert_eq!(archive.read_entry(&entry).await.unwrap(), b"first");
}

#[tokio::test]
async fn finds_central_directory_behind_comment() {
    let bytes = ZipBuilder::new()
        .member(Member::stored("FL_insurance.csv", b"x"))
        .comment(b"exported 2012-12-31 by the state office")
        .build();

    let entry = archive(bytes).find_csv_entry().await.unwrap();
    assert_eq!(entry.file_name, "FL_insurance.csv");
}

#[tokio::test]
async fn no_csv_member_is_an_error() {
    let bytes = ZipBuilder::new()
        .member(Member::stored("FL_insurance.xlsx", b"binary"))
        .build();

    let err = archive(bytes).find_csv_entry().await.unwrap_err();
    assert!(err.to_string().contains("No .csv member"), "{err}");
}

#[tokio::test]
async fn empty_archive_has_no_csv_member() {
    let err = archive(ZipBuilder::new().build())
        .find_csv_entry()
        .await
        .unwrap_err();
    assert!(err.to_string().contains("No .csv member"), "{err}");
}

#[tokio::test]
async fn not_a_zip_is_rejected() {
    let err = archive(b"county,tiv_2011,tiv_2012\nA,1,2\n".to_vec())
        .list_entries()
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Not a valid ZIP file"), "{err}");

    assert!(archive(Vec::new()).list_entries().await.is_err());
}

#[tokio::test]
async fn crc_mismatch_is_rejected() {
    let mut member = Member::deflated("FL_insurance.csv", SAMPLE_CSV.as_bytes());
    member.crc32 = Some(0xDEADBEEF);
    let bytes = ZipBuilder::new().member(member).build();

    let err = archive(bytes).open_csv().await.unwrap_err();
    assert!(err.to_string().contains("CRC mismatch"), "{err}");
}

#[tokio::test]
async fn oversized_zip64_declaration_is_rejected() {
    let mut member = Member::deflated("FL_insurance.csv", SAMPLE_CSV.as_bytes());
    member.zip64_uncompressed = Some(1 << 62);
    let bytes = ZipBuilder::new().member(member).build();

    let archive = archive(bytes);
    let entry = archive.find_csv_entry().await.unwrap();
    assert_eq!(entry.uncompressed_size, 1 << 62);

    let err = archive.read_entry(&entry).await.unwrap_err();
    assert!(err.to_string().contains("Size mismatch"), "{err}");
}

#[tokio::test]
async fn unsupported_method_is_rejected() {
    let mut member = Member::stored("FL_insurance.csv", b"data");
    member.method = 12;
    let bytes = ZipBuilder::new().member(member).build();

    let err = archive(bytes).open_csv().await.unwrap_err();
    assert!(err.to_string().contains("Unsupported compression method: 12"), "{err}");
}

#[tokio::test]
async fn encrypted_member_is_rejected() {
    let mut member = Member::stored("FL_insurance.csv", b"data");
    member.flags = 0x0001;
    let bytes = ZipBuilder::new().member(member).build();

    let err = archive(bytes).open_csv().await.unwrap_err();
    assert!(err.to_string().contains("encrypted"), "{err}");
}

#[tokio::test]
async fn load_dataset_from_disk() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("FL_insurance.csv.zip");
    std::fs::write(&path, sample_archive()).unwrap();

    let dataset = load_dataset(&path).await.unwrap();
    assert_eq!(dataset.len(), 3);
}

#[tokio::test]
async fn load_dataset_without_csv_is_archive_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("FL_insurance.csv.zip");
    let bytes = ZipBuilder::new()
        .member(Member::stored("notes.txt", b"nothing here"))
        .build();
    std::fs::write(&path, bytes).unwrap();

    let err = load_dataset(&path).await.unwrap_err();
    match err {
        ReportError::Archive { path: p, reason } => {
            assert_eq!(p, path);
            assert!(reason.contains("No .csv member"), "{reason}");
        }
        other => panic!("expected archive error, got {other:?}"),
    }
}

#[tokio::test]
async fn load_dataset_missing_file_is_archive_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let err = load_dataset(&temp_dir.path().join("absent.zip"))
        .await
        .unwrap_err();
    assert!(matches!(err, ReportError::Archive { .. }));
}

#[tokio::test]
async fn load_dataset_propagates_parse_errors() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("FL_insurance.csv.zip");
    let bytes = ZipBuilder::new()
        .member(Member::deflated(
            "FL_insurance.csv",
            b"county,tiv_2011,tiv_2012\nA,1,2\nB,x,3\n",
        ))
        .build();
    std::fs::write(&path, bytes).unwrap();

    let err = load_dataset(&path).await.unwrap_err();
    assert!(matches!(err, ReportError::Parse { line: 3, .. }));
}
