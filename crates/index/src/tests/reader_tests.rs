use crate::*;
use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use tempfile::tempdir;

use super::helpers::{raw_index, write_file, COMMENTED_DB, SAMPLE_DB};

const FIELDS: [u32; 6] = [2, 3, 612, 28, 0, 37 << 24];
const POINTERS: [u32; 3] = [0, 12, 154];

fn sample_reader(dir: &std::path::Path) -> Result<IndexReader> {
    let path = write_file(dir, "sample.dat", &raw_index(FIELDS, &POINTERS, 200));
    Ok(IndexReader::open(path)?)
}

// -------------------- Header --------------------

#[test]
fn header_fields_are_returned_raw() -> Result<()> {
    let dir = tempdir()?;
    let reader = sample_reader(dir.path())?;
    assert_eq!(reader.header_fields(), FIELDS);
    assert_eq!(reader.version(), 2);
    assert_eq!(reader.count(), 3);
    assert_eq!(reader.max_len(), 612);
    assert_eq!(reader.min_len(), 28);
    assert_eq!(reader.delim(), '%');
    assert_eq!(reader.len(), 3);
    assert!(!reader.is_empty());
    Ok(())
}

#[test]
fn options_are_rebuilt_from_header() -> Result<()> {
    let dir = tempdir()?;
    let mut fields = FIELDS;
    fields[4] = 0b1010;
    fields[5] = u32::from(b'#') << 24;
    let path = write_file(dir.path(), "flags.dat", &raw_index(fields, &POINTERS, 200));

    let opts = IndexReader::open(path)?.options();
    assert_eq!(
        opts,
        IndexOptions {
            index_path: None,
            version: 2,
            delim: '#',
            randomized: false,
            ordered: true,
            rotated: false,
            comments: true,
        }
    );
    Ok(())
}

// -------------------- Pointers --------------------

#[test]
fn get_pointers_reads_whole_table() -> Result<()> {
    let dir = tempdir()?;
    let reader = sample_reader(dir.path())?;
    assert_eq!(reader.get_pointers()?, POINTERS.to_vec());
    Ok(())
}

#[test]
fn get_pointer_at_seeks_directly() -> Result<()> {
    let dir = tempdir()?;
    let reader = sample_reader(dir.path())?;
    assert_eq!(reader.get_pointer_at(1)?, 12);
    assert_eq!(reader.get_pointer_at(2)?, 154);
    assert_eq!(reader.get_pointer_at(0)?, 0);
    Ok(())
}

#[test]
fn get_pointer_at_out_of_range() -> Result<()> {
    let dir = tempdir()?;
    let reader = sample_reader(dir.path())?;
    match reader.get_pointer_at(3) {
        Err(IndexError::OutOfRange { index, count }) => {
            assert_eq!(index, 3);
            assert_eq!(count, 3);
        }
        other => panic!("expected OutOfRange, got {:?}", other),
    }
    Ok(())
}

#[test]
fn eof_offset_follows_pointer_table() -> Result<()> {
    let dir = tempdir()?;
    let reader = sample_reader(dir.path())?;
    assert_eq!(reader.eof_offset()?, 200);
    Ok(())
}

#[test]
fn random_pointer_varies_and_stays_in_table() -> Result<()> {
    let dir = tempdir()?;
    let reader = sample_reader(dir.path())?;

    let mut seen = HashSet::new();
    for _ in 0..1000 {
        let p = reader.random_pointer()?;
        assert!(POINTERS.contains(&p));
        seen.insert(p);
    }
    assert!(seen.len() > 1);
    Ok(())
}

#[test]
fn random_pointer_with_seeded_rng_is_reproducible() -> Result<()> {
    let dir = tempdir()?;
    let reader = sample_reader(dir.path())?;

    let draw = |seed: u64| -> Vec<u32> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..20)
            .map(|_| reader.random_pointer_with(&mut rng).unwrap())
            .collect()
    };
    assert_eq!(draw(7), draw(7));
    Ok(())
}

#[test]
fn random_pointer_on_empty_index_fails() -> Result<()> {
    let dir = tempdir()?;
    let fields = [2, 0, 0, MIN_LEN_SENTINEL, 0, 37 << 24];
    let path = write_file(dir.path(), "empty.dat", &raw_index(fields, &[], 0));

    let reader = IndexReader::open(path)?;
    assert!(reader.is_empty());
    assert!(reader.get_pointers()?.is_empty());
    assert!(matches!(reader.random_pointer(), Err(IndexError::Empty)));
    Ok(())
}

// -------------------- Corruption --------------------

#[test]
fn file_shorter_than_header_is_corrupt() -> Result<()> {
    let dir = tempdir()?;
    let path = write_file(dir.path(), "tiny.dat", &[0, 0, 0, 2]);
    assert!(matches!(IndexReader::open(path), Err(IndexError::Corrupt(_))));
    Ok(())
}

#[test]
fn truncated_pointer_table_is_corrupt() -> Result<()> {
    let dir = tempdir()?;
    let mut bytes = raw_index(FIELDS, &POINTERS, 200);
    bytes.truncate(bytes.len() - 4);
    let path = write_file(dir.path(), "short.dat", &bytes);
    assert!(matches!(IndexReader::open(path), Err(IndexError::Corrupt(_))));
    Ok(())
}

#[test]
fn count_past_end_of_file_is_corrupt() -> Result<()> {
    let dir = tempdir()?;
    let mut fields = FIELDS;
    fields[1] = 1_000_000;
    let path = write_file(dir.path(), "lying.dat", &raw_index(fields, &POINTERS, 200));
    let err = IndexReader::open(path).unwrap_err();
    assert!(err.to_string().contains("past end of file"), "{}", err);
    Ok(())
}

#[test]
fn reserved_flag_bits_are_corrupt() -> Result<()> {
    let dir = tempdir()?;
    let mut fields = FIELDS;
    fields[4] = 0xF0;
    let path = write_file(dir.path(), "flags.dat", &raw_index(fields, &POINTERS, 200));
    assert!(matches!(IndexReader::open(path), Err(IndexError::Corrupt(_))));
    Ok(())
}

#[test]
fn missing_index_is_an_io_error() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        IndexReader::open(dir.path().join("absent.dat")),
        Err(IndexError::Io(_))
    ));
}

// -------------------- Writer round trip --------------------

#[test]
fn writer_output_reads_back_exactly() -> Result<()> {
    let dir = tempdir()?;
    let db = write_file(dir.path(), "fortunes", SAMPLE_DB.as_bytes());
    let writer = IndexWriter::new(
        &db,
        IndexOptions {
            ordered: true,
            version: 3,
            ..IndexOptions::default()
        },
    )?;
    writer.write()?;

    let reader = IndexReader::open(writer.index_path())?;
    assert_eq!(*reader.header(), writer.header());
    assert_eq!(reader.get_pointers()?, writer.offsets());
    assert_eq!(reader.eof_offset()?, writer.eof());
    for (i, offset) in writer.offsets().into_iter().enumerate() {
        assert_eq!(reader.get_pointer_at(i)?, offset);
    }

    let opts = reader.options();
    assert_eq!(opts.version, 3);
    assert!(opts.ordered);
    assert!(!opts.randomized);
    Ok(())
}

#[test]
fn comment_flag_survives_round_trip() -> Result<()> {
    let dir = tempdir()?;
    let db = write_file(dir.path(), "commented", COMMENTED_DB.as_bytes());
    let writer = IndexWriter::new(
        &db,
        IndexOptions {
            comments: true,
            randomized: true,
            ..IndexOptions::default()
        },
    )?;
    writer.write()?;

    let reader = IndexReader::open(writer.index_path())?;
    let opts = reader.options();
    assert!(opts.comments);
    assert!(opts.randomized);
    assert_eq!(reader.get_pointers()?, vec![13]);
    Ok(())
}
