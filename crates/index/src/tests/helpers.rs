use byteorder::{BigEndian, WriteBytesExt};
use std::fs;
use std::path::{Path, PathBuf};

/// Three records; offsets 2, 20, 57; eof 62; shortest 5, longest 35.
pub const SAMPLE_DB: &str = "%\nI Like Facebook\n%\n\"I see fire\"\n        -- Ed Sheeran\n%\nCTSG\n";

/// One real record at offset 13 once comments are skipped.
pub const COMMENTED_DB: &str = "%% It's new!\n\"Be or not to be\"\n%% What?!\n        -- Shakespeare\n%\n%% Todo: Change it!\n";

pub fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Hand-assembles an index file from raw header fields, pointers and eof.
pub fn raw_index(fields: [u32; 6], pointers: &[u32], eof: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    for f in fields.iter().chain(pointers).chain(std::iter::once(&eof)) {
        buf.write_u32::<BigEndian>(*f).unwrap();
    }
    buf
}
