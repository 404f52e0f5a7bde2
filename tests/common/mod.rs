#![allow(dead_code)]

use std::fs::{self, File};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

// ---------------------------------------------------------------------------
// Archive fixtures
// ---------------------------------------------------------------------------

/// ZIP bytes holding `files` in order. Names ending in `/` become directories.
pub fn zip_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().unix_permissions(0o644);

    for (name, data) in files {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

pub fn write_zip(path: &Path, files: &[(&str, &[u8])]) -> PathBuf {
    fs::write(path, zip_bytes(files)).unwrap();
    path.to_path_buf()
}

pub fn write_tar_gz(path: &Path, files: &[(&str, &[u8])]) -> PathBuf {
    let gz = GzEncoder::new(File::create(path).unwrap(), Compression::default());
    let mut builder = tar::Builder::new(gz);

    for (name, data) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(1_700_000_000);
        builder.append_data(&mut header, name, *data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
    path.to_path_buf()
}

/// Compress a directory built from `files` into a 7z archive at `path`,
/// AES-encrypted when `password` is given.
pub fn write_7z(path: &Path, files: &[(&str, &[u8])], password: Option<&str>) -> PathBuf {
    let src = tempfile::tempdir().unwrap();
    for (name, data) in files {
        let target = src.path().join(name);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(target, data).unwrap();
    }
    match password {
        Some(pw) => sevenz_rust::compress_to_path_encrypted(src.path(), path, pw.into()).unwrap(),
        None => sevenz_rust::compress_to_path(src.path(), path).unwrap(),
    }
    path.to_path_buf()
}

/// A minimal Word document whose body part contains `text`.
pub fn docx_bytes(text: &str) -> Vec<u8> {
    let body = format!(
        "<?xml version=\"1.0\"?><w:document><w:body><w:p><w:r><w:t>{text}</w:t></w:r></w:p></w:body></w:document>"
    );
    zip_bytes(&[
        ("[Content_Types].xml", b"<Types/>"),
        ("word/", b""),
        ("word/document.xml", body.as_bytes()),
    ])
}

// ---------------------------------------------------------------------------
// Filesystem checks
// ---------------------------------------------------------------------------

/// Every file (not directory) under `dir`.
pub fn files_under(dir: &Path) -> Vec<PathBuf> {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect()
}

/// A program that prints its first argument, standing in for `pdftotext`
/// on fixtures whose "PDF" bytes are plain text.
#[cfg(unix)]
pub fn fake_pdftotext() -> PathBuf {
    PathBuf::from("/bin/cat")
}
