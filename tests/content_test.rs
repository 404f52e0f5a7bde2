mod common;

use std::fs;
use std::path::Path;

use dirsift::{query, CollectingReporter, ContentMode, Entry, PdfTool, SearchLimits};

use common::{docx_bytes, files_under, write_zip, zip_bytes};

/// Names of entries matched under `root` by a content query.
fn matched_names(root: &Path, mode: ContentMode, pattern: &str) -> Vec<String> {
    let mut reporter = CollectingReporter::new();
    query()
        .content(mode, pattern)
        .pdf_tool(PdfTool::Disabled)
        .run(root, &mut reporter)
        .unwrap();
    reporter.names().into_iter().map(String::from).collect()
}

/// The excerpt recorded for the single match of a find-all query.
fn excerpt_for(root: &Path, pattern: &str, limits: SearchLimits) -> Option<String> {
    let mut reporter = CollectingReporter::new();
    query()
        .content(ContentMode::CaseSensitive, pattern)
        .find_all(true)
        .limits(limits)
        .run(root, &mut reporter)
        .unwrap();
    assert!(reporter.entries.len() <= 1);
    reporter.entries.pop().and_then(|(_, e)| e.excerpt)
}

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

#[test]
fn literal_and_regex_modes() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("report.txt"), "Quarterly Results (final)\n").unwrap();

    assert!(matched_names(dir.path(), ContentMode::CaseSensitive, "quarterly").is_empty());
    assert_eq!(matched_names(dir.path(), ContentMode::CaseInsensitive, "quarterly"), ["report.txt"]);
    assert_eq!(matched_names(dir.path(), ContentMode::Regex, r"Q\w+ R"), ["report.txt"]);

    // Literal modes take metacharacters at face value.
    assert!(matched_names(dir.path(), ContentMode::CaseSensitive, r"Q\w+ R").is_empty());
    assert_eq!(matched_names(dir.path(), ContentMode::CaseSensitive, "(final)"), ["report.txt"]);
}

#[test]
fn directories_never_match_content() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("needle")).unwrap();
    fs::write(dir.path().join("needle.txt"), "no such word").unwrap();
    fs::write(dir.path().join("hay.txt"), "a needle in it").unwrap();

    let mut reporter = CollectingReporter::new();
    query()
        .mask("needle*")
        .content(ContentMode::CaseSensitive, "needle")
        .run(dir.path(), &mut reporter)
        .unwrap();
    assert!(reporter.entries.is_empty());

    assert_eq!(matched_names(dir.path(), ContentMode::CaseSensitive, "needle"), ["hay.txt"]);
}

// ---------------------------------------------------------------------------
// Excerpts
// ---------------------------------------------------------------------------

#[test]
fn find_all_collects_an_excerpt_per_match() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("a.txt"),
        "alpha needle beta\r\nno match here\nxx needle yy needle\n",
    )
    .unwrap();

    let excerpt = excerpt_for(dir.path(), "needle", SearchLimits::default()).unwrap();
    let lines: Vec<&str> = excerpt.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "lpha needle beta");
    assert_eq!(lines[1], "xx needle yy needle");
    assert_eq!(lines[2], "e yy needle");
    assert!(excerpt.ends_with('\n'));
}

#[test]
fn excerpts_are_clipped_and_printable() {
    let dir = tempfile::tempdir().unwrap();
    let long_tail = "z".repeat(200);
    fs::write(
        dir.path().join("a.txt"),
        format!("0123456789needle\t\x07{long_tail}\n"),
    )
    .unwrap();

    let excerpt = excerpt_for(dir.path(), "needle", SearchLimits::default()).unwrap();
    let line = excerpt.lines().next().unwrap();
    let expected = format!("56789needle  {}", "z".repeat(dirsift::EXCERPT_AFTER - 2));
    assert_eq!(line, expected);
    assert_eq!(line.len(), dirsift::EXCERPT_BEFORE + "needle".len() + dirsift::EXCERPT_AFTER);
}

#[test]
fn find_all_never_reports_fewer_than_first_match() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("one.txt"), "needle").unwrap();
    fs::write(dir.path().join("many.txt"), "needle needle\nneedle\n").unwrap();
    fs::write(dir.path().join("none.txt"), "hay").unwrap();

    let run = |find_all: bool| {
        let mut reporter = CollectingReporter::new();
        query()
            .content(ContentMode::CaseSensitive, "needle")
            .find_all(find_all)
            .run(dir.path(), &mut reporter)
            .unwrap();
        reporter.entries
    };

    let first = run(false);
    let all = run(true);
    assert_eq!(first.len(), all.len());

    for ((_, f), (_, a)) in first.iter().zip(&all) {
        assert_eq!(f.name, a.name);
        assert!(f.excerpt.is_none(), "first-match mode builds no excerpt");
        let count = a.excerpt.as_deref().map_or(0, |x| x.lines().count());
        assert!(count >= 1);
    }
    let many = all.iter().find(|(_, e)| e.name == "many.txt").unwrap();
    assert_eq!(many.1.excerpt.as_deref().unwrap().lines().count(), 3);
}

// ---------------------------------------------------------------------------
// Chunked disk reads
// ---------------------------------------------------------------------------

fn small_chunks(overlap: usize) -> SearchLimits {
    SearchLimits { chunk_size: 1000, overlap, ..SearchLimits::default() }
}

#[test]
fn overlap_finds_matches_across_chunk_boundaries() {
    let dir = tempfile::tempdir().unwrap();
    let mut body = vec![b'.'; 5000];
    body[997..1003].copy_from_slice(b"NEEDLE");
    fs::write(dir.path().join("big.dat"), &body).unwrap();

    let with_overlap = query()
        .content(ContentMode::CaseSensitive, "NEEDLE")
        .limits(small_chunks(50))
        .run(dir.path(), &mut CollectingReporter::new())
        .unwrap();
    assert_eq!(with_overlap.matches, 1);

    let without = query()
        .content(ContentMode::CaseSensitive, "NEEDLE")
        .limits(small_chunks(0))
        .run(dir.path(), &mut CollectingReporter::new())
        .unwrap();
    assert_eq!(without.matches, 0);
}

#[test]
fn carried_overlap_is_not_counted_twice() {
    let dir = tempfile::tempdir().unwrap();
    let mut body = vec![b'.'; 5000];
    body[970..976].copy_from_slice(b"NEEDLE");
    body[997..1003].copy_from_slice(b"NEEDLE");
    body[2500..2506].copy_from_slice(b"NEEDLE");
    fs::write(dir.path().join("big.dat"), &body).unwrap();

    let excerpt = excerpt_for(dir.path(), "NEEDLE", small_chunks(50)).unwrap();
    assert_eq!(excerpt.lines().count(), 3);
}

#[test]
fn match_cut_at_chunk_end_is_reported_once() {
    let dir = tempfile::tempdir().unwrap();
    let mut body = vec![b'.'; 5000];
    body[990..1010].copy_from_slice(b"12345678901234567890");
    fs::write(dir.path().join("digits.dat"), &body).unwrap();

    let mut reporter = CollectingReporter::new();
    query()
        .content(ContentMode::Regex, r"\d+")
        .find_all(true)
        .limits(small_chunks(50))
        .run(dir.path(), &mut reporter)
        .unwrap();

    assert_eq!(reporter.entries.len(), 1);
    let excerpt = reporter.entries[0].1.excerpt.clone().unwrap();
    assert_eq!(excerpt.lines().count(), 1, "got {excerpt:?}");
}

#[cfg(unix)]
#[test]
fn symlinked_files_are_chunked_by_target_size() {
    let dir = tempfile::tempdir().unwrap();
    let mut body = vec![b'.'; 5000];
    body[997..1003].copy_from_slice(b"NEEDLE");
    fs::write(dir.path().join("real.dat"), &body).unwrap();
    std::os::unix::fs::symlink(dir.path().join("real.dat"), dir.path().join("link.dat")).unwrap();

    for (overlap, expected) in [(0, Vec::<&str>::new()), (50, vec!["link.dat", "real.dat"])] {
        let mut reporter = CollectingReporter::new();
        query()
            .content(ContentMode::CaseSensitive, "NEEDLE")
            .limits(small_chunks(overlap))
            .run(dir.path(), &mut reporter)
            .unwrap();
        assert_eq!(reporter.names(), expected, "overlap {overlap}");
    }
}

// ---------------------------------------------------------------------------
// Office documents
// ---------------------------------------------------------------------------

#[test]
fn office_documents_are_unpacked() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("report.docx"), docx_bytes("Quarterly Results")).unwrap();
    fs::write(dir.path().join("empty.xlsx"), docx_bytes("nothing to see")).unwrap();
    // Not a ZIP at all: searched as plain bytes instead.
    fs::write(dir.path().join("renamed.pptx"), "Quarterly Results in plain text").unwrap();

    assert_eq!(
        matched_names(dir.path(), ContentMode::CaseInsensitive, "quarterly results"),
        ["renamed.pptx", "report.docx"]
    );
}

#[test]
fn office_documents_inside_archives_are_searched() {
    let dir = tempfile::tempdir().unwrap();
    let docx = docx_bytes("Quarterly Results");
    write_zip(
        &dir.path().join("bundle.zip"),
        &[("report.docx", &docx), ("broken.docx", b"Quarterly Results, not zipped")],
    );
    let temp = tempfile::tempdir().unwrap();

    let mut reporter = CollectingReporter::new();
    query()
        .content(ContentMode::CaseSensitive, "Quarterly")
        .exclude_extensions(["zip"])
        .archives(true)
        .temp_dir(temp.path())
        .run(dir.path(), &mut reporter)
        .unwrap();

    assert_eq!(reporter.names(), ["broken.docx", "report.docx"]);
    assert!(files_under(temp.path()).is_empty(), "temporary documents must be removed");
}

#[test]
fn single_archive_entry_is_extracted_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_zip(
        &dir.path().join("bundle.zip"),
        &[("inner/notes.txt", b"the needle is here")],
    );
    let query = query()
        .content(ContentMode::CaseSensitive, "needle")
        .build()
        .unwrap();

    let mut entry = Entry::new(&path, "inner/notes.txt");
    entry.in_archive = true;
    entry.size = 18;
    assert!(query.matches(&entry).matched);

    entry.name = "inner/missing.txt".into();
    assert!(!query.matches(&entry).matched, "extraction failure is a plain miss");
}

#[test]
fn temp_file_failure_is_a_miss() {
    let dir = tempfile::tempdir().unwrap();
    write_zip(&dir.path().join("bundle.zip"), &[("report.docx", &docx_bytes("needle"))]);

    let results = query()
        .content(ContentMode::CaseSensitive, "needle")
        .exclude_extensions(["zip"])
        .archives(true)
        .temp_dir(dir.path().join("does-not-exist"))
        .run(dir.path(), &mut CollectingReporter::new())
        .unwrap();
    assert_eq!(results.matches, 0);
}

// ---------------------------------------------------------------------------
// PDF
// ---------------------------------------------------------------------------

fn pdf_fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("report.pdf"), "Quarterly Results\n").unwrap();
    fs::write(dir.path().join("notes.txt"), "Quarterly Results\n").unwrap();
    dir
}

#[cfg(unix)]
#[test]
fn pdf_text_comes_from_the_converter() {
    let dir = pdf_fixture();

    let mut reporter = CollectingReporter::new();
    query()
        .content(ContentMode::CaseInsensitive, "Quarterly")
        .pdf_tool(PdfTool::At(common::fake_pdftotext()))
        .run(dir.path(), &mut reporter)
        .unwrap();
    assert_eq!(reporter.names(), ["notes.txt", "report.pdf"]);
}

#[cfg(unix)]
#[test]
fn built_query_keeps_its_pdf_utility() {
    let dir = pdf_fixture();
    let query = query()
        .content(ContentMode::CaseInsensitive, "Quarterly")
        .pdf_tool(PdfTool::At(common::fake_pdftotext()))
        .build()
        .unwrap();

    let report = Entry::new(dir.path(), "report.pdf");
    assert!(query.matches(&report).matched);
    assert!(query.matches(&report).matched);
    assert_eq!(query.pdf_utility(), Some(common::fake_pdftotext().as_path()));

    let copy = query.clone();
    assert!(copy.matches(&report).matched);
}

#[test]
fn pdf_without_converter_never_matches() {
    let dir = pdf_fixture();
    assert_eq!(
        matched_names(dir.path(), ContentMode::CaseInsensitive, "Quarterly"),
        ["notes.txt"]
    );

    let mut reporter = CollectingReporter::new();
    query()
        .content(ContentMode::CaseInsensitive, "Quarterly")
        .pdf_tool(PdfTool::At(dir.path().join("no-such-pdftotext")))
        .run(dir.path(), &mut reporter)
        .unwrap();
    assert_eq!(reporter.names(), ["notes.txt"]);
}

#[cfg(unix)]
#[test]
fn pdf_temp_files_are_removed_on_match_and_on_failure() {
    let dir = tempfile::tempdir().unwrap();
    write_zip(
        &dir.path().join("papers.zip"),
        &[("scan.pdf", b"Quarterly Results\n"), ("misc.docx", &zip_bytes(&[]))],
    );

    for (tool, expected) in [
        (PdfTool::At(common::fake_pdftotext()), 1),
        (PdfTool::At(dir.path().join("no-such-pdftotext")), 0),
    ] {
        let temp = tempfile::tempdir().unwrap();
        let results = query()
            .content(ContentMode::CaseSensitive, "Quarterly")
            .exclude_extensions(["zip"])
            .archives(true)
            .pdf_tool(tool)
            .temp_dir(temp.path())
            .run(dir.path(), &mut CollectingReporter::new())
            .unwrap();

        assert_eq!(results.matches, expected);
        assert!(files_under(temp.path()).is_empty(), "temporary documents must be removed");
    }
}
