use std::fs;
use std::io::Write;
use tempfile::TempDir;

use lexrag_core::config::IndexerConfig;
use lexrag_core::data_processor::DataProcessor;
use lexrag_core::Error;

fn processor(chunk_size: usize, overlap: usize) -> DataProcessor {
    let config = IndexerConfig { chunk_size, overlap, ..IndexerConfig::default() };
    DataProcessor::new(config).expect("valid config")
}

#[test]
fn process_directory_single_small_file() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let mut f = fs::File::create(dir.join("a.txt")).unwrap();
    writeln!(f, "Short text.").unwrap();

    let chunks = processor(150, 50).process_directory(dir).expect("process");

    assert_eq!(chunks.len(), 1, "one small file becomes one chunk");
    assert_eq!(chunks[0].text, "Short text .");
    assert_eq!(chunks[0].file, "a.txt");
    assert_eq!((chunks[0].start_word, chunks[0].end_word), (0, 2));
    assert_eq!(chunks[0].citation(), "a.txt:words[0-2]");
}

#[test]
fn files_are_discovered_recursively_in_sorted_order() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::create_dir_all(dir.join("b/nested")).unwrap();
    fs::write(dir.join("c.md"), "gamma").unwrap();
    fs::write(dir.join("a.txt"), "alpha").unwrap();
    fs::write(dir.join("b/nested/z.markdown"), "zeta").unwrap();
    fs::write(dir.join("b/image.png"), "not text").unwrap();
    fs::write(dir.join("b/README"), "no extension").unwrap();

    let processor = processor(10, 2);
    let chunks = processor.process_directory(dir).expect("process");
    let files: Vec<_> = chunks.iter().map(|c| c.file.as_str()).collect();
    assert_eq!(files, vec!["a.txt", "b/nested/z.markdown", "c.md"]);
    let ids: Vec<_> = chunks.iter().map(|c| c.chunk_id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
}

#[test]
fn every_token_is_covered_without_gaps() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let words: Vec<String> = (0..137).map(|i| format!("word{i}")).collect();
    fs::write(dir.join("long.txt"), words.join(" ")).unwrap();

    let chunks = processor(20, 7).process_directory(dir).expect("process");
    let mut covered = vec![false; words.len()];
    for c in &chunks {
        for slot in covered.iter_mut().take(c.end_word + 1).skip(c.start_word) {
            *slot = true;
        }
        let expected = words[c.start_word..=c.end_word].join(" ");
        assert_eq!(c.text, expected);
    }
    assert!(covered.iter().all(|&c| c));
    for pair in chunks.windows(2) {
        assert!(pair[1].start_word <= pair[0].end_word, "consecutive chunks overlap");
    }
}

#[test]
fn rebuilding_is_deterministic() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    for name in ["q.md", "a.txt", "m.txt"] {
        fs::write(dir.join(name), format!("{name} body text, repeated body text.")).unwrap();
    }
    let processor = processor(4, 1);
    let first = processor.process_directory(dir).unwrap();
    let second = processor.process_directory(dir).unwrap();
    assert_eq!(first, second);
}

#[test]
fn empty_directory_yields_no_chunks() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("blank.txt"), "  \r\n\r\n ").unwrap();
    let chunks = processor(150, 50).process_directory(tmp.path()).unwrap();
    assert!(chunks.is_empty());
}

#[test]
fn undecodable_file_aborts_processing() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("good.txt"), "fine").unwrap();
    fs::write(tmp.path().join("bad.txt"), [0xff, 0xfe, 0x00, 0xc3]).unwrap();
    let err = processor(150, 50).process_directory(tmp.path()).expect_err("decode failure");
    match err {
        Error::FileDecode { path, .. } => assert!(path.ends_with("bad.txt")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_directory_is_a_configuration_error() {
    let tmp = TempDir::new().unwrap();
    let err =
        processor(150, 50).process_directory(&tmp.path().join("nope")).expect_err("missing dir");
    assert!(matches!(err, Error::Configuration(_)));
}

#[test]
fn sibling_paths_sort_as_strings() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::create_dir_all(dir.join("a")).unwrap();
    fs::create_dir_all(dir.join("a-b")).unwrap();
    fs::write(dir.join("a/x.txt"), "plain").unwrap();
    fs::write(dir.join("a-b/x.txt"), "dashed").unwrap();
    fs::write(dir.join("a.md"), "dotted").unwrap();

    let chunks = processor(10, 2).process_directory(dir).expect("process");
    let files: Vec<_> = chunks.iter().map(|c| c.file.as_str()).collect();
    assert_eq!(files, vec!["a-b/x.txt", "a.md", "a/x.txt"]);
    let ids: Vec<_> = chunks.iter().map(|c| c.chunk_id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
}

#[cfg(unix)]
#[test]
fn symlinked_documents_are_indexed() {
    use std::os::unix::fs::symlink;

    let tmp = TempDir::new().unwrap();
    let docs = tmp.path().join("docs");
    fs::create_dir_all(&docs).unwrap();
    fs::write(docs.join("a.txt"), "alpha").unwrap();
    fs::write(tmp.path().join("outside.md"), "linked body").unwrap();
    symlink(tmp.path().join("outside.md"), docs.join("link.md")).unwrap();

    let chunks = processor(10, 2).process_directory(&docs).expect("process");
    let files: Vec<_> = chunks.iter().map(|c| c.file.as_str()).collect();
    assert_eq!(files, vec!["a.txt", "link.md"]);
    assert_eq!(chunks[1].text, "linked body");
}

#[cfg(unix)]
#[test]
fn dangling_symlink_is_a_decode_error() {
    use std::os::unix::fs::symlink;

    let tmp = TempDir::new().unwrap();
    let docs = tmp.path().join("docs");
    fs::create_dir_all(&docs).unwrap();
    fs::write(docs.join("a.txt"), "alpha").unwrap();
    symlink(tmp.path().join("gone.md"), docs.join("broken.md")).unwrap();

    let err = processor(10, 2).process_directory(&docs).expect_err("dangling link");
    match err {
        Error::FileDecode { path, .. } => assert!(path.ends_with("broken.md")),
        other => panic!("unexpected error: {other}"),
    }
}
