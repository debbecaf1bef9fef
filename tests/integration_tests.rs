//! Integration tests for corpus_tally

use corpus_tally::*;
use std::path::Path;
use tempfile::TempDir;

/// Brown-style tagged documents of increasing length.
const BROWN_DOCS: &[(&str, &str)] = &[
    (
        "ca01",
        "\n\n\tThe/at Fulton/np-tl County/nn-tl Grand/jj-tl Jury/nn-tl said/vbd Friday/nr an/at \
         investigation/nn of/in Atlanta's/np$ recent/jj primary/nn election/nn produced/vbd ``/`` \
         no/at evidence/nn ''/'' that/cs any/dti irregularities/nns took/vbd place/nn ./.\n\n\
         \tThe/at jury/nn further/rbr said/vbd it/pps did/dod n't/* find/vb any/dti ./.\n",
    ),
    ("ca02", "\n\n\tNo/at ./.\n\n\t_/nil\n"),
    (
        "cb01",
        "\n\n\tMr./np Smith/np ca/md n't/* go/vb ./.\n\n\t*/* */* ./.\n\n\t\
         He/pps stayed/vbd home/nr ./.\n",
    ),
];

const EMMA: &str = "[Emma by Jane Austen 1816]\n\nVOLUME I\n\nCHAPTER I\n\n\
Emma Woodhouse, handsome, clever, and rich, with a comfortable home\n";

fn fixture() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let brown = dir.path().join("corpora").join("brown");
    std::fs::create_dir_all(&brown).unwrap();
    for (id, content) in BROWN_DOCS {
        std::fs::write(brown.join(id), content).unwrap();
    }
    std::fs::write(brown.join("README"), "The Brown Corpus").unwrap();
    std::fs::write(brown.join("cats.txt"), "ca01 news\nca02 news\ncb01 editorial\n").unwrap();

    let gutenberg = dir.path().join("corpora").join("gutenberg");
    std::fs::create_dir_all(&gutenberg).unwrap();
    std::fs::write(gutenberg.join("austen-emma.txt"), EMMA).unwrap();
    std::fs::write(gutenberg.join("README"), "Project Gutenberg Selections").unwrap();
    dir
}

fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let header = reader.headers().unwrap().iter().map(str::to_string).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    (header, rows)
}

fn run_fixture(top_n: usize) -> (TempDir, PipelineConfig, PipelineReport) {
    let dir = fixture();
    let config = PipelineConfig::default()
        .with_data_dir(dir.path())
        .with_output_dir(dir.path().join("out"))
        .with_offline(true)
        .with_top_n(top_n);
    let mut store = CorpusStore::from_config(&config);
    let report = Pipeline::new(config.clone()).unwrap().run(&mut store).unwrap();
    (dir, config, report)
}

#[test]
fn test_full_pipeline_writes_reference_files() {
    let (dir, _, report) = run_fixture(12);
    let out = dir.path().join("out");

    for name in [
        "brown_corpus_with_tokens_and_count_sorted.csv",
        "top_12_token_count.csv",
        "brown_corpus_top_12_token_count.csv",
        "gutenberg_corpus.csv",
    ] {
        assert!(out.join(name).is_file(), "missing {}", name);
    }
    assert_eq!(report.documents, 3);
    assert_eq!(report.top_documents, 3);
    assert_eq!(report.gutenberg_documents, Some(1));
}

#[test]
fn test_sorted_table_descending_and_counts_consistent() {
    let (_dir, config, _) = run_fixture(12);
    let (header, rows) = read_csv(&config.sorted_path());
    assert_eq!(header, vec!["text_id", "text", "word", "word_count"]);

    let ids: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(ids, vec!["ca01", "cb01", "ca02"]);

    let counts: Vec<usize> = rows.iter().map(|r| r[3].parse().unwrap()).collect();
    assert!(counts.windows(2).all(|w| w[0] >= w[1]));

    let tokenizer = Tokenizer::new();
    for row in &rows {
        let recount = tokenizer.word_tokenize(&row[1]).len();
        assert_eq!(recount.to_string(), row[3], "count mismatch for {}", row[0]);
    }
}

#[test]
fn test_brown_text_is_space_joined_words() {
    let (_dir, config, _) = run_fixture(12);
    let (_, rows) = read_csv(&config.sorted_path());
    let ca02 = rows.iter().find(|r| r[0] == "ca02").unwrap();
    assert_eq!(ca02[1], "No . _");
    assert_eq!(ca02[2], "['No', '.', '_']");
}

#[test]
fn test_top_file_is_prefix_of_sorted() {
    let (_dir, config, report) = run_fixture(2);
    let (_, sorted) = read_csv(&config.sorted_path());
    let (header, top) = read_csv(&config.top_path());

    assert_eq!(header, vec!["text_id", "text", "word", "word_count"]);
    assert_eq!(top.len(), 2);
    assert_eq!(top[..], sorted[..2]);
    assert_eq!(report.top_documents, 2);
    assert!(config.top_path().ends_with("top_2_token_count.csv"));
}

#[test]
fn test_sentence_table_filtered_and_numbered() {
    let (_dir, config, report) = run_fixture(12);
    let (header, rows) = read_csv(&config.sentences_path());
    assert_eq!(header, vec!["text_id", "text", "linenumber"]);
    assert_eq!(rows.len(), report.sentences);

    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row[2], (i + 1).to_string());
        assert!(!has_no_word_chars(&row[1]), "punctuation-only row {:?}", row);
    }

    // "_" is dropped by the single-character filter, "* * ." by the second one.
    assert!(rows.iter().all(|r| r[1] != "_" && r[1] != "* * ."));

    // Sentences come grouped by document in ranked order.
    let ids: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    let first_cb01 = ids.iter().position(|id| *id == "cb01").unwrap();
    let last_ca01 = ids.iter().rposition(|id| *id == "ca01").unwrap();
    assert!(last_ca01 < first_cb01);

    // The abbreviation keeps "Mr. Smith" together.
    assert!(rows.iter().any(|r| r[1] == "Mr. Smith ca n't go ."));
}

#[test]
fn test_gutenberg_export() {
    let (_dir, config, _) = run_fixture(12);
    let (header, rows) = read_csv(&config.gutenberg_path());
    assert_eq!(header, vec!["text_id", "text"]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "austen-emma.txt");
    assert_eq!(
        rows[0][1],
        "[ Emma by Jane Austen 1816 ] VOLUME I CHAPTER I Emma Woodhouse , handsome , \
         clever , and rich , with a comfortable home"
    );
}

#[test]
fn test_skip_gutenberg() {
    let dir = fixture();
    std::fs::remove_dir_all(dir.path().join("corpora").join("gutenberg")).unwrap();

    let config = PipelineConfig::default()
        .with_data_dir(dir.path())
        .with_output_dir(dir.path().join("out"))
        .with_offline(true)
        .with_skip_gutenberg(true);
    let mut store = CorpusStore::from_config(&config);
    let report = Pipeline::new(config.clone()).unwrap().run(&mut store).unwrap();

    assert_eq!(report.gutenberg_documents, None);
    assert_eq!(report.files.len(), 3);
    assert!(!config.gutenberg_path().exists());
}

#[test]
fn test_missing_corpus_offline_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig::default()
        .with_data_dir(dir.path())
        .with_output_dir(dir.path().join("out"))
        .with_offline(true);
    let mut store = CorpusStore::from_config(&config);

    let err = Pipeline::new(config).unwrap().run(&mut store).unwrap_err();
    assert_eq!(err.code, ErrorCode::CorpusUnavailable);
    assert_eq!(err.doc_id.as_deref(), Some("brown"));
}

#[test]
fn test_missing_gutenberg_keeps_brown_exports() {
    let dir = fixture();
    std::fs::remove_dir_all(dir.path().join("corpora").join("gutenberg")).unwrap();

    let config = PipelineConfig::default()
        .with_data_dir(dir.path())
        .with_output_dir(dir.path().join("out"))
        .with_offline(true);
    let mut store = CorpusStore::from_config(&config);

    let err = Pipeline::new(config.clone()).unwrap().run(&mut store).unwrap_err();
    assert_eq!(err.code, ErrorCode::CorpusUnavailable);
    assert_eq!(err.doc_id.as_deref(), Some("gutenberg"));

    assert!(config.sorted_path().is_file());
    assert!(config.top_path().is_file());
    assert!(config.sentences_path().is_file());
    assert!(!config.gutenberg_path().exists());
}
