use std::collections::HashMap;
use std::fs;
use std::path::Path;

use indoc::indoc;
use tempfile::TempDir;

use stringsync::traits::Parser;
use stringsync::{
    Disabled, MockMode, MockTranslator, RetryPolicy, SyncOptions, Table, append_content,
    sync_tables,
};

fn write_table(root: &Path, dir: &str, content: &str) {
    let dir_path = root.join(dir);
    fs::create_dir_all(&dir_path).unwrap();
    fs::write(dir_path.join("Localizable.strings"), content).unwrap();
}

fn read_table(root: &Path, dir: &str) -> Table {
    Table::read_from(root.join(dir).join("Localizable.strings")).unwrap()
}

fn options(root: &Path) -> SyncOptions {
    let mut options = SyncOptions::new(root);
    options.original_language = Some("en".to_string());
    options.retry = RetryPolicy {
        max_attempts: 1,
        delay: std::time::Duration::ZERO,
    };
    options
}

const SOURCE: &str = indoc! {r#"
    /* Greeting */
    "greeting" = "Hello";
    /* Farewell */
    "farewell" = "Goodbye";
"#};

#[tokio::test]
async fn every_source_key_appears_in_every_target_table() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_table(root, "en.lproj", SOURCE);
    write_table(root, "fr.lproj", "");
    write_table(root, "de.lproj", "\"greeting\" = \"Hallo\";\n");

    let report = sync_tables(&options(root), &MockTranslator::suffix())
        .await
        .unwrap();

    for dir in ["en.lproj", "fr.lproj", "de.lproj"] {
        let table = read_table(root, dir);
        assert!(table.get("\"greeting\"").is_some(), "{dir} lost greeting");
        assert!(table.get("\"farewell\"").is_some(), "{dir} lost farewell");
    }
    assert_eq!(report.directories, 3);
    assert_eq!(report.source_entries, 2);
}

#[tokio::test]
async fn missing_target_directory_file_is_created_with_fallback_values() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_table(root, "en.lproj", "\"greeting\" = \"Hello\";\n");
    fs::create_dir_all(root.join("fr.lproj")).unwrap();

    // default policy: zero attempts, everything falls back to source text
    let mut opts = options(root);
    opts.retry = RetryPolicy::default();
    let report = sync_tables(&opts, &Disabled).await.unwrap();

    let fr = read_table(root, "fr.lproj");
    assert_eq!(fr.get("\"greeting\"").unwrap().value, "Hello");
    assert!(report.fallback_languages.contains("fr"));
    assert!(report.fallbacks >= 1);
}

#[tokio::test]
async fn translated_value_without_braces_is_preserved() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_table(root, "en.lproj", SOURCE);
    write_table(
        root,
        "fr.lproj",
        indoc! {r#"
            /* French greeting */
            "greeting" = "Bonjour";
        "#},
    );

    let report = sync_tables(&options(root), &MockTranslator::suffix())
        .await
        .unwrap();

    let fr = read_table(root, "fr.lproj");
    let greeting = fr.get("\"greeting\"").unwrap();
    assert_eq!(greeting.value, "Bonjour");
    // the target's own comment wins over the source comment
    assert_eq!(greeting.comment.as_deref(), Some("/* French greeting */"));
    // the missing key was filled in from source
    assert_eq!(fr.get("\"farewell\"").unwrap().value, "Goodbye_fr");
    assert!(report.kept >= 1);
}

#[tokio::test]
async fn placeholder_braces_force_retranslation() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_table(root, "en.lproj", "\"greeting\" = \"Hello\";\n");
    write_table(root, "fr.lproj", "\"greeting\" = \"Bonjour {name}\";\n");

    sync_tables(&options(root), &MockTranslator::suffix())
        .await
        .unwrap();

    let fr = read_table(root, "fr.lproj");
    assert_eq!(fr.get("\"greeting\"").unwrap().value, "Hello_fr");
}

#[tokio::test]
async fn replace_mode_overwrites_already_translated_values() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_table(root, "en.lproj", "\"greeting\" = \"Hello\";\n");
    write_table(root, "fr.lproj", "\"greeting\" = \"Bonjour\";\n");

    let mut opts = options(root);
    opts.replace = true;
    sync_tables(&opts, &MockTranslator::suffix()).await.unwrap();

    let fr = read_table(root, "fr.lproj");
    assert_eq!(fr.get("\"greeting\"").unwrap().value, "Hello_fr");
}

#[tokio::test]
async fn retry_mode_retranslates_only_values_equal_to_source() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_table(root, "en.lproj", SOURCE);
    write_table(
        root,
        "fr.lproj",
        "\"greeting\" = \"Hello\";\n\"farewell\" = \"Au revoir\";\n",
    );

    let mut opts = options(root);
    opts.retry_identical = true;
    let report = sync_tables(&opts, &MockTranslator::suffix()).await.unwrap();

    let fr = read_table(root, "fr.lproj");
    assert_eq!(fr.get("\"greeting\"").unwrap().value, "Hello_fr");
    assert_eq!(fr.get("\"farewell\"").unwrap().value, "Au revoir");
    // the en.lproj source directory is rewritten too, and in retry mode its
    // values always equal the source, so both of its entries count as well
    assert_eq!(report.retranslated, 3);
    assert_eq!(report.kept, 1);
}

#[tokio::test]
async fn source_directory_is_rewritten_normalized() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    // unsorted file with a stray malformed line
    write_table(
        root,
        "en.lproj",
        "\"b\" = \"Two\";\nnoise\n\"a\" = \"One\";\n",
    );

    sync_tables(&options(root), &Disabled).await.unwrap();

    let en = read_table(root, "en.lproj");
    assert_eq!(en.len(), 2);
    assert_eq!(en.entries[0].key, "\"b\"");
    assert_eq!(en.entries[1].key, "\"a\"");
    // entries with no comment get the default one on rewrite
    assert_eq!(
        en.entries[0].comment.as_deref(),
        Some("/* No comment provided by engineer. */")
    );
}

#[tokio::test]
async fn missing_source_file_aborts_the_run() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("fr.lproj")).unwrap();

    let result = sync_tables(&options(root), &Disabled).await;
    assert!(matches!(
        result,
        Err(stringsync::Error::MissingSource(_))
    ));
}

#[tokio::test]
async fn mapped_translations_flow_into_the_target_table() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_table(root, "en.lproj", "\"greeting\" = \"Hello\";\n");
    fs::create_dir_all(root.join("fr.lproj")).unwrap();

    let mut map = HashMap::new();
    map.insert(
        ("Hello".to_string(), "fr".to_string()),
        "Bonjour".to_string(),
    );
    let provider = MockTranslator::new(MockMode::Mappings(map));
    sync_tables(&options(root), &provider).await.unwrap();

    let fr = read_table(root, "fr.lproj");
    assert_eq!(fr.get("\"greeting\"").unwrap().value, "Bonjour");
}

#[tokio::test]
async fn chinese_directories_use_service_locale_codes() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_table(root, "en.lproj", "\"greeting\" = \"Hello\";\n");
    fs::create_dir_all(root.join("zh-Hans.lproj")).unwrap();
    fs::create_dir_all(root.join("zh-TW.lproj")).unwrap();

    sync_tables(&options(root), &MockTranslator::suffix())
        .await
        .unwrap();

    assert_eq!(
        read_table(root, "zh-Hans.lproj").get("\"greeting\"").unwrap().value,
        "Hello_zh-cn"
    );
    assert_eq!(
        read_table(root, "zh-TW.lproj").get("\"greeting\"").unwrap().value,
        "Hello_zh-tw"
    );
}

#[tokio::test]
async fn append_content_adds_quoted_duplicate_entries() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_table(root, "en.lproj", "\"greeting\" = \"Hello\";\n");
    write_table(root, "fr.lproj", "\"greeting\" = \"Bonjour\";\n");

    let opts = options(root);
    let provider = MockTranslator::suffix();
    append_content(&opts, &provider, "New feature").await.unwrap();
    let report = append_content(&opts, &provider, "New feature").await.unwrap();

    let fr = read_table(root, "fr.lproj");
    let duplicates: Vec<_> = fr
        .entries
        .iter()
        .filter(|e| e.key == "\"New feature\"")
        .collect();
    assert_eq!(duplicates.len(), 2, "append mode must not deduplicate");
    for entry in duplicates {
        assert_eq!(entry.value, "New feature_fr");
        assert_eq!(
            entry.comment.as_deref(),
            Some("/* No comment provided by engineer. */")
        );
    }
    // the pre-existing entry is untouched
    assert_eq!(fr.get("\"greeting\"").unwrap().value, "Bonjour");
    assert_eq!(report.appended, 1);
}

#[tokio::test]
async fn append_content_skips_the_source_directory() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_table(root, "en.lproj", "\"greeting\" = \"Hello\";\n");
    write_table(root, "fr.lproj", "");

    append_content(&options(root), &MockTranslator::suffix(), "Note")
        .await
        .unwrap();

    let en = fs::read_to_string(root.join("en.lproj/Localizable.strings")).unwrap();
    assert!(!en.contains("Note"));
    let fr = read_table(root, "fr.lproj");
    assert!(fr.get("\"Note\"").is_some());
}
