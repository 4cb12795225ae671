use jpview::config::{ConfigFlags, load_config_flags, parse_flag_tokens};
use jpview::host::SplitDirection;

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".jpviewrc");
    let content = r#"
# comment
--watch

--split horizontal

--filetype=jsonc
"#;
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.watch);
    assert_eq!(flags.split, Some(SplitDirection::Horizontal));
    assert_eq!(flags.filetype.as_deref(), Some("jsonc"));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".jpviewrc");
    let content = "--watch\n--split horizontal\n--filetype json5\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_flags = ConfigFlags {
        split: Some(SplitDirection::Vertical),
        ..ConfigFlags::default()
    };

    let effective = file_flags.union(&cli_flags);
    assert!(effective.watch, "file flags should remain enabled");
    assert_eq!(
        effective.split,
        Some(SplitDirection::Vertical),
        "cli should override split"
    );
    assert_eq!(
        effective.filetype.as_deref(),
        Some("json5"),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_parse_flag_tokens_handles_equals_syntax() {
    let args = vec![
        "--split=vertical".to_string(),
        "--filetype=json".to_string(),
    ];
    let flags = parse_flag_tokens(&args);
    assert_eq!(flags.split, Some(SplitDirection::Vertical));
    assert_eq!(flags.filetype.as_deref(), Some("json"));
    assert!(!flags.watch);
}

#[test]
fn test_missing_config_file_is_default() {
    let dir = tempfile::tempdir().unwrap();
    let flags = load_config_flags(&dir.path().join("absent")).unwrap();
    assert_eq!(flags, ConfigFlags::default());
}
