use chub_domain::config::EngineConfig;
use chub_kernel::config::load_config;
use std::io::Write;

fn write_toml(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn file_values_override_defaults() {
    let file = write_toml(
        r#"
        [policy]
        confirmation_window_secs = 60

        [listing]
        default_page_size = 25
        "#,
    );

    let cfg: EngineConfig = load_config(Some(file.path())).unwrap();

    assert_eq!(cfg.policy.confirmation_window_secs, 60);
    assert_eq!(cfg.listing.default_page_size, 25);
    assert_eq!(cfg.listing.max_page_size, 100);
    assert_eq!(cfg.policy.uploads.allowed_extensions, [".pdf", ".docx"]);
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    assert!(load_config::<EngineConfig>(Some(missing)).is_err());
}

#[test]
fn defaults_apply_without_any_source() {
    let cfg: EngineConfig = load_config(None::<&str>).unwrap();
    assert_eq!(cfg.policy.confirmation_window_secs, 900);
    assert_eq!(cfg.policy.password.min_length, 8);
}
