use super::*;

#[test]
fn missing_title_path_is_a_config_error() {
    let err = FontSet::load(&FontPaths::default()).unwrap_err();
    assert!(matches!(err, CardError::Config(_)));

    let err = FontSet::load(&FontPaths {
        title: PathBuf::from("/nonexistent/mediacard-font.ttf"),
        ..FontPaths::default()
    })
    .unwrap_err();
    assert!(err.to_string().contains("failed to read font"));
}

#[test]
fn garbage_bytes_are_rejected() {
    assert!(LoadedFont::from_bytes(b"not a font".to_vec()).is_err());
}

#[test]
fn font_roles_fall_back_to_title() {
    let font_path = std::path::Path::new("tests/data/fonts/Tuffy.ttf");
    let set = FontSet::load(&FontPaths {
        title: font_path.to_path_buf(),
        ..FontPaths::default()
    })
    .unwrap();
    assert_eq!(set.get(FontRole::Title).family, "Tuffy");
    assert_eq!(
        set.get(FontRole::Rating).family,
        set.get(FontRole::Title).family
    );
}
