use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        StitchError::config("x")
            .to_string()
            .contains("config error:")
    );
    assert!(
        StitchError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        StitchError::presentation("x")
            .to_string()
            .contains("presentation error:")
    );
}

#[test]
fn upload_error_shows_user_message() {
    let err = StitchError::from(ValidationError::EmptyFile);
    assert_eq!(err.to_string(), "File is empty.");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = StitchError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
