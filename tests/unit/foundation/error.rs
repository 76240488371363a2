use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CityweaveError::input("x")
            .to_string()
            .contains("input error:")
    );
    assert!(
        CityweaveError::reference("x")
            .to_string()
            .contains("reference error:")
    );
    assert!(
        CityweaveError::nothing_to_animate("x")
            .to_string()
            .contains("nothing to animate:")
    );
    assert!(
        CityweaveError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        CityweaveError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn parse_error_names_file_and_line() {
    let err = CityweaveError::parse("frames/step_003.txt", 7, "expected 3 tokens, got 2");
    let msg = err.to_string();
    assert!(msg.contains("frames/step_003.txt:7"));
    assert!(msg.contains("expected 3 tokens"));
}

#[test]
fn export_error_names_destination() {
    let err = CityweaveError::export("/nope/out.mp4", "permission denied");
    assert!(err.to_string().contains("/nope/out.mp4"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CityweaveError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert!(!err.is_reference());
}
