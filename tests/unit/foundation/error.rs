use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(FlipError::config("x").to_string().contains("config error:"));
    assert!(
        FlipError::transform("x")
            .to_string()
            .contains("transform error:")
    );
    assert!(
        FlipError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = FlipError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn serde_json_errors_convert() {
    let err: FlipError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, FlipError::Serde(_)));
}
