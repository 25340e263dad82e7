use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ReelError::config("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        ReelError::encoder_open("x")
            .to_string()
            .contains("failed to open encoder:")
    );
    assert!(ReelError::encode("x").to_string().contains("encoder error:"));
    assert!(
        ReelError::frame_load("a/b.jpg", "gone")
            .to_string()
            .contains("a/b.jpg")
    );
}

#[test]
fn sample_size_message_names_both_counts() {
    let err = ReelError::InvalidSampleSize {
        requested: 91,
        available: Some(90),
    };
    let msg = err.to_string();
    assert!(msg.contains("91"));
    assert!(msg.contains("1..=90"));
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let zero = ReelError::InvalidSampleSize {
        requested: 0,
        available: None,
    };
    assert!(zero.to_string().contains("at least 1"));
}

#[test]
fn kinds_follow_variants() {
    assert_eq!(
        ReelError::DatasetMissing {
            path: PathBuf::from("DAVIS")
        }
        .kind(),
        ErrorKind::DatasetMissing
    );
    assert_eq!(ReelError::NoFrames.kind(), ErrorKind::NoFrames);
    assert_eq!(
        ReelError::FrameSizeMismatch {
            expected: FrameGeometry {
                width: 2,
                height: 2
            },
            actual: FrameGeometry {
                width: 4,
                height: 2
            },
            context: "overlay".to_owned(),
        }
        .kind(),
        ErrorKind::FrameSizeMismatch
    );
    assert_eq!(ErrorKind::DatasetMissing.to_string(), "dataset-missing");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ReelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.kind(), ErrorKind::Other);
}
