use super::*;

fn music() -> UploadFile {
    UploadFile::new("track.MP3", AssetRole::Music, 4_000_000)
}

#[test]
fn music_is_mandatory_and_unique() {
    let limits = UploadLimits::default();
    let err = validate_uploads(&[], &limits).unwrap_err();
    assert!(err.to_string().starts_with("upload stage failed"));
    assert_eq!(err.stage(), Some(PipelineStage::Upload));

    let two = [music(), UploadFile::new("b.wav", AssetRole::Music, 1)];
    assert!(validate_uploads(&two, &limits).is_err());
    assert!(validate_uploads(&[music()], &limits).is_ok());
}

#[test]
fn extensions_are_checked_per_role() {
    let limits = UploadLimits::default();
    let jpg_logo = [music(), UploadFile::new("logo.jpg", AssetRole::Logo, 10)];
    assert!(validate_uploads(&jpg_logo, &limits).is_err());

    let ok = [
        music(),
        UploadFile::new("logo.svg", AssetRole::Logo, 10),
        UploadFile::new("shot.webp", AssetRole::ProductImage, 10),
        UploadFile::new("demo.mov", AssetRole::ProductVideo, 10),
        UploadFile::new("sky.mp4", AssetRole::Background, 10),
    ];
    assert!(validate_uploads(&ok, &limits).is_ok());

    let no_ext = [music(), UploadFile::new("README", AssetRole::ProductImage, 1)];
    assert!(validate_uploads(&no_ext, &limits).is_err());
}

#[test]
fn size_limits_apply_per_file_and_in_total() {
    let limits = UploadLimits {
        max_file_bytes: 100,
        max_total_bytes: 150,
    };
    let big = [UploadFile::new("a.mp3", AssetRole::Music, 101)];
    assert!(validate_uploads(&big, &limits).is_err());

    let many = [
        UploadFile::new("a.mp3", AssetRole::Music, 80),
        UploadFile::new("b.png", AssetRole::ProductImage, 80),
    ];
    let err = validate_uploads(&many, &limits).unwrap_err();
    assert!(err.to_string().contains("total 160 bytes"));
}

#[test]
fn uploaded_assets_group_by_role() {
    let asset = |url: &str| UploadedAsset {
        url: url.to_string(),
        file_name: url.to_string(),
        size_bytes: 1,
    };
    let grouped = UploadedAssets::from_uploads([
        (AssetRole::ProductImage, asset("i1")),
        (AssetRole::Music, asset("m")),
        (AssetRole::ProductImage, asset("i2")),
    ])
    .unwrap();
    assert_eq!(grouped.music_file.url, "m");
    assert_eq!(grouped.product_images.len(), 2);
    assert!(grouped.logo.is_none());

    assert!(UploadedAssets::from_uploads([(AssetRole::Logo, asset("l"))]).is_err());
}
