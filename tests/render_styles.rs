use std::path::Path;

use thumbsmith::{BrandTheme, Style, ThumbnailSpec, render_thumbnail};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().try_init();
}

/// Small canvas keeps the full-pipeline tests quick; styles only use the
/// theme dimensions, never hardcoded 1200x630.
fn small_theme() -> BrandTheme {
    BrandTheme {
        width: 300,
        height: 158,
        ..BrandTheme::default()
    }
}

fn spec(title: &str, tag: &str, out: &Path, seed: Option<u64>, style: Style) -> ThumbnailSpec {
    ThumbnailSpec {
        title: title.to_owned(),
        tag: tag.to_owned(),
        output_path: out.to_path_buf(),
        seed,
        style,
    }
}

#[test]
fn every_style_is_deterministic_byte_for_byte() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let theme = small_theme();
    for style in Style::ALL {
        let a = dir.path().join(format!("{}_a.png", style.name()));
        let b = dir.path().join(format!("{}_b.png", style.name()));
        render_thumbnail(&spec("Deterministic Output", "CI", &a, Some(7), style), &theme).unwrap();
        render_thumbnail(&spec("Deterministic Output", "CI", &b, Some(7), style), &theme).unwrap();
        let bytes_a = std::fs::read(&a).unwrap();
        let bytes_b = std::fs::read(&b).unwrap();
        assert_eq!(bytes_a, bytes_b, "style {} not reproducible", style.name());
    }
}

#[test]
fn example_scenario_full_size_radar() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let theme = BrandTheme::default();
    let out = dir.path().join("out.png");
    let s = spec(
        "How to Find UK Government Tenders in 2026",
        "UK Procurement",
        &out,
        Some(42),
        Style::Radar,
    );
    let written = render_thumbnail(&s, &theme).unwrap();
    assert_eq!(written, out);

    let img = image::ImageReader::open(&out).unwrap().decode().unwrap();
    assert_eq!((img.width(), img.height()), (1200, 630));

    // repeat render is byte-identical
    let out2 = dir.path().join("out2.png");
    let s2 = ThumbnailSpec {
        output_path: out2.clone(),
        ..s
    };
    render_thumbnail(&s2, &theme).unwrap();
    assert_eq!(std::fs::read(&out).unwrap(), std::fs::read(&out2).unwrap());
}

#[test]
fn different_seeds_differ_but_stay_valid() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let theme = small_theme();
    let a = dir.path().join("s1.png");
    let b = dir.path().join("s2.png");
    render_thumbnail(&spec("Same Title", "Tag", &a, Some(1), Style::Scatter), &theme).unwrap();
    render_thumbnail(&spec("Same Title", "Tag", &b, Some(2), Style::Scatter), &theme).unwrap();

    let img_a = image::ImageReader::open(&a).unwrap().decode().unwrap().to_rgb8();
    let img_b = image::ImageReader::open(&b).unwrap().decode().unwrap().to_rgb8();
    assert_eq!(img_a.dimensions(), img_b.dimensions());
    assert!(
        img_a.pixels().zip(img_b.pixels()).any(|(p, q)| p != q),
        "seed change must move at least one pixel"
    );
}

#[test]
fn single_character_title_renders() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let theme = small_theme();
    let out = dir.path().join("single.png");
    render_thumbnail(&spec("A", "Tag", &out, None, Style::Waves), &theme).unwrap();
    let img = image::ImageReader::open(&out).unwrap().decode().unwrap();
    assert_eq!((img.width(), img.height()), (300, 158));
}

#[test]
fn missing_fonts_fall_back_without_error() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    // point the theme at a fonts directory that cannot exist
    let theme = BrandTheme {
        fonts_dir: dir.path().join("no-such-fonts"),
        ..small_theme()
    };
    let out = dir.path().join("fallback.png");
    render_thumbnail(&spec("Fallback Face", "Tag", &out, Some(3), Style::Mesh), &theme).unwrap();
    assert!(image::ImageReader::open(&out).unwrap().decode().is_ok());
}

#[test]
fn rerender_overwrites_cleanly() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let theme = small_theme();
    let out = dir.path().join("same.png");

    render_thumbnail(&spec("First Pass", "Tag", &out, Some(5), Style::Radar), &theme).unwrap();
    render_thumbnail(&spec("Second Pass", "Tag", &out, Some(9), Style::Scatter), &theme).unwrap();

    // the overwrite leaves exactly what a fresh render would produce
    let fresh = dir.path().join("fresh.png");
    render_thumbnail(&spec("Second Pass", "Tag", &fresh, Some(9), Style::Scatter), &theme).unwrap();
    assert_eq!(std::fs::read(&out).unwrap(), std::fs::read(&fresh).unwrap());

    // and no temporary artifact survives
    assert!(!dir.path().join("same.png.tmp").exists());
}

#[test]
fn parent_directories_are_created() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let theme = small_theme();
    let out = dir.path().join("a/b/c/deep.png");
    render_thumbnail(&spec("Nested Output", "Tag", &out, None, Style::Waves), &theme).unwrap();
    assert!(out.exists());
}

#[test]
fn dumped_theme_file_loads_and_renders() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let theme_path = dir.path().join("brand.json");
    std::fs::write(&theme_path, serde_json::to_string(&small_theme()).unwrap()).unwrap();

    let theme = BrandTheme::from_json_file(&theme_path).unwrap();
    assert_eq!((theme.width, theme.height), (300, 158));

    let out = dir.path().join("themed.png");
    render_thumbnail(&spec("Scaffolded Theme", "Tag", &out, None, Style::Waves), &theme).unwrap();
    assert!(out.exists());
}

#[test]
fn blank_title_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let theme = small_theme();
    let out = dir.path().join("never.png");
    let err = render_thumbnail(&spec("  ", "Tag", &out, None, Style::Radar), &theme).unwrap_err();
    assert!(err.to_string().contains("title"));
    assert!(!out.exists());
}

#[test]
fn unwritable_output_path_is_fatal_and_leaves_nothing() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let theme = small_theme();
    // a directory where the file should go
    let out = dir.path().join("occupied.png");
    std::fs::create_dir(&out).unwrap();
    let result = render_thumbnail(&spec("Doomed", "Tag", &out, None, Style::Scatter), &theme);
    assert!(result.is_err());
    let tmp = dir.path().join("occupied.png.tmp");
    assert!(!tmp.exists(), "temporary file must not be left behind");
}
