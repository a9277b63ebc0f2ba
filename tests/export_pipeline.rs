use egui::{Color32, Pos2};
use futures::executor::block_on;
use freehand_canvas::export::PNG_MIME_TYPE;
use freehand_canvas::{
    BackgroundImage, CanvasConfig, Command, DrawingSession, DrawingState, ExportError,
    ExportPipeline, PicturesDirSink,
};
use std::sync::Arc;

fn pipeline_into(dir: &std::path::Path) -> ExportPipeline {
    ExportPipeline::new(Arc::new(PicturesDirSink::new(dir)))
}

#[test]
fn test_empty_drawing_exports_opaque_white_file() {
    let dir = tempfile::tempdir().unwrap();
    let receipt = pipeline_into(dir.path())
        .export(&DrawingState::new(), 100, 100)
        .unwrap();

    assert!(receipt.file_name.starts_with("Drawing_"));
    assert!(receipt.file_name.ends_with(".png"));
    assert_eq!(PNG_MIME_TYPE, "image/png");

    let path = dir.path().join(&receipt.file_name);
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), receipt.byte_len);

    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (100, 100));
    assert!(decoded.pixels().all(|px| px.0 == [255, 255, 255, 255]));
}

#[test]
fn test_red_segment_export() {
    let state = editor_state_with_red_segment();
    let dir = tempfile::tempdir().unwrap();
    let receipt = pipeline_into(dir.path()).export(&state, 20, 10).unwrap();

    let decoded = image::open(dir.path().join(&receipt.file_name)).unwrap().to_rgba8();
    // Along the segment, away from the round caps' anti-aliased rim
    for x in 1..10 {
        assert_eq!(decoded.get_pixel(x, 0).0, [255, 0, 0, 255], "x = {}", x);
    }
    // Well below the 5px brush everything is white
    assert_eq!(decoded.get_pixel(5, 8).0, [255, 255, 255, 255]);
}

fn editor_state_with_red_segment() -> DrawingState {
    use freehand_canvas::editor;
    let state = editor::set_color(DrawingState::new(), Color32::RED);
    let state = editor::set_width(state, 5.0).unwrap();
    let state = editor::begin_stroke(state, Pos2::new(0.0, 0.0));
    let state = editor::extend_stroke(state, Pos2::new(10.0, 0.0));
    editor::end_stroke(state)
}

#[test]
fn test_background_is_stretched_under_strokes() {
    let background = BackgroundImage::from_rgba(1, 1, vec![0, 0, 255, 255]).unwrap();
    let session = DrawingSession::default();
    session.apply(Command::SetBackground(Some(background))).unwrap();
    session.apply(Command::SetColor(Color32::RED)).unwrap();
    session.apply(Command::BeginStroke(Pos2::new(0.0, 15.0))).unwrap();
    session.apply(Command::ExtendStroke(Pos2::new(30.0, 15.0))).unwrap();
    session.apply(Command::EndStroke).unwrap();

    let image = freehand_canvas::renderer::render(&session.snapshot(), 30, 30).unwrap();
    for (x, y) in [(2, 2), (29, 29)] {
        let px = image.pixel(x, y).unwrap();
        assert!(px.r() <= 1 && px.g() <= 1 && px.b() >= 254, "{:?}", px);
    }
    assert_eq!(image.pixel(15, 15), Some(Color32::RED));
}

#[test]
fn test_background_export_writes_into_configured_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = CanvasConfig {
        export_dir: Some(dir.path().join("exports")),
        file_prefix: "Sketch".to_string(),
        ..CanvasConfig::default()
    };
    let session = DrawingSession::new(config);

    let receipt = block_on(session.export_in_background(64, 48)).unwrap();
    assert!(receipt.file_name.starts_with("Sketch_"));
    assert_eq!((receipt.width, receipt.height), (64, 48));

    let decoded = image::open(dir.path().join("exports").join(&receipt.file_name)).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (64, 48));
}

#[test]
fn test_invalid_dimensions_write_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let result = pipeline_into(dir.path()).export(&DrawingState::new(), 0, 100);

    assert!(matches!(
        result,
        Err(ExportError::InvalidDimensions { width: 0, height: 100 })
    ));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
