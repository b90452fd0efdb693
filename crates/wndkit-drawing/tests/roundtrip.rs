//! Emit → import → merge cycles over real descriptors.

use wndkit_atlas::{AtlasRegistry, TableScope};
use wndkit_drawing::{emit, import};
use wndkit_ingest::{SchemeDocument, WndDocument};
use wndkit_model::{Canvas, LayoutDescriptor as _, Rect, WarningKind};
use wndkit_transform::{MergeMode, merge};

const WND: &str = concat!(
    "WINDOW\n",
    "  SCREENRECT = UPPERLEFT: 0 0, BOTTOMRIGHT: 800 600, CREATIONRESOLUTION: 800 600;\n",
    "  NAME = \"Bar.wnd:Parent\";\n",
    "  ENABLEDDRAWDATA = IMAGE: SCExit, COLOR: 0 0 0 255;\n",
    "  CHILD\n",
    "  WINDOW\n",
    "    SCREENRECT = UPPERLEFT: 70 50, BOTTOMRIGHT: 86 66, CREATIONRESOLUTION: 800 600;\n",
    "    NAME = \"Bar.wnd:ButtonTwo\";\n",
    "  END\n",
    "  ENDALLCHILDREN\n",
    "END\n",
);

const SCHEME: &str = concat!(
    "ControlBarScheme USA\n",
    "  ScreenCreationRes X:800 Y:600\n",
    "  ImagePart\n",
    "    Position X:0 Y:408\n",
    "    Size X:800 Y:191\n",
    "    ImageName SCExit\n",
    "  End\n",
    "  MoneyUL X:50 Y:50\n",
    "  MoneyLR X:66 Y:66\n",
    "  MoneyButtonEnable SCExit\n",
    "  MoneyButtonPushed SCPushed\n",
    "End\n",
);

fn atlas() -> AtlasRegistry {
    let mut registry = AtlasRegistry::new();
    registry.load_table(
        &TableScope::Explicit,
        "test.ini",
        concat!(
            "MappedImage SCExit\n",
            "  Texture = sacommandbar.tga\n",
            "  Coords = Left:0 Top:123 Right:799 Bottom:1023\n",
            "End\n",
            "MappedImage SCPushed\n",
            "  Texture = sacommandbar.tga\n",
            "  Coords = Left:0 Top:0 Right:32 Bottom:32\n",
            "End\n",
        ),
    );
    registry
}

#[test]
fn emission_is_deterministic() {
    let doc = WndDocument::parse(WND).unwrap();
    let atlas = atlas();
    let first = emit(&doc.emit_source(), &atlas, None).unwrap();
    let second = emit(&doc.emit_source(), &atlas, None).unwrap();
    assert_eq!(first.svg, second.svg);
    assert!(first.report.is_empty());
}

#[test]
fn unedited_cycle_reproduces_the_descriptor_byte_for_byte() {
    let doc = WndDocument::parse(WND).unwrap();
    let emitted = emit(&doc.emit_source(), &atlas(), None).unwrap();

    let imported = import(&emitted.svg).unwrap();
    assert_eq!(imported.updates.len(), 2);
    assert!(!imported.canvas_resized());
    assert_eq!(imported.report.count_of(WarningKind::CanvasResized), 0);

    let outcome = merge(Some(doc), &imported, MergeMode::Update).unwrap();
    assert!(outcome.canvas_resized.is_none());
    assert_eq!(outcome.document.serialize(), WND);
}

#[test]
fn unresolved_references_still_emit_every_shape() {
    let doc = WndDocument::parse(WND).unwrap();
    let empty = AtlasRegistry::new();
    let emitted = emit(&doc.emit_source(), &empty, None).unwrap();

    assert_eq!(
        emitted.report.count_of(WarningKind::UnresolvedImageReference),
        1
    );
    // The drawing is still complete: one shape per element.
    let imported = import(&emitted.svg).unwrap();
    assert_eq!(imported.updates.len(), 2);
}

#[test]
fn canvas_override_reaches_the_reference_resolution_on_merge() {
    let doc = WndDocument::parse(WND).unwrap();
    let emitted = emit(&doc.emit_source(), &atlas(), Some(Canvas::new(1920, 1080))).unwrap();

    let imported = import(&emitted.svg).unwrap();
    assert_eq!(imported.canvas, Canvas::new(1920, 1080));
    // The drawing was born at this size; only the merge sees a change.
    assert!(!imported.canvas_resized());

    let outcome = merge(Some(doc), &imported, MergeMode::Update).unwrap();
    assert_eq!(
        outcome.canvas_resized,
        Some((Canvas::new(800, 600), Canvas::new(1920, 1080)))
    );
    assert_eq!(outcome.document.resolution(), Canvas::new(1920, 1080));
    assert!(
        outcome
            .document
            .serialize()
            .contains("CREATIONRESOLUTION: 1920 1080")
    );
}

#[test]
fn scheme_shapes_are_anchored_to_the_image_part() {
    let doc = SchemeDocument::parse(SCHEME, "USA").unwrap();
    let emitted = emit(&doc.emit_source(), &atlas(), None).unwrap();

    let imported = import(&emitted.svg).unwrap();
    let money = imported
        .updates
        .iter()
        .find(|u| u.name == "Money")
        .expect("money shape");
    // Descriptor (50, 50) minus anchor (0, 408).
    assert_eq!(money.rect, Rect::new(50, -358, 16, 16));

    // Re-importing the unmodified drawing restores the original text.
    let outcome = merge(Some(doc), &imported, MergeMode::Update).unwrap();
    assert_eq!(outcome.document.serialize(), SCHEME);
}

#[test]
fn button_states_ride_along_as_hidden_decorations() {
    let doc = SchemeDocument::parse(SCHEME, "USA").unwrap();
    let emitted = emit(&doc.emit_source(), &atlas(), None).unwrap();
    assert_eq!(emitted.svg.matches("visibility=\"visible\"").count(), 1);
    assert_eq!(emitted.svg.matches("visibility=\"hidden\"").count(), 1);
    assert!(emitted.svg.contains("data-wnd-texture=\"sacommandbar.tga\""));
    assert!(emitted.svg.contains("data-wnd-atlas=\"0 123 799 1023\""));
}

#[test]
fn a_hand_edit_flows_back_into_the_descriptor() {
    let doc = WndDocument::parse(WND).unwrap();
    let emitted = emit(&doc.emit_source(), &atlas(), None).unwrap();

    // Drag ButtonTwo to x=200 in the editor.
    assert_eq!(emitted.svg.matches("x=\"70\"").count(), 1);
    let edited = emitted.svg.replace("x=\"70\"", "x=\"200\"");

    let imported = import(&edited).unwrap();
    let outcome = merge(Some(doc), &imported, MergeMode::Update).unwrap();
    let out = outcome.document.serialize();
    assert!(out.contains("UPPERLEFT: 200 50, BOTTOMRIGHT: 216 66"));
    // The parent is untouched.
    assert!(out.contains("UPPERLEFT: 0 0, BOTTOMRIGHT: 800 600"));
}

#[test]
fn stray_shapes_are_annotation_not_layout() {
    let doc = WndDocument::parse(WND).unwrap();
    let emitted = emit(&doc.emit_source(), &atlas(), None).unwrap();
    let edited = emitted.svg.replace(
        "</svg>",
        "<rect x=\"1\" y=\"2\" width=\"3\" height=\"4\"/></svg>",
    );

    let imported = import(&edited).unwrap();
    assert_eq!(imported.updates.len(), 2);
    assert_eq!(imported.report.count_of(WarningKind::UnlinkedShape), 1);

    // The stray shape does not disturb the merge.
    let outcome = merge(Some(doc), &imported, MergeMode::Update).unwrap();
    assert_eq!(outcome.document.serialize(), WND);
}

#[test]
fn a_resized_drawing_is_surfaced_not_rescaled() {
    let doc = WndDocument::parse(WND).unwrap();
    let emitted = emit(&doc.emit_source(), &atlas(), None).unwrap();
    let resized = emitted
        .svg
        .replace("width=\"800\" height=\"600\"", "width=\"1920\" height=\"1080\"");

    let imported = import(&resized).unwrap();
    assert!(imported.canvas_resized());
    assert_eq!(imported.report.count_of(WarningKind::CanvasResized), 1);
    // Shape geometry is untouched by the resize.
    assert_eq!(imported.updates[1].rect, Rect::new(70, 50, 16, 16));

    let outcome = merge(Some(doc), &imported, MergeMode::Update).unwrap();
    assert_eq!(
        outcome.canvas_resized,
        Some((Canvas::new(800, 600), Canvas::new(1920, 1080)))
    );
}

#[test]
fn view_box_is_a_canvas_fallback() {
    let svg = concat!(
        "<svg viewBox=\"0 0 1024 768\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        "  <rect x=\"1\" y=\"2\" width=\"3\" height=\"4\"/>\n",
        "</svg>\n",
    );
    let imported = import(svg).unwrap();
    assert_eq!(imported.canvas, Canvas::new(1024, 768));
    assert_eq!(imported.updates.len(), 0);
    assert_eq!(imported.report.count_of(WarningKind::UnlinkedShape), 1);
}

#[test]
fn px_suffixed_dimensions_parse() {
    let svg = concat!(
        "<svg width=\"800px\" height=\"600px\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        "</svg>\n",
    );
    let imported = import(svg).unwrap();
    assert_eq!(imported.canvas, Canvas::new(800, 600));
}

#[test]
fn a_drawing_without_any_canvas_is_rejected() {
    let svg = "<svg xmlns=\"http://www.w3.org/2000/svg\"></svg>";
    assert!(import(svg).is_err());
}
