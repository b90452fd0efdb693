//! Round-trip tests for the WND parser against realistic layout files.

use proptest::prelude::{prop_assert_eq, proptest};

use wndkit_ingest::{ElementKind, IngestError, WndDocument};
use wndkit_model::{Canvas, LayoutDescriptor as _, Rect};

/// A cut-down but structurally faithful WND file: header block,
/// comments, nested children, multi-line statements, unknown fields.
const FIXTURE: &str = concat!(
    "; FILE: GenPowersShortcutBar.wnd\n",
    "; Edited with care\n",
    "\n",
    "FILE_VERSION = 2;\n",
    "\n",
    "STARTLAYOUTBLOCK\n",
    "  LAYOUTINIT = [None];\n",
    "  LAYOUTUPDATE = [None];\n",
    "ENDLAYOUTBLOCK\n",
    "\n",
    "WINDOW WINDOWTYPE = USER;\n",
    "  SCREENRECT = UPPERLEFT: 0 0,\n",
    "               BOTTOMRIGHT: 800 600,\n",
    "               CREATIONRESOLUTION: 800 600;\n",
    "  NAME = \"GenPowersShortcutBar.wnd:ParentShortcutBar\";\n",
    "  STATUS = ENABLED+IMAGE;\n",
    "  STYLE = USER+MOUSETRACK;\n",
    "  SYSTEMCALLBACK = \"[None]\";\n",
    "  ENABLEDDRAWDATA = IMAGE: NoImage, COLOR: 255 0 255 255, BORDERCOLOR: 128 128 128 255,\n",
    "                    IMAGE: GenPowersShortcutBarUS, COLOR: 255 255 255 0, BORDERCOLOR: 255 255 255 0;\n",
    "  CHILD\n",
    "  WINDOW WINDOWTYPE = PUSHBUTTON;\n",
    "    SCREENRECT = UPPERLEFT: 22 33,\n",
    "                 BOTTOMRIGHT: 54 65,\n",
    "                 CREATIONRESOLUTION: 800 600;\n",
    "    NAME = \"GenPowersShortcutBar.wnd:ButtonCommand01\";\n",
    "    STATUS = ENABLED;\n",
    "    ENABLEDDRAWDATA = IMAGE: NoImage, COLOR: 0 0 0 255;\n",
    "  END\n",
    "  ENDALLCHILDREN\n",
    "END\n",
);

#[test]
fn fixture_round_trips_byte_for_byte() {
    let doc = WndDocument::parse(FIXTURE).unwrap();
    assert_eq!(doc.serialize(), FIXTURE);
}

#[test]
fn fixture_models_both_elements() {
    let doc = WndDocument::parse(FIXTURE).unwrap();
    assert_eq!(doc.node_count(), 2);
    assert_eq!(doc.resolution(), Canvas::new(800, 600));

    let parent = &doc.elements()[0];
    assert_eq!(parent.name, "GenPowersShortcutBar.wnd:ParentShortcutBar");
    assert_eq!(parent.kind, ElementKind::Window);
    assert_eq!(parent.rect, Rect::new(0, 0, 800, 600));
    assert_eq!(parent.image.as_deref(), Some("GenPowersShortcutBarUS"));

    let child = &doc.elements()[1];
    assert_eq!(child.kind, ElementKind::Button);
    assert_eq!(child.rect, Rect::new(22, 33, 32, 32));
    assert_eq!(child.image, None);
}

#[test]
fn opaque_fields_survive_a_geometry_edit() {
    let mut doc = WndDocument::parse(FIXTURE).unwrap();
    doc.apply_rect(1, Rect::new(100, 200, 32, 32));
    let out = doc.serialize();

    assert!(out.contains("UPPERLEFT: 100 200,"));
    assert!(out.contains("BOTTOMRIGHT: 132 232,"));
    // Everything the parser does not understand is untouched.
    assert!(out.contains("; Edited with care\n"));
    assert!(out.contains("  STYLE = USER+MOUSETRACK;\n"));
    assert!(out.contains("  SYSTEMCALLBACK = \"[None]\";\n"));
    assert!(out.contains("BORDERCOLOR: 128 128 128 255,\n"));
    // The parent's geometry is untouched too.
    assert!(out.contains("  SCREENRECT = UPPERLEFT: 0 0,\n"));
}

#[test]
fn crlf_files_round_trip() {
    let input = "WINDOW\r\n  SCREENRECT = UPPERLEFT: 0 0, BOTTOMRIGHT: 10 10, CREATIONRESOLUTION: 800 600;\r\n  NAME = \"A\";\r\nEND\r\n";
    let doc = WndDocument::parse(input).unwrap();
    assert_eq!(doc.serialize(), input);
}

#[test]
fn file_without_trailing_newline_round_trips() {
    let input = "WINDOW\n  SCREENRECT = UPPERLEFT: 1 2, BOTTOMRIGHT: 3 4;\n  NAME = \"A\";\nEND";
    let doc = WndDocument::parse(input).unwrap();
    assert_eq!(doc.serialize(), input);
}

#[test]
fn truncated_file_is_rejected_with_its_line() {
    let input = "WINDOW\n  SCREENRECT = UPPERLEFT: 1 2, BOTTOMRIGHT: 3 4;\n  NAME = \"A\";\n";
    match WndDocument::parse(input) {
        Err(IngestError::MalformedDescriptor { line, .. }) => assert_eq!(line, 1),
        other => panic!("expected MalformedDescriptor, got {other:?}"),
    }
}

proptest! {
    /// Rewritten geometry survives a serialize/parse cycle exactly.
    #[test]
    fn applied_rects_round_trip(
        x in -2000i32..4000,
        y in -2000i32..4000,
        w in 0i32..4000,
        h in 0i32..4000,
    ) {
        let rect = Rect::new(x, y, w, h);
        let mut doc = WndDocument::parse(FIXTURE).unwrap();
        doc.apply_rect(0, rect);
        let text = doc.serialize();
        let again = WndDocument::parse(&text).unwrap();
        prop_assert_eq!(again.elements()[0].rect, rect);
        prop_assert_eq!(again.elements()[1].rect, Rect::new(22, 33, 32, 32));
    }
}
