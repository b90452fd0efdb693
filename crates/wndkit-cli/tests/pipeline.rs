//! File-level end-to-end tests for the generate and update flows.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use wndkit_cli::cli::{GenerateArgs, UpdateArgs};
use wndkit_cli::commands::{run_generate, run_update};
use wndkit_model::WarningKind;

const WND: &str = concat!(
    "WINDOW\n",
    "  SCREENRECT = UPPERLEFT: 0 0, BOTTOMRIGHT: 800 600, CREATIONRESOLUTION: 800 600;\n",
    "  NAME = \"Panel.wnd:Parent\";\n",
    "  ENABLEDDRAWDATA = IMAGE: PanelBase, COLOR: 0 0 0 255;\n",
    "  CHILD\n",
    "  WINDOW\n",
    "    SCREENRECT = UPPERLEFT: 50 50, BOTTOMRIGHT: 66 66, CREATIONRESOLUTION: 800 600;\n",
    "    NAME = \"Panel.wnd:Button\";\n",
    "  END\n",
    "  ENDALLCHILDREN\n",
    "END\n",
);

const TABLE: &str = concat!(
    "MappedImage PanelBase\n",
    "  Texture = sacommandbar.tga\n",
    "  TextureWidth = 1024\n",
    "  TextureHeight = 256\n",
    "  Coords = Left:0 Top:64 Right:799 Bottom:255\n",
    "End\n",
);

fn generate_args(descriptor: PathBuf) -> GenerateArgs {
    GenerateArgs {
        descriptor,
        scheme: None,
        atlas_dirs: Vec::new(),
        atlas_files: Vec::new(),
        svg: None,
        canvas: None,
        json: false,
    }
}

fn update_args(descriptor: PathBuf) -> UpdateArgs {
    UpdateArgs {
        descriptor,
        scheme: None,
        svg: None,
        output: None,
        write_new: false,
        json: false,
    }
}

#[test]
fn generate_then_unedited_update_is_lossless() {
    let dir = TempDir::new().unwrap();
    let wnd = dir.path().join("Panel.wnd");
    fs::write(&wnd, WND).unwrap();
    fs::create_dir(dir.path().join("MappedImages")).unwrap();
    fs::write(dir.path().join("MappedImages/panel.ini"), TABLE).unwrap();

    let generated = run_generate(&generate_args(wnd.clone())).unwrap();
    assert_eq!(generated.shapes, 2);
    assert!(generated.report.is_empty());
    assert!(generated.output.exists());

    let updated = run_update(&update_args(wnd.clone())).unwrap();
    assert_eq!(updated.shapes, 2);
    assert_eq!(fs::read_to_string(&wnd).unwrap(), WND);
}

#[test]
fn tables_outside_conventional_directories_are_invisible() {
    let dir = TempDir::new().unwrap();
    let wnd = dir.path().join("Panel.wnd");
    fs::write(&wnd, WND).unwrap();
    // The table exists, but under a directory name outside the search
    // scope.
    let art = dir.path().join("Art");
    fs::create_dir(&art).unwrap();
    fs::write(art.join("panel.ini"), TABLE).unwrap();

    let mut args = generate_args(wnd);
    args.atlas_dirs = vec![art];
    let generated = run_generate(&args).unwrap();
    assert_eq!(
        generated.report.count_of(WarningKind::UnresolvedImageReference),
        1
    );
}

#[test]
fn explicit_atlas_files_are_always_in_scope() {
    let dir = TempDir::new().unwrap();
    let wnd = dir.path().join("Panel.wnd");
    fs::write(&wnd, WND).unwrap();
    let table = dir.path().join("HandCreatedMappedImages.txt");
    fs::write(&table, TABLE).unwrap();

    let mut args = generate_args(wnd);
    args.atlas_files = vec![table];
    let generated = run_generate(&args).unwrap();
    assert!(generated.report.is_empty());
}

#[test]
fn write_new_never_touches_the_source() {
    let dir = TempDir::new().unwrap();
    let wnd = dir.path().join("Panel.wnd");
    fs::write(&wnd, WND).unwrap();
    run_generate(&generate_args(wnd.clone())).unwrap();

    // Move the button in the drawing.
    let svg_path = dir.path().join("Panel.svg");
    let svg = fs::read_to_string(&svg_path).unwrap();
    fs::write(&svg_path, svg.replace("x=\"50\"", "x=\"120\"")).unwrap();

    let mut args = update_args(wnd.clone());
    args.write_new = true;
    let updated = run_update(&args).unwrap();

    assert_eq!(updated.output, dir.path().join("Panel_NEW.wnd"));
    assert_eq!(fs::read_to_string(&wnd).unwrap(), WND);
    let new_text = fs::read_to_string(updated.output).unwrap();
    assert!(new_text.contains("UPPERLEFT: 120 50, BOTTOMRIGHT: 136 66"));
}

#[test]
fn desynchronized_drawing_fails_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let wnd = dir.path().join("Panel.wnd");
    fs::write(&wnd, WND).unwrap();
    run_generate(&generate_args(wnd.clone())).unwrap();

    // A different descriptor now claims the drawing.
    let other = dir.path().join("Other.wnd");
    fs::write(&other, WND.replace("Panel.wnd:", "Other.wnd:")).unwrap();
    let before = fs::read_to_string(&other).unwrap();

    let mut args = update_args(other.clone());
    args.svg = Some(dir.path().join("Panel.svg"));
    let error = run_update(&args).unwrap_err();
    assert!(error.to_string().contains("unknown target"));
    assert_eq!(fs::read_to_string(&other).unwrap(), before);
}

#[test]
fn scheme_sections_round_trip_through_files() {
    let scheme_text = concat!(
        "ControlBarScheme GLA8x6\n",
        "  ScreenCreationRes X:800 Y:600\n",
        "  ImagePart\n",
        "    Position X:0 Y:408\n",
        "    Size X:800 Y:191\n",
        "    ImageName PanelBase\n",
        "  End\n",
        "  MoneyUL X:50 Y:50\n",
        "  MoneyLR X:66 Y:66\n",
        "End\n",
    );
    let dir = TempDir::new().unwrap();
    let ini = dir.path().join("ControlBarScheme.ini");
    fs::write(&ini, scheme_text).unwrap();

    let mut args = generate_args(ini.clone());
    args.scheme = Some("GLA8x6".to_string());
    args.svg = Some(dir.path().join("GLA8x6_scheme.svg"));
    let generated = run_generate(&args).unwrap();
    assert_eq!(generated.shapes, 2);

    let mut update = update_args(ini.clone());
    update.scheme = Some("GLA8x6".to_string());
    update.svg = Some(dir.path().join("GLA8x6_scheme.svg"));
    run_update(&update).unwrap();
    assert_eq!(fs::read_to_string(&ini).unwrap(), scheme_text);
}

#[test]
fn missing_descriptor_without_write_new_is_an_error() {
    let dir = TempDir::new().unwrap();
    let wnd = dir.path().join("Panel.wnd");
    fs::write(&wnd, WND).unwrap();
    run_generate(&generate_args(wnd.clone())).unwrap();
    fs::remove_file(&wnd).unwrap();

    let mut args = update_args(wnd.clone());
    args.svg = Some(dir.path().join("Panel.svg"));
    assert!(run_update(&args).is_err());

    // With --write-new the drawing alone is enough.
    args.write_new = true;
    let updated = run_update(&args).unwrap();
    assert_eq!(updated.shapes, 2);
    let text = fs::read_to_string(updated.output).unwrap();
    assert!(text.contains("NAME = \"Panel.wnd:Button\";"));
    assert!(text.contains("UPPERLEFT: 50 50,"));
}
