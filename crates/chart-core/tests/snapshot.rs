// File: crates/chart-core/tests/snapshot.rs
// Purpose: Golden snapshot harness with bless flow.
// Behavior:
// - Renders a deterministic small chart to PNG bytes.
// - If env UPDATE_SNAPSHOTS=1, (re)writes the snapshot file.
// - Else, if snapshot exists, compares decoded pixels for exact match.
// - Always checks the frame decodes at the requested size and renders deterministically;
//   a missing golden only skips the byte-level comparison.

use chart_core::series::{Bar, Series};
use chart_core::{BarSelectionListener, ChartController, Gesture, RenderOptions, TimeFrame};

struct Ignore;

impl BarSelectionListener for Ignore {
    fn on_bar_selected(&mut self, _selection: Option<(usize, Bar)>) {}
}

fn bless_mode() -> bool {
    std::env::var("UPDATE_SNAPSHOTS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false)
}

fn write_or_compare(path: &std::path::Path, bytes: &[u8]) {
    let img = image::load_from_memory(bytes).expect("decode png").to_rgba8();
    assert_eq!((img.width(), img.height()), (WIDTH as u32, HEIGHT as u32));
    if bless_mode() {
        if let Some(parent) = path.parent() { std::fs::create_dir_all(parent).ok(); }
        std::fs::write(path, bytes).expect("write snapshot");
        eprintln!("[snapshot] Updated {} ({} bytes)", path.display(), bytes.len());
        return;
    }
    if path.exists() {
        let want = std::fs::read(path).expect("read snapshot");
        let got_img = image::load_from_memory(bytes).expect("decode got").to_rgba8();
        let want_img = image::load_from_memory(&want).expect("decode want").to_rgba8();
        assert_eq!(got_img.as_raw(), want_img.as_raw(), "Pixels differ: {}", path.display());
    } else {
        eprintln!("[snapshot] Missing {}; set UPDATE_SNAPSHOTS=1 to bless.", path.display());
    }
}

fn hourly(n: usize) -> Series {
    // 2023-01-09 02:00 UTC, stepping back one hour per bar
    let newest = 1_673_229_600_000i64;
    let bars = (0..n)
        .map(|i| {
            let p = 50.0 + ((i * 7) % 11) as f64;
            let (o, c) = if i % 3 == 0 { (p + 1.0, p - 0.5) } else { (p - 0.5, p + 1.0) };
            Bar { open: o, close: c, low: p - 2.0, high: p + 2.0, time: newest - i as i64 * 3_600_000 }
        })
        .collect();
    Series::from_newest_first(bars)
}

const WIDTH: i32 = 480;
const HEIGHT: i32 = 320;

fn render(gestures: &[Gesture]) -> Vec<u8> {
    let mut opts = RenderOptions::default();
    opts.width = WIDTH;
    opts.height = HEIGHT;
    opts.draw_labels = false; // deterministic
    let plot = opts.plot_rect();
    let mut c = ChartController::new(hourly(120), TimeFrame::Hour1, plot.width(), plot.height());
    for g in gestures {
        c.apply(*g, &mut Ignore);
    }
    c.chart().render_to_png_bytes(&opts).expect("render bytes")
}

#[test]
fn golden_candles_default_view() {
    let bytes = render(&[]);
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/__snapshots__/candles_default.png");
    write_or_compare(&path, &bytes);
}

#[test]
fn golden_candles_zoomed_panned_selected() {
    let bytes = render(&[
        Gesture::Transform { zoom: 2.5, pan_x: 120.0 },
        Gesture::Tap { x: 300.0 },
    ]);
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/__snapshots__/candles_zoomed.png");
    write_or_compare(&path, &bytes);
}

fn pixels(bytes: &[u8]) -> Vec<u8> {
    image::load_from_memory(bytes).expect("decode png").to_rgba8().into_raw()
}

#[test]
fn rendering_is_deterministic() {
    let gestures = [Gesture::Transform { zoom: 1.7, pan_x: 55.0 }, Gesture::Tap { x: 240.0 }];
    assert_eq!(pixels(&render(&gestures)), pixels(&render(&gestures)));
}

#[test]
fn gestures_change_the_frame() {
    let base = pixels(&render(&[]));
    let zoomed = pixels(&render(&[Gesture::Transform { zoom: 2.5, pan_x: 120.0 }]));
    assert_ne!(base, zoomed);
}
