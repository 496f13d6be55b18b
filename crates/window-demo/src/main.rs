// File: crates/window-demo/src/main.rs
// Summary: Windowed terminal screen: renders chart-core to a window via RGBA blit (CPU)
// using winit + softbuffer, with data loaded asynchronously through the view model.

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chart_core::{theme, ChartController, Gesture, RenderOptions, ScreenOverlay, Series, Status, TimeFrame};
use chrono::FixedOffset;
use clap::Parser;
use log::{debug, error, info};
use market_data::{BarSource, CsvBarSource, PolygonClient, Ticker};
use terminal_screen::{ScreenState, TerminalViewModel};
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, Event, KeyboardInput, MouseButton, MouseScrollDelta, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

/// Pointer travel (px) below which a press/release counts as a tap.
const TAP_SLOP: f64 = 4.0;
/// Poll interval while a fetch may be in flight.
const POLL_EVERY: Duration = Duration::from_millis(50);

#[derive(Parser, Debug)]
#[command(version, about = "Interactive candlestick terminal")]
struct Args {
    /// Time frame to show once the first symbol has loaded.
    #[arg(long, default_value = "1h")]
    timeframe: TimeFrame,
    /// Read `<SYMBOL>_<tf>.csv` files from this directory instead of the HTTP API.
    #[arg(long)]
    csv_dir: Option<PathBuf>,
    #[arg(long, default_value = "dark")]
    theme: String,
    /// Hours east of UTC used for delimiters and labels.
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    utc_offset: i32,
}

/// Which content the controller currently shows.
#[derive(Clone, Debug, PartialEq)]
struct Shown {
    ticker: Ticker,
    time_frame: TimeFrame,
    bars: usize,
}

/// Left-button press being tracked for drag vs tap.
struct Press {
    origin: PhysicalPosition<f64>,
    moved: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let offset = FixedOffset::east_opt(args.utc_offset * 3600)
        .with_context(|| format!("utc offset out of range: {}", args.utc_offset))?;
    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    let source: Arc<dyn BarSource> = match &args.csv_dir {
        Some(dir) => Arc::new(CsvBarSource::new(dir)),
        None => Arc::new(PolygonClient::from_env().context("creating API client")?),
    };
    let mut vm = TerminalViewModel::new(source, runtime.handle().clone());
    vm.load_tickers();
    // the first symbol always arrives at the default time frame
    let mut wanted_tf = (args.timeframe != TimeFrame::default()).then_some(args.timeframe);

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("Terminal")
        .with_inner_size(winit::dpi::LogicalSize::new(1024.0, 640.0))
        .build(&event_loop)
        .context("building window")?;

    // SAFETY: the window outlives both the context and the surface; all three move into the loop.
    let context = unsafe { softbuffer::Context::new(&window) }
        .map_err(|e| anyhow::anyhow!("softbuffer context: {e:?}"))?;
    let mut surface = unsafe { softbuffer::Surface::new(&context, &window) }
        .map_err(|e| anyhow::anyhow!("softbuffer surface: {e:?}"))?;

    let mut opts = RenderOptions {
        theme: theme::find(&args.theme),
        utc_offset: offset,
        ..RenderOptions::default()
    };
    let size = window.inner_size();
    opts.width = size.width.max(1) as i32;
    opts.height = size.height.max(1) as i32;
    let plot = opts.plot_rect();
    let mut controller = ChartController::new(Series::empty(), args.timeframe, plot.width(), plot.height());

    let mut shown: Option<Shown> = None;
    let mut cursor = PhysicalPosition::new(0.0, 0.0);
    let mut press: Option<Press> = None;
    let started = Instant::now();

    event_loop.run(move |event, _, cf| {
        // keep the runtime alive for the lifetime of the loop
        let _ = &runtime;
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => *cf = ControlFlow::Exit,
                WindowEvent::Resized(new_size) => {
                    opts.width = new_size.width.max(1) as i32;
                    opts.height = new_size.height.max(1) as i32;
                    let plot = opts.plot_rect();
                    if controller.apply(Gesture::Resize { width: plot.width(), height: plot.height() }, &mut vm) {
                        window.request_redraw();
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    if let Some(p) = press.as_mut() {
                        let dx = position.x - cursor.x;
                        p.moved = p.moved.max((position.x - p.origin.x).abs());
                        if controller.apply(Gesture::Transform { zoom: 1.0, pan_x: dx as f32 }, &mut vm) {
                            window.request_redraw();
                        }
                    }
                    cursor = position;
                }
                WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => match state {
                    ElementState::Pressed => press = Some(Press { origin: cursor, moved: 0.0 }),
                    ElementState::Released => {
                        if let Some(p) = press.take() {
                            let plot = opts.plot_rect();
                            let (x, y) = (cursor.x as f32, cursor.y as f32);
                            // a drag was already applied as pan
                            if p.moved < TAP_SLOP {
                                if let Some(tf) = ScreenOverlay::chip_at(x, y) {
                                    if select_time_frame(&mut vm, tf) {
                                        window.request_redraw();
                                    }
                                } else if plot.contains(x, y) {
                                    let (local_x, _) = plot.to_local(x, y);
                                    controller.apply(Gesture::Tap { x: local_x }, &mut vm);
                                    window.request_redraw();
                                }
                            }
                        }
                    }
                },
                WindowEvent::MouseWheel { delta, .. } => {
                    let zoom = match delta {
                        MouseScrollDelta::LineDelta(_, y) => 1.1f32.powf(y),
                        MouseScrollDelta::PixelDelta(p) => (1.0 + p.y / 240.0).max(0.1) as f32,
                    };
                    if controller.apply(Gesture::Transform { zoom, pan_x: 0.0 }, &mut vm) {
                        window.request_redraw();
                    }
                }
                WindowEvent::KeyboardInput {
                    input: KeyboardInput { state: ElementState::Pressed, virtual_keycode: Some(key), .. },
                    ..
                } => {
                    if handle_key(key, &mut vm, &mut controller) {
                        window.request_redraw();
                    }
                }
                _ => {}
            },
            Event::MainEventsCleared => {
                if vm.poll() {
                    sync_controller(&vm, &mut controller, &mut shown);
                    let first = vm.state().content().map(|c| c.current_ticker.clone());
                    if let (Some(ticker), Some(tf)) = (first, wanted_tf) {
                        wanted_tf = None;
                        vm.load_content(ticker, tf);
                    }
                    window.request_redraw();
                }
                *cf = match vm.state() {
                    ScreenState::Content(_) => ControlFlow::Wait,
                    _ => {
                        // keeps the spinner turning
                        window.request_redraw();
                        ControlFlow::WaitUntil(Instant::now() + POLL_EVERY)
                    }
                };
            }
            Event::RedrawRequested(_) => {
                window.set_title(&title(&vm));
                let overlay = screen_overlay(&vm, &controller, &opts.utc_offset, started.elapsed());
                if let Err(e) = draw(&mut surface, &controller, &overlay, &opts) {
                    error!("draw failed: {e:#}");
                }
            }
            _ => {}
        }
    })
}

/// `1`-`4` pick the time frame, `Tab` cycles the symbol, `Esc` clears the info panel.
fn handle_key(key: VirtualKeyCode, vm: &mut TerminalViewModel, controller: &mut ChartController) -> bool {
    let Some(content) = vm.state().content() else { return false };
    let (ticker, tf) = (content.current_ticker.clone(), content.time_frame);
    match key {
        VirtualKeyCode::Key1 | VirtualKeyCode::Key2 | VirtualKeyCode::Key3 | VirtualKeyCode::Key4 => {
            let slot = match key {
                VirtualKeyCode::Key1 => 0,
                VirtualKeyCode::Key2 => 1,
                VirtualKeyCode::Key3 => 2,
                _ => 3,
            };
            select_time_frame(vm, TimeFrame::ALL[slot])
        }
        VirtualKeyCode::Tab => {
            let tickers = &content.tickers;
            let at = tickers.iter().position(|t| *t == ticker).unwrap_or(0);
            match tickers.get((at + 1) % tickers.len().max(1)).cloned() {
                Some(next) if next != ticker => vm.load_content(next, tf),
                _ => false,
            }
        }
        VirtualKeyCode::Escape => {
            controller.clear_selection();
            vm.show_bar_info(None);
            true
        }
        _ => false,
    }
}

/// Push freshly loaded bars into the controller; a reverted load leaves the view untouched.
fn sync_controller(vm: &TerminalViewModel, controller: &mut ChartController, shown: &mut Option<Shown>) {
    let Some(content) = vm.state().content() else { return };
    let now = Shown {
        ticker: content.current_ticker.clone(),
        time_frame: content.time_frame,
        bars: content.bars.len(),
    };
    if shown.as_ref() == Some(&now) {
        return;
    }
    info!("showing {} @ {} ({} bars)", now.ticker.id, now.time_frame, now.bars);
    controller.replace_series(content.bars.clone(), content.time_frame);
    *shown = Some(now);
}

/// Reload the current symbol at `tf`; no-op when it is already shown.
fn select_time_frame(vm: &mut TerminalViewModel, tf: TimeFrame) -> bool {
    let Some(content) = vm.state().content() else { return false };
    if content.time_frame == tf {
        return false;
    }
    let ticker = content.current_ticker.clone();
    vm.load_content(ticker, tf)
}

fn title(vm: &TerminalViewModel) -> String {
    match vm.state().content() {
        Some(c) => format!("{} - {}", c.current_ticker, c.time_frame.label()),
        None => "Terminal".to_string(),
    }
}

/// Chips, tapped-bar panel and load status for the current screen state.
fn screen_overlay(vm: &TerminalViewModel, controller: &ChartController, offset: &FixedOffset, uptime: Duration) -> ScreenOverlay {
    const ROWS: [&str; 6] = ["index", "open", "close", "high", "low", "date"];
    let mut o = ScreenOverlay::new(controller.time_frame());
    if let Some(info) = vm.state().content().and_then(|c| c.bar_for_info) {
        o.info = ROWS.iter().map(|r| r.to_string()).zip(info.lines(offset)).collect();
    }
    o.status = match (vm.state(), vm.last_error()) {
        (ScreenState::Loading, _) | (ScreenState::Initial, None) => Status::Loading { phase: uptime.as_secs_f32() },
        (_, Some(e)) => Status::Error(e.to_string()),
        (ScreenState::Content(_), None) => Status::Idle,
    };
    o
}

fn draw(
    surface: &mut softbuffer::Surface,
    controller: &ChartController,
    overlay: &ScreenOverlay,
    opts: &RenderOptions,
) -> Result<()> {
    let (w, h) = (opts.width.max(1) as u32, opts.height.max(1) as u32);
    let (nw, nh) = NonZeroU32::new(w).zip(NonZeroU32::new(h)).context("zero-sized window")?;
    surface.resize(nw, nh).map_err(|e| anyhow::anyhow!("resize: {e:?}"))?;

    let (rgba, _, _, _) = controller.chart().with_overlay(overlay).render_to_rgba8(opts)?;
    let mut frame = surface.buffer_mut().map_err(|e| anyhow::anyhow!("buffer: {e:?}"))?;
    // softbuffer expects 0RGB
    for (dst, px) in frame.iter_mut().zip(rgba.chunks_exact(4)) {
        *dst = (u32::from(px[0]) << 16) | (u32::from(px[1]) << 8) | u32::from(px[2]);
    }
    frame.present().map_err(|e| anyhow::anyhow!("present: {e:?}"))?;
    debug!("frame {w}x{h}");
    Ok(())
}
