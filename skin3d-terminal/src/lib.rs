/// Terminal front end: file loading, PNG export and the interactive preview
use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use image::RgbaImage;
use skin3d_core::{render, RenderConfig, SkinAsset};
use std::io::{stdout, Write};
use std::path::Path;
use std::time::{Duration, Instant};

pub mod config;
pub mod renderer;

pub use config::{Overrides, PoseFile, PreviewSettings};
pub use renderer::HalfBlockRenderer;

/// Which arm model to use for a skin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArmModel {
    #[default]
    Detect,
    Classic,
    Slim,
}

/// Load a skin (and optional cape) from PNG files.
pub fn load_skin(skin: &Path, cape: Option<&Path>, model: ArmModel) -> Result<SkinAsset> {
    let atlas = load_rgba(skin)?;
    let cape = cape.map(load_rgba).transpose()?;
    let asset = match model {
        ArmModel::Detect => SkinAsset::with_detected_model(atlas, cape),
        ArmModel::Classic => SkinAsset::new(atlas, cape, false),
        ArmModel::Slim => SkinAsset::new(atlas, cape, true),
    };
    tracing::info!(
        path = %skin.display(),
        slim = asset.is_slim(),
        cape = asset.cape().is_some(),
        "loaded skin"
    );
    Ok(asset)
}

fn load_rgba(path: &Path) -> Result<RgbaImage> {
    Ok(image::open(path)
        .with_context(|| format!("Failed to load image {}", path.display()))?
        .to_rgba8())
}

/// Render once and write a PNG.
pub fn render_to_file(skin: &SkinAsset, config: &RenderConfig, output: &Path) -> Result<()> {
    let result = render(skin, config).context("Failed to render skin")?;
    result
        .image
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    tracing::info!(
        path = %output.display(),
        width = result.image.width(),
        height = result.image.height(),
        quads = result.stats.drawn_quads,
        "wrote render"
    );
    Ok(())
}

/// Pose and toggles driven by key presses.
#[derive(Debug, Clone)]
pub struct PreviewState {
    pub config: RenderConfig,
    pub settings: PreviewSettings,
    pub spinning: bool,
    pub running: bool,
    /// The image needs re-rendering.
    pub dirty: bool,
}

impl PreviewState {
    pub fn new(config: RenderConfig, settings: PreviewSettings) -> Self {
        Self {
            config,
            settings,
            spinning: false,
            running: true,
            dirty: true,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        let step = self.settings.step;
        let config = &mut self.config;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
                return;
            }
            KeyCode::Char('w') | KeyCode::Up => config.vr += step,
            KeyCode::Char('s') | KeyCode::Down => config.vr -= step,
            KeyCode::Char('a') | KeyCode::Left => config.hr -= step,
            KeyCode::Char('d') | KeyCode::Right => config.hr += step,
            KeyCode::Char('h') => config.display_hair = !config.display_hair,
            KeyCode::Char('l') => config.display_second_layer = !config.display_second_layer,
            KeyCode::Char('c') => config.display_cape = !config.display_cape,
            KeyCode::Char('x') => config.antialias = !config.antialias,
            KeyCode::Char(' ') => {
                self.spinning = !self.spinning;
                return;
            }
            _ => return,
        }
        self.dirty = true;
    }

    /// Advance one frame.
    pub fn tick(&mut self) {
        if self.spinning {
            self.config.hr = (self.config.hr + self.settings.spin_speed).rem_euclid(360.0);
            self.dirty = true;
        }
    }
}

/// Main application struct for the interactive terminal preview
pub struct TerminalApp {
    skin: SkinAsset,
    state: PreviewState,
    renderer: HalfBlockRenderer,
    status: String,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(skin: SkinAsset, config: RenderConfig, settings: PreviewSettings) -> Result<Self> {
        let (width, height) = terminal::size().context("Failed to query terminal size")?;

        Ok(Self {
            skin,
            state: PreviewState::new(config, settings),
            renderer: HalfBlockRenderer::new(width as usize, height.saturating_sub(1) as usize),
            status: String::new(),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)
            .context("Failed to enter alternate screen")?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)
            .context("Failed to leave alternate screen")?;

        result
    }

    fn main_loop(&mut self) -> Result<()> {
        let target_frame_time = Duration::from_millis(1000 / u64::from(self.state.settings.fps.max(1)));

        while self.state.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.state.tick();

            if self.state.dirty {
                self.render()?;
                self.state.dirty = false;
            }

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press | KeyEventKind::Repeat,
                ..
            }) => self.state.handle_key(code),
            Event::Resize(width, height) => {
                self.renderer =
                    HalfBlockRenderer::new(width as usize, height.saturating_sub(1) as usize);
                self.state.dirty = true;
            }
            _ => {}
        }
    }

    fn render(&mut self) -> Result<()> {
        let started = Instant::now();
        match render(&self.skin, &self.state.config) {
            Ok(result) => {
                self.renderer.blit(&result.image);
                self.status = format!(
                    "{}x{} in {:.1} ms",
                    result.image.width(),
                    result.image.height(),
                    started.elapsed().as_secs_f64() * 1000.0
                );
            }
            Err(err) => {
                tracing::error!(error = %err, "render failed");
                self.renderer.clear();
                self.status = err.to_string();
            }
        }

        let mut stdout = stdout();
        queue!(stdout, terminal::Clear(terminal::ClearType::All))?;
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let (_, rows) = self.renderer.size();
        let config = &self.state.config;
        queue!(
            stdout,
            cursor::MoveTo(0, rows as u16),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "vr {:.0} hr {:.0} | {} | FPS {:.1} | arrows/WASD rotate  h hair  l layer  c cape  x aa  space spin  q quit",
                config.vr, config.hr, self.status, self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
