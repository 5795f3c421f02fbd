pub mod canvas;
pub mod events;
pub mod world;

use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use tracing::{debug, info};

use crate::{
    app::{
        controller::EffectController,
        events::HostEvent,
        keybind::KeybindList,
        menu::{Field, OptionValue, SettingKey},
    },
    cli::Cli,
    domain::{style::RayStyle, weather::WeatherState},
    host::{BlendMode, LocationInfo, SpriteSurface},
};

use self::{
    canvas::GlyphCanvas,
    events::{PreviewEvent, button_name, held_buttons},
    world::{SimContent, SimHud, SimMenu, SimWeatherRegistry, SimWorld},
};

/// Host pixels represented by one terminal cell.
pub const CELL_PIXELS: (f32, f32) = (8.0, 16.0);
/// Rows under the canvas reserved for the status line and HUD.
pub const STATUS_ROWS: u16 = 2;
const PAN_STEP: f32 = 64.0;

fn screen_size(cols: u16, rows: u16) -> (f32, f32) {
    (
        f32::from(cols.max(1)) * CELL_PIXELS.0,
        f32::from(rows.max(1)) * CELL_PIXELS.1,
    )
}

/// The preview's stand-in for a running game: one simulated world feeding
/// the effect controller, drawn into a glyph canvas each frame.
#[derive(Debug)]
pub struct PreviewApp {
    pub running: bool,
    pub controller: EffectController,
    pub world: SimWorld,
    pub hud: SimHud,
    pub content: SimContent,
    pub menu: SimMenu,
    pub canvas: GlyphCanvas,
    pub last_drawn: usize,
    pub in_save: bool,
    last_frame_at: Instant,
}

impl PreviewApp {
    pub fn new(cli: &Cli, data_dir: PathBuf, terminal: (u16, u16)) -> Result<Self> {
        let (cols, rows) = terminal;
        let canvas_rows = rows.saturating_sub(STATUS_ROWS).max(1);
        let screen = screen_size(cols, canvas_rows);

        let mut controller = EffectController::new(data_dir);
        bind_preview_keys(&mut controller)?;
        if let Some(style) = cli.style {
            let label = RayStyle::from(style).label().to_string();
            controller.set_menu_value(&SettingKey::generic(Field::Style), OptionValue::Choice(label))?;
        }

        let registry = SimWeatherRegistry::for_weather(&cli.weather);
        let mut menu = SimMenu::default();
        controller.on_game_launched(Some(&mut menu), Some(&registry));

        let weather = WeatherState::vanilla(&cli.weather);
        let world = SimWorld::new(
            LocationInfo {
                name: cli.location.clone(),
                is_outdoors: !cli.indoors,
                map_width: cli.map_width as f32,
            },
            cli.time,
            cli.minute_ms,
            weather,
            screen,
        );

        let mut app = Self {
            running: true,
            controller,
            world,
            hud: SimHud::default(),
            content: SimContent::default(),
            menu,
            canvas: GlyphCanvas::new(cols, canvas_rows, screen),
            last_drawn: 0,
            in_save: false,
            last_frame_at: Instant::now(),
        };
        app.load_save();
        info!(
            location = %cli.location,
            weather = %cli.weather,
            time = %cli.time,
            "preview started"
        );
        Ok(app)
    }

    pub fn handle_event(&mut self, event: PreviewEvent) -> Result<()> {
        match event {
            PreviewEvent::TickFrame => {
                let now = Instant::now();
                let delta = now.duration_since(self.last_frame_at);
                self.last_frame_at = now;
                self.frame(delta)?;
            }
            PreviewEvent::Input(Event::Key(key)) => self.handle_key(key),
            PreviewEvent::Input(Event::Resize(cols, rows)) => self.resize(cols, rows),
            PreviewEvent::Input(_) => {}
            PreviewEvent::Quit => self.running = false,
        }
        Ok(())
    }

    /// One host frame: advance the clock, tick the effect, then draw it
    /// between the world pass and the HUD.
    pub fn frame(&mut self, delta: Duration) -> Result<()> {
        self.world.advance(delta);
        self.controller
            .handle_event(HostEvent::UpdateTicked, &self.world, &mut self.hud);

        self.canvas.clear();
        self.canvas.begin(BlendMode::AlphaBlend);
        let drawn = self
            .controller
            .render(&self.world, &mut self.content, &mut self.canvas);
        self.canvas.end();
        self.last_drawn = drawn?;

        self.hud.expire(delta);
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.running = false;
                return;
            }
            KeyCode::Left => self.world.pan(-PAN_STEP, 0.0),
            KeyCode::Right => self.world.pan(PAN_STEP, 0.0),
            KeyCode::Up => self.world.pan(0.0, -PAN_STEP),
            KeyCode::Down => self.world.pan(0.0, PAN_STEP),
            KeyCode::Char('[') => self.world.set_time_speed(self.world.time_speed() / 2),
            KeyCode::Char(']') => self.world.set_time_speed(self.world.time_speed() * 2),
            KeyCode::Char('n') => self.world.skip_hour(),
            KeyCode::Char('c') => self.world.summon_cloud(),
            KeyCode::Char('o') => {
                self.world.toggle_outdoors();
                self.warp();
            }
            KeyCode::Char('r') => self.warp(),
            KeyCode::Char('t') => self.toggle_title(),
            _ => {}
        }

        if let Some(button) = button_name(key.code) {
            debug!(%button, "button forwarded");
            self.controller.handle_event(
                HostEvent::ButtonPressed {
                    button,
                    held: held_buttons(&key),
                },
                &self.world,
                &mut self.hud,
            );
        }
    }

    fn warp(&mut self) {
        self.controller
            .handle_event(HostEvent::Warped, &self.world, &mut self.hud);
    }

    fn load_save(&mut self) {
        self.controller
            .handle_event(HostEvent::SaveLoaded, &self.world, &mut self.hud);
        self.in_save = true;
    }

    fn toggle_title(&mut self) {
        if self.in_save {
            self.controller
                .handle_event(HostEvent::ReturnedToTitle, &self.world, &mut self.hud);
            self.in_save = false;
        } else {
            self.load_save();
        }
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        let canvas_rows = rows.saturating_sub(STATUS_ROWS).max(1);
        let screen = screen_size(cols, canvas_rows);
        self.world.resize(screen.0, screen.1);
        self.canvas.resize(cols, canvas_rows, screen);
    }
}

/// Gives every unbound action a key so the preview is usable on a fresh
/// config. Only the in-memory config changes until something saves it.
fn bind_preview_keys(controller: &mut EffectController) -> Result<()> {
    let defaults = [
        (Field::ToggleLocationKey, "L"),
        (Field::ToggleWeatherKey, "W"),
        (Field::SpeedUpKey, "PageUp"),
        (Field::SpeedDownKey, "PageDown"),
    ];
    for (field, button) in defaults {
        let key = SettingKey::generic(field);
        if let OptionValue::Keybind(bind) = controller.menu_value(&key)
            && bind.is_bound()
        {
            continue;
        }
        controller.set_menu_value(&key, OptionValue::Keybind(KeybindList::single(button)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::{app::overrides::OVERRIDES_FILE, domain::clock::GameTime};

    fn app(dir: &tempfile::TempDir, args: &[&str]) -> PreviewApp {
        let cli = Cli::parse_from(std::iter::once("lightshafts").chain(args.iter().copied()));
        PreviewApp::new(&cli, dir.path().to_path_buf(), (120, 42)).expect("preview app")
    }

    fn press(app: &mut PreviewApp, code: KeyCode) {
        app.handle_event(PreviewEvent::Input(Event::Key(KeyEvent::new(
            code,
            KeyModifiers::NONE,
        ))))
        .expect("key event");
    }

    #[test]
    fn starts_in_a_save_with_the_menu_registered() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let app = app(&dir, &[]);
        assert!(app.in_save);
        assert!(app.controller.renderer().is_some());
        assert!(app.menu.layout.is_some());
        assert_eq!(app.canvas.size(), (120, 40));
    }

    #[test]
    fn morning_frames_draw_rays() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let mut app = app(&dir, &["--time", "10:00"]);
        for _ in 0..40 {
            app.frame(Duration::from_millis(100)).expect("frame");
        }
        assert!(app.last_drawn > 0);
        assert_eq!(app.canvas.ray_draws(), app.last_drawn);
        assert!(!app.canvas.is_open());
    }

    #[test]
    fn rain_keeps_the_canvas_dark() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let mut app = app(&dir, &["--weather", "Rain"]);
        app.frame(Duration::from_millis(100)).expect("frame");
        assert_eq!(app.last_drawn, 0);
    }

    #[test]
    fn style_flag_overrides_saved_style() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let app = app(&dir, &["--style", "high-detail"]);
        assert_eq!(app.controller.config().style, RayStyle::HighDetail);
    }

    #[test]
    fn location_key_writes_an_override() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let mut app = app(&dir, &["--indoors"]);
        press(&mut app, KeyCode::Char('l'));
        assert!(dir.path().join(OVERRIDES_FILE).exists());
        assert_eq!(app.hud.messages().count(), 1);
    }

    #[test]
    fn title_round_trip_restarts_the_renderer() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let mut app = app(&dir, &[]);
        press(&mut app, KeyCode::Char('t'));
        assert!(app.controller.renderer().is_none());
        app.frame(Duration::from_millis(16)).expect("frame");
        assert_eq!(app.last_drawn, 0);
        press(&mut app, KeyCode::Char('t'));
        assert!(app.controller.renderer().is_some());
    }

    #[test]
    fn time_keys_move_the_clock() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let mut app = app(&dir, &["--time", "09:00"]);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.world.time_of_day(), GameTime(1000));
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.world.time_speed(), 2);
    }

    #[test]
    fn quit_and_resize() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let mut app = app(&dir, &[]);
        app.handle_event(PreviewEvent::Input(Event::Resize(80, 26)))
            .expect("resize");
        assert_eq!(app.canvas.size(), (80, 24));
        press(&mut app, KeyCode::Esc);
        assert!(!app.running);
    }
}
