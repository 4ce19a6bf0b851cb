mod flow;
pub mod keys;
pub mod logging;
mod sudo;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use installer_core::anim::FPS;
use installer_core::Actions;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::installer::{Installer, StepOutcome};
use crate::model::Screen;
use crate::settings::Settings;
use crate::system::{DryRunActions, SystemActions, DRY_RUN_DELAY};
use crate::ui::draw_ui;

use self::flow::{clear_screen, Tui};
use self::keys::map_key;
use self::logging::InstallLog;

pub fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    let actions: Arc<dyn Actions> = if settings.dry_run {
        Arc::new(DryRunActions::new(
            settings.config_dir.clone(),
            settings.dry_run_fail.clone(),
            DRY_RUN_DELAY,
        ))
    } else {
        Arc::new(SystemActions::new(settings.config_dir.clone())?)
    };

    if !settings.dry_run && !settings.skip_sudo && !sudo::is_root() {
        clear_screen()?;
        sudo::acquire()?;
    }

    let mut log = InstallLog::open(&settings.log_file);
    if !log.has_file() {
        log.push(format!(
            "Could not open {}, keeping the log on screen only",
            settings.log_file.display()
        ));
    }
    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut terminal = flow::enter_terminal()?;
    let result = run_loop(&mut terminal, actions, rng, log);
    let restored = flow::restore_terminal(&mut terminal);
    let screen = result?;
    restored?;

    if screen == Screen::Error {
        bail!(
            "installation failed, see {} for details",
            settings.log_file.display()
        );
    }
    Ok(())
}

/// Draws, reads input, drains task events, and advances animations at a fixed
/// rate until a screen asks to quit. Returns the screen that was active then.
fn run_loop(
    terminal: &mut Tui,
    actions: Arc<dyn Actions>,
    rng: StdRng,
    log: InstallLog,
) -> Result<Screen> {
    let (tx, rx) = crossbeam_channel::unbounded();
    let size = terminal.size().context("read terminal size")?;
    let mut installer = Installer::new(actions, rng, tx, log, (size.width, size.height));

    let tick_rate = Duration::from_secs_f64(1.0 / FPS);
    let mut last_tick = Instant::now();
    loop {
        terminal
            .draw(|f| draw_ui(f.area(), f, &installer))
            .context("draw frame")?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout).context("poll events")? {
            match event::read().context("read event")? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(key) = map_key(key) {
                        if installer.handle_key(key) == StepOutcome::Quit {
                            break;
                        }
                    }
                }
                Event::Resize(width, height) => installer.resize(width, height),
                _ => {}
            }
        }

        while let Ok(evt) = rx.try_recv() {
            installer.handle_task_event(evt);
        }

        if last_tick.elapsed() >= tick_rate {
            installer.tick();
            last_tick = Instant::now();
        }
    }
    Ok(installer.screen())
}
