use anyhow::bail;
use chrono::Utc;
use clap::Parser;
use pelorus_almanac::SkyModel;
use pelorus_core::angle::format_bearing;
use pelorus_core::LocalClock;
use pelorus_ephemeris::Ephemeris;
use pelorus_watch::config::Config;
use pelorus_watch::display;
use pelorus_watch::engine::Engine;
use pelorus_watch::feed::{self, FeedMessage};
use pelorus_watch::logbook::{Logbook, PositionEntry};
use std::sync::mpsc;
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Config::parse();
    let clock = LocalClock::system();
    log::info!("local offset {}", clock.offset_label());

    let ephemeris = match Ephemeris::load(&config.kernel) {
        Ok(ephemeris) => {
            log::info!("ephemeris kernel loaded: {}", config.kernel.display());
            ephemeris
        }
        Err(err) => {
            log::error!(
                "could not load ephemeris kernel {}: {err}; \
                 astronomy stays unavailable until restart",
                config.kernel.display()
            );
            Ephemeris::unavailable()
        }
    };

    let (tx, rx) = mpsc::channel();
    let _feed_thread = feed::spawn(config.feed.clone(), tx);

    let mut engine = Engine::new(ephemeris, clock, f64::from(config.smoothing_seconds));
    let mut logbook = Logbook::new(&config.logbook_dir);
    let mut connected = false;

    loop {
        // Drain the feed before computing anything, so this tick sees the
        // newest complete fix.
        loop {
            match rx.try_recv() {
                Ok(FeedMessage::Fix(fix)) => engine.apply_fix(fix, Utc::now()),
                Ok(FeedMessage::Connected) => {
                    connected = true;
                    if let Err(err) = logbook.log_connection(Utc::now(), &clock, true) {
                        log::warn!("logbook write failed: {err}");
                    }
                }
                Ok(FeedMessage::Disconnected) => {
                    connected = false;
                    engine.clear_fix();
                    if let Err(err) = logbook.log_connection(Utc::now(), &clock, false) {
                        log::warn!("logbook write failed: {err}");
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => bail!("feed thread terminated"),
            }
        }

        let now = Utc::now();
        let report = engine.tick(now);
        let entry = position_entry(&engine);

        if report.minute_boundary {
            if let Some(snapshot) = engine.snapshot() {
                for line in display::render(snapshot, &clock) {
                    println!("{line}");
                }
            }
            if connected {
                if let Some(entry) = &entry {
                    if let Err(err) = logbook.log_position(now, &clock, entry) {
                        log::warn!("logbook write failed: {err}");
                    }
                }
            }
        }

        for event in &report.notifications {
            match event.angle {
                Some(angle) => println!(
                    "*** {} at {} {}",
                    event.label,
                    clock.to_local(event.instant).format("%H:%M:%S"),
                    format_bearing(angle)
                ),
                None => println!(
                    "*** {} at {}",
                    event.label,
                    clock.to_local(event.instant).format("%H:%M:%S")
                ),
            }
            if let Err(err) =
                logbook.log_event(now, &clock, &event.label, event.angle, entry.as_ref())
            {
                log::warn!("logbook write failed: {err}");
            }
        }

        std::thread::sleep(Duration::from_secs(1));
    }
}

fn position_entry<M: SkyModel>(engine: &Engine<M>) -> Option<PositionEntry> {
    engine.observer().map(|observer| PositionEntry {
        observer,
        speed_knots: engine.smoothed_speed(),
        course: engine.smoothed_course(),
    })
}
