//! Math Arcade entry point
//!
//! Native builds run a headless autopilot session and log what happens. The
//! browser build drives the core through `math_arcade::web::WebGame`.
//!
//! Usage: `math-arcade [asteroids|invaders] [ticks] [save-dir]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use math_arcade::consts::SIM_DT;
    use math_arcade::persistence::DirStore;
    use math_arcade::sim::GameEvent;
    use math_arcade::{GameVariant, Session, Settings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let variant = args
        .next()
        .and_then(|s| GameVariant::from_str(&s))
        .unwrap_or_default();
    let ticks: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(3600);
    let save_dir = args.next().unwrap_or_else(|| ".math-arcade".to_string());

    log::info!("Math Arcade (native) starting {} for {} ticks", variant.as_str(), ticks);

    let store = match DirStore::open(&save_dir) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Cannot open save directory {}: {}", save_dir, e);
            std::process::exit(1);
        }
    };

    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0);
    let settings = Settings::load(&store, variant);
    let mut session = match Session::open(settings, now_ms as u64, store) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Invalid settings: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = session.start() {
        log::error!("Could not start: {}", e);
        std::process::exit(1);
    }

    for _ in 0..ticks {
        let input = autopilot::next_input(session.state());
        for event in session.tick(&input, SIM_DT) {
            match event {
                GameEvent::Hit { problem, points, .. } => {
                    log::info!("Hit {} = {} (+{})", problem, problem.answer(), points)
                }
                GameEvent::Missed { problem, payload, .. } => {
                    log::info!("Missed {} with {}", problem, payload)
                }
                GameEvent::Escaped { problem, .. } => log::info!("{} escaped", problem),
                other => log::debug!("{:?}", other),
            }
        }
    }

    match session.end(now_ms) {
        Ok(rank) => {
            let state = session.state();
            println!(
                "{}: score {} | wave {} | {} hits, {} misses | {} weak facts{}",
                variant.as_str(),
                state.score.total(),
                state.wave,
                state.hits,
                state.misses,
                state.facts.len(),
                rank.map(|r| format!(" | leaderboard #{}", r)).unwrap_or_default()
            );
        }
        Err(e) => log::error!("Could not end run: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_main, this is just to satisfy the compiler
}

/// A simple player: aim at the nearest enemy, fire when lined up, and get
/// every fifth answer wrong so the fact bank has something to learn.
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use math_arcade::normalize_angle;
    use math_arcade::sim::{GameState, TickInput};

    pub fn next_input(state: &GameState) -> TickInput {
        let ship = &state.ship;
        let Some(target) = state.entities.iter().min_by(|a, b| {
            a.pos
                .distance_squared(ship.pos)
                .total_cmp(&b.pos.distance_squared(ship.pos))
        }) else {
            return TickInput::default();
        };

        let to_target = target.pos - ship.pos;
        let desired = to_target.y.atan2(to_target.x);
        let diff = normalize_angle(desired - ship.heading);

        let mut input = TickInput {
            turn: Some((diff * 4.0).clamp(-1.0, 1.0)),
            // Nudge forward now and then to show momentum
            thrust: Some(state.time_ticks % 240 < 20),
            ..Default::default()
        };

        if diff.abs() < 0.05 && state.bullets.is_empty() {
            let answer = target.problem.answer() as i64;
            let shot = state.hits + state.misses;
            input.fire.push(if shot % 5 == 4 { answer + 1 } else { answer });
        }
        input
    }
}
