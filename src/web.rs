//! Browser bindings
//!
//! Exposes a session to the JavaScript shell. The shell owns the render loop
//! and input wiring; it calls `update` once per animation frame and reads the
//! snapshot back as JSON.

use wasm_bindgen::prelude::*;

use crate::persistence::LocalStorageStore;
use crate::session::Session;
use crate::settings::{GameVariant, Settings};
use crate::sim::TickInput;

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Math Arcade core loaded");
}

#[wasm_bindgen]
pub struct WebGame {
    session: Session<LocalStorageStore>,
    input: TickInput,
}

#[wasm_bindgen]
impl WebGame {
    /// `variant` is "asteroids" or "invaders"
    #[wasm_bindgen(constructor)]
    pub fn new(variant: &str, seed: u32) -> Result<WebGame, JsError> {
        let variant = GameVariant::from_str(variant)
            .ok_or_else(|| JsError::new(&format!("unknown game variant: {}", variant)))?;
        let store = LocalStorageStore::new();
        let settings = Settings::load(&store, variant);
        let session = Session::open(settings, seed as u64, store)?;
        Ok(WebGame {
            session,
            input: TickInput::default(),
        })
    }

    pub fn start(&mut self) -> Result<(), JsError> {
        Ok(self.session.start()?)
    }

    pub fn set_thrust(&mut self, engaged: bool) -> Result<(), JsError> {
        Ok(self.session.set_thrust(engaged)?)
    }

    pub fn set_turn(&mut self, turn: f32) -> Result<(), JsError> {
        Ok(self.session.set_turn(turn)?)
    }

    pub fn set_fast_descent(&mut self, active: bool) -> Result<(), JsError> {
        Ok(self.session.set_fast_descent(active)?)
    }

    /// Queue a shot for the next frame
    pub fn fire(&mut self, payload: i32) -> Result<(), JsError> {
        self.session.state().require_playing("fire")?;
        self.input.fire.push(payload as i64);
        Ok(())
    }

    /// Advance by one animation frame; returns the number of events
    pub fn update(&mut self, frame_dt: f32) -> usize {
        let events = self.session.advance(frame_dt, &self.input);
        self.input = TickInput::default();
        events.len()
    }

    pub fn snapshot_json(&self) -> Result<String, JsError> {
        Ok(self.session.snapshot().to_json()?)
    }

    /// End the run; returns the leaderboard rank, if any
    pub fn end(&mut self) -> Result<Option<u32>, JsError> {
        let rank = self.session.end(js_sys::Date::now())?;
        Ok(rank.map(|r| r as u32))
    }

    pub fn top_score(&self) -> Option<f64> {
        self.session.highscores().top_score().map(|s| s as f64)
    }
}
