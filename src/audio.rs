//! Sound cues using the Web Audio API
//!
//! Generated with oscillators, so no sound files are fetched.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Jump,
    Coin,
    /// Player touched lava
    Burn,
    LevelWon,
    /// Every level won
    GameWon,
}

impl SoundEffect {
    pub fn for_event(event: GameEvent) -> Self {
        match event {
            GameEvent::Jumped => SoundEffect::Jump,
            GameEvent::CoinCollected { .. } => SoundEffect::Coin,
            GameEvent::Burned => SoundEffect::Burn,
            GameEvent::LevelWon => SoundEffect::LevelWon,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: settings.effective_volume(),
        }
    }

    /// Resume audio context (browsers require a user gesture first)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn play_events(&self, events: &[GameEvent]) {
        for &event in events {
            self.play(SoundEffect::for_event(event));
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let now = ctx.current_time();
        match effect {
            SoundEffect::Jump => {
                tone(ctx, OscillatorType::Square, (250.0, 700.0), vol * 0.1, now, 0.15);
            }
            SoundEffect::Burn => {
                tone(ctx, OscillatorType::Sawtooth, (300.0, 40.0), vol * 0.6, now, 0.8);
            }
            SoundEffect::Coin => {
                arpeggio(ctx, OscillatorType::Sine, &[988.0, 1319.0], 0.07, vol * 0.2, 0.2);
            }
            SoundEffect::LevelWon => arpeggio(
                ctx,
                OscillatorType::Triangle,
                &[400.0, 500.0, 600.0, 800.0],
                0.1,
                vol * 0.3,
                0.4,
            ),
            SoundEffect::GameWon => arpeggio(
                ctx,
                OscillatorType::Triangle,
                &[500.0, 600.0, 700.0, 800.0, 1000.0],
                0.1,
                vol * 0.3,
                0.4,
            ),
        }
    }
}

/// Notes played one after another, `gap` seconds apart
fn arpeggio(
    ctx: &AudioContext,
    wave: OscillatorType,
    notes: &[f32],
    gap: f64,
    vol: f32,
    length: f64,
) {
    let start = ctx.current_time();
    for (i, &hz) in notes.iter().enumerate() {
        tone(ctx, wave, (hz, hz), vol, start + i as f64 * gap, length);
    }
}

/// One decaying note gliding between two pitches
///
/// Returns `None` if any Web Audio node could not be built or scheduled.
fn tone(
    ctx: &AudioContext,
    wave: OscillatorType,
    (from_hz, to_hz): (f32, f32),
    vol: f32,
    at: f64,
    length: f64,
) -> Option<()> {
    let osc: OscillatorNode = ctx.create_oscillator().ok()?;
    let gain: GainNode = ctx.create_gain().ok()?;
    osc.set_type(wave);

    let end = at + length;
    let pitch = osc.frequency();
    pitch.set_value_at_time(from_hz, at).ok()?;
    if to_hz != from_hz {
        pitch.exponential_ramp_to_value_at_time(to_hz, end).ok()?;
    }
    let level = gain.gain();
    level.set_value_at_time(vol, at).ok()?;
    level.exponential_ramp_to_value_at_time(0.001, end).ok()?;

    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;
    osc.start_with_when(at).ok()?;
    osc.stop_with_when(end + 0.05).ok()?;
    Some(())
}
