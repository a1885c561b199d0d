//! Sound cue trigger
//!
//! The simulation never waits on audio. Cues are pushed onto a queue and a
//! worker thread hands them to an [`AudioSink`]; a sink that fails only costs
//! the sound, never the game.

use std::io;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::error::AudioError;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Flyer jumped
    Flap,
    /// Flyer hit a gate
    Hit,
    /// Run ended
    GameOver,
}

impl SoundEffect {
    /// File name of the sample for this effect
    pub fn asset_name(&self) -> &'static str {
        match self {
            SoundEffect::Flap => "flap.wav",
            SoundEffect::Hit => "hit.wav",
            SoundEffect::GameOver => "gameover.wav",
        }
    }
}

/// Something that can actually make noise
pub trait AudioSink: Send {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError>;
}

/// Plays nothing
#[derive(Debug, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Headless sink: logs each cue, optionally checking its sample exists
#[derive(Debug, Default)]
pub struct LogSink {
    pub asset_dir: Option<PathBuf>,
}

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError> {
        if let Some(dir) = &self.asset_dir {
            let path = dir.join(effect.asset_name());
            if !path.is_file() {
                return Err(AudioError::MissingAsset(path));
            }
        }
        log::info!("♪ {:?} ({}) at volume {:.2}", effect, effect.asset_name(), volume);
        Ok(())
    }
}

struct Cue {
    effect: SoundEffect,
    volume: f32,
}

/// Audio manager for the game
pub struct AudioTrigger {
    cues: Option<Sender<Cue>>,
    worker: Option<JoinHandle<()>>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl AudioTrigger {
    /// Start a worker thread feeding `sink`
    pub fn spawn(sink: Box<dyn AudioSink>) -> io::Result<Self> {
        let (tx, rx) = unbounded();
        let worker = thread::Builder::new()
            .name("audio".into())
            .spawn(move || run_worker(sink, rx))?;
        Ok(Self {
            cues: Some(tx),
            worker: Some(worker),
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        })
    }

    /// No audio output at all
    pub fn disabled() -> Self {
        Self {
            cues: None,
            worker: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Queue a sound effect. Never blocks.
    pub fn play(&self, effect: SoundEffect) {
        let volume = self.effective_volume();
        if volume <= 0.0 {
            return;
        }
        let Some(tx) = &self.cues else { return };
        if tx.send(Cue { effect, volume }).is_err() {
            log::warn!("Audio worker has stopped; dropping {:?}", effect);
        }
    }
}

impl Drop for AudioTrigger {
    fn drop(&mut self) {
        // Closing the queue ends the worker loop
        self.cues.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Audio thread panicked");
            }
        }
    }
}

fn run_worker(mut sink: Box<dyn AudioSink>, cues: Receiver<Cue>) {
    for cue in cues.iter() {
        if let Err(e) = sink.play(cue.effect, cue.volume) {
            log::warn!("Could not play {:?}: {}", cue.effect, e);
        }
    }
}
