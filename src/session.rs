//! Note session: turns key presses into independently playing tones.
//!
//! Every press gets its own [`WaveformStream`] and backend [`Player`], owned by
//! a Tokio task that walks the [`VolumeEnvelope`] and then releases the player.
//! The only state shared between notes is [`ActiveNotes`], used to scale each
//! new note's volume by the number of notes sounding at once.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use log::{debug, info, warn};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::config::StreamConfig;
use crate::dsp::envelope::VolumeEnvelope;
use crate::dsp::stream::WaveformStream;
use crate::error::{ConfigError, SessionError};
use crate::notes::key_frequency;

/// How long each note's stream lasts.
pub const DEFAULT_NOTE_DURATION: Duration = Duration::from_secs(3);

/// A backend playback handle pulling from one stream.
pub trait Player: Send + 'static {
    fn play(&mut self);
    /// Set the output gain, 0.0 = silent, 1.0 = unity.
    fn set_volume(&mut self, volume: f64);
}

/// An audio output that mixes any number of players.
pub trait Backend: Send + Sync + 'static {
    type Player: Player;

    fn new_player(&self, stream: WaveformStream) -> Result<Self::Player, SessionError>;
}

/// Count of currently sounding notes, shared between note tasks.
#[derive(Debug, Clone, Default)]
pub struct ActiveNotes {
    count: Arc<Mutex<usize>>,
}

impl ActiveNotes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        *self.count.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count a new note in; it is counted out when the guard drops.
    pub fn register(&self) -> NoteGuard {
        let mut count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        *count += 1;
        NoteGuard {
            notes: self.clone(),
            count_at_start: *count,
        }
    }
}

/// Keeps one note counted in [`ActiveNotes`].
#[derive(Debug)]
pub struct NoteGuard {
    notes: ActiveNotes,
    count_at_start: usize,
}

impl NoteGuard {
    /// Active notes, including this one, when it was registered.
    pub fn count_at_start(&self) -> usize {
        self.count_at_start
    }

    /// Volume that keeps this note's share of the mix at or below unity.
    pub fn initial_volume(&self) -> f64 {
        1.0 / self.count_at_start as f64
    }
}

impl Drop for NoteGuard {
    fn drop(&mut self) {
        let mut count = self.notes.count.lock().unwrap_or_else(PoisonError::into_inner);
        *count = count.saturating_sub(1);
    }
}

/// Plays a note per key press through a shared backend.
pub struct Session<B: Backend> {
    backend: Arc<B>,
    config: StreamConfig,
    note_duration: Duration,
    envelope: Arc<VolumeEnvelope>,
    active: ActiveNotes,
}

impl<B: Backend> Session<B> {
    pub fn new(backend: B, config: StreamConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Session {
            backend: Arc::new(backend),
            config,
            note_duration: DEFAULT_NOTE_DURATION,
            envelope: Arc::new(VolumeEnvelope::default()),
            active: ActiveNotes::new(),
        })
    }

    pub fn with_note_duration(mut self, duration: Duration) -> Self {
        self.note_duration = duration;
        self
    }

    pub fn with_envelope(mut self, envelope: VolumeEnvelope) -> Self {
        self.envelope = Arc::new(envelope);
        self
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn active_notes(&self) -> &ActiveNotes {
        &self.active
    }

    /// Start the note mapped to `key`.
    ///
    /// The note runs as a task on the current Tokio runtime; outside one the
    /// press fails before any player is created. The returned task finishes
    /// once the envelope has run out and the player has been released;
    /// dropping the handle lets the note play on detached.
    pub fn press(&self, key: char) -> Result<JoinHandle<()>, SessionError> {
        let Some(frequency) = key_frequency(key) else {
            warn!("no note mapped to key {key:?}");
            return Err(SessionError::UnknownKey(key));
        };
        let runtime = Handle::try_current().map_err(|e| SessionError::Backend(e.to_string()))?;

        let stream = WaveformStream::from_config(frequency, self.note_duration, &self.config);
        let player = self.backend.new_player(stream)?;
        let guard = self.active.register();
        info!(
            "note {key:?} at {frequency:.2} Hz ({} active)",
            guard.count_at_start()
        );

        let envelope = Arc::clone(&self.envelope);
        Ok(runtime.spawn(run_note(key, player, guard, envelope)))
    }
}

/// Drive one player through the envelope, then release it.
async fn run_note<P: Player>(
    key: char,
    mut player: P,
    guard: NoteGuard,
    envelope: Arc<VolumeEnvelope>,
) {
    let initial = guard.initial_volume();
    let mut started = false;

    for (volume, hold) in envelope.schedule(initial) {
        player.set_volume(volume);
        if !started {
            player.play();
            started = true;
        }
        debug!("note {key:?} volume {volume:.3}");
        if !hold.is_zero() {
            tokio::time::sleep(hold).await;
        }
    }

    // The player must outlive the whole envelope; release it only now.
    drop(player);
    drop(guard);
    debug!("note {key:?} released");
}
