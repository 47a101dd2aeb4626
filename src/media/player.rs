//! rodio-backed playback on a dedicated thread
//!
//! The output stream handle is not `Send`, so one OS thread owns the device
//! for the player's lifetime and everything else talks to it over a channel.

use super::{AudioPlayer, MediaError};
use rodio::{Decoder, OutputStream, Sink};
use std::io::Cursor;
use std::sync::mpsc;
use std::thread;

enum Command {
    Play(Vec<Vec<u8>>),
    Stop(mpsc::Sender<()>),
}

pub struct RodioPlayer {
    tx: mpsc::Sender<Command>,
}

impl RodioPlayer {
    /// Open the default output device. The playback thread shuts down when
    /// the player is dropped.
    pub fn new() -> Result<Self, MediaError> {
        let (tx, rx) = mpsc::channel::<Command>();
        let (ready_tx, ready_rx) = mpsc::channel();

        thread::Builder::new()
            .name("audio-playback".into())
            .spawn(move || playback_loop(&rx, &ready_tx))
            .map_err(|e| MediaError::Device(e.to_string()))?;

        ready_rx
            .recv()
            .map_err(|_| MediaError::ThreadGone)?
            .map_err(MediaError::Device)?;

        Ok(Self { tx })
    }
}

fn playback_loop(rx: &mpsc::Receiver<Command>, ready_tx: &mpsc::Sender<Result<(), String>>) {
    let (stream, handle) = match OutputStream::try_default() {
        Ok(pair) => {
            let _ = ready_tx.send(Ok(()));
            pair
        }
        Err(e) => {
            let _ = ready_tx.send(Err(e.to_string()));
            return;
        }
    };
    // Dropping the stream closes the device; keep it for the thread's lifetime.
    let _stream = stream;

    let mut sink: Option<Sink> = None;
    while let Ok(cmd) = rx.recv() {
        match cmd {
            Command::Play(clips) => {
                if let Some(active) = sink.take() {
                    active.stop();
                }
                match Sink::try_new(&handle) {
                    Ok(fresh) => {
                        for clip in clips {
                            match Decoder::new(Cursor::new(clip)) {
                                Ok(source) => fresh.append(source),
                                Err(e) => {
                                    tracing::warn!(error = %e, "skipping undecodable audio clip");
                                }
                            }
                        }
                        sink = Some(fresh);
                    }
                    Err(e) => tracing::warn!(error = %e, "audio sink unavailable"),
                }
            }
            Command::Stop(ack) => {
                if let Some(active) = sink.take() {
                    active.stop();
                }
                let _ = ack.send(());
            }
        }
    }
}

impl AudioPlayer for RodioPlayer {
    fn play(&self, clips: Vec<Vec<u8>>) -> Result<(), MediaError> {
        self.tx
            .send(Command::Play(clips))
            .map_err(|_| MediaError::ThreadGone)
    }

    fn stop(&self) {
        let (ack_tx, ack_rx) = mpsc::channel();
        if self.tx.send(Command::Stop(ack_tx)).is_ok() {
            // Rendezvous with the playback thread so the device is silent
            // before the caller proceeds.
            let _ = ack_rx.recv();
        }
    }
}
