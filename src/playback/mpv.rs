//! mpv-backed playback engine
//!
//! Spawns `mpv` with a JSON IPC socket. Property changes (`time-pos`,
//! `duration`, `pause`, `eof-reached`) are mirrored into local state each
//! time the session polls; nothing blocks the UI loop. Commands issued
//! before the socket exists are queued and flushed on connect.

use serde_json::{json, Value};
use std::collections::VecDeque;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use tracing::{debug, info, warn};

use super::engine::{EngineEvent, PlaybackEngine};
use super::PlaybackError;

const OBSERVED: [&str; 4] = ["time-pos", "duration", "pause", "eof-reached"];

/// External mpv process driven over IPC
#[derive(Debug)]
pub struct MpvEngine {
    command: String,
    socket_path: PathBuf,
    process: Option<Child>,
    conn: Option<BufReader<UnixStream>>,
    outbox: Vec<Value>,
    partial: String,
    request_id: u64,
    time_pos: f64,
    duration: f64,
    paused: bool,
    finished: bool,
    events: VecDeque<EngineEvent>,
}

impl MpvEngine {
    /// Create an engine that launches `command` (usually `mpv`)
    pub fn new(command: impl Into<String>) -> Self {
        let socket_path =
            std::env::temp_dir().join(format!("couchtv-mpv-{}.sock", uuid::Uuid::new_v4()));
        Self {
            command: command.into(),
            socket_path,
            process: None,
            conn: None,
            outbox: Vec::new(),
            partial: String::new(),
            request_id: 1,
            time_pos: 0.0,
            duration: 0.0,
            paused: false,
            finished: false,
            events: VecDeque::new(),
        }
    }

    fn send(&mut self, args: Value) {
        let message = json!({ "command": args, "request_id": self.request_id });
        self.request_id += 1;

        let Some(conn) = self.conn.as_mut() else {
            self.outbox.push(message);
            return;
        };
        let stream = conn.get_mut();
        if let Err(e) = writeln!(stream, "{}", message).and_then(|_| stream.flush()) {
            warn!(error = %e, "mpv ipc write failed");
        }
    }

    fn try_connect(&mut self) {
        if self.conn.is_some() || self.process.is_none() {
            return;
        }
        let stream = match UnixStream::connect(&self.socket_path) {
            Ok(s) => s,
            // Socket not created yet
            Err(_) => return,
        };
        if let Err(e) = stream.set_nonblocking(true) {
            warn!(error = %e, "mpv ipc socket setup failed");
            return;
        }
        debug!(socket = %self.socket_path.display(), "mpv ipc connected");
        self.conn = Some(BufReader::new(stream));

        for (id, property) in OBSERVED.iter().enumerate() {
            self.send(json!(["observe_property", id + 1, property]));
        }
        for message in std::mem::take(&mut self.outbox) {
            if let Some(conn) = self.conn.as_mut() {
                let stream = conn.get_mut();
                if let Err(e) = writeln!(stream, "{}", message).and_then(|_| stream.flush()) {
                    warn!(error = %e, "mpv ipc write failed");
                }
            }
        }
    }

    /// Read whatever the socket has and update state
    fn pump(&mut self) {
        self.try_connect();

        let mut lines = Vec::new();
        if let Some(conn) = self.conn.as_mut() {
            loop {
                match conn.read_line(&mut self.partial) {
                    Ok(0) => {
                        debug!("mpv ipc closed");
                        self.conn = None;
                        break;
                    }
                    Ok(_) => {
                        if self.partial.ends_with('\n') {
                            lines.push(std::mem::take(&mut self.partial));
                        }
                    }
                    Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                    Err(e) => {
                        warn!(error = %e, "mpv ipc read failed");
                        self.conn = None;
                        break;
                    }
                }
            }
        }
        for line in lines {
            self.handle_message(line.trim_end());
        }

        self.check_process();
    }

    fn handle_message(&mut self, line: &str) {
        let Ok(msg) = serde_json::from_str::<Value>(line) else {
            return;
        };
        match msg["event"].as_str() {
            Some("property-change") => match msg["name"].as_str() {
                Some("time-pos") => {
                    if let Some(pos) = msg["data"].as_f64() {
                        self.time_pos = pos;
                    }
                }
                Some("duration") => {
                    if let Some(dur) = msg["data"].as_f64() {
                        self.duration = dur;
                    }
                }
                Some("pause") => {
                    if let Some(paused) = msg["data"].as_bool() {
                        self.paused = paused;
                    }
                }
                Some("eof-reached") => {
                    if msg["data"].as_bool() == Some(true) {
                        self.finish(EngineEvent::Ended);
                    }
                }
                _ => {}
            },
            Some("end-file") => match msg["reason"].as_str() {
                Some("eof") => self.finish(EngineEvent::Ended),
                Some("error") => {
                    let detail = msg["file_error"]
                        .as_str()
                        .unwrap_or("playback error")
                        .to_string();
                    self.finish(EngineEvent::Error(detail));
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn check_process(&mut self) {
        let Some(child) = self.process.as_mut() else {
            return;
        };
        match child.try_wait() {
            Ok(Some(status)) => {
                info!(%status, "mpv exited");
                self.process = None;
                self.conn = None;
                self.finish(EngineEvent::Error(format!("player exited ({})", status)));
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "failed to query mpv process"),
        }
    }

    /// Queue a terminal event once
    fn finish(&mut self, event: EngineEvent) {
        if self.finished {
            return;
        }
        self.finished = true;
        if event == EngineEvent::Ended && self.duration > 0.0 {
            self.time_pos = self.duration;
        }
        self.events.push_back(event);
    }

    fn kill(&mut self) {
        if let Some(mut child) = self.process.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        self.conn = None;
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

impl PlaybackEngine for MpvEngine {
    fn load(&mut self, url: &str) -> Result<(), PlaybackError> {
        self.kill();
        self.time_pos = 0.0;
        self.duration = 0.0;
        self.paused = false;
        self.finished = false;
        self.events.clear();

        let mut cmd = Command::new(&self.command);
        cmd.arg(format!("--input-ipc-server={}", self.socket_path.display()))
            .arg("--force-window=immediate")
            .arg("--idle=no")
            .arg("--keep-open=no")
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        info!(command = %self.command, "spawning player");
        let child = cmd.spawn().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                PlaybackError::NotFound(self.command.clone())
            } else {
                PlaybackError::StartFailed(e)
            }
        })?;
        self.process = Some(child);
        Ok(())
    }

    fn play(&mut self) {
        self.paused = false;
        self.send(json!(["set_property", "pause", false]));
    }

    fn pause(&mut self) {
        self.paused = true;
        self.send(json!(["set_property", "pause", true]));
    }

    fn seek(&mut self, seconds: f64) {
        self.time_pos = seconds;
        self.send(json!(["seek", seconds, "absolute"]));
    }

    fn current_time(&self) -> f64 {
        self.time_pos
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn poll_event(&mut self) -> Option<EngineEvent> {
        self.pump();
        self.events.pop_front()
    }

    fn stop(&mut self) {
        if self.conn.is_some() {
            self.send(json!(["quit"]));
        }
        self.kill();
    }
}

impl Drop for MpvEngine {
    fn drop(&mut self) {
        self.kill();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_changes_update_state() {
        let mut engine = MpvEngine::new("mpv");
        engine.handle_message(r#"{"event":"property-change","id":1,"name":"time-pos","data":12.5}"#);
        engine.handle_message(r#"{"event":"property-change","id":2,"name":"duration","data":600.0}"#);
        engine.handle_message(r#"{"event":"property-change","id":3,"name":"pause","data":true}"#);
        assert_eq!(engine.current_time(), 12.5);
        assert_eq!(engine.duration(), 600.0);
        assert!(engine.is_paused());
        assert!(engine.is_ready());
    }

    #[test]
    fn test_end_reported_once() {
        let mut engine = MpvEngine::new("mpv");
        engine.handle_message(r#"{"event":"property-change","name":"duration","data":90.0}"#);
        engine.handle_message(r#"{"event":"property-change","name":"eof-reached","data":true}"#);
        engine.handle_message(r#"{"event":"end-file","reason":"eof"}"#);
        assert_eq!(engine.events.pop_front(), Some(EngineEvent::Ended));
        assert!(engine.events.is_empty());
        assert_eq!(engine.current_time(), 90.0);
    }

    #[test]
    fn test_end_file_error() {
        let mut engine = MpvEngine::new("mpv");
        engine.handle_message(r#"{"event":"end-file","reason":"error","file_error":"loading failed"}"#);
        assert_eq!(
            engine.events.pop_front(),
            Some(EngineEvent::Error("loading failed".into()))
        );
    }

    #[test]
    fn test_commands_queue_until_connected() {
        let mut engine = MpvEngine::new("mpv");
        engine.pause();
        engine.seek(30.0);
        assert_eq!(engine.outbox.len(), 2);
        assert_eq!(engine.outbox[1]["command"], json!(["seek", 30.0, "absolute"]));
        assert_eq!(engine.current_time(), 30.0);
    }

    #[test]
    fn test_missing_binary() {
        let mut engine = MpvEngine::new("couchtv-no-such-player-binary");
        match engine.load("http://example.com/a.mp4") {
            Err(PlaybackError::NotFound(cmd)) => assert_eq!(cmd, "couchtv-no-such-player-binary"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
