use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::blend::Frame;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::Fps;
use crate::foundation::error::{ReelError, ReelResult};

const VIDEO_CODEC: &str = "libx264";

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// Delete the output file when the sink is aborted.
    pub remove_on_abort: bool,
}

impl FfmpegSinkOpts {
    /// Create options for outputting an MP4 to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            remove_on_abort: true,
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw RGB8 frames to stdin.
///
/// Even geometries are encoded as yuv420p; odd ones keep their exact size as yuv444p.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    cfg: Option<SinkConfig>,
    frames_written: u64,
    // Set once ffmpeg was spawned; cleared only by a successful `end`.
    unfinished_output: bool,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`. Nothing is spawned until `begin`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            cfg: None,
            frames_written: 0,
            unfinished_output: false,
        }
    }

    fn spawn_encoder(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        if !is_ffmpeg_on_path() {
            return Err(ReelError::encoder_open(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }
        if !ffmpeg_has_encoder(VIDEO_CODEC) {
            return Err(ReelError::encoder_open(format!(
                "ffmpeg on PATH was built without the {VIDEO_CODEC} encoder"
            )));
        }

        let g = cfg.geometry;
        let out_pix_fmt = if g.is_even() { "yuv420p" } else { "yuv444p" };

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        // Existing outputs were already refused in `begin` when overwriting is disabled, and the
        // pre-flight open may have just created the file.
        cmd.arg("-y");
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgb24",
            "-s",
            &g.to_string(),
        ]);
        push_input_fps(&mut cmd, cfg.fps);
        cmd.args(["-i", "pipe:0"]);
        cmd.args([
            "-an",
            "-c:v",
            VIDEO_CODEC,
            "-pix_fmt",
            out_pix_fmt,
            "-movflags",
            "+faststart",
        ]);
        cmd.arg(&self.opts.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            ReelError::encoder_open(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ReelError::encoder_open("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ReelError::encoder_open("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.unfinished_output = true;

        if let Some(child) = self.child.as_mut()
            && let Ok(Some(status)) = child.try_wait()
        {
            let detail = self.reap_stderr();
            return Err(ReelError::encoder_open(format!(
                "ffmpeg exited during startup with status {status}: {detail}"
            )));
        }

        tracing::debug!(
            path = %self.opts.out_path.display(),
            geometry = %g,
            fps = %cfg.fps,
            pix_fmt = out_pix_fmt,
            "ffmpeg encoder started"
        );

        self.cfg = Some(cfg);
        self.frames_written = 0;
        Ok(())
    }

    /// Close stdin, wait for ffmpeg and return its trimmed stderr.
    fn reap_stderr(&mut self) -> String {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.wait();
        }
        let bytes = match self.stderr_drain.take() {
            Some(handle) => handle.join().ok().and_then(|r| r.ok()).unwrap_or_default(),
            None => Vec::new(),
        };
        self.cfg = None;
        String::from_utf8_lossy(&bytes).trim().to_owned()
    }

    fn kill_child(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Some(handle) = self.stderr_drain.take() {
            let _ = handle.join();
        }
        self.cfg = None;
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        if self.child.is_some() {
            return Err(ReelError::encoder_open("ffmpeg sink already started"));
        }
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(ReelError::encoder_open("fps must be non-zero"));
        }
        let g = cfg.geometry;
        if g.width == 0 || g.height == 0 {
            return Err(ReelError::encoder_open(
                "ffmpeg sink width/height must be non-zero",
            ));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(ReelError::encoder_open(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        let created = preflight_output(&self.opts.out_path)?;

        let res = self.spawn_encoder(cfg);
        if res.is_err() {
            self.kill_child();
            self.unfinished_output = false;
            if created {
                let _ = std::fs::remove_file(&self.opts.out_path);
            }
        }
        res
    }

    fn push_frame(&mut self, frame: &Frame) -> ReelResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| ReelError::encode("ffmpeg sink not started"))?;

        if frame.geometry() != cfg.geometry {
            return Err(ReelError::FrameSizeMismatch {
                expected: cfg.geometry,
                actual: frame.geometry(),
                context: format!("frame {}", self.frames_written),
            });
        }
        if frame.data.len() != cfg.geometry.rgb8_len() {
            return Err(ReelError::encode(
                "frame.data size mismatch with width*height*3",
            ));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ReelError::encode("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        if let Err(e) = stdin.write_all(&frame.data) {
            if self.frames_written == 0 {
                // ffmpeg gave up before accepting anything: it never opened the output.
                let detail = self.reap_stderr();
                return Err(ReelError::encoder_open(format!(
                    "ffmpeg rejected the output before the first frame ({e}): {detail}"
                )));
            }
            return Err(ReelError::encode(format!(
                "failed to write frame to ffmpeg stdin: {e}"
            )));
        }
        self.frames_written += 1;
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| ReelError::encode("ffmpeg sink not started"))?;

        let status = child
            .wait()
            .map_err(|e| ReelError::encode(format!("failed to wait for ffmpeg to finish: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| ReelError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| ReelError::encode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        self.cfg = None;
        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(ReelError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        self.unfinished_output = false;
        Ok(())
    }

    fn abort(&mut self) -> ReelResult<()> {
        self.kill_child();
        if std::mem::take(&mut self.unfinished_output) && self.opts.remove_on_abort {
            match std::fs::remove_file(&self.opts.out_path) {
                Ok(()) => {
                    tracing::debug!(path = %self.opts.out_path.display(), "removed partial output")
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(ReelError::encode(format!(
                        "failed to remove partial output '{}': {e}",
                        self.opts.out_path.display()
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        if self.child.is_some() {
            self.kill_child();
        }
    }
}

fn push_input_fps(cmd: &mut Command, fps: Fps) {
    // For rawvideo input, `-r` before `-i` sets the input framerate.
    cmd.args(["-r", &format!("{}/{}", fps.num, fps.den)]);
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            ReelError::encoder_open(format!(
                "failed to create output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }
    Ok(())
}

/// Open `path` for writing without truncating it. Returns `true` when the file was created.
fn preflight_output(path: &Path) -> ReelResult<bool> {
    let existed = path.exists();
    std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|e| {
            ReelError::encoder_open(format!(
                "output path '{}' is not writable: {e}",
                path.display()
            ))
        })?;
    Ok(!existed)
}

/// Return `true` when `ffmpeg -encoders` lists `name`.
fn ffmpeg_has_encoder(name: &str) -> bool {
    let Ok(out) = Command::new("ffmpeg")
        .args(["-hide_banner", "-encoders"])
        .stderr(Stdio::null())
        .output()
    else {
        return false;
    };
    String::from_utf8_lossy(&out.stdout)
        .lines()
        .any(|line| line.split_whitespace().nth(1) == Some(name))
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
