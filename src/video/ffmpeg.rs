use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::OnceLock;

use regex::Regex;
use tokio::process::Command;
use tracing::debug;

use super::{VideoTool, VideoToolError};
use crate::models::CandidateFrame;

/// Configuration for the ffmpeg-backed video tool
#[derive(Debug, Clone)]
pub struct FfmpegConfig {
    /// ffmpeg executable
    pub ffmpeg_bin: PathBuf,
    /// ffprobe executable
    pub ffprobe_bin: PathBuf,
    /// JPEG quality passed as `-q:v` (2 is near lossless)
    pub jpeg_quality: u8,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            ffmpeg_bin: PathBuf::from("ffmpeg"),
            ffprobe_bin: PathBuf::from("ffprobe"),
            jpeg_quality: 2,
        }
    }
}

impl FfmpegConfig {
    /// Defaults, with binaries overridable through FFMPEG_BIN and FFPROBE_BIN
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ffmpeg_bin: std::env::var_os("FFMPEG_BIN")
                .map(PathBuf::from)
                .unwrap_or(defaults.ffmpeg_bin),
            ffprobe_bin: std::env::var_os("FFPROBE_BIN")
                .map(PathBuf::from)
                .unwrap_or(defaults.ffprobe_bin),
            jpeg_quality: defaults.jpeg_quality,
        }
    }
}

/// Video tool backed by the ffmpeg and ffprobe command-line programs
#[derive(Debug, Clone)]
pub struct FfmpegTool {
    config: FfmpegConfig,
}

impl FfmpegTool {
    /// Verify that both binaries can be executed
    pub async fn locate(config: FfmpegConfig) -> Result<Self, VideoToolError> {
        for bin in [&config.ffmpeg_bin, &config.ffprobe_bin] {
            let tool = bin.display().to_string();
            let result = Command::new(bin).arg("-version").output().await;
            match result {
                Ok(output) if output.status.success() => {}
                Ok(_) => return Err(VideoToolError::MissingTool(tool)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(VideoToolError::MissingTool(tool));
                }
                Err(source) => return Err(VideoToolError::Spawn { tool, source }),
            }
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &FfmpegConfig {
        &self.config
    }

    fn ffmpeg(&self) -> Command {
        let mut cmd = Command::new(&self.config.ffmpeg_bin);
        cmd.kill_on_drop(true);
        cmd
    }

    /// Run a command to completion, failing on a non-zero exit
    async fn run(&self, tool: &Path, cmd: &mut Command) -> Result<Output, VideoToolError> {
        let tool = tool.display().to_string();
        let output = cmd
            .output()
            .await
            .map_err(|source| VideoToolError::Spawn {
                tool: tool.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(VideoToolError::Failed {
                tool,
                status: output.status.to_string(),
                stderr: stderr_tail(&output.stderr, 5),
            });
        }

        Ok(output)
    }
}

impl VideoTool for FfmpegTool {
    async fn probe_duration(&self, video: &Path) -> Result<f64, VideoToolError> {
        let mut cmd = Command::new(&self.config.ffprobe_bin);
        cmd.args(["-v", "error", "-show_entries", "format=duration"])
            .args(["-of", "default=noprint_wrappers=1:nokey=1"])
            .arg(video);

        let output = self.run(&self.config.ffprobe_bin, &mut cmd).await?;
        parse_duration(&String::from_utf8_lossy(&output.stdout))
    }

    async fn extract_interval_frames(
        &self,
        video: &Path,
        frames_dir: &Path,
        interval_seconds: f64,
        duration_seconds: f64,
    ) -> Result<Vec<CandidateFrame>, VideoToolError> {
        let mut cmd = self.ffmpeg();
        cmd.arg("-y")
            .arg("-i")
            .arg(video)
            .arg("-vf")
            .arg(format!("fps=1/{}", interval_seconds))
            .arg("-q:v")
            .arg(self.config.jpeg_quality.to_string())
            .arg(frames_dir.join("frame_%04d.jpg"));

        self.run(&self.config.ffmpeg_bin, &mut cmd).await?;

        let mut frames = Vec::new();
        for (frame_number, timestamp) in interval_instants(interval_seconds, duration_seconds) {
            let name = interval_frame_name(frame_number);
            if tokio::fs::try_exists(frames_dir.join(&name)).await.unwrap_or(false) {
                frames.push(CandidateFrame::new(timestamp, name));
            } else {
                debug!("No interval frame written for {:.2}s ({})", timestamp, name);
            }
        }

        Ok(frames)
    }

    async fn detect_scene_changes(&self, video: &Path, threshold: f64) -> Result<Vec<f64>, VideoToolError> {
        let mut cmd = self.ffmpeg();
        cmd.arg("-i")
            .arg(video)
            .arg("-vf")
            .arg(format!("select='gt(scene,{})',showinfo", threshold))
            .args(["-f", "null", "-"]);

        let output = self.run(&self.config.ffmpeg_bin, &mut cmd).await?;
        Ok(parse_scene_times(&String::from_utf8_lossy(&output.stderr)))
    }

    async fn extract_still(
        &self,
        video: &Path,
        timestamp_seconds: f64,
        output: &Path,
    ) -> Result<(), VideoToolError> {
        let mut cmd = self.ffmpeg();
        cmd.arg("-y")
            .arg("-ss")
            .arg(timestamp_seconds.to_string())
            .arg("-i")
            .arg(video)
            .args(["-frames:v", "1"])
            .arg("-q:v")
            .arg(self.config.jpeg_quality.to_string())
            .arg(output);

        self.run(&self.config.ffmpeg_bin, &mut cmd).await?;

        if !tokio::fs::try_exists(output).await.unwrap_or(false) {
            return Err(VideoToolError::MissingStill {
                path: output.to_path_buf(),
                timestamp_seconds,
            });
        }
        Ok(())
    }
}

/// File name ffmpeg gives the n-th (1-based) interval frame
pub fn interval_frame_name(frame_number: usize) -> String {
    format!("frame_{:04}.jpg", frame_number)
}

/// Frame numbers and instants of the fixed-interval pass, strictly before `duration`
pub fn interval_instants(interval_seconds: f64, duration_seconds: f64) -> Vec<(usize, f64)> {
    if interval_seconds <= 0.0 {
        return vec![];
    }
    (0..)
        .map(|i| (i + 1, i as f64 * interval_seconds))
        .take_while(|&(_, t)| t < duration_seconds)
        .collect()
}

/// Parse ffprobe's bare duration output
pub fn parse_duration(stdout: &str) -> Result<f64, VideoToolError> {
    let trimmed = stdout.trim();
    match trimmed.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => Ok(seconds),
        _ => Err(VideoToolError::InvalidDuration(trimmed.to_string())),
    }
}

/// Pull `pts_time` values out of showinfo filter logs
pub fn parse_scene_times(stderr: &str) -> Vec<f64> {
    static PTS_TIME: OnceLock<Regex> = OnceLock::new();
    let pts_time = PTS_TIME.get_or_init(|| Regex::new(r"pts_time:([\d.]+)").expect("valid regex"));

    stderr
        .lines()
        .filter_map(|line| pts_time.captures(line))
        .filter_map(|caps| caps[1].parse::<f64>().ok())
        .collect()
}

fn stderr_tail(stderr: &[u8], max_lines: usize) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().collect();
    lines[lines.len().saturating_sub(max_lines)..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("125.400000\n").unwrap(), 125.4);
        assert!(matches!(
            parse_duration("N/A"),
            Err(VideoToolError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_parse_scene_times() {
        let stderr = "\
[Parsed_showinfo_1 @ 0x1] n:   0 pts:  12800 pts_time:1.0     duration: 512\n\
frame=    2 fps=0.0 q=-0.0 size=N/A\n\
[Parsed_showinfo_1 @ 0x1] n:   1 pts: 160256 pts_time:12.52   duration: 512\n";

        assert_eq!(parse_scene_times(stderr), vec![1.0, 12.52]);
        assert!(parse_scene_times("nothing here").is_empty());
    }

    #[test]
    fn test_interval_instants_stop_before_duration() {
        let instants = interval_instants(5.0, 15.0);
        assert_eq!(instants, vec![(1, 0.0), (2, 5.0), (3, 10.0)]);
        assert!(interval_instants(0.0, 15.0).is_empty());
    }

    #[test]
    fn test_interval_frame_name() {
        assert_eq!(interval_frame_name(1), "frame_0001.jpg");
        assert_eq!(interval_frame_name(12345), "frame_12345.jpg");
    }

    #[test]
    fn test_stderr_tail() {
        assert_eq!(stderr_tail(b"a\nb\nc\nd", 2), "c\nd");
        assert_eq!(stderr_tail(b"only", 5), "only");
    }

    #[tokio::test]
    async fn test_locate_missing_binary() {
        let config = FfmpegConfig {
            ffmpeg_bin: PathBuf::from("/nonexistent/ffmpeg-for-tests"),
            ..Default::default()
        };
        let result = FfmpegTool::locate(config).await;
        assert!(matches!(result, Err(VideoToolError::MissingTool(_))));
    }
}
