//! Movie assembly and video export.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};

use kino_core::Frame;
use thiserror::Error;

/// Errors that can occur while persisting or exporting a movie.
#[derive(Error, Debug)]
pub enum MovieError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("frame image error: {0}")]
    Frame(#[from] kino_core::TextureError),

    #[error("video encoder failed: {0}")]
    Encoder(String),
}

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// A logical collection of rendered frames that can be exported as a video.
///
/// Frames are persisted as numbered images in a uniquely-named temporary
/// directory, one per movie instance, deleted when the movie is dropped.
/// Export hands the image sequence to an external `ffmpeg` process; an
/// encoder failure aborts only the export, never the rendered frames.
pub struct Movie {
    width: u32,
    height: u32,
    framerate: u32,
    dir: PathBuf,
}

impl Movie {
    pub(crate) fn new(width: u32, height: u32, framerate: u32) -> Result<Self, MovieError> {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!("kino_movie_{}_{id}", std::process::id()));
        if dir.exists() {
            std::fs::remove_dir_all(&dir)?;
        }
        std::fs::create_dir_all(&dir)?;

        log::debug!("Movie frame directory: {}", dir.display());

        Ok(Self {
            width,
            height,
            framerate,
            dir,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn framerate(&self) -> u32 {
        self.framerate
    }

    fn frame_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{index}.png"))
    }

    /// Persist a single frame into the movie's frame directory.
    pub fn write_frame(&self, frame: &Frame, index: usize) -> Result<(), MovieError> {
        frame.save(&self.frame_path(index))?;
        Ok(())
    }

    /// Read a previously written frame back.
    pub fn load_frame(&self, index: usize) -> Result<Frame, MovieError> {
        Ok(Frame::load(&self.frame_path(index))?)
    }

    /// Export the frame sequence as a video via `ffmpeg`. The `.mp4`
    /// extension is appended to `path`.
    pub fn export(&self, path: &Path) -> Result<(), MovieError> {
        let mut output = path.to_path_buf();
        output.set_extension("mp4");
        log::info!("Exporting movie: {}", output.display());

        let pattern = self.dir.join("%d.png");
        let status = Command::new("ffmpeg")
            .arg("-y")
            .args(["-v", "-8"])
            .args(["-framerate", &self.framerate.to_string()])
            .args(["-f", "image2"])
            .arg("-i")
            .arg(&pattern)
            .args(["-c", "h264"])
            .args(["-pix_fmt", "yuv420p"])
            .args(["-b:v", "32768k"])
            .arg(&output)
            .status()
            .map_err(|err| MovieError::Encoder(format!("could not start ffmpeg: {err}")))?;

        if !status.success() {
            return Err(MovieError::Encoder(format!("ffmpeg exited with {status}")));
        }
        Ok(())
    }
}

impl Drop for Movie {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_dir_all(&self.dir) {
            log::warn!(
                "Could not clean up movie directory {}: {err}",
                self.dir.display()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kino_core::Rgba;

    #[test]
    fn test_write_and_load_frame() {
        let movie = Movie::new(4, 4, 30).unwrap();
        let mut frame = Frame::new(4, 4);
        frame.set(1, 2, Rgba::opaque(9, 8, 7));

        movie.write_frame(&frame, 3).unwrap();
        let loaded = movie.load_frame(3).unwrap();
        assert_eq!(loaded, frame);
    }

    #[test]
    fn test_temp_dir_unique_and_cleaned() {
        let first = Movie::new(2, 2, 30).unwrap();
        let second = Movie::new(2, 2, 30).unwrap();
        assert_ne!(first.dir, second.dir);

        let dir = first.dir.clone();
        assert!(dir.exists());
        drop(first);
        assert!(!dir.exists());
        drop(second);
    }

    #[test]
    fn test_missing_frame_is_error() {
        let movie = Movie::new(2, 2, 30).unwrap();
        assert!(movie.load_frame(0).is_err());
    }
}
