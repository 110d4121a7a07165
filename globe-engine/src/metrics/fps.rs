// fps.rs - Frame rate over ~1s windows
//
// The window closes on the first frame at or past window_ms after the
// previous sample, so its true length varies with frame timing. The rate
// divides by the measured elapsed time, not by the nominal window.

#[derive(Clone, Debug)]
pub struct FpsCounter {
    window_ms: f64,
    frames: u32,
    last: f64,
    fps: u32,
}

impl FpsCounter {
    pub fn new(start: f64, window_ms: f64, initial: u32) -> Self {
        Self {
            window_ms,
            frames: 0,
            last: start,
            fps: initial,
        }
    }

    /// Count a frame at `now`. Returns the new rate when a window closes.
    pub fn frame(&mut self, now: f64) -> Option<u32> {
        self.frames += 1;

        let elapsed = now - self.last;
        if elapsed < self.window_ms || elapsed <= 0.0 {
            return None;
        }

        self.fps = (self.frames as f64 * 1000.0 / elapsed).round() as u32;
        self.frames = 0;
        self.last = now;
        Some(self.fps)
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}
