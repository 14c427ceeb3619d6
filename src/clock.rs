/// Elapsed-time source for one activation of the backdrop.
///
/// The start timestamp is latched from the first frame, so the first frame
/// always sees `t = 0` whatever the host's timestamp origin is.
#[derive(Debug, Clone, Copy)]
pub struct AnimationClock {
    start_ms: Option<f64>,
    time_scale: f64,
}

impl AnimationClock {
    pub fn new(time_scale: f64) -> Self {
        Self {
            start_ms: None,
            time_scale,
        }
    }

    /// Scaled elapsed time for a frame timestamp in milliseconds.
    ///
    /// Never negative: timestamps before the latched start read as zero.
    pub fn elapsed(&mut self, now_ms: f64) -> f64 {
        let start = *self.start_ms.get_or_insert(now_ms);
        ((now_ms - start).max(0.0)) * self.time_scale
    }

    pub fn has_started(&self) -> bool {
        self.start_ms.is_some()
    }
}
