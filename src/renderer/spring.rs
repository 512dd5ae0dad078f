/// Physical parameters of a damped spring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    pub damping: f64,
    pub mass: f64,
    pub stiffness: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            damping: 10.0,
            mass: 1.0,
            stiffness: 100.0,
        }
    }
}

impl SpringConfig {
    pub fn with_damping(damping: f64) -> Self {
        Self {
            damping,
            ..Default::default()
        }
    }
}

/// Largest simulation step in milliseconds
const MAX_STEP_MS: f64 = 64.0;
const REST_THRESHOLD: f64 = 0.005;
/// Frames a settled spring must stay inside the threshold
const SETTLE_WINDOW: u32 = 20;
const MAX_SETTLE_FRAMES: u32 = 100_000;

#[derive(Debug, Clone, Copy)]
struct SpringState {
    last_timestamp: f64,
    current: f64,
    velocity: f64,
}

/// A spring animation from 0 to 1, optionally stretched to a fixed frame count
#[derive(Debug, Clone, Copy)]
pub struct Spring {
    config: SpringConfig,
    fps: f64,
    duration_in_frames: Option<f64>,
    natural_duration: f64,
}

impl Spring {
    pub fn new(config: SpringConfig, fps: u32) -> Self {
        let fps = fps.max(1) as f64;
        Self {
            config,
            fps,
            duration_in_frames: None,
            natural_duration: measure(config, fps),
        }
    }

    /// Stretch the animation so it settles after `frames` frames
    pub fn with_duration(mut self, frames: u32) -> Self {
        self.duration_in_frames = Some(frames as f64);
        self
    }

    /// Frames the unstretched spring needs to come to rest
    pub fn natural_duration(&self) -> f64 {
        self.natural_duration
    }

    /// Progress at `frame`, 0 at or before frame 0
    pub fn progress(&self, frame: f64) -> f64 {
        let scaled = match self.duration_in_frames {
            Some(duration) => {
                if frame > duration {
                    return 1.0;
                }
                if duration <= 0.0 {
                    return 1.0;
                }
                frame / (duration / self.natural_duration)
            }
            None => frame,
        };
        simulate(self.config, self.fps, scaled)
    }

    /// Progress mapped linearly onto `from..to`
    pub fn value(&self, frame: f64, from: f64, to: f64) -> f64 {
        let p = self.progress(frame);
        from + (to - from) * p
    }
}

fn advance(state: SpringState, now: f64, config: SpringConfig) -> SpringState {
    let delta = (now - state.last_timestamp).min(MAX_STEP_MS);
    let c = config.damping;
    let m = config.mass;
    let k = config.stiffness;

    let v0 = -state.velocity;
    let x0 = 1.0 - state.current;
    let zeta = c / (2.0 * (k * m).sqrt());
    let omega0 = (k / m).sqrt();
    let t = delta / 1000.0;

    let (current, velocity) = if zeta < 1.0 {
        let omega1 = omega0 * (1.0 - zeta * zeta).sqrt();
        let sin1 = (omega1 * t).sin();
        let cos1 = (omega1 * t).cos();
        let envelope = (-zeta * omega0 * t).exp();
        let frag = envelope * (sin1 * ((v0 + zeta * omega0 * x0) / omega1) + x0 * cos1);
        let position = 1.0 - frag;
        let velocity = zeta * omega0 * frag
            - envelope * (cos1 * (v0 + zeta * omega0 * x0) - omega1 * x0 * sin1);
        (position, velocity)
    } else {
        let envelope = (-omega0 * t).exp();
        let position = 1.0 - envelope * (x0 + (v0 + omega0 * x0) * t);
        let velocity = envelope * (v0 * (t * omega0 - 1.0) + t * x0 * omega0 * omega0);
        (position, velocity)
    };

    SpringState {
        last_timestamp: now,
        current,
        velocity,
    }
}

/// Step the spring frame by frame up to a possibly fractional frame
fn simulate(config: SpringConfig, fps: f64, frame: f64) -> f64 {
    let frame = frame.max(0.0);
    let whole = frame.floor() as u64;
    let remainder = frame - frame.floor();

    let mut state = SpringState {
        last_timestamp: 0.0,
        current: 0.0,
        velocity: 0.0,
    };
    for f in 0..=whole {
        let f = if f == whole {
            f as f64 + remainder
        } else {
            f as f64
        };
        state = advance(state, f / fps * 1000.0, config);
    }
    state.current
}

fn measure(config: SpringConfig, fps: f64) -> f64 {
    let off = |frame: u32| (simulate(config, fps, frame as f64) - 1.0).abs();

    let mut frame = 0;
    while off(frame) >= REST_THRESHOLD && frame < MAX_SETTLE_FRAMES {
        frame += 1;
    }

    let mut finished = frame;
    let mut stable = 0;
    while stable < SETTLE_WINDOW && frame < MAX_SETTLE_FRAMES {
        frame += 1;
        if off(frame) >= REST_THRESHOLD {
            stable = 0;
            finished = frame + 1;
        } else {
            stable += 1;
        }
    }
    finished as f64
}
