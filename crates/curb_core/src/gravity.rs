pub const DEFAULT_ACCELERATION: f32 = 9.8;
pub const DEFAULT_TERMINAL_VELOCITY: f32 = 50.0;

/// Downward velocity integrator. Positive `velocity_y` is downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityComponent {
    pub acceleration: f32,
    pub terminal_velocity: f32,
    velocity_y: f32,
}

impl GravityComponent {
    pub fn new(acceleration: f32, terminal_velocity: f32) -> Self {
        Self {
            acceleration,
            terminal_velocity: terminal_velocity.abs(),
            velocity_y: 0.0,
        }
    }

    /// Gravity only ever adds fall speed, up to the cap. Slowing down is
    /// the caller's job through [`reset_velocity`](Self::reset_velocity).
    pub fn apply_gravity(&mut self, dt: f32) {
        self.velocity_y = (self.velocity_y + self.acceleration * dt).min(self.terminal_velocity);
    }

    pub fn reset_velocity(&mut self) {
        self.velocity_y = 0.0;
    }

    pub fn velocity_y(&self) -> f32 {
        self.velocity_y
    }
}

impl Default for GravityComponent {
    fn default() -> Self {
        Self::new(DEFAULT_ACCELERATION, DEFAULT_TERMINAL_VELOCITY)
    }
}
