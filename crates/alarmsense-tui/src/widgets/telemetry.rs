//! Simulated host load for the status bar.
//!
//! Nothing here measures the machine. Each sample nudges CPU and RAM by a
//! bounded random step so the footer looks alive.

use rand::Rng;

const CPU_START: f64 = 12.0;
const CPU_STEP: f64 = 2.0;
const CPU_RANGE: (f64, f64) = (2.0, 95.0);

const RAM_START: f64 = 4.2;
const RAM_STEP: f64 = 0.15;
const RAM_RANGE: (f64, f64) = (2.0, 15.0);
pub const RAM_TOTAL_GB: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Telemetry {
    /// Percent.
    pub cpu: f64,
    /// Gigabytes in use out of [`RAM_TOTAL_GB`].
    pub ram_gb: f64,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self {
            cpu: CPU_START,
            ram_gb: RAM_START,
        }
    }
}

impl Telemetry {
    /// Advance one sample.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cpu = walk(self.cpu, rng.gen_range(-CPU_STEP..=CPU_STEP), CPU_RANGE);
        self.ram_gb = walk(self.ram_gb, rng.gen_range(-RAM_STEP..=RAM_STEP), RAM_RANGE);
    }

    pub fn cpu_label(&self) -> String {
        format!("CPU {:.0}%", self.cpu)
    }

    pub fn ram_label(&self) -> String {
        format!("RAM {:.1}/{RAM_TOTAL_GB:.0} GB", self.ram_gb)
    }
}

fn walk(value: f64, delta: f64, (lo, hi): (f64, f64)) -> f64 {
    (value + delta).clamp(lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn starts_at_baseline() {
        let t = Telemetry::default();
        assert_eq!(t.cpu_label(), "CPU 12%");
        assert_eq!(t.ram_label(), "RAM 4.2/16 GB");
    }

    #[test]
    fn steps_stay_bounded() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut t = Telemetry::default();
        for _ in 0..10_000 {
            let before = t;
            t.step(&mut rng);
            assert!((t.cpu - before.cpu).abs() <= CPU_STEP + f64::EPSILON);
            assert!((t.ram_gb - before.ram_gb).abs() <= RAM_STEP + 1e-9);
            assert!((CPU_RANGE.0..=CPU_RANGE.1).contains(&t.cpu));
            assert!((RAM_RANGE.0..=RAM_RANGE.1).contains(&t.ram_gb));
        }
    }

    #[test]
    fn clamps_at_the_edges() {
        assert!((walk(94.5, 2.0, CPU_RANGE) - 95.0).abs() < f64::EPSILON);
        assert!((walk(2.1, -0.15, RAM_RANGE) - 2.0).abs() < f64::EPSILON);
    }
}
