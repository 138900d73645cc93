//! Drives a simulated first-order plant to a setpoint with both numeric backends.
//!
//! The plant follows `dy/dt = (gain * u - y) / tau`, integrated with forward Euler at the same
//! period the controller runs at.

use fixed::types::I16F16;
use pidloop::{num::PidValue, pid::PidController};

const DT: f64 = 0.01;
const STEPS: usize = 600;
const SETPOINT: f64 = 25.0;

struct Plant {
    gain: f64,
    tau: f64,
    y: f64,
}

impl Plant {
    fn step(&mut self, u: f64) -> f64 {
        self.y += (self.gain * u - self.y) / self.tau * DT;
        self.y
    }
}

fn simulate<T: PidValue>(name: &str, to: impl Fn(f64) -> T, from: impl Fn(T) -> f64) {
    let mut pid = PidController::new(to(1.2), to(2.0), to(0.05), to(0.0), to(12.0));
    pid.set_setpoint(to(SETPOINT));

    let mut plant = Plant {
        gain: 3.0,
        tau: 0.8,
        y: 0.0,
    };

    let mut y = plant.y;
    for step in 0..STEPS {
        let u = from(pid.update(to(y), to(DT)));
        y = plant.step(u);

        if step % 50 == 0 {
            println!("[{name}] t={:5.2}s  u={u:6.3}  y={y:7.3}", step as f64 * DT);
        }
    }

    println!("[{name}] settled at y={y:.3} (setpoint {SETPOINT})");
}

fn main() {
    simulate("f32", |x| x as f32, f64::from);
    simulate("I16F16", I16F16::from_num, |x: I16F16| x.to_num::<f64>());
}
