//! Instruction and timer clock.
use std::time::Duration;

use log::trace;

use crate::arch;
use crate::chip::Chip;
use crate::error::Result;

/// What a stretch of clock time did to the machine.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Instructions executed.
    pub cycles: u64,
    /// Timer decrements applied.
    pub timer_ticks: u64,
    /// Timer periods during which the sound timer was running.
    pub tones: u64,
}

impl Tick {
    fn merge(&mut self, other: Tick) {
        self.cycles += other.cycles;
        self.timer_ticks += other.timer_ticks;
        self.tones += other.tones;
    }
}

/// Drives a [`Chip`] at a fixed instruction rate while the delay and sound
/// timers count down at their own rate.
///
/// The clock has no notion of wall time. Callers feed it elapsed time with
/// [`Clock::run_for`] or step it one instruction at a time with
/// [`Clock::tick`]. Timer periods are counted in whole instructions with an
/// exact remainder, so the two rates stay independent and never drift.
pub struct Clock {
    cpu_hz: u64,
    timer_hz: u64,
    /// Elapsed nanoseconds scaled by `cpu_hz`, not yet spent on an instruction.
    cpu_acc: u128,
    /// Instructions executed scaled by `timer_hz`, not yet spent on a timer tick.
    timer_acc: u64,
}

const NANOS_IN_SECOND: u128 = 1_000_000_000;

fn period(hz: u64) -> Duration {
    Duration::from_nanos(NANOS_IN_SECOND as u64 / hz)
}

impl Clock {
    /// Instructions at `cpu_hz`, timers at 60 Hz.
    pub fn new(cpu_hz: u32) -> Self {
        Self::with_rates(cpu_hz, arch::TIMER_HZ)
    }

    pub fn with_rates(cpu_hz: u32, timer_hz: u32) -> Self {
        Clock {
            cpu_hz: cpu_hz.max(1) as u64,
            timer_hz: timer_hz.max(1) as u64,
            cpu_acc: 0,
            timer_acc: 0,
        }
    }

    pub fn cpu_period(&self) -> Duration {
        period(self.cpu_hz)
    }

    pub fn timer_period(&self) -> Duration {
        period(self.timer_hz)
    }

    /// Set the clock state back to zero.
    pub fn reset(&mut self) {
        self.cpu_acc = 0;
        self.timer_acc = 0;
    }

    /// Execute one instruction, then apply every timer period that has
    /// elapsed during it.
    pub fn tick(&mut self, chip: &mut Chip) -> Result<Tick> {
        chip.cycle()?;

        let mut tick = Tick { cycles: 1, ..Tick::default() };
        self.timer_acc += self.timer_hz;
        while self.timer_acc >= self.cpu_hz {
            self.timer_acc -= self.cpu_hz;
            tick.timer_ticks += 1;
            if chip.cycle_timers() {
                tick.tones += 1;
            }
        }
        Ok(tick)
    }

    /// Run as many instructions as fit into `elapsed`, carrying the remainder
    /// over to the next call.
    pub fn run_for(&mut self, chip: &mut Chip, elapsed: Duration) -> Result<Tick> {
        self.cpu_acc += elapsed.as_nanos() * self.cpu_hz as u128;

        let mut total = Tick::default();
        while self.cpu_acc >= NANOS_IN_SECOND {
            self.cpu_acc -= NANOS_IN_SECOND;
            total.merge(self.tick(chip)?);
        }
        trace!("run_for {:?}: {:?}", elapsed, total);
        Ok(total)
    }

    /// Run exactly `steps` instructions.
    pub fn run_steps(&mut self, chip: &mut Chip, steps: u32) -> Result<Tick> {
        let mut total = Tick::default();
        for _ in 0..steps {
            total.merge(self.tick(chip)?);
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Clock, Tick};
    use crate::chip::Chip;
    use crate::error::Fault;
    use crate::profile::Profile;

    fn bytes(code: &[u16]) -> Vec<u8> {
        code.iter().flat_map(|w| w.to_be_bytes()).collect()
    }

    /// Machine with the sound timer set to `st`, spinning at 0x204.
    fn sounding_chip(st: u8) -> Chip {
        let mut chip = Chip::new_seed(7, Profile::default());
        chip.load_program(&bytes(&[
            0x6000 | st as u16, // LD V0, st
            0xF018,             // LD ST, V0
            0x1204,             // JP 0x204
        ])).unwrap();
        chip.cycle().unwrap();
        chip.cycle().unwrap();
        assert_eq!(chip.sound_timer(), st);
        chip
    }

    #[test]
    fn sound_timer_tones() {
        let mut chip = sounding_chip(3);
        let mut clock = Clock::with_rates(60, 60);

        let mut tones = 0;
        for _ in 0..3 {
            let tick = clock.tick(&mut chip).unwrap();
            assert_eq!(tick.timer_ticks, 1);
            tones += tick.tones;
        }
        assert_eq!(tones, 3);
        assert_eq!(chip.sound_timer(), 0);

        let tick = clock.tick(&mut chip).unwrap();
        assert_eq!(tick, Tick { cycles: 1, timer_ticks: 1, tones: 0 });
        assert_eq!(chip.sound_timer(), 0);
    }

    #[test]
    fn timers_slower_than_cpu() {
        let mut chip = sounding_chip(10);
        let mut clock = Clock::with_rates(240, 60);

        let tick = clock.run_steps(&mut chip, 8).unwrap();
        assert_eq!(tick.cycles, 8);
        assert_eq!(tick.timer_ticks, 2);
        assert_eq!(chip.sound_timer(), 8);
        assert_eq!(chip.pc(), 0x204);
    }

    #[test]
    fn run_for_carries_remainder() {
        let mut chip = sounding_chip(0);
        let mut clock = Clock::with_rates(1000, 60);

        let tick = clock.run_for(&mut chip, Duration::from_micros(2500)).unwrap();
        assert_eq!(tick.cycles, 2);

        let tick = clock.run_for(&mut chip, Duration::from_micros(500)).unwrap();
        assert_eq!(tick.cycles, 1);
    }

    #[test]
    fn default_timer_rate() {
        let mut chip = sounding_chip(0);
        let mut clock = Clock::new(500);
        assert_eq!(clock.timer_period(), Duration::from_nanos(16_666_666));
        assert_eq!(clock.cpu_period(), Duration::from_millis(2));

        // One second of emulated time.
        let tick = clock.run_for(&mut chip, Duration::from_secs(1)).unwrap();
        assert_eq!(tick.cycles, 500);
        assert_eq!(tick.timer_ticks, 60);
    }

    #[test]
    fn tick_counts_past_u32() {
        let mut total = Tick { cycles: u32::MAX as u64, timer_ticks: u32::MAX as u64, tones: 0 };
        total.merge(Tick { cycles: 1, timer_ticks: 1, tones: 1 });
        assert_eq!(total.cycles, 1 << 32);
        assert_eq!(total.timer_ticks, 1 << 32);
        assert_eq!(total.tones, 1);
    }

    #[test]
    fn fault_stops_clock() {
        let mut chip = Chip::new_seed(7, Profile::default());
        chip.load_program(&bytes(&[0x00EE])).unwrap();
        let mut clock = Clock::new(500);

        let fault = Fault::StackUnderflow { pc: 0x200 };
        assert_eq!(clock.run_for(&mut chip, Duration::from_millis(10)), Err(fault));
        assert_eq!(clock.tick(&mut chip), Err(fault));
    }
}
