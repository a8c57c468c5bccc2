//! Simulation statistics collection and reporting.
//!
//! Tracks cycle counts, reset and stall cycles, and how often the arithmetic
//! units took their bounded paths (forced-zero products, normalization
//! outcomes of the adder).

use std::ops::AddAssign;
use std::time::Instant;

use crate::core::units::adder::Normalization;

/// Statistics for one MAC unit (or a whole row, once merged).
#[derive(Clone, Debug)]
pub struct MacStats {
    start_time: Instant,
    pub cycles: u64,
    pub reset_cycles: u64,
    pub stall_cycles: u64,

    pub products: u64,
    /// Products forced to zero by a zero operand that was latched since the
    /// last reset. Reset-state contents of the multiplier are not counted.
    pub zero_products: u64,

    pub norm_shift_right: u64,
    pub norm_aligned: u64,
    pub norm_shift_left1: u64,
    pub norm_shift_left2: u64,
    pub norm_cancelled: u64,
    pub norm_underflow: u64,
}

impl Default for MacStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            reset_cycles: 0,
            stall_cycles: 0,
            products: 0,
            zero_products: 0,
            norm_shift_right: 0,
            norm_aligned: 0,
            norm_shift_left1: 0,
            norm_shift_left2: 0,
            norm_cancelled: 0,
            norm_underflow: 0,
        }
    }
}

impl MacStats {
    /// Counts one adder evaluation by its normalization path.
    pub fn record_add(&mut self, normalization: Normalization) {
        let counter = match normalization {
            Normalization::ShiftRight => &mut self.norm_shift_right,
            Normalization::Aligned => &mut self.norm_aligned,
            Normalization::ShiftLeft1 => &mut self.norm_shift_left1,
            Normalization::ShiftLeft2 => &mut self.norm_shift_left2,
            Normalization::Cancelled => &mut self.norm_cancelled,
            Normalization::Underflow => &mut self.norm_underflow,
        };
        *counter += 1;
    }

    /// Total adder evaluations.
    pub fn additions(&self) -> u64 {
        self.norm_shift_right
            + self.norm_aligned
            + self.norm_shift_left1
            + self.norm_shift_left2
            + self.norm_cancelled
            + self.norm_underflow
    }

    /// Prints a formatted summary of the collected statistics.
    pub fn print(&self) {
        let seconds = self.start_time.elapsed().as_secs_f64();
        let active = self
            .cycles
            .saturating_sub(self.reset_cycles + self.stall_cycles);
        let adds = self.additions().max(1) as f64;
        let khz = if seconds > 0.0 {
            (self.cycles as f64 / seconds) / 1000.0
        } else {
            0.0
        };

        println!("\n==========================================================");
        println!("FP8 MAC SIMULATION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {:.4} s", seconds);
        println!("sim_cycles               {}", self.cycles);
        println!("sim_freq                 {:.2} kHz", khz);
        println!("cycles_reset             {}", self.reset_cycles);
        println!("cycles_stalled           {}", self.stall_cycles);
        println!("cycles_active            {}", active);
        println!("----------------------------------------------------------");
        println!("mul_products             {}", self.products);
        println!("mul_zero_forced          {}", self.zero_products);
        println!("----------------------------------------------------------");
        println!("add_total                {}", self.additions());
        let row = |name: &str, n: u64| {
            println!("{:<24} {:<10} ({:.2}%)", name, n, n as f64 / adds * 100.0);
        };
        row("add_norm_shift_right", self.norm_shift_right);
        row("add_norm_aligned", self.norm_aligned);
        row("add_norm_shift_left1", self.norm_shift_left1);
        row("add_norm_shift_left2", self.norm_shift_left2);
        row("add_cancelled", self.norm_cancelled);
        row("add_window_underflow", self.norm_underflow);
        println!("==========================================================");
    }
}

impl AddAssign<&MacStats> for MacStats {
    /// Merges another unit's counters into this one. Cycle counts add up
    /// too, so a merged row reports unit-cycles.
    fn add_assign(&mut self, other: &MacStats) {
        self.cycles += other.cycles;
        self.reset_cycles += other.reset_cycles;
        self.stall_cycles += other.stall_cycles;
        self.products += other.products;
        self.zero_products += other.zero_products;
        self.norm_shift_right += other.norm_shift_right;
        self.norm_aligned += other.norm_aligned;
        self.norm_shift_left1 += other.norm_shift_left1;
        self.norm_shift_left2 += other.norm_shift_left2;
        self.norm_cancelled += other.norm_cancelled;
        self.norm_underflow += other.norm_underflow;
        self.start_time = self.start_time.min(other.start_time);
    }
}
