//! GPIO glue for the display's parallel interface
//!
//! The data bus uses Flex pins: outputs while writing, inputs while the
//! display drives the bus during a /RD read-back. Control lines are plain
//! outputs, idle levels set at construction.

use embassy_rp::gpio::{Flex, Output};

use flipterm_drivers::vfd::ParallelBus;

/// RP2040 pin bundle implementing [`ParallelBus`]
pub struct RpParallelBus {
    /// D0..D7, LSB first
    data: [Flex<'static>; 8],
    wr: Output<'static>,
    cs: Output<'static>,
    a0: Output<'static>,
    rd: Output<'static>,
}

impl RpParallelBus {
    /// Wrap the GPIO pins; data pins start as driven-low outputs
    pub fn new(
        mut data: [Flex<'static>; 8],
        wr: Output<'static>,
        cs: Output<'static>,
        a0: Output<'static>,
        rd: Output<'static>,
    ) -> Self {
        for pin in &mut data {
            pin.set_low();
            pin.set_as_output();
        }
        Self { data, wr, cs, a0, rd }
    }
}

impl ParallelBus for RpParallelBus {
    fn write_data(&mut self, value: u8) {
        for (bit, pin) in self.data.iter_mut().enumerate() {
            pin.set_as_output();
            if value & (1 << bit) != 0 {
                pin.set_high();
            } else {
                pin.set_low();
            }
        }
    }

    fn read_data(&mut self) -> u8 {
        let mut value = 0;
        for (bit, pin) in self.data.iter_mut().enumerate() {
            pin.set_as_input();
            if pin.is_high() {
                value |= 1 << bit;
            }
        }
        value
    }

    fn set_wr(&mut self, high: bool) {
        self.wr.set_level(high.into());
    }

    fn set_cs(&mut self, high: bool) {
        self.cs.set_level(high.into());
    }

    fn set_a0(&mut self, high: bool) {
        self.a0.set_level(high.into());
    }

    fn set_rd(&mut self, high: bool) {
        self.rd.set_level(high.into());
    }
}
