#![no_std]
#![no_main]

use arduino_hal::prelude::*;
use panic_halt as _;
use tm1637::{OpenDrain, Tm1637};

const DEFAULT_BRIGHTNESS: u8 = 7;

#[arduino_hal::entry]
fn main() -> ! {
    let dp = arduino_hal::Peripherals::take().unwrap();
    let pins = arduino_hal::pins!(dp);
    let mut serial = arduino_hal::default_serial!(dp, pins, 57600);

    let clk = pins.d3.into_output_high();
    let dio = OpenDrain::new(pins.d2.into_opendrain_high());
    let lid = pins.d4.into_pull_up_input();

    let mut display = Tm1637::new(clk, dio, arduino_hal::Delay::new());
    display.initialize(true, DEFAULT_BRIGHTNESS).unwrap();
    display.clear().unwrap();

    ufmt::uwriteln!(&mut serial, "Ramping brightness...").unwrap_infallible();
    display.display_number(1438).unwrap();
    for brightness in 0..=tm1637::MAX_BRIGHTNESS {
        display.set_brightness(brightness).unwrap();
        arduino_hal::delay_ms(200);
    }

    ufmt::uwriteln!(&mut serial, "Counting up...").unwrap_infallible();
    let mut count: u16 = 0;
    loop {
        // display goes dark while the lid is open
        if lid.is_high() {
            display.enable(false).unwrap();
        } else {
            display.enable(true).unwrap();
            let sent = display.display_number(count).unwrap();
            if !sent.is_acknowledged() {
                ufmt::uwriteln!(&mut serial, "display not responding").unwrap_infallible();
            }
            display.display_colon(count % 2 == 0).unwrap();
            count = (count + 1) % 10000;
        }

        arduino_hal::delay_ms(500);
    }
}
