use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::digital::{
    Mock as PinMock, State as PinState, Transaction as PinTransaction,
};
use embedded_hal_mock::eh1::MockError;
use std::io::ErrorKind;
use tm1637::{Ack, Bus, OpenDrain, Tm1637, Tm1637Error};

fn level(high: bool) -> PinState {
    if high {
        PinState::High
    } else {
        PinState::Low
    }
}

fn bus(clk: &PinMock, dio: &PinMock) -> Bus<PinMock, OpenDrain<PinMock>, NoopDelay> {
    Bus::new(clk.clone(), OpenDrain::new(dio.clone()), NoopDelay, 5)
}

/// Clock edges of one byte: eight data bits, then the acknowledge clock.
fn clock_for_byte() -> Vec<PinTransaction> {
    let mut clk = Vec::new();
    for _ in 0..8 {
        clk.push(PinTransaction::set(PinState::Low));
        clk.push(PinTransaction::set(PinState::High));
    }
    clk.push(PinTransaction::set(PinState::Low));
    clk.push(PinTransaction::set(PinState::High));
    clk.push(PinTransaction::set(PinState::Low));
    clk
}

/// Data line activity of one byte, LSB first, with the chip answering `ack`.
fn data_for_byte(value: u8, ack: bool) -> Vec<PinTransaction> {
    let mut dio: Vec<PinTransaction> = (0..8)
        .map(|bit| PinTransaction::set(level(value & (1 << bit) != 0)))
        .collect();
    dio.push(PinTransaction::set(PinState::High));
    dio.push(PinTransaction::get(level(ack)));
    if ack {
        dio.push(PinTransaction::set(PinState::Low));
    }
    dio
}

#[test]
fn start_pulls_data_low_under_high_clock() {
    let mut clk = PinMock::new(&[PinTransaction::set(PinState::High)]);
    let mut dio = PinMock::new(&[
        PinTransaction::set(PinState::High),
        PinTransaction::set(PinState::Low),
    ]);

    bus(&clk, &dio).start().unwrap();

    clk.done();
    dio.done();
}

#[test]
fn stop_releases_data_under_high_clock() {
    let mut clk = PinMock::new(&[
        PinTransaction::set(PinState::Low),
        PinTransaction::set(PinState::High),
    ]);
    let mut dio = PinMock::new(&[
        PinTransaction::set(PinState::Low),
        PinTransaction::set(PinState::High),
    ]);

    bus(&clk, &dio).stop().unwrap();

    clk.done();
    dio.done();
}

#[test]
fn transfer_drives_data_low_on_ack() {
    let mut clk = PinMock::new(&clock_for_byte());
    let mut dio = PinMock::new(&data_for_byte(0xA5, true));

    let ack = bus(&clk, &dio).transfer_byte(0xA5).unwrap();
    assert_eq!(ack, Ack::Acknowledged);

    clk.done();
    dio.done();
}

#[test]
fn transfer_leaves_data_released_without_ack() {
    for value in [0x00, 0xFF] {
        let mut clk = PinMock::new(&clock_for_byte());
        let mut dio = PinMock::new(&data_for_byte(value, false));

        let ack = bus(&clk, &dio).transfer_byte(value).unwrap();
        assert_eq!(ack, Ack::Missing);

        clk.done();
        dio.done();
    }
}

#[test]
fn initialize_sends_one_framed_command() {
    let mut clk_expectations = vec![PinTransaction::set(PinState::High)];
    clk_expectations.push(PinTransaction::set(PinState::High));
    clk_expectations.extend(clock_for_byte());
    clk_expectations.push(PinTransaction::set(PinState::Low));
    clk_expectations.push(PinTransaction::set(PinState::High));

    let mut dio_expectations = vec![PinTransaction::set(PinState::High)];
    dio_expectations.push(PinTransaction::set(PinState::High));
    dio_expectations.push(PinTransaction::set(PinState::Low));
    dio_expectations.extend(data_for_byte(0x8A, true));
    dio_expectations.push(PinTransaction::set(PinState::Low));
    dio_expectations.push(PinTransaction::set(PinState::High));

    let mut clk = PinMock::new(&clk_expectations);
    let mut dio = PinMock::new(&dio_expectations);

    let mut display = Tm1637::new(clk.clone(), OpenDrain::new(dio.clone()), NoopDelay);
    let sent = display.initialize(true, 2).unwrap();
    assert_eq!(sent.value.command(), 0x8A);

    clk.done();
    dio.done();
}

#[test]
fn pin_errors_propagate() {
    let mut clk = PinMock::new(&[PinTransaction::set(PinState::High)
        .with_error(MockError::Io(ErrorKind::NotConnected))]);
    let mut dio = PinMock::new(&[PinTransaction::set(PinState::High)]);

    let mut display = Tm1637::new(clk.clone(), OpenDrain::new(dio.clone()), NoopDelay);
    let result = display.initialize(true, 7);
    assert!(matches!(result, Err(Tm1637Error::PinError(_))));

    clk.done();
    dio.done();
}
