use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

/// Data line of the display bus.
///
/// The line is driven as an output for every data bit and released to an
/// input while the chip answers the acknowledge clock.
pub trait DataLine: InputPin + OutputPin {
    fn set_input_mode(&mut self) -> Result<(), Self::Error>;
    fn set_output_mode(&mut self) -> Result<(), Self::Error>;
}

/// Adapter for pins that are already bidirectional, e.g. an open-drain
/// output with a pull-up. Direction changes are no-ops.
pub struct OpenDrain<P>(P);

impl<P> OpenDrain<P> {
    pub fn new(pin: P) -> Self {
        Self(pin)
    }

    pub fn into_inner(self) -> P {
        self.0
    }
}

impl<P: ErrorType> ErrorType for OpenDrain<P> {
    type Error = P::Error;
}

impl<P: InputPin> InputPin for OpenDrain<P> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.0.is_high()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.0.is_low()
    }
}

impl<P: OutputPin> OutputPin for OpenDrain<P> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set_low()
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set_high()
    }
}

impl<P: InputPin + OutputPin> DataLine for OpenDrain<P> {
    fn set_input_mode(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_output_mode(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Acknowledge bit sampled after each byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ack {
    Acknowledged,
    Missing,
}

impl Ack {
    pub fn from_level(high: bool) -> Self {
        if high {
            Ack::Acknowledged
        } else {
            Ack::Missing
        }
    }

    pub fn is_acknowledged(self) -> bool {
        self == Ack::Acknowledged
    }

    /// Acknowledged only if both are.
    pub fn and(self, other: Ack) -> Ack {
        Ack::from_level(self.is_acknowledged() && other.is_acknowledged())
    }
}

/// Bit-banged clock/data transport.
pub struct Bus<CLK, DIO, DELAY> {
    clk: CLK,
    dio: DIO,
    delay: DELAY,
    settle_delay_us: u32,
}

impl<CLK, DIO, DELAY, E> Bus<CLK, DIO, DELAY>
where
    CLK: OutputPin<Error = E>,
    DIO: DataLine<Error = E>,
    DELAY: DelayNs,
{
    pub fn new(clk: CLK, dio: DIO, delay: DELAY, settle_delay_us: u32) -> Self {
        Self {
            clk,
            dio,
            delay,
            settle_delay_us,
        }
    }

    pub fn release(self) -> (CLK, DIO, DELAY) {
        (self.clk, self.dio, self.delay)
    }

    pub fn settle_delay_us(&self) -> u32 {
        self.settle_delay_us
    }

    /// Drive both lines as outputs, high.
    pub fn idle(&mut self) -> Result<(), E> {
        self.dio.set_output_mode()?;
        self.dio.set_high()?;
        self.clk.set_high()?;
        Ok(())
    }

    /// Data falls while clock is high.
    pub fn start(&mut self) -> Result<(), E> {
        self.dio.set_high()?;
        self.clk.set_high()?;
        self.settle();
        self.dio.set_low()?;
        Ok(())
    }

    /// Data rises while clock is high.
    pub fn stop(&mut self) -> Result<(), E> {
        self.clk.set_low()?;
        self.settle();

        self.dio.set_low()?;
        self.settle();

        self.clk.set_high()?;
        self.settle();

        self.dio.set_high()?;
        Ok(())
    }

    /// Clock out `value` LSB first, then run the acknowledge clock.
    ///
    /// A high level on the released data line counts as acknowledged, and
    /// the master answers it by driving the line low for the ninth clock.
    pub fn transfer_byte(&mut self, value: u8) -> Result<Ack, E> {
        let mut data = value;
        for _ in 0..8 {
            self.clk.set_low()?;
            self.settle();

            if data & 0x01 != 0 {
                self.dio.set_high()?;
            } else {
                self.dio.set_low()?;
            }

            self.clk.set_high()?;
            self.settle();
            data >>= 1;
        }

        self.clk.set_low()?;
        self.dio.set_input_mode()?;
        self.dio.set_high()?;
        self.settle();

        let ack = Ack::from_level(self.dio.is_high()?);
        if ack.is_acknowledged() {
            self.dio.set_output_mode()?;
            self.dio.set_low()?;
        }
        self.settle();

        self.clk.set_high()?;
        self.settle();

        self.clk.set_low()?;
        self.settle();

        self.dio.set_output_mode()?;

        #[cfg(feature = "defmt")]
        defmt::trace!("tm1637: sent {=u8:#x}, {}", value, ack);

        Ok(ack)
    }

    fn settle(&mut self) {
        self.delay.delay_us(self.settle_delay_us);
    }
}
