#![no_std]

mod bus;
mod constants;

pub use bus::{Ack, Bus, DataLine, OpenDrain};
pub use constants::*;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use num_traits::ToPrimitive;

/// What to do when the display does not acknowledge a byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AckPolicy {
    /// Report the missing ack in the returned value only.
    #[default]
    Ignore,
    /// Fail the operation with [`Tm1637Error::NotAcknowledged`].
    Require,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub settle_delay_us: u32,
    pub ack_policy: AckPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settle_delay_us: DEFAULT_SETTLE_DELAY_US,
            ack_policy: AckPolicy::Ignore,
        }
    }
}

/// Power state and brightness as last sent to the chip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    pub enabled: bool,
    pub brightness: u8,
}

impl DisplayConfig {
    /// Brightness above [`MAX_BRIGHTNESS`] is clamped.
    pub fn new(enabled: bool, brightness: u8) -> Self {
        Self {
            enabled,
            brightness: brightness.min(MAX_BRIGHTNESS),
        }
    }

    pub fn command(&self) -> u8 {
        let power = if self.enabled {
            command::display::ON
        } else {
            command::display::OFF
        };
        command::DISPLAY | power | self.brightness
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::new(true, MAX_BRIGHTNESS)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SegmentWrite {
    /// Position after masking to the display's range.
    pub position: u8,
    pub segments: u8,
}

/// Value actually sent to the chip, with the combined acknowledge of
/// every byte it took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transmitted<T> {
    pub value: T,
    pub ack: Ack,
}

/// Segment pattern for a decimal digit, blank for anything above 9.
pub fn digit_segments(digit: u8) -> u8 {
    DIGITS.get(digit as usize).copied().unwrap_or(BLANK)
}

pub struct Tm1637<CLK, DIO, DELAY> {
    bus: Bus<CLK, DIO, DELAY>,
    ack_policy: AckPolicy,
    config: DisplayConfig,
    segments: u8, // last byte rendered at COLON_POSITION
}

impl<CLK, DIO, DELAY, E> Tm1637<CLK, DIO, DELAY>
where
    CLK: OutputPin<Error = E>,
    DIO: DataLine<Error = E>,
    DELAY: DelayNs,
{
    pub fn new(clk: CLK, dio: DIO, delay: DELAY) -> Self {
        Self::with_config(clk, dio, delay, Config::default())
    }

    pub fn with_config(clk: CLK, dio: DIO, delay: DELAY, config: Config) -> Self {
        Self {
            bus: Bus::new(clk, dio, delay, config.settle_delay_us),
            ack_policy: config.ack_policy,
            config: DisplayConfig::default(),
            segments: 0xFF,
        }
    }

    pub fn destroy(self) -> (CLK, DIO, DELAY) {
        self.bus.release()
    }

    pub fn config(&self) -> DisplayConfig {
        self.config
    }

    pub fn segments(&self) -> u8 {
        self.segments
    }

    pub fn colon(&self) -> bool {
        self.segments & COLON_MASK != 0
    }

    /// Put both lines in their idle state and send the initial display
    /// control command. Call once, before anything else.
    pub fn initialize(
        &mut self,
        enabled: bool,
        brightness: u8,
    ) -> Result<Transmitted<DisplayConfig>, Tm1637Error<E>> {
        self.bus.idle()?;
        self.send_display_config(enabled, brightness)
    }

    pub fn enable(&mut self, on: bool) -> Result<Transmitted<DisplayConfig>, Tm1637Error<E>> {
        self.send_display_config(on, self.config.brightness)
    }

    pub fn set_brightness(
        &mut self,
        brightness: u8,
    ) -> Result<Transmitted<DisplayConfig>, Tm1637Error<E>> {
        self.send_display_config(self.config.enabled, brightness)
    }

    pub fn display_digit(
        &mut self,
        position: u8,
        digit: u8,
    ) -> Result<Transmitted<SegmentWrite>, Tm1637Error<E>> {
        let position = mask_position(position);
        let mut segments = digit_segments(digit);

        if position == COLON_POSITION {
            segments |= self.segments & COLON_MASK;
            self.segments = segments;
        }

        self.write_segments_at(position, segments)
    }

    /// Re-renders the colon position with the last digit shown there.
    pub fn display_colon(&mut self, on: bool) -> Result<Transmitted<SegmentWrite>, Tm1637Error<E>> {
        if on {
            self.segments |= COLON_MASK;
        } else {
            self.segments &= !COLON_MASK;
        }
        self.write_segments_at(COLON_POSITION, self.segments)
    }

    /// Blank every position. The colon cache is left alone.
    pub fn clear(&mut self) -> Result<Ack, Tm1637Error<E>> {
        let mut ack = Ack::Acknowledged;
        for position in 0..NUM_POSITIONS {
            ack = ack.and(self.write_segments_at(position, BLANK)?.ack);
        }
        Ok(ack)
    }

    /// Show `number` in decimal across all positions, zero padded.
    pub fn display_number<T>(&mut self, number: T) -> Result<Ack, Tm1637Error<E>>
    where
        T: ToPrimitive,
    {
        let mut num = number.to_u32().ok_or(Tm1637Error::InvalidValue)?;
        if num >= 10u32.pow(NUM_POSITIONS as u32) {
            return Err(Tm1637Error::InvalidValue);
        }

        let mut ack = Ack::Acknowledged;
        for i in 0..NUM_POSITIONS {
            let digit = (num % 10) as u8;
            ack = ack.and(self.display_digit(NUM_POSITIONS - 1 - i, digit)?.ack);
            num /= 10;
        }
        Ok(ack)
    }

    /// Store the new power state and brightness and send them as one
    /// display control command.
    pub fn send_display_config(
        &mut self,
        enabled: bool,
        brightness: u8,
    ) -> Result<Transmitted<DisplayConfig>, Tm1637Error<E>> {
        self.config = DisplayConfig::new(enabled, brightness);

        #[cfg(feature = "defmt")]
        defmt::debug!("tm1637: display config {}", self.config);

        let ack = self.transmit_command(self.config.command())?;
        self.checked(self.config, ack)
    }

    pub fn send_command(&mut self, value: u8) -> Result<Transmitted<u8>, Tm1637Error<E>> {
        let ack = self.transmit_command(value)?;
        self.checked(value, ack)
    }

    /// Latch fixed-address write mode, then send address and segment byte
    /// in a single transaction.
    pub fn write_segments_at(
        &mut self,
        position: u8,
        segments: u8,
    ) -> Result<Transmitted<SegmentWrite>, Tm1637Error<E>> {
        let position = mask_position(position);
        let mode = self.transmit_command(command::DATA | command::data::FIXED_ADDRESS)?;

        self.bus.start()?;
        let address = self.bus.transfer_byte(command::ADDRESS | position)?;
        let data = self.bus.transfer_byte(segments)?;
        self.bus.stop()?;

        self.checked(
            SegmentWrite { position, segments },
            mode.and(address).and(data),
        )
    }

    fn transmit_command(&mut self, value: u8) -> Result<Ack, E> {
        self.bus.start()?;
        let ack = self.bus.transfer_byte(value)?;
        self.bus.stop()?;
        Ok(ack)
    }

    fn checked<T>(&self, value: T, ack: Ack) -> Result<Transmitted<T>, Tm1637Error<E>> {
        if !ack.is_acknowledged() {
            #[cfg(feature = "defmt")]
            defmt::warn!("tm1637: display did not acknowledge");

            if self.ack_policy == AckPolicy::Require {
                return Err(Tm1637Error::NotAcknowledged);
            }
        }
        Ok(Transmitted { value, ack })
    }
}

fn mask_position(position: u8) -> u8 {
    position & (NUM_POSITIONS - 1)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tm1637Error<E> {
    PinError(E),
    NotAcknowledged,
    InvalidValue,
}

impl<E> From<E> for Tm1637Error<E> {
    fn from(error: E) -> Self {
        Tm1637Error::PinError(error)
    }
}
