pub const NUM_POSITIONS: u8 = 4;
pub const MAX_BRIGHTNESS: u8 = 7; // 3 bits
pub const DEFAULT_SETTLE_DELAY_US: u32 = 5;

// position 1 shares its segment byte with the colon
pub const COLON_POSITION: u8 = 0x01;
pub const COLON_MASK: u8 = 0x80;

/// Any digit at or above this value renders as a blank position.
pub const BLANK_DIGIT: u8 = 10;
pub const BLANK: u8 = 0x00;

// gfedcba
pub const DIGITS: [u8; 10] = [0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7D, 0x07, 0x7F, 0x6F];

#[allow(dead_code)]
pub mod command {
    pub const DATA: u8 = 0x40;
    pub const ADDRESS: u8 = 0xC0;
    pub const DISPLAY: u8 = 0x80;

    pub mod data {
        pub const WRITE: u8 = 0x00; // bit 1 clear: write to display register
        pub const READ: u8 = 0x02; // bit 1 set: read key scan data
        pub const AUTO_ADDRESS: u8 = 0x00; // bit 2 clear: address increments after each byte
        pub const FIXED_ADDRESS: u8 = 0x04; // bit 2 set: address stays put
        pub const NORMAL_MODE: u8 = 0x00;
        pub const TEST_MODE: u8 = 0x10; // bit 4 set: chip test mode
    }

    pub mod display {
        pub const OFF: u8 = 0x00;
        pub const ON: u8 = 0x08; // bit 3; bits 2:0 carry brightness
    }
}
