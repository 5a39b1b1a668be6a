//! Register addresses for AS5600 sensor.

/// Register addresses for AS5600
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
#[repr(u8)]
pub enum Register {
    /// Number of times ZPOS and MPOS have been permanently written
    Zmco = 0x00,
    /// Zero (start) position MSB
    ZPosH = 0x01,
    /// Zero (start) position LSB
    ZPosL = 0x02,
    /// Maximum (stop) position MSB
    MPosH = 0x03,
    /// Maximum (stop) position LSB
    MPosL = 0x04,
    /// Maximum angle MSB
    MAngH = 0x05,
    /// Maximum angle LSB
    MAngL = 0x06,
    /// Configuration MSB
    ConfH = 0x07,
    /// Configuration LSB
    ConfL = 0x08,

    /// Magnet status
    Status = 0x0B,
    /// Unscaled and unmodified angle MSB (12-bit)
    RawAngleH = 0x0C,
    /// Unscaled and unmodified angle LSB
    RawAngleL = 0x0D,
    /// Scaled output angle MSB (12-bit)
    AngleH = 0x0E,
    /// Scaled output angle LSB
    AngleL = 0x0F,
    /// Automatic gain control
    Agc = 0x1A,
    /// CORDIC magnitude MSB (12-bit)
    MagnitudeH = 0x1B,
    /// CORDIC magnitude LSB
    MagnitudeL = 0x1C,

    /// Permanent (OTP) write command. Never written by this driver.
    Burn = 0xFF,
}

impl From<Register> for u8 {
    fn from(reg: Register) -> u8 {
        reg as u8
    }
}

/// Status bits that carry the magnet state (MD, ML, MH)
pub const STATUS_MASK: u8 = 0b0011_1000;
/// Masked status value reported when the magnet is detected at a usable distance
pub const MAGNET_OK: u8 = 0x20;
/// Watchdog enable bit in the high configuration byte
pub const WATCHDOG_BIT: u8 = 0x20;
/// Power mode bits in the low configuration byte
pub const POWER_MODE_MASK: u8 = 0b0000_0011;
/// All 12-bit registers (angles, positions, magnitude) share this width
pub const RAW_ANGLE_MASK: u16 = 0x0FFF;

bitfield::bitfield! {
    /// STATUS
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct Status(u8);
    impl Debug;
    /// Magnet was detected
    pub md, _: 5;
    /// AGC maximum gain overflow, magnet too weak
    pub ml, _: 4;
    /// AGC minimum gain overflow, magnet too strong
    pub mh, _: 3;
}

impl Status {
    /// Status byte reduced to the magnet bits
    #[must_use]
    #[inline]
    pub fn masked(&self) -> u8 {
        self.0 & STATUS_MASK
    }

    /// Check if the magnet is detected and neither gain limit is hit
    #[must_use]
    #[inline]
    pub fn magnet_ok(&self) -> bool {
        self.masked() == MAGNET_OK
    }
}

bitfield::bitfield! {
    /// CONF (LSB)
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct ConfigLoRegister(u8);
    impl Debug;
    u8;
    /// PWM frequency
    ///
    /// - `00` = 115 Hz
    /// - `01` = 230 Hz
    /// - `10` = 460 Hz
    /// - `11` = 920 Hz
    pub pwmf, set_pwmf: 7, 6;
    /// Output stage
    ///
    /// - `00` = analog (full range 0% to 100% between GND and VDD)
    /// - `01` = analog (reduced range 10% to 90% between GND and VDD)
    /// - `10` = digital PWM
    pub outs, set_outs: 5, 4;
    /// Hysteresis in LSBs (off, 1, 2, 3)
    pub hyst, set_hyst: 3, 2;
    /// Power mode (see [`PowerMode`])
    pub pm, set_pm: 1, 0;
}

bitfield::bitfield! {
    /// CONF (MSB)
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct ConfigHiRegister(u8);
    impl Debug;
    u8;
    /// Watchdog: low power mode after one minute of less than 4 LSB change
    pub wd, set_wd: 5;
    /// Fast filter threshold
    pub fth, set_fth: 4, 2;
    /// Slow filter (16x, 8x, 4x, 2x)
    pub sf, set_sf: 1, 0;
}

/// Power mode stored in the PM bits of the low configuration byte
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PowerMode {
    /// Always on, 6.5 mA
    #[default]
    Normal = 0,
    /// 5 ms polling, 3.4 mA
    LowPower1 = 1,
    /// 20 ms polling, 1.8 mA
    LowPower2 = 2,
    /// 100 ms polling, 1.5 mA
    LowPower3 = 3,
}

impl From<PowerMode> for u8 {
    fn from(mode: PowerMode) -> u8 {
        mode as u8
    }
}

impl TryFrom<u8> for PowerMode {
    /// The rejected value
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Normal),
            1 => Ok(Self::LowPower1),
            2 => Ok(Self::LowPower2),
            3 => Ok(Self::LowPower3),
            other => Err(other),
        }
    }
}
