//! Blocking driver for AS5600 magnetic position sensor

use embedded_hal::{delay::DelayNs, i2c::I2c};

use crate::{
    diagnostics::MagnetStatus,
    error::Error,
    register::{
        ConfigHiRegister, ConfigLoRegister, POWER_MODE_MASK, PowerMode, RAW_ANGLE_MASK, Register,
        Status, WATCHDOG_BIT,
    },
    utils,
};

/// Fixed 7-bit I2C address of the AS5600
pub const ADDRESS: u8 = 0x36;

/// Delay between selecting a register and reading it back
pub const SETTLE_DELAY_MS: u32 = 2;

/// Driver configuration
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Power mode applied by [`As5600::init`] once the magnet is detected
    pub power_mode: PowerMode,
}

impl Config {
    /// Set the power mode applied on init
    #[must_use]
    pub const fn power_mode(mut self, power_mode: PowerMode) -> Self {
        self.power_mode = power_mode;
        self
    }
}

/// AS5600 driver instance (blocking)
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct As5600<I2C, D> {
    i2c: I2C,
    delay: D,
    config: Config,
    present: bool,
    raw: u16,
    angle: u16,
}

impl<I2C, D, E> As5600<I2C, D>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
{
    /// Create a new AS5600 driver instance
    ///
    /// The bus must already be initialised. No bus traffic happens until
    /// [`Self::init`] is called.
    pub fn new(i2c: I2C, delay: D, config: Config) -> Self {
        Self {
            i2c,
            delay,
            config,
            present: false,
            raw: 0,
            angle: 0,
        }
    }

    /// Release the I2C bus and delay, consuming the driver
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// Read one register byte
    ///
    /// Selects the register, waits [`SETTLE_DELAY_MS`], then reads exactly
    /// one byte back.
    fn read_single_byte(&mut self, register: Register) -> Result<u8, Error<E>> {
        let address = u8::from(register);

        self.i2c
            .write(ADDRESS, &[address])
            .map_err(Error::Communication)?;

        self.delay.delay_ms(SETTLE_DELAY_MS);

        let mut rx = [0u8; 1];
        self.i2c
            .read(ADDRESS, &mut rx)
            .map_err(Error::Communication)?;

        #[cfg(feature = "defmt")]
        defmt::trace!("Register 0x{:02X} value: 0x{:02X}", address, rx[0]);

        Ok(rx[0])
    }

    /// Read a register pair as two separate transactions, MSB strictly first
    ///
    /// The pair is not latched by the chip: a value that changes between the
    /// two reads yields a torn result.
    fn read_two_bytes(&mut self, msb: Register, lsb: Register) -> Result<u16, Error<E>> {
        let msb = self.read_single_byte(msb)?;
        let lsb = self.read_single_byte(lsb)?;

        Ok(utils::combine(msb, lsb))
    }

    fn write_single_byte(&mut self, register: Register, value: u8) -> Result<(), Error<E>> {
        let address = u8::from(register);

        #[cfg(feature = "defmt")]
        defmt::trace!("Writing 0x{:02X} to register 0x{:02X}", value, address);

        self.i2c
            .write(ADDRESS, &[address, value])
            .map_err(Error::Communication)
    }

    /// Write a 12-bit value as MSB then LSB
    fn write_two_bytes(&mut self, msb: Register, lsb: Register, value: u16) -> Result<(), Error<E>> {
        let [hi, lo] = (value & RAW_ANGLE_MASK).to_be_bytes();

        self.write_single_byte(msb, hi)?;
        self.write_single_byte(lsb, lo)
    }

    /// Read-modify-write of one register byte. Not atomic against other bus
    /// users.
    fn modify_register<R>(
        &mut self,
        register: Register,
        f: impl FnOnce(&mut u8) -> R,
    ) -> Result<R, Error<E>> {
        let mut data = self.read_single_byte(register)?;

        let result = f(&mut data);

        self.write_single_byte(register, data)?;

        Ok(result)
    }

    /// Probe for a correctly placed magnet and apply the configured power mode
    ///
    /// Returns the magnet classification. A misplaced or missing magnet is
    /// not an error: the driver simply stays absent and [`Self::measure`]
    /// does nothing. Once present, the driver never becomes absent again.
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails. If the magnet was
    /// detected but applying the power mode fails, the sensor stays present
    /// even though the error is returned; call [`Self::set_power_mode`] to
    /// retry the configuration.
    pub fn init(&mut self) -> Result<MagnetStatus, Error<E>> {
        let status = self.status()?;
        let magnet = MagnetStatus::from(status);

        if magnet.is_ok() {
            self.present = true;
            self.set_power_mode(self.config.power_mode)?;

            #[cfg(feature = "defmt")]
            defmt::info!("AS5600 OK, power mode {}", self.config.power_mode);
        } else {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "AS5600 failure, status 0x{:02X} ({})",
                status.masked(),
                magnet
            );
        }

        Ok(magnet)
    }

    /// Whether a correctly placed magnet was detected by [`Self::init`]
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.present
    }

    /// Set the power mode from its raw `PM` bits
    ///
    /// Values above 3 are rejected without touching the bus.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPowerMode`] for bits above 3, or an error if
    /// I2C communication fails
    pub fn set_power_mode_bits(&mut self, bits: u8) -> Result<(), Error<E>> {
        match PowerMode::try_from(bits) {
            Ok(mode) => self.set_power_mode(mode),
            Err(bits) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Rejected power mode {}", bits);
                Err(Error::InvalidPowerMode(bits))
            }
        }
    }

    /// Set the power mode, preserving the other bits of `CONF` LSB
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn set_power_mode(&mut self, mode: PowerMode) -> Result<(), Error<E>> {
        self.modify_register(Register::ConfL, |v: &mut u8| {
            *v = (*v & !POWER_MODE_MASK) | u8::from(mode);
        })
    }

    /// Enable or disable the watchdog, preserving the other bits of `CONF` MSB
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn set_watchdog(&mut self, enabled: bool) -> Result<(), Error<E>> {
        self.modify_register(Register::ConfH, |v: &mut u8| {
            *v &= !WATCHDOG_BIT;
            if enabled {
                *v |= WATCHDOG_BIT;
            }
        })
    }

    /// Read the raw angle and update the cached raw and degree values
    ///
    /// Does nothing while the sensor is absent. On error the cached values
    /// are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn measure(&mut self) -> Result<(), Error<E>> {
        if !self.present {
            return Ok(());
        }

        let raw = self.read_two_bytes(Register::RawAngleH, Register::RawAngleL)? & RAW_ANGLE_MASK;
        self.raw = raw;
        self.angle = utils::raw_to_degrees(raw);

        Ok(())
    }

    /// Last measured angle in degrees (0-359)
    #[must_use]
    pub fn angle(&self) -> u16 {
        self.angle
    }

    /// Last measured 12-bit raw angle (0-4095)
    #[must_use]
    pub fn raw(&self) -> u16 {
        self.raw
    }

    /// Read `CONF` LSB
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn config_lo(&mut self) -> Result<u8, Error<E>> {
        self.read_single_byte(Register::ConfL)
    }

    /// Read `CONF` MSB
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn config_hi(&mut self) -> Result<u8, Error<E>> {
        self.read_single_byte(Register::ConfH)
    }

    /// Read both configuration bytes as bitfield views
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn config_registers(&mut self) -> Result<(ConfigLoRegister, ConfigHiRegister), Error<E>> {
        let lo = self.config_lo().map(ConfigLoRegister)?;
        let hi = self.config_hi().map(ConfigHiRegister)?;

        Ok((lo, hi))
    }

    /// Read the `STATUS` register
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn status(&mut self) -> Result<Status, Error<E>> {
        self.read_single_byte(Register::Status).map(Status)
    }

    /// Read and classify the magnet status without changing presence
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn magnet_status(&mut self) -> Result<MagnetStatus, Error<E>> {
        self.status().map(MagnetStatus::from)
    }

    /// Automatic gain control value
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn agc(&mut self) -> Result<u8, Error<E>> {
        self.read_single_byte(Register::Agc)
    }

    /// 12-bit magnitude value from CORDIC
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn magnitude(&mut self) -> Result<u16, Error<E>> {
        self.read_two_bytes(Register::MagnitudeH, Register::MagnitudeL)
            .map(|v| v & RAW_ANGLE_MASK)
    }

    /// 12-bit output angle after start/stop position scaling
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn scaled_angle(&mut self) -> Result<u16, Error<E>> {
        self.read_two_bytes(Register::AngleH, Register::AngleL)
            .map(|v| v & RAW_ANGLE_MASK)
    }

    /// Number of permanent writes already performed (0-3)
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn burn_count(&mut self) -> Result<u8, Error<E>> {
        self.read_single_byte(Register::Zmco).map(|v| v & 0b11)
    }

    /// Start (zero) position
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn start_position(&mut self) -> Result<u16, Error<E>> {
        self.read_two_bytes(Register::ZPosH, Register::ZPosL)
            .map(|v| v & RAW_ANGLE_MASK)
    }

    /// Set the start (zero) position in volatile memory
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn set_start_position(&mut self, value: u16) -> Result<(), Error<E>> {
        self.write_two_bytes(Register::ZPosH, Register::ZPosL, value)
    }

    /// Stop (maximum) position
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn stop_position(&mut self) -> Result<u16, Error<E>> {
        self.read_two_bytes(Register::MPosH, Register::MPosL)
            .map(|v| v & RAW_ANGLE_MASK)
    }

    /// Set the stop (maximum) position in volatile memory
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn set_stop_position(&mut self, value: u16) -> Result<(), Error<E>> {
        self.write_two_bytes(Register::MPosH, Register::MPosL, value)
    }

    /// Maximum angular range
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn max_angle(&mut self) -> Result<u16, Error<E>> {
        self.read_two_bytes(Register::MAngH, Register::MAngL)
            .map(|v| v & RAW_ANGLE_MASK)
    }

    /// Set the maximum angular range in volatile memory
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn set_max_angle(&mut self, value: u16) -> Result<(), Error<E>> {
        self.write_two_bytes(Register::MAngH, Register::MAngL, value)
    }
}
