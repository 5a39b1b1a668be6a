/// Error type for AS5600 operations
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the sensor
    Communication(E),
    /// Power mode bits outside `0..=3`; nothing was sent to the sensor
    InvalidPowerMode(u8),
}
