use crate::register::RAW_ANGLE_MASK;

/// Full-scale span of a 12-bit reading, used as the input range of the
/// degree conversion
pub const RAW_ANGLE_MAX: u16 = RAW_ANGLE_MASK + 1;

/// Upper end of the degree output range
pub const DEGREES_MAX: u16 = 359;

/// Linearly re-map `x` from `[in_min, in_max]` to `[out_min, out_max]`,
/// truncating toward zero
pub fn map_range(x: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Convert a 12-bit raw angle to whole degrees in `0..=359`
pub fn raw_to_degrees(raw: u16) -> u16 {
    let degrees = map_range(
        i32::from(raw),
        0,
        i32::from(RAW_ANGLE_MAX),
        0,
        i32::from(DEGREES_MAX),
    );
    u16::try_from(degrees).unwrap_or(DEGREES_MAX)
}

/// Join two register bytes, MSB first
pub fn combine(msb: u8, lsb: u8) -> u16 {
    (u16::from(msb) << 8) | u16::from(lsb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degree_boundaries() {
        assert_eq!(raw_to_degrees(0), 0);
        assert_eq!(raw_to_degrees(1), 0);
        assert_eq!(raw_to_degrees(2048), 179);
        assert_eq!(raw_to_degrees(4095), 358);
        assert_eq!(raw_to_degrees(RAW_ANGLE_MAX), 359);
    }

    #[test]
    fn degrees_follow_floor_formula() {
        for raw in (0..RAW_ANGLE_MAX).step_by(7) {
            let expected = u32::from(raw) * 359 / 4096;
            assert_eq!(u32::from(raw_to_degrees(raw)), expected, "raw = {raw}");
        }
    }

    #[test]
    fn map_range_truncates_toward_zero() {
        assert_eq!(map_range(5, 0, 10, 0, 3), 1);
        assert_eq!(map_range(-5, 0, 10, 0, 3), -1);
        assert_eq!(map_range(10, 0, 10, 100, 200), 200);
    }

    #[test]
    fn combines_msb_first() {
        assert_eq!(combine(0x08, 0x00), 2048);
        assert_eq!(combine(0x0F, 0xFF), 4095);
        assert_eq!(combine(0x00, 0x01), 1);
    }
}
