/// Price of `duration` minutes at `hourly_rate`, rounded half up to the
/// nearest unit. `None` on overflow.
pub fn session_price(hourly_rate: i64, duration: u32) -> Option<i64> {
    hourly_rate
        .checked_mul(i64::from(duration))?
        .checked_add(30)
        .map(|total| total / 60)
}
