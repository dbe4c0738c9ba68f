//! Rate calculators.
//!
//! Both calculators split the items evenly over the workers (rounding
//! down) and treat a job plus its delay as one tick. They differ in which
//! quantity the caller fixes:
//!
//! - `fixed_duration`: the time budget is fixed, solve for connections.
//! - `fixed_connections`: the connection cap is fixed, solve for time.
//!
//! Arithmetic is done in whole seconds.

use std::time::Duration;

use tracing::debug;

use crawlrate_core::{Constraint, PlanError, PlanResult, Pulse, Timing};

const EXCEEDS_DURATION: &str = "total keyword time exceeds duration";

/// How many connections each worker needs to finish `keyword_count`
/// items inside `time_period`.
///
/// The returned duration is always exactly `time_period`. Time that does
/// not divide evenly into ticks is spread over the ticks as extra delay,
/// so the window is used evenly instead of ending in dead time.
pub fn fixed_duration(
    keyword_count: usize,
    proxy_count: usize,
    avg_job_runtime: Duration,
    minimum_delay: Duration,
    time_period: Duration,
) -> PlanResult<Pulse> {
    let total_keyword_time = job_time(avg_job_runtime, minimum_delay)?;
    let per_proxy = keywords_per_proxy(keyword_count, proxy_count)?;
    let time_period = time_period.as_secs();

    if total_keyword_time > time_period {
        return Err(PlanError::ConstraintViolation(EXCEEDS_DURATION.to_string()));
    }

    // Ticks that fit in the window, rounded down. At least one, since the
    // job time fits.
    let keywords_per_channel = time_period / total_keyword_time;

    // Leftover time becomes extra delay per tick, rounded down so the
    // ticks still fit.
    let remainder = time_period - total_keyword_time * keywords_per_channel;
    let delay_increment = remainder / keywords_per_channel;

    let frequency = total_keyword_time + delay_increment;
    let volume = volume(per_proxy, keywords_per_channel)?;

    let pulse = Pulse::from_secs(volume, frequency, time_period);
    debug!(
        keyword_count,
        proxy_count,
        keywords_per_channel,
        delay_increment,
        %pulse,
        "fixed-duration pulse"
    );
    Ok(pulse)
}

/// How long `keyword_count` items take when each worker is capped at
/// `connection_count` concurrent connections.
///
/// A cap larger than necessary is corrected downward: the returned volume
/// is the smallest one that still needs the same number of ticks, so it
/// never exceeds `connection_count`.
pub fn fixed_connections(
    keyword_count: usize,
    proxy_count: usize,
    avg_job_runtime: Duration,
    minimum_delay: Duration,
    connection_count: u32,
) -> PlanResult<Pulse> {
    if connection_count == 0 {
        return Err(PlanError::InvalidArgument(
            "connection count must be positive".to_string(),
        ));
    }
    let total_keyword_time = job_time(avg_job_runtime, minimum_delay)?;
    let per_proxy = keywords_per_proxy(keyword_count, proxy_count)?;

    // Ticks needed at the cap. A worker with no share still gets one tick
    // so the window is never shorter than a tick.
    let keywords_per_channel = per_proxy.div_ceil(u64::from(connection_count)).max(1);

    let duration = keywords_per_channel
        .checked_mul(total_keyword_time)
        .ok_or_else(|| PlanError::InvalidArgument("plan duration overflows".to_string()))?;
    let volume = volume(per_proxy, keywords_per_channel)?;

    let pulse = Pulse::from_secs(volume, total_keyword_time, duration);
    debug!(
        keyword_count,
        proxy_count,
        connection_count,
        keywords_per_channel,
        %pulse,
        "fixed-connections pulse"
    );
    Ok(pulse)
}

/// Dispatch on the caller's constraint.
pub fn compute_pulse(
    keyword_count: usize,
    proxy_count: usize,
    timing: &Timing,
    constraint: &Constraint,
) -> PlanResult<Pulse> {
    match *constraint {
        Constraint::FixedDuration { time_period } => fixed_duration(
            keyword_count,
            proxy_count,
            timing.avg_job_runtime,
            timing.minimum_delay,
            time_period,
        ),
        Constraint::FixedConnections { max_connections } => fixed_connections(
            keyword_count,
            proxy_count,
            timing.avg_job_runtime,
            timing.minimum_delay,
            max_connections,
        ),
    }
}

fn keywords_per_proxy(keyword_count: usize, proxy_count: usize) -> PlanResult<u64> {
    if proxy_count == 0 {
        return Err(PlanError::InvalidArgument(
            "proxy count must be positive".to_string(),
        ));
    }
    Ok((keyword_count / proxy_count) as u64)
}

fn job_time(avg_job_runtime: Duration, minimum_delay: Duration) -> PlanResult<u64> {
    let total = avg_job_runtime
        .as_secs()
        .checked_add(minimum_delay.as_secs())
        .ok_or_else(|| PlanError::InvalidArgument("job time overflows".to_string()))?;
    if total == 0 {
        return Err(PlanError::InvalidArgument(
            "total keyword time must be at least one second".to_string(),
        ));
    }
    Ok(total)
}

/// `ceil(per_proxy / ticks)`, never below one connection.
fn volume(per_proxy: u64, ticks: u64) -> PlanResult<u32> {
    let volume = per_proxy.div_ceil(ticks).max(1);
    u32::try_from(volume)
        .map_err(|_| PlanError::InvalidArgument(format!("volume {volume} exceeds u32")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn fd(k: usize, p: usize, run: u64, delay: u64, period: u64) -> PlanResult<Pulse> {
        fixed_duration(k, p, secs(run), secs(delay), secs(period))
    }

    fn fc(k: usize, p: usize, run: u64, delay: u64, conns: u32) -> PlanResult<Pulse> {
        fixed_connections(k, p, secs(run), secs(delay), conns)
    }

    #[test]
    fn fixed_duration_table() {
        // (keywords, proxies, runtime, delay, period) → (volume, frequency, duration)
        let cases = [
            // volume
            ((100, 10, 45, 15, 60), (10, 60, 60)),
            ((100, 10, 45, 15, 120), (5, 60, 120)),
            // 30 per minute for 4 minutes, last minute lighter
            ((100, 10, 45, 15, 240), (3, 60, 240)),
            ((45, 15, 45, 15, 180), (1, 60, 180)),
            ((45, 5, 45, 15, 180), (3, 60, 180)),
            ((45, 2, 45, 15, 180), (8, 60, 180)),
            ((100, 10, 45, 15, 480), (2, 60, 480)),
            // leftover time stretches the frequency
            ((100, 10, 45, 15, 70), (10, 70, 70)),
            ((100, 10, 45, 15, 140), (5, 70, 140)),
            // 500s = 8 ticks of 60s with 20s spread as 2s each
            ((100, 10, 45, 15, 500), (2, 62, 500)),
            ((4, 3, 60, 60, 300), (1, 150, 300)),
        ];

        for (i, ((k, p, run, delay, period), (v, f, d))) in cases.into_iter().enumerate() {
            let pulse = fd(k, p, run, delay, period).unwrap();
            assert_eq!(pulse, Pulse::from_secs(v, f, d), "case {i}");
        }
    }

    #[test]
    fn fixed_duration_never_adjusts_the_window() {
        for period in [60, 61, 119, 500, 3600] {
            for keywords in [1, 7, 100, 1000] {
                let pulse = fd(keywords, 3, 45, 15, period).unwrap();
                assert_eq!(pulse.duration, secs(period));
                assert!(pulse.frequency <= pulse.duration);
            }
        }
    }

    #[test]
    fn fixed_duration_rejects_job_longer_than_window() {
        let err = fd(100, 10, 45, 15, 50).unwrap_err();
        assert_eq!(
            err,
            PlanError::ConstraintViolation("total keyword time exceeds duration".to_string())
        );
        assert_eq!(err.to_string(), "total keyword time exceeds duration");
    }

    #[test]
    fn fixed_duration_rejects_zero_divisors() {
        assert!(matches!(fd(100, 0, 45, 15, 60), Err(PlanError::InvalidArgument(_))));
        assert!(matches!(fd(100, 10, 0, 0, 60), Err(PlanError::InvalidArgument(_))));
    }

    #[test]
    fn fixed_connections_table() {
        // (keywords, proxies, runtime, delay, cap) → (volume, frequency, duration)
        let cases = [
            ((10, 10, 45, 15, 1), (1, 60, 60)),
            ((10, 5, 45, 15, 1), (1, 60, 120)),
            ((10, 5, 45, 15, 2), (2, 60, 60)),
            // caps above what is needed are corrected down
            ((10, 10, 45, 15, 2), (1, 60, 60)),
            ((10, 10, 45, 15, 10), (1, 60, 60)),
            ((10, 10, 45, 15, 100_000), (1, 60, 60)),
            // duration grows as the cap shrinks
            ((100, 10, 45, 15, 10), (10, 60, 60)),
            ((100, 10, 45, 15, 9), (5, 60, 120)),
            ((100, 10, 45, 15, 8), (5, 60, 120)),
            ((100, 10, 45, 15, 7), (5, 60, 120)),
            ((100, 10, 45, 15, 6), (5, 60, 120)),
            ((100, 10, 45, 15, 5), (5, 60, 120)),
            ((100, 10, 45, 15, 4), (4, 60, 180)),
            ((100, 10, 45, 15, 3), (3, 60, 240)),
            ((100, 10, 45, 15, 2), (2, 60, 300)),
            ((100, 10, 45, 15, 1), (1, 60, 600)),
        ];

        for (i, ((k, p, run, delay, cap), (v, f, d))) in cases.into_iter().enumerate() {
            let pulse = fc(k, p, run, delay, cap).unwrap();
            assert_eq!(pulse, Pulse::from_secs(v, f, d), "case {i}");
        }
    }

    #[test]
    fn fixed_connections_volume_is_a_fixpoint() {
        for keywords in 0..120 {
            for proxies in 1..6 {
                for cap in 1..12 {
                    let pulse = fc(keywords, proxies, 45, 15, cap).unwrap();
                    assert!(pulse.volume <= cap);
                    let again = fc(keywords, proxies, 45, 15, pulse.volume).unwrap();
                    assert_eq!(again, pulse, "k={keywords} p={proxies} cap={cap}");
                }
            }
        }
    }

    #[test]
    fn fixed_connections_rejects_zero_divisors() {
        assert!(matches!(fc(10, 0, 45, 15, 2), Err(PlanError::InvalidArgument(_))));
        assert!(matches!(fc(10, 5, 45, 15, 0), Err(PlanError::InvalidArgument(_))));
        assert!(matches!(fc(10, 5, 0, 0, 2), Err(PlanError::InvalidArgument(_))));
    }

    #[test]
    fn fewer_keywords_than_proxies_still_yields_one_tick() {
        assert_eq!(fc(2, 5, 45, 15, 3).unwrap(), Pulse::from_secs(1, 60, 60));
        assert_eq!(fd(2, 5, 45, 15, 120).unwrap(), Pulse::from_secs(1, 60, 120));
    }

    #[test]
    fn compute_pulse_dispatches_on_constraint() {
        let timing = Timing::from_secs(45, 15);
        let by_duration = compute_pulse(
            100,
            10,
            &timing,
            &Constraint::FixedDuration { time_period: secs(120) },
        )
        .unwrap();
        assert_eq!(by_duration, Pulse::from_secs(5, 60, 120));

        let by_connections = compute_pulse(
            100,
            10,
            &timing,
            &Constraint::FixedConnections { max_connections: 4 },
        )
        .unwrap();
        assert_eq!(by_connections, Pulse::from_secs(4, 60, 180));
    }
}
