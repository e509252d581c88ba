use instant::{Duration, Instant};
use map_app::clock::Clock;

#[test]
fn should_measure_time_between_ticks() {
    let mut clock = Clock::new();
    let start = Instant::now();

    let first = clock.tick_at(start + Duration::from_millis(10));
    let second = clock.tick_at(start + Duration::from_millis(26));

    assert_eq!(first.frame_index, 0);
    assert_eq!(second.frame_index, 1);
    assert_eq!(second.dt, Duration::from_millis(16));
    assert!(second.elapsed > first.elapsed);
    assert_eq!(clock.frame_index(), 2);
}

#[test]
fn should_cap_long_frames() {
    let mut clock = Clock::new();
    let start = Instant::now();
    clock.tick_at(start);

    let stalled = clock.tick_at(start + Duration::from_secs(5));
    assert_eq!(stalled.dt, Duration::from_millis(250));
}
