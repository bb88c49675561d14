// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_clock_only_moves_when_advanced() {
    let clock = FakeClock::new();
    let t1 = clock.now();
    assert_eq!(clock.now(), t1);

    clock.advance(Duration::from_millis(5000));
    assert_eq!(clock.now().duration_since(t1), Duration::from_millis(5000));
}

#[test]
fn fake_clock_clones_share_time() {
    let clock = FakeClock::new();
    let other = clock.clone();
    let start = other.now();
    clock.advance(Duration::from_secs(1));
    assert_eq!(other.now().duration_since(start), Duration::from_secs(1));
}
