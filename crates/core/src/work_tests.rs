// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::{Clock, FakeClock};

#[test]
fn fresh_slot_is_ready() {
    let clock = FakeClock::new();
    let mut slot = WorkSlot::default();
    assert!(slot.try_begin(clock.now()));
    assert!(slot.is_working());
}

#[test]
fn busy_slot_rejects_second_claim() {
    let clock = FakeClock::new();
    let mut slot = WorkSlot::default();
    assert!(slot.try_begin(clock.now()));
    assert!(!slot.try_begin(clock.now()));
}

#[test]
fn delay_is_honored_after_finish() {
    let clock = FakeClock::new();
    let mut slot = WorkSlot::default();
    assert!(slot.try_begin(clock.now()));
    slot.finish(clock.now(), Duration::from_millis(5000));

    clock.advance(Duration::from_millis(4999));
    assert!(!slot.try_begin(clock.now()));

    clock.advance(Duration::from_millis(1));
    assert!(slot.try_begin(clock.now()));
}

#[test]
fn zero_delay_is_immediately_ready() {
    let clock = FakeClock::new();
    let mut slot = WorkSlot::default();
    assert!(slot.try_begin(clock.now()));
    slot.finish(clock.now(), Duration::ZERO);
    assert!(slot.is_ready(clock.now()));
}
