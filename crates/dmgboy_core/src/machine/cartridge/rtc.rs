use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

/// Days counter is nine bits wide.
const DAYS_MODULUS: u64 = 512;

/// Counter values as exposed through register selects 0x08-0x0C.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RtcRegisters {
    pub seconds: u8,
    pub minutes: u8,
    pub hours: u8,
    pub days: u16,
    pub halt: bool,
    pub carry: bool,
}

impl RtcRegisters {
    /// Register 0x0C: bit 0 = day bit 8, bit 6 = halt, bit 7 = day carry.
    pub fn control_byte(&self) -> u8 {
        ((self.days >> 8) as u8 & 0x01)
            | if self.halt { 0x40 } else { 0 }
            | if self.carry { 0x80 } else { 0 }
    }

    pub fn read(&self, select: u8) -> u8 {
        match select {
            0x08 => self.seconds & 0x3F,
            0x09 => self.minutes & 0x3F,
            0x0A => self.hours & 0x1F,
            0x0B => self.days as u8,
            0x0C => self.control_byte(),
            _ => 0xFF,
        }
    }

    fn advance(&mut self, secs: u64) {
        let mut t = secs + self.seconds as u64;
        self.seconds = (t % 60) as u8;
        t = t / 60 + self.minutes as u64;
        self.minutes = (t % 60) as u8;
        t = t / 60 + self.hours as u64;
        self.hours = (t % 24) as u8;
        t = t / 24 + self.days as u64;
        if t >= DAYS_MODULUS {
            self.carry = true;
        }
        self.days = (t % DAYS_MODULUS) as u16;
    }
}

/// MBC3 real-time clock.
///
/// The live counters are brought up to date from wall-clock time lazily,
/// whenever the game latches or writes them. Only whole seconds are
/// consumed, so the fractional remainder carries into the next sync.
/// Reads always observe the latched copy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rtc {
    live: RtcRegisters,
    latched: RtcRegisters,
    last_sync: SystemTime,
}

impl Rtc {
    pub fn new(now: SystemTime) -> Self {
        Self {
            live: RtcRegisters::default(),
            latched: RtcRegisters::default(),
            last_sync: now,
        }
    }

    pub fn live(&self) -> &RtcRegisters {
        &self.live
    }

    pub fn latched(&self) -> &RtcRegisters {
        &self.latched
    }

    pub fn sync(&mut self, now: SystemTime) {
        if self.live.halt {
            self.last_sync = now;
            return;
        }
        // A clock that went backwards contributes nothing.
        let elapsed = now.duration_since(self.last_sync).unwrap_or_default();
        let secs = elapsed.as_secs();
        if secs == 0 {
            return;
        }
        self.last_sync += Duration::from_secs(secs);
        self.live.advance(secs);
    }

    pub fn latch(&mut self, now: SystemTime) {
        self.sync(now);
        self.latched = self.live;
    }

    pub fn read(&self, select: u8) -> u8 {
        self.latched.read(select)
    }

    pub fn write(&mut self, select: u8, value: u8, now: SystemTime) {
        self.sync(now);
        match select {
            0x08 => {
                self.live.seconds = value & 0x3F;
                // Writing seconds restarts the sub-second phase.
                self.last_sync = now;
            }
            0x09 => self.live.minutes = value & 0x3F,
            0x0A => self.live.hours = value & 0x1F,
            0x0B => self.live.days = (self.live.days & 0x100) | value as u16,
            0x0C => {
                self.live.days = (self.live.days & 0xFF) | ((value as u16 & 0x01) << 8);
                self.live.halt = value & 0x40 != 0;
                self.live.carry = value & 0x80 != 0;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000 + secs)
    }

    #[test]
    fn latch_captures_elapsed_time() {
        let mut rtc = Rtc::new(at(0));
        rtc.latch(at(3_661));
        assert_eq!(rtc.read(0x08), 1);
        assert_eq!(rtc.read(0x09), 1);
        assert_eq!(rtc.read(0x0A), 1);
        assert_eq!(rtc.read(0x0B), 0);
    }

    #[test]
    fn reads_hold_until_next_latch() {
        let mut rtc = Rtc::new(at(0));
        rtc.latch(at(5));
        rtc.write(0x09, 10, at(20));
        assert_eq!(rtc.read(0x08), 5);
        assert_eq!(rtc.read(0x09), 0);
        rtc.latch(at(20));
        assert_eq!(rtc.read(0x08), 20);
        assert_eq!(rtc.read(0x09), 10);
    }

    #[test]
    fn fractional_seconds_are_carried() {
        let base = at(0);
        let mut rtc = Rtc::new(base);
        rtc.latch(base + Duration::from_millis(1_600));
        assert_eq!(rtc.read(0x08), 1);
        rtc.latch(base + Duration::from_millis(2_100));
        assert_eq!(rtc.read(0x08), 2);
    }

    #[test]
    fn halt_freezes_counters() {
        let mut rtc = Rtc::new(at(0));
        rtc.write(0x0C, 0x40, at(10));
        rtc.latch(at(500));
        assert_eq!(rtc.read(0x08), 10);
        assert_eq!(rtc.read(0x0C), 0x40);

        rtc.write(0x0C, 0x00, at(500));
        rtc.latch(at(503));
        assert_eq!(rtc.read(0x08), 13);
    }

    #[test]
    fn day_counter_overflow_sets_carry() {
        let mut rtc = Rtc::new(at(0));
        rtc.write(0x0B, 0xFF, at(0));
        rtc.write(0x0C, 0x01, at(0));
        rtc.latch(at(86_400));
        assert_eq!(rtc.read(0x0B), 0x00);
        assert_eq!(rtc.read(0x0C), 0x80);
    }

    #[test]
    fn writes_mask_to_register_width() {
        let mut rtc = Rtc::new(at(0));
        rtc.write(0x08, 0xFF, at(0));
        rtc.write(0x0A, 0xFF, at(0));
        rtc.latch(at(0));
        assert_eq!(rtc.read(0x08), 0x3F);
        assert_eq!(rtc.read(0x0A), 0x1F);
    }
}
