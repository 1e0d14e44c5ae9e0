//! Host-side stand-ins for the register frames and the write latch.

use core::cell::Cell;
use core::ptr::NonNull;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::boxed::Box;

use critical_section::Mutex;

use crate::gpio::Gpio;
use crate::regmap::{GpioCtrlRegs, GpioDataRegs, RegisterMap};
use crate::register::{Protection, Reg, WriteProtect};
use crate::resolve::{Half, Port, QualPort, RegisterId};

pub(crate) const ALL_REGISTERS: [RegisterId; 24] = [
    RegisterId::Direction(Port::A),
    RegisterId::Direction(Port::B),
    RegisterId::Direction(Port::C),
    RegisterId::PullUpDisable(Port::A),
    RegisterId::PullUpDisable(Port::B),
    RegisterId::PullUpDisable(Port::C),
    RegisterId::Mux(Port::A, Half::First),
    RegisterId::Mux(Port::A, Half::Second),
    RegisterId::Mux(Port::B, Half::First),
    RegisterId::Mux(Port::B, Half::Second),
    RegisterId::Mux(Port::C, Half::First),
    RegisterId::Mux(Port::C, Half::Second),
    RegisterId::QualSelect(QualPort::A, Half::First),
    RegisterId::QualSelect(QualPort::A, Half::Second),
    RegisterId::QualSelect(QualPort::B, Half::First),
    RegisterId::QualSelect(QualPort::B, Half::Second),
    RegisterId::QualControl(QualPort::A),
    RegisterId::QualControl(QualPort::B),
    RegisterId::Data(Port::A),
    RegisterId::Data(Port::B),
    RegisterId::Data(Port::C),
    RegisterId::Toggle(Port::A),
    RegisterId::Toggle(Port::B),
    RegisterId::Toggle(Port::C),
];

/// Write latch that counts its transitions.
///
/// Optionally samples one register whenever it opens or closes, which shows
/// whether a store landed inside the unlock/lock bracket.
pub(crate) struct MockLatch {
    open: AtomicBool,
    unlocks: AtomicU32,
    locks: AtomicU32,
    watched: Mutex<Cell<Option<Reg>>>,
    seen_at_unlock: Mutex<Cell<Option<u32>>>,
    seen_at_lock: Mutex<Cell<Option<u32>>>,
}

impl MockLatch {
    pub(crate) fn new() -> Self {
        Self {
            open: AtomicBool::new(false),
            unlocks: AtomicU32::new(0),
            locks: AtomicU32::new(0),
            watched: Mutex::new(Cell::new(None)),
            seen_at_unlock: Mutex::new(Cell::new(None)),
            seen_at_lock: Mutex::new(Cell::new(None)),
        }
    }

    pub(crate) fn watch(&self, reg: Reg) {
        critical_section::with(|cs| self.watched.borrow(cs).set(Some(reg)));
    }

    pub(crate) fn is_open(&self) -> bool {
        self.open.load(Ordering::Relaxed)
    }

    pub(crate) fn unlocks(&self) -> u32 {
        self.unlocks.load(Ordering::Relaxed)
    }

    pub(crate) fn locks(&self) -> u32 {
        self.locks.load(Ordering::Relaxed)
    }

    pub(crate) fn seen_at_unlock(&self) -> Option<u32> {
        critical_section::with(|cs| self.seen_at_unlock.borrow(cs).get())
    }

    pub(crate) fn seen_at_lock(&self) -> Option<u32> {
        critical_section::with(|cs| self.seen_at_lock.borrow(cs).get())
    }

    fn sample(&self, into: &Mutex<Cell<Option<u32>>>) {
        critical_section::with(|cs| {
            if let Some(reg) = self.watched.borrow(cs).get() {
                into.borrow(cs).set(Some(reg.read(u32::MAX)));
            }
        });
    }
}

impl WriteProtect for MockLatch {
    fn unlock(&self) {
        assert!(!self.open.swap(true, Ordering::Relaxed), "latch opened twice");
        self.unlocks.fetch_add(1, Ordering::Relaxed);
        self.sample(&self.seen_at_unlock);
    }

    fn lock(&self) {
        assert!(self.open.swap(false, Ordering::Relaxed), "latch closed while not open");
        self.locks.fetch_add(1, Ordering::Relaxed);
        self.sample(&self.seen_at_lock);
    }
}

/// Register frames in host memory plus a latch.
///
/// Everything is leaked so the bench can hand out `'static` borrows.
pub(crate) struct Bench {
    pub(crate) ctrl: NonNull<GpioCtrlRegs>,
    pub(crate) data: NonNull<GpioDataRegs>,
    pub(crate) map: RegisterMap,
    pub(crate) latch: &'static MockLatch,
}

impl Bench {
    pub(crate) fn new() -> Self {
        let ctrl = NonNull::from(Box::leak(Box::<GpioCtrlRegs>::default()));
        let data = NonNull::from(Box::leak(Box::<GpioDataRegs>::default()));
        Self {
            ctrl,
            data,
            // SAFETY: Both frames are leaked, so they live forever.
            map: unsafe { RegisterMap::new(ctrl, data) },
            latch: Box::leak(Box::new(MockLatch::new())),
        }
    }

    pub(crate) fn gpio(&self) -> Gpio<'static> {
        Gpio::new(self.map, self.latch)
    }

    pub(crate) fn get(&self, id: RegisterId) -> u32 {
        self.map.register(id).read(u32::MAX)
    }

    pub(crate) fn preload(&self, id: RegisterId, value: u32) {
        self.map.register(id).write(u32::MAX, value, Protection::None);
    }

    /// Fill every register with a distinct pattern.
    pub(crate) fn scramble(&self) {
        for (i, id) in ALL_REGISTERS.iter().enumerate() {
            self.preload(*id, 0x9E37_79B9u32.rotate_left(i as u32) ^ (i as u32));
        }
    }

    /// Contents of all registers, in `ALL_REGISTERS` order.
    pub(crate) fn snapshot(&self) -> [u32; 24] {
        ALL_REGISTERS.map(|id| self.get(id))
    }
}
