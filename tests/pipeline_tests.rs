//! End-to-End Pipeline Tests
//!
//! Key mailbox, outbound queue and join signal, then the full path from a
//! key press to decoded bytes on the far side of a noisy channel.

use asc_firmware::config::{OUTBOUND_QUEUE_DEPTH, SENDER_ADDRESS};
use asc_firmware::controller::fsm::{Controller, ControllerAction};
use asc_firmware::hamming::decode_frame;
use asc_firmware::protocol::{parse, ControlMessage, EncodedFrame, UnencodedFrame};
use asc_firmware::radio::link::{LinkInput, RadioLink};
use asc_firmware::radio::FrameTransmitter;
use asc_firmware::sync::{JoinSignal, KeyMailbox, OutboundQueue, QueueFull};
use asc_firmware::types::KeyEvent;
use embassy_futures::block_on;

/// Channel that flips one bit in every codeword before delivery
#[derive(Default)]
struct NoisyChannel {
    delivered: Vec<EncodedFrame>,
    flip: u8,
}

impl FrameTransmitter for NoisyChannel {
    type Error = core::convert::Infallible;

    fn send(&mut self, frame: &EncodedFrame) -> Result<(), Self::Error> {
        let mut noisy = *frame;
        for codeword in noisy.as_bytes_mut() {
            *codeword ^= 1 << (self.flip % 8);
            self.flip = self.flip.wrapping_add(3);
        }
        self.delivered.push(noisy);
        Ok(())
    }
}

/// Controller, link and the shared objects between them
struct Rig {
    keys: KeyMailbox,
    join: JoinSignal,
    queue: OutboundQueue,
    controller: Controller,
    link: RadioLink,
    air: NoisyChannel,
}

impl Rig {
    fn new() -> Self {
        Self {
            keys: KeyMailbox::new(),
            join: JoinSignal::new(),
            queue: OutboundQueue::new(),
            controller: Controller::new(SENDER_ADDRESS),
            link: RadioLink::new(SENDER_ADDRESS),
            air: NoisyChannel::default(),
        }
    }

    /// One pacing tick of each task
    fn tick(&mut self) {
        let key = if self.controller.is_idle() { self.keys.take() } else { None };
        if let ControllerAction::Enqueue(frame) = self.controller.step(key) {
            let _ = self.queue.push(frame);
        }

        let input = if self.link.is_idle() {
            let queue = &self.queue;
            LinkInput::select(self.join.take(), || queue.pop())
        } else {
            LinkInput::Nothing
        };
        self.link.step(input, &mut self.air);
    }

    fn received(&self) -> Vec<ControlMessage> {
        self.air
            .delivered
            .iter()
            .filter_map(|encoded| parse(&decode_frame(encoded).frame).ok())
            .map(|(_, message)| message)
            .collect()
    }
}

// ============================================================================
// Key Mailbox Tests
// ============================================================================

#[test]
fn mailbox_empty() {
    let keys = KeyMailbox::new();
    assert!(!keys.is_pending());
    assert_eq!(keys.take(), None);
}

#[test]
fn mailbox_take_clears() {
    let keys = KeyMailbox::new();
    keys.post(KeyEvent::K4);
    assert!(keys.is_pending());
    assert_eq!(keys.take(), Some(KeyEvent::K4));
    assert_eq!(keys.take(), None);
}

#[test]
fn mailbox_auto_clear_drops_others() {
    let keys = KeyMailbox::new();
    keys.post(KeyEvent::K0);
    keys.post(KeyEvent::K2);
    assert_eq!(keys.take(), Some(KeyEvent::K2));
    assert_eq!(keys.take(), None);
}

// ============================================================================
// Join Signal Tests
// ============================================================================

#[test]
fn join_consumed_once() {
    let join = JoinSignal::new();
    assert!(!join.take());
    join.raise();
    join.raise();
    assert!(join.is_raised());
    assert!(join.take());
    assert!(!join.take());
}

// ============================================================================
// Outbound Queue Tests
// ============================================================================

#[test]
fn queue_is_fifo() {
    let queue = OutboundQueue::new();
    let a = UnencodedFrame::rot(SENDER_ADDRESS, 10);
    let b = UnencodedFrame::rot(SENDER_ADDRESS, 20);
    queue.push(a).unwrap();
    queue.push(b).unwrap();
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.pop(), Some(a));
    assert_eq!(queue.pop(), Some(b));
    assert!(queue.is_empty());
}

#[test]
fn queue_full_drops_newest() {
    let queue = OutboundQueue::new();
    for angle in 0..OUTBOUND_QUEUE_DEPTH {
        queue.push(UnencodedFrame::rot(SENDER_ADDRESS, angle as u8)).unwrap();
    }
    let extra = UnencodedFrame::join(SENDER_ADDRESS);
    assert_eq!(queue.push(extra), Err(QueueFull(extra)));
    assert_eq!(queue.len(), OUTBOUND_QUEUE_DEPTH);
    assert_eq!(queue.dropped(), 1);
    assert_eq!(queue.pop(), Some(UnencodedFrame::rot(SENDER_ADDRESS, 0)));
}

#[test]
fn queue_accepts_again_after_pop() {
    let queue = OutboundQueue::new();
    for angle in 0..OUTBOUND_QUEUE_DEPTH {
        queue.push(UnencodedFrame::rot(SENDER_ADDRESS, angle as u8)).unwrap();
    }
    assert!(queue.push(UnencodedFrame::join(SENDER_ADDRESS)).is_err());
    assert!(queue.pop().is_some());
    assert!(queue.push(UnencodedFrame::join(SENDER_ADDRESS)).is_ok());
    assert_eq!(queue.dropped(), 1);
}

#[test]
fn queue_next_yields_oldest() {
    let queue = OutboundQueue::new();
    let a = UnencodedFrame::vac(SENDER_ADDRESS, true);
    queue.push(a).unwrap();
    queue.push(UnencodedFrame::join(SENDER_ADDRESS)).unwrap();
    assert_eq!(block_on(queue.next()), a);
    assert_eq!(queue.len(), 1);
}

#[test]
fn queue_in_a_static() {
    static FRAMES: OutboundQueue = OutboundQueue::new();
    let frame = UnencodedFrame::rot(SENDER_ADDRESS, 30);
    FRAMES.push(frame).unwrap();
    assert_eq!(FRAMES.pop(), Some(frame));
    assert_eq!(FRAMES.pop(), None);
}

// ============================================================================
// Pipeline Tests
// ============================================================================

#[test]
fn key_press_reaches_receiver() {
    let mut rig = Rig::new();
    rig.keys.post(KeyEvent::K1);
    for _ in 0..10 {
        rig.tick();
    }
    assert_eq!(rig.received(), vec![ControlMessage::Xyz { x: 0, y: 150, z: 0 }]);
    assert_eq!(rig.link.stats().frames_sent, 1);
}

#[test]
fn noise_is_corrected_end_to_end() {
    let mut rig = Rig::new();
    for key in [KeyEvent::K9, KeyEvent::KB, KeyEvent::KC, KeyEvent::K0] {
        rig.keys.post(key);
        for _ in 0..8 {
            rig.tick();
        }
    }
    assert_eq!(
        rig.received(),
        vec![
            ControlMessage::Xyz { x: 150, y: 0, z: 0 },
            ControlMessage::Xyz { x: 150, y: 0, z: 10 },
            ControlMessage::Rot { angle: 10 },
            ControlMessage::Vac { on: true },
        ]
    );
    for encoded in &rig.air.delivered {
        assert_eq!(usize::from(decode_frame(encoded).parity_differ), 32);
    }
}

#[test]
fn join_preempts_queued_frames() {
    let mut rig = Rig::new();
    // Let both machines reach IDLE
    rig.tick();

    let _ = rig.queue.push(UnencodedFrame::rot(SENDER_ADDRESS, 10));
    rig.join.raise();
    for _ in 0..8 {
        rig.tick();
    }

    assert_eq!(
        rig.received(),
        vec![ControlMessage::Join, ControlMessage::Rot { angle: 10 }]
    );
    assert_eq!(rig.link.stats().joins_sent, 1);
    assert_eq!(rig.link.stats().frames_sent, 1);
}

#[test]
fn sender_survives_the_channel() {
    let mut rig = Rig::new();
    rig.tick();
    rig.join.raise();
    for _ in 0..4 {
        rig.tick();
    }
    let decoded = decode_frame(&rig.air.delivered[0]).frame;
    assert_eq!(parse(&decoded).map(|(sender, _)| sender), Ok(SENDER_ADDRESS));
}
