//! Radio Link Tests
//!
//! Link state machine, join priority, counters and failure handling.

use asc_firmware::hamming::{decode_frame, encode_frame};
use asc_firmware::protocol::{EncodedFrame, UnencodedFrame};
use asc_firmware::radio::link::{LinkAction, LinkInput, LinkState, RadioLink};
use asc_firmware::radio::FrameTransmitter;
use asc_firmware::types::SenderAddress;

const SENDER: SenderAddress = SenderAddress::new([0x47, 0x41, 0x85, 0x89]);

/// Records every frame handed to it
#[derive(Default)]
struct Recorder {
    sent: Vec<EncodedFrame>,
    fail: bool,
}

impl FrameTransmitter for Recorder {
    type Error = ();

    fn send(&mut self, frame: &EncodedFrame) -> Result<(), ()> {
        if self.fail {
            return Err(());
        }
        self.sent.push(*frame);
        Ok(())
    }
}

fn ready(radio: &mut Recorder) -> RadioLink {
    let mut link = RadioLink::new(SENDER);
    assert_eq!(link.step(LinkInput::Nothing, radio), LinkAction::None);
    link
}

// ============================================================================
// State Machine Tests
// ============================================================================

#[test]
fn starts_in_init() {
    let link = RadioLink::new(SENDER);
    assert_eq!(link.state(), LinkState::Init);
    assert!(!link.is_idle());
}

#[test]
fn idle_without_input_stays() {
    let mut radio = Recorder::default();
    let mut link = ready(&mut radio);
    for _ in 0..3 {
        assert_eq!(link.step(LinkInput::Nothing, &mut radio), LinkAction::None);
        assert!(link.is_idle());
    }
    assert!(radio.sent.is_empty());
}

#[test]
fn frame_walks_encode_then_transmit() {
    let mut radio = Recorder::default();
    let mut link = ready(&mut radio);
    let frame = UnencodedFrame::xyz(SENDER, 75, 75, 0);

    assert_eq!(link.step(LinkInput::Frame(frame), &mut radio), LinkAction::Accepted);
    assert_eq!(link.state(), LinkState::Encode(frame));

    assert_eq!(link.step(LinkInput::Nothing, &mut radio), LinkAction::Encoded);
    assert_eq!(link.state(), LinkState::Transmit(encode_frame(&frame)));
    assert!(radio.sent.is_empty());

    assert_eq!(link.step(LinkInput::Nothing, &mut radio), LinkAction::Sent);
    assert!(link.is_idle());
    assert_eq!(radio.sent, vec![encode_frame(&frame)]);
}

#[test]
fn input_ignored_while_busy() {
    let mut radio = Recorder::default();
    let mut link = ready(&mut radio);
    let first = UnencodedFrame::rot(SENDER, 10);
    let second = UnencodedFrame::rot(SENDER, 20);

    link.step(LinkInput::Frame(first), &mut radio);
    link.step(LinkInput::Frame(second), &mut radio);
    link.step(LinkInput::Join, &mut radio);

    assert_eq!(radio.sent.len(), 1);
    assert_eq!(decode_frame(&radio.sent[0]).frame, first);
    assert!(!link.join_in_progress());
}

#[test]
fn join_sends_join_frame() {
    let mut radio = Recorder::default();
    let mut link = ready(&mut radio);

    assert_eq!(link.step(LinkInput::Join, &mut radio), LinkAction::Accepted);
    assert!(link.join_in_progress());
    link.step(LinkInput::Nothing, &mut radio);
    assert_eq!(link.step(LinkInput::Nothing, &mut radio), LinkAction::Sent);
    assert!(!link.join_in_progress());

    assert_eq!(
        decode_frame(&radio.sent[0]).frame.as_bytes(),
        &[0x20, 0x47, 0x41, 0x85, 0x89, b'J', b'O', b'I', b'N', 0, 0, 0, 0, 0, 0, 0]
    );
}

#[test]
fn run_cycle_sends_in_one_call() {
    let mut radio = Recorder::default();
    let mut link = ready(&mut radio);
    let frame = UnencodedFrame::vac(SENDER, true);
    assert_eq!(link.run_cycle(LinkInput::Frame(frame), &mut radio), LinkAction::Sent);
    assert_eq!(link.run_cycle(LinkInput::Nothing, &mut radio), LinkAction::None);
    assert_eq!(radio.sent.len(), 1);
}

// ============================================================================
// Join Priority Tests
// ============================================================================

#[test]
fn select_prefers_join() {
    let mut polled = false;
    let input = LinkInput::select(true, || {
        polled = true;
        Some(UnencodedFrame::default())
    });
    assert_eq!(input, LinkInput::Join);
    assert!(!polled, "queue must not be read while a join is pending");
}

#[test]
fn select_falls_back_to_queue() {
    let frame = UnencodedFrame::rot(SENDER, 30);
    assert_eq!(LinkInput::select(false, || Some(frame)), LinkInput::Frame(frame));
    assert_eq!(LinkInput::select(false, || None), LinkInput::Nothing);
}

// ============================================================================
// Counter and Failure Tests
// ============================================================================

#[test]
fn counters_split_joins_and_frames() {
    let mut radio = Recorder::default();
    let mut link = ready(&mut radio);

    link.run_cycle(LinkInput::Join, &mut radio);
    link.run_cycle(LinkInput::Frame(UnencodedFrame::rot(SENDER, 10)), &mut radio);
    link.run_cycle(LinkInput::Frame(UnencodedFrame::rot(SENDER, 20)), &mut radio);

    let stats = link.stats();
    assert_eq!(stats.joins_sent, 1);
    assert_eq!(stats.frames_sent, 2);
    assert_eq!(stats.send_failures, 0);
}

#[test]
fn failed_send_is_dropped_not_retried() {
    let mut radio = Recorder {
        fail: true,
        ..Recorder::default()
    };
    let mut link = ready(&mut radio);

    let action = link.run_cycle(LinkInput::Frame(UnencodedFrame::rot(SENDER, 10)), &mut radio);
    assert_eq!(action, LinkAction::SendFailed);
    assert!(link.is_idle());
    assert_eq!(link.stats().send_failures, 1);
    assert_eq!(link.stats().frames_sent, 0);

    radio.fail = false;
    assert_eq!(link.run_cycle(LinkInput::Nothing, &mut radio), LinkAction::None);
    assert!(radio.sent.is_empty());
}

#[test]
fn failed_join_clears_progress() {
    let mut radio = Recorder {
        fail: true,
        ..Recorder::default()
    };
    let mut link = ready(&mut radio);
    link.run_cycle(LinkInput::Join, &mut radio);
    assert!(!link.join_in_progress());
    assert_eq!(link.stats().joins_sent, 0);
}

#[test]
fn transmitter_through_mut_ref() {
    let mut radio = Recorder::default();
    let mut link = ready(&mut radio);
    let mut by_ref = &mut radio;
    link.run_cycle(LinkInput::Join, &mut by_ref);
    assert_eq!(radio.sent.len(), 1);
}
