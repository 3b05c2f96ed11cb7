// End-to-end checks of the public decoding API
use canfd_decoder::{
    decode, dlc_to_length, open_channel, ChannelHandle, FdBitrate, FrameFlags, MonitorConfig,
    RawFrame, ReadOutcome, ReceiveStream, Reception, ScriptedAdapter, StatusCode,
};
use std::thread;

fn raw(id: u32, flags: FrameFlags, dlc: u8, payload: &[u8], ticks: u64) -> RawFrame {
    RawFrame::new(id, flags, dlc, payload.to_vec(), ticks)
}

#[test]
fn dlc_table_matches_canfd() {
    let expected = [0, 1, 2, 3, 4, 5, 6, 7, 8, 12, 16, 20, 24, 32, 48, 64];
    for (dlc, length) in expected.iter().enumerate() {
        assert_eq!(dlc_to_length(dlc as u8), *length, "dlc {}", dlc);
    }
    for dlc in 16..=u8::MAX {
        assert_eq!(dlc_to_length(dlc), 0);
    }
}

#[test]
fn type_label_for_every_flag_combination() {
    // Extra flags never change the classification
    for extra in [FrameFlags::empty(), FrameFlags::FD | FrameFlags::BITRATE_SWITCH] {
        let label = |flags: FrameFlags| decode(&raw(0x10, flags | extra, 0, &[], 0)).type_label();

        assert_eq!(label(FrameFlags::EXTENDED | FrameFlags::REMOTE_REQUEST), "RTR Frame (Extended ID)");
        assert_eq!(label(FrameFlags::EXTENDED), "Extended Frame");
        assert_eq!(label(FrameFlags::REMOTE_REQUEST), "RTR Frame (Standard ID)");
        assert_eq!(label(FrameFlags::empty()), "Standard Frame");
    }
}

#[test]
fn id_text_masks_standard_ids_only() {
    assert_eq!(decode(&raw(0x1ABC, FrameFlags::empty(), 0, &[], 0)).id_text, "ABC");
    assert_eq!(decode(&raw(0x1ABCDE, FrameFlags::EXTENDED, 0, &[], 0)).id_text, "1ABCDE");
}

#[test]
fn remote_frames_never_render_payload() {
    for flags in [FrameFlags::REMOTE_REQUEST, FrameFlags::REMOTE_REQUEST | FrameFlags::EXTENDED] {
        let decoded = decode(&raw(0x55, flags, 15, &[0xFF; 64], 0));
        assert_eq!(decoded.data_text, "Remote Request");
    }
}

#[test]
fn data_and_time_formatting() {
    let decoded = decode(&raw(0x1, FrameFlags::empty(), 3, &[0x0A, 0xFF, 0x01, 0x99], 1_500_000));
    assert_eq!(decoded.data_text, "0A FF 01");
    assert_eq!(decoded.time_seconds, "1.5");

    let decoded = decode(&raw(0x1, FrameFlags::empty(), 0, &[], 999_999));
    assert_eq!(decoded.time_seconds, "1.0");
    assert_eq!(decoded.data_text, "");
}

#[test]
fn end_to_end_fd_frame() {
    let payload: Vec<u8> = (0x10..0x1C).collect();
    let decoded = decode(&raw(0x123, FrameFlags::empty(), 9, &payload, 2_345_678));

    assert_eq!(decoded.type_label(), "Standard Frame");
    assert_eq!(decoded.id_text, "123");
    assert_eq!(decoded.length, 12);
    assert_eq!(decoded.time_seconds, "2.3");
    assert_eq!(decoded.data_text, "10 11 12 13 14 15 16 17 18 19 1A 1B");
    assert!(!decoded.data_truncated);
}

#[test]
fn decoding_from_many_threads() {
    let handles: Vec<_> = (0..8u32)
        .map(|i| {
            thread::spawn(move || {
                let frame = raw(0x100 + i, FrameFlags::FD, 8, &[i as u8; 8], u64::from(i) * 1_000_000);
                decode(&frame)
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let decoded = handle.join().unwrap();
        assert_eq!(decoded.id_text, format!("{:X}", 0x100 + i));
        assert_eq!(decoded.time_seconds, format!("{}.0", i));
    }
}

#[test]
fn receive_loop_over_scripted_channel() {
    let mut adapter = ScriptedAdapter::new(
        ChannelHandle::USB_BUS_1,
        vec![
            ReadOutcome::Empty,
            ReadOutcome::Frame(raw(0x18DA_F110, FrameFlags::EXTENDED | FrameFlags::FD, 10, &[0x22; 16], 100)),
            ReadOutcome::Error { status: StatusCode::BUS_LIGHT },
            ReadOutcome::Empty,
            ReadOutcome::Frame(raw(0x7DF, FrameFlags::REMOTE_REQUEST, 0, &[], 200_000)),
        ],
    );
    open_channel(&mut adapter, &FdBitrate::default()).unwrap();

    let received: Vec<Reception> = ReceiveStream::new(&mut adapter, MonitorConfig::new()).collect();
    assert_eq!(received.len(), 3);

    match &received[0] {
        Reception::Frame(frame) => {
            assert_eq!(frame.type_label(), "Extended Frame");
            assert_eq!(frame.id_text, "18DAF110");
            assert_eq!(frame.length, 16);
            assert!(frame.is_fd);
        }
        other => panic!("expected frame, got {:?}", other),
    }
    assert_eq!(received[1], Reception::Status(StatusCode::BUS_LIGHT));
    match &received[2] {
        Reception::Frame(frame) => {
            assert_eq!(frame.type_label(), "RTR Frame (Standard ID)");
            assert_eq!(frame.time_seconds, "0.2");
        }
        other => panic!("expected frame, got {:?}", other),
    }
}

#[test]
fn independent_channels_coexist() {
    let mut first = ScriptedAdapter::new(
        ChannelHandle::USB_BUS_1,
        vec![ReadOutcome::Frame(raw(0x1, FrameFlags::empty(), 0, &[], 0))],
    );
    let mut second = ScriptedAdapter::new(ChannelHandle(0x52), vec![])
        .with_init_status(StatusCode::ILLEGAL_HARDWARE);

    assert!(open_channel(&mut first, &FdBitrate::default()).is_ok());
    assert!(open_channel(&mut second, &FdBitrate::default()).is_err());

    // The failed channel does not affect the working one
    assert_eq!(ReceiveStream::new(&mut first, MonitorConfig::new()).count(), 1);
}
